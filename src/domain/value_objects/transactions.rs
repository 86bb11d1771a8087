use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::transactions::TransactionEntity,
    value_objects::enums::{plan_types::PlanType, transaction_statuses::TransactionStatus},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionModel {
    pub id: i64,
    pub trx_id: String,
    pub user_id: Uuid,
    pub amount: f64,
    pub plan_type: PlanType,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl TryFrom<TransactionEntity> for TransactionModel {
    type Error = anyhow::Error;

    fn try_from(entity: TransactionEntity) -> Result<Self, Self::Error> {
        let plan_type = PlanType::from_str(&entity.plan_type)
            .ok_or_else(|| anyhow!("unknown plan type stored: {}", entity.plan_type))?;

        Ok(Self {
            id: entity.id,
            trx_id: entity.trx_id,
            user_id: entity.user_id,
            amount: entity.amount,
            plan_type,
            status: TransactionStatus::from_str(&entity.status).unwrap_or_default(),
            created_at: entity.created_at,
            approved_at: entity.approved_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertTransactionModel {
    pub trx_id: String,
    pub amount: f64,
    pub plan_type: PlanType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkApproveModel {
    pub trx_ids: Vec<String>,
}

/// Payload posted by the SMS forwarding automation when the merchant wallet
/// receives money.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsWebhookModel {
    pub trx_id: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantSubscriptionModel {
    pub user_id: Uuid,
    pub plan_type: PlanType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInfoModel {
    pub merchant_number: String,
    pub qr_code_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListTransactionsFilter {
    pub status: Option<String>,
}
