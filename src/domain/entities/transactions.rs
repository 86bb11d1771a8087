use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::transactions;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = transactions)]
pub struct TransactionEntity {
    pub id: i64,
    pub trx_id: String,
    pub user_id: Uuid,
    pub amount: f64,
    pub plan_type: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = transactions)]
pub struct InsertTransactionEntity {
    pub trx_id: String,
    pub user_id: Uuid,
    pub amount: f64,
    pub plan_type: String,
    pub status: String,
}
