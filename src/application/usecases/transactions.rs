use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::transactions::InsertTransactionEntity,
    repositories::{transactions::TransactionRepository, users::UserRepository},
    value_objects::{
        enums::{plan_types::PlanType, transaction_statuses::TransactionStatus},
        plans::{self, PRICE_TOLERANCE, PlanModel},
        transactions::{InsertTransactionModel, PaymentInfoModel, TransactionModel},
    },
};

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("duplicate transaction id")]
    DuplicateTrxId,
    #[error("transaction id must not be empty")]
    MissingTrxId,
    #[error("amount {amount:.2} does not match the {plan_type} plan price")]
    PriceMismatch { plan_type: PlanType, amount: f64 },
    #[error("claimed amount {claimed:.2} does not match the submitted transaction")]
    AmountMismatch { claimed: f64 },
    #[error("unknown plan type: {0}")]
    UnknownPlanType(String),
    #[error("transaction not found")]
    NotFound,
    #[error("transaction not found or already settled")]
    NotPending,
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl TransactionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            TransactionError::DuplicateTrxId => StatusCode::CONFLICT,
            TransactionError::MissingTrxId
            | TransactionError::PriceMismatch { .. }
            | TransactionError::AmountMismatch { .. }
            | TransactionError::UnknownPlanType(_) => StatusCode::BAD_REQUEST,
            TransactionError::NotFound
            | TransactionError::NotPending
            | TransactionError::UserNotFound => StatusCode::NOT_FOUND,
            TransactionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, TransactionError>;

/// Manual payment workflow: a user submits the wallet reference code of a
/// payment they made, an admin (or the SMS webhook) settles it, and approval
/// activates the subscription.
pub struct TransactionUseCase<T, U>
where
    T: TransactionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    transaction_repository: Arc<T>,
    user_repository: Arc<U>,
    payment_info: PaymentInfoModel,
}

impl<T, U> TransactionUseCase<T, U>
where
    T: TransactionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(
        transaction_repository: Arc<T>,
        user_repository: Arc<U>,
        payment_info: PaymentInfoModel,
    ) -> Self {
        Self {
            transaction_repository,
            user_repository,
            payment_info,
        }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        insert_transaction_model: InsertTransactionModel,
    ) -> UseCaseResult<i64> {
        let trx_id = insert_transaction_model.trx_id.trim().to_string();
        let plan_type = insert_transaction_model.plan_type;
        let amount = insert_transaction_model.amount;

        info!(
            %user_id,
            %trx_id,
            plan_type = %plan_type,
            amount,
            "transactions: submission received"
        );

        if trx_id.is_empty() {
            let err = TransactionError::MissingTrxId;
            warn!(
                %user_id,
                status = err.status_code().as_u16(),
                "transactions: empty trx id submitted"
            );
            return Err(err);
        }

        if !plans::amount_matches(amount, plan_type) {
            let err = TransactionError::PriceMismatch { plan_type, amount };
            warn!(
                %user_id,
                %trx_id,
                status = err.status_code().as_u16(),
                "transactions: submitted amount does not match plan price"
            );
            return Err(err);
        }

        let existing = self
            .transaction_repository
            .find_by_trx_id(&trx_id)
            .await
            .map_err(|err| {
                error!(%trx_id, db_error = ?err, "transactions: duplicate check failed");
                TransactionError::Internal(err)
            })?;
        if existing.is_some() {
            let err = TransactionError::DuplicateTrxId;
            warn!(
                %user_id,
                %trx_id,
                status = err.status_code().as_u16(),
                "transactions: trx id already submitted"
            );
            return Err(err);
        }

        let insert_transaction_entity = InsertTransactionEntity {
            trx_id: trx_id.clone(),
            user_id,
            amount,
            plan_type: plan_type.to_string(),
            status: TransactionStatus::Pending.to_string(),
        };

        match self.transaction_repository.create(insert_transaction_entity).await {
            Ok(id) => {
                info!(%user_id, %trx_id, id, "transactions: recorded as pending");
                Ok(id)
            }
            Err(err) => {
                // The unique index is authoritative when a concurrent submit
                // beats the pre-check.
                let raced = self
                    .transaction_repository
                    .find_by_trx_id(&trx_id)
                    .await
                    .unwrap_or(None)
                    .is_some();
                if raced {
                    warn!(%user_id, %trx_id, "transactions: lost insert race on trx id");
                    Err(TransactionError::DuplicateTrxId)
                } else {
                    error!(%user_id, %trx_id, db_error = ?err, "transactions: insert failed");
                    Err(TransactionError::Internal(err))
                }
            }
        }
    }

    pub async fn approve(&self, trx_id: &str) -> UseCaseResult<()> {
        let approved_at = Utc::now();

        let transaction = self
            .transaction_repository
            .find_pending_by_trx_id(trx_id)
            .await
            .map_err(|err| {
                error!(%trx_id, db_error = ?err, "transactions: pending lookup failed");
                TransactionError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = TransactionError::NotPending;
                warn!(
                    %trx_id,
                    status = err.status_code().as_u16(),
                    "transactions: nothing pending to approve"
                );
                err
            })?;

        let plan_type = PlanType::from_str(&transaction.plan_type).ok_or_else(|| {
            let err = TransactionError::UnknownPlanType(transaction.plan_type.clone());
            warn!(
                %trx_id,
                plan_type = %transaction.plan_type,
                status = err.status_code().as_u16(),
                "transactions: stored plan type is not approvable"
            );
            err
        })?;

        let subscription_expiry = plans::calculate_expiry(plan_type, approved_at);

        let approved = self
            .transaction_repository
            .approve_pending(trx_id, approved_at, subscription_expiry)
            .await
            .map_err(|err| {
                error!(%trx_id, db_error = ?err, "transactions: approval update failed");
                TransactionError::Internal(err)
            })?;

        // A concurrent approve can win between the lookup and the conditional
        // update; zero affected rows is a normal outcome.
        if !approved {
            let err = TransactionError::NotPending;
            warn!(
                %trx_id,
                status = err.status_code().as_u16(),
                "transactions: already settled by another approval"
            );
            return Err(err);
        }

        info!(
            %trx_id,
            user_id = %transaction.user_id,
            plan_type = %plan_type,
            expiry = %subscription_expiry,
            "transactions: approved and subscription activated"
        );
        Ok(())
    }

    pub async fn reject(&self, trx_id: &str) -> UseCaseResult<()> {
        let rejected = self
            .transaction_repository
            .reject_pending(trx_id)
            .await
            .map_err(|err| {
                error!(%trx_id, db_error = ?err, "transactions: rejection update failed");
                TransactionError::Internal(err)
            })?;

        if !rejected {
            let err = TransactionError::NotPending;
            warn!(
                %trx_id,
                status = err.status_code().as_u16(),
                "transactions: nothing pending to reject"
            );
            return Err(err);
        }

        info!(%trx_id, "transactions: rejected");
        Ok(())
    }

    /// SMS-webhook entry point: cross-checks the claimed amount against the
    /// stored pending transaction before reusing the normal approval path.
    pub async fn auto_approve(&self, trx_id: &str, claimed_amount: f64) -> UseCaseResult<()> {
        let transaction = self
            .transaction_repository
            .find_pending_by_trx_id(trx_id)
            .await
            .map_err(|err| {
                error!(%trx_id, db_error = ?err, "transactions: webhook lookup failed");
                TransactionError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = TransactionError::NotPending;
                info!(
                    %trx_id,
                    status = err.status_code().as_u16(),
                    "transactions: webhook trx id has no pending match"
                );
                err
            })?;

        if (transaction.amount - claimed_amount).abs() > PRICE_TOLERANCE {
            let err = TransactionError::AmountMismatch {
                claimed: claimed_amount,
            };
            warn!(
                %trx_id,
                stored_amount = transaction.amount,
                claimed_amount,
                status = err.status_code().as_u16(),
                "transactions: webhook amount mismatch, leaving pending for review"
            );
            return Err(err);
        }

        self.approve(trx_id).await
    }

    /// Admin bulk action. Per-id failures are logged; the caller only sees
    /// the success count.
    pub async fn approve_many(&self, trx_ids: Vec<String>) -> usize {
        let mut approved = 0;
        for trx_id in &trx_ids {
            match self.approve(trx_id).await {
                Ok(()) => approved += 1,
                Err(err) => {
                    warn!(%trx_id, error = %err, "transactions: bulk approval skipped id");
                }
            }
        }

        info!(
            requested = trx_ids.len(),
            approved, "transactions: bulk approval finished"
        );
        approved
    }

    /// Admin subscription override. Stays ledger-aware: a synthetic
    /// zero-amount transaction is recorded and settled through the normal
    /// approval path instead of editing the user row directly.
    pub async fn grant_subscription(
        &self,
        user_id: Uuid,
        plan_type: PlanType,
    ) -> UseCaseResult<String> {
        self.user_repository
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "transactions: grant user lookup failed");
                TransactionError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = TransactionError::UserNotFound;
                warn!(
                    %user_id,
                    status = err.status_code().as_u16(),
                    "transactions: grant target user does not exist"
                );
                err
            })?;

        let trx_id = format!("ADMIN-{}", Uuid::new_v4());
        let insert_transaction_entity = InsertTransactionEntity {
            trx_id: trx_id.clone(),
            user_id,
            amount: 0.0,
            plan_type: plan_type.to_string(),
            status: TransactionStatus::Pending.to_string(),
        };

        self.transaction_repository
            .create(insert_transaction_entity)
            .await
            .map_err(|err| {
                error!(%user_id, %trx_id, db_error = ?err, "transactions: grant insert failed");
                TransactionError::Internal(err)
            })?;

        self.approve(&trx_id).await?;

        info!(%user_id, %trx_id, plan_type = %plan_type, "transactions: subscription granted");
        Ok(trx_id)
    }

    pub async fn find_by_trx_id(&self, trx_id: &str) -> UseCaseResult<TransactionModel> {
        let transaction = self
            .transaction_repository
            .find_by_trx_id(trx_id)
            .await
            .map_err(|err| {
                error!(%trx_id, db_error = ?err, "transactions: lookup failed");
                TransactionError::Internal(err)
            })?
            .ok_or(TransactionError::NotFound)?;

        TransactionModel::try_from(transaction).map_err(TransactionError::Internal)
    }

    pub async fn list_by_status(
        &self,
        status: TransactionStatus,
    ) -> UseCaseResult<Vec<TransactionModel>> {
        let entities = self
            .transaction_repository
            .list_by_status(&status.to_string())
            .await
            .map_err(|err| {
                error!(status = %status, db_error = ?err, "transactions: listing failed");
                TransactionError::Internal(err)
            })?;

        Ok(entities
            .into_iter()
            .filter_map(|entity| match TransactionModel::try_from(entity) {
                Ok(model) => Some(model),
                Err(err) => {
                    warn!(error = %err, "transactions: skipping unreadable row");
                    None
                }
            })
            .collect())
    }

    pub fn list_plans(&self) -> Vec<PlanModel> {
        plans::list_plans()
    }

    pub fn payment_info(&self) -> PaymentInfoModel {
        self.payment_info.clone()
    }
}
