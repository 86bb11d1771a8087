use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;

use crate::domain::entities::transactions::{InsertTransactionEntity, TransactionEntity};

#[async_trait]
#[automock]
pub trait TransactionRepository {
    async fn create(&self, insert_transaction_entity: InsertTransactionEntity) -> Result<i64>;

    async fn find_by_trx_id(&self, trx_id: &str) -> Result<Option<TransactionEntity>>;

    async fn find_pending_by_trx_id(&self, trx_id: &str) -> Result<Option<TransactionEntity>>;

    /// Transitions a pending transaction to approved and activates the owning
    /// user's subscription in the same database transaction. Returns false
    /// when no pending row matched.
    async fn approve_pending(
        &self,
        trx_id: &str,
        approved_at: DateTime<Utc>,
        subscription_expiry: DateTime<Utc>,
    ) -> Result<bool>;

    async fn reject_pending(&self, trx_id: &str) -> Result<bool>;

    async fn list_by_status(&self, status: &str) -> Result<Vec<TransactionEntity>>;
}
