use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::{
    domain::{
        entities::transactions::{InsertTransactionEntity, TransactionEntity},
        repositories::transactions::TransactionRepository,
        value_objects::enums::{
            subscription_statuses::SubscriptionStatus, transaction_statuses::TransactionStatus,
        },
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{transactions, users},
    },
};

pub struct TransactionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl TransactionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl TransactionRepository for TransactionPostgres {
    async fn create(&self, insert_transaction_entity: InsertTransactionEntity) -> Result<i64> {
        let mut conn = self.db_pool.get()?;

        let id = diesel::insert_into(transactions::table)
            .values(&insert_transaction_entity)
            .returning(transactions::id)
            .get_result::<i64>(&mut conn)?;

        Ok(id)
    }

    async fn find_by_trx_id(&self, trx_id: &str) -> Result<Option<TransactionEntity>> {
        let mut conn = self.db_pool.get()?;

        let result = transactions::table
            .filter(transactions::trx_id.eq(trx_id))
            .select(TransactionEntity::as_select())
            .first::<TransactionEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_pending_by_trx_id(&self, trx_id: &str) -> Result<Option<TransactionEntity>> {
        let mut conn = self.db_pool.get()?;

        let result = transactions::table
            .filter(transactions::trx_id.eq(trx_id))
            .filter(transactions::status.eq(TransactionStatus::Pending.to_string()))
            .select(TransactionEntity::as_select())
            .first::<TransactionEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn approve_pending(
        &self,
        trx_id: &str,
        approved_at: DateTime<Utc>,
        subscription_expiry: DateTime<Utc>,
    ) -> Result<bool> {
        let mut conn = self.db_pool.get()?;

        // The status filter makes concurrent approvals settle exactly once;
        // the user activation rides the same database transaction so an
        // approved row can never exist without its subscription side effect.
        let approved = conn.transaction::<bool, anyhow::Error, _>(|conn| {
            let updated = diesel::update(
                transactions::table
                    .filter(transactions::trx_id.eq(trx_id))
                    .filter(transactions::status.eq(TransactionStatus::Pending.to_string())),
            )
            .set((
                transactions::status.eq(TransactionStatus::Approved.to_string()),
                transactions::approved_at.eq(approved_at),
            ))
            .returning(TransactionEntity::as_returning())
            .get_result::<TransactionEntity>(conn)
            .optional()?;

            let Some(transaction) = updated else {
                return Ok(false);
            };

            diesel::update(users::table.filter(users::id.eq(transaction.user_id)))
                .set((
                    users::subscription_status.eq(SubscriptionStatus::Active.to_string()),
                    users::subscription_expiry.eq(Some(subscription_expiry)),
                ))
                .execute(conn)?;

            Ok(true)
        })?;

        Ok(approved)
    }

    async fn reject_pending(&self, trx_id: &str) -> Result<bool> {
        let mut conn = self.db_pool.get()?;

        let affected = diesel::update(
            transactions::table
                .filter(transactions::trx_id.eq(trx_id))
                .filter(transactions::status.eq(TransactionStatus::Pending.to_string())),
        )
        .set(transactions::status.eq(TransactionStatus::Rejected.to_string()))
        .execute(&mut conn)?;

        Ok(affected > 0)
    }

    async fn list_by_status(&self, status: &str) -> Result<Vec<TransactionEntity>> {
        let mut conn = self.db_pool.get()?;

        let result = transactions::table
            .filter(transactions::status.eq(status))
            .order(transactions::created_at.desc())
            .select(TransactionEntity::as_select())
            .load::<TransactionEntity>(&mut conn)?;

        Ok(result)
    }
}
