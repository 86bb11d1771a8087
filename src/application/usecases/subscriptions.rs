use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use crate::domain::{
    repositories::users::UserRepository,
    value_objects::{
        enums::subscription_statuses::SubscriptionStatus,
        subscriptions::CurrentSubscriptionModel,
    },
};

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SubscriptionError::UserNotFound => StatusCode::NOT_FOUND,
            SubscriptionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct SubscriptionUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repository: Arc<U>,
}

impl<U> SubscriptionUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repository: Arc<U>) -> Self {
        Self { user_repository }
    }

    /// Nothing sweeps expired subscriptions; expiry is evaluated here, at
    /// read time, without writing back.
    pub async fn current(
        &self,
        user_id: Uuid,
    ) -> Result<CurrentSubscriptionModel, SubscriptionError> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: user lookup failed");
                SubscriptionError::Internal(err)
            })?
            .ok_or(SubscriptionError::UserNotFound)?;

        let mut status = SubscriptionStatus::from_str(&user.subscription_status);
        if status == SubscriptionStatus::Active {
            let lapsed = user
                .subscription_expiry
                .map_or(true, |expiry| expiry <= Utc::now());
            if lapsed {
                debug!(%user_id, "subscriptions: active subscription has lapsed");
                status = SubscriptionStatus::Expired;
            }
        }

        Ok(CurrentSubscriptionModel {
            status,
            expiry: user.subscription_expiry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::domain::{entities::users::UserEntity, repositories::users::MockUserRepository};

    fn user_with_subscription(
        status: &str,
        expiry: Option<chrono::DateTime<Utc>>,
    ) -> UserEntity {
        UserEntity {
            id: Uuid::new_v4(),
            email: "reader@example.com".to_string(),
            display_name: Some("Reader".to_string()),
            role: "user".to_string(),
            subscription_status: status.to_string(),
            subscription_expiry: expiry,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn active_subscription_with_future_expiry_stays_active() {
        let expiry = Utc::now() + Duration::days(10);
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_id().returning(move |_| {
            let user = user_with_subscription("active", Some(expiry));
            Box::pin(async move { Ok(Some(user)) })
        });

        let usecase = SubscriptionUseCase::new(Arc::new(user_repo));
        let current = usecase.current(Uuid::new_v4()).await.unwrap();

        assert_eq!(current.status, SubscriptionStatus::Active);
        assert_eq!(current.expiry, Some(expiry));
    }

    #[tokio::test]
    async fn active_subscription_past_expiry_reports_expired() {
        let expiry = Utc::now() - Duration::days(1);
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_id().returning(move |_| {
            let user = user_with_subscription("active", Some(expiry));
            Box::pin(async move { Ok(Some(user)) })
        });

        let usecase = SubscriptionUseCase::new(Arc::new(user_repo));
        let current = usecase.current(Uuid::new_v4()).await.unwrap();

        assert_eq!(current.status, SubscriptionStatus::Expired);
    }

    #[tokio::test]
    async fn active_subscription_without_expiry_reports_expired() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_id().returning(|_| {
            let user = user_with_subscription("active", None);
            Box::pin(async move { Ok(Some(user)) })
        });

        let usecase = SubscriptionUseCase::new(Arc::new(user_repo));
        let current = usecase.current(Uuid::new_v4()).await.unwrap();

        assert_eq!(current.status, SubscriptionStatus::Expired);
    }

    #[tokio::test]
    async fn free_user_stays_free() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_id().returning(|_| {
            let user = user_with_subscription("free", None);
            Box::pin(async move { Ok(Some(user)) })
        });

        let usecase = SubscriptionUseCase::new(Arc::new(user_repo));
        let current = usecase.current(Uuid::new_v4()).await.unwrap();

        assert_eq!(current.status, SubscriptionStatus::Free);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = SubscriptionUseCase::new(Arc::new(user_repo));
        let err = usecase.current(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, SubscriptionError::UserNotFound));
    }
}
