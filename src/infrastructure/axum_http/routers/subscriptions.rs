use std::sync::Arc;

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};

use crate::{
    application::usecases::subscriptions::SubscriptionUseCase,
    domain::repositories::users::UserRepository,
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::AppError},
        postgres::{postgres_connection::PgPoolSquad, repositories::users::UserPostgres},
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let subscription_usecase = SubscriptionUseCase::new(Arc::new(user_repository));

    Router::new()
        .route("/current", get(current))
        .with_state(Arc::new(subscription_usecase))
}

pub async fn current<U>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<U>>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
{
    let current_subscription = subscription_usecase.current(auth.user_id).await?;

    Ok(Json(current_subscription))
}
