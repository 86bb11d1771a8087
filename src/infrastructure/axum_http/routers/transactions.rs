use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::{
    application::usecases::transactions::TransactionUseCase,
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::{transactions::TransactionRepository, users::UserRepository},
        value_objects::{
            enums::transaction_statuses::TransactionStatus,
            transactions::{
                BulkApproveModel, GrantSubscriptionModel, InsertTransactionModel,
                ListTransactionsFilter, PaymentInfoModel, SmsWebhookModel,
            },
        },
    },
    infrastructure::{
        axum_http::{
            auth::{AdminUser, AuthUser},
            error_responses::AppError,
        },
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{transactions::TransactionPostgres, users::UserPostgres},
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let transaction_repository = TransactionPostgres::new(Arc::clone(&db_pool));
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let payment_info_model = PaymentInfoModel {
        merchant_number: config.bkash.merchant_number.clone(),
        qr_code_url: config.bkash.qr_code_url.clone(),
    };
    let transaction_usecase = TransactionUseCase::new(
        Arc::new(transaction_repository),
        Arc::new(user_repository),
        payment_info_model,
    );

    Router::new()
        .route("/", post(submit).get(list_by_status))
        .route("/plans", get(list_plans))
        .route("/payment-info", get(payment_info))
        .route("/sms-webhook", post(sms_webhook))
        .route("/bulk-approve", post(bulk_approve))
        .route("/grant", post(grant_subscription))
        .route("/:trx_id", get(find_by_trx_id))
        .route("/:trx_id/approve", post(approve))
        .route("/:trx_id/reject", post(reject))
        .with_state(Arc::new(transaction_usecase))
}

pub async fn submit<T, U>(
    State(transaction_usecase): State<Arc<TransactionUseCase<T, U>>>,
    auth: AuthUser,
    Json(insert_transaction_model): Json<InsertTransactionModel>,
) -> Result<impl IntoResponse, AppError>
where
    T: TransactionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let id = transaction_usecase
        .create(auth.user_id, insert_transaction_model)
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn approve<T, U>(
    State(transaction_usecase): State<Arc<TransactionUseCase<T, U>>>,
    _admin: AdminUser,
    Path(trx_id): Path<String>,
) -> Result<impl IntoResponse, AppError>
where
    T: TransactionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    transaction_usecase.approve(&trx_id).await?;

    Ok(StatusCode::OK)
}

pub async fn reject<T, U>(
    State(transaction_usecase): State<Arc<TransactionUseCase<T, U>>>,
    _admin: AdminUser,
    Path(trx_id): Path<String>,
) -> Result<impl IntoResponse, AppError>
where
    T: TransactionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    transaction_usecase.reject(&trx_id).await?;

    Ok(StatusCode::OK)
}

pub async fn bulk_approve<T, U>(
    State(transaction_usecase): State<Arc<TransactionUseCase<T, U>>>,
    _admin: AdminUser,
    Json(bulk_approve_model): Json<BulkApproveModel>,
) -> Result<impl IntoResponse, AppError>
where
    T: TransactionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let approved = transaction_usecase
        .approve_many(bulk_approve_model.trx_ids)
        .await;

    Ok(Json(json!({ "approved": approved })))
}

/// Unauthenticated automation entry point. The usecase cross-checks the
/// claimed amount against the stored pending transaction before approving.
pub async fn sms_webhook<T, U>(
    State(transaction_usecase): State<Arc<TransactionUseCase<T, U>>>,
    Json(sms_webhook_model): Json<SmsWebhookModel>,
) -> Result<impl IntoResponse, AppError>
where
    T: TransactionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    transaction_usecase
        .auto_approve(&sms_webhook_model.trx_id, sms_webhook_model.amount)
        .await?;

    Ok(StatusCode::OK)
}

pub async fn grant_subscription<T, U>(
    State(transaction_usecase): State<Arc<TransactionUseCase<T, U>>>,
    _admin: AdminUser,
    Json(grant_subscription_model): Json<GrantSubscriptionModel>,
) -> Result<impl IntoResponse, AppError>
where
    T: TransactionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let trx_id = transaction_usecase
        .grant_subscription(
            grant_subscription_model.user_id,
            grant_subscription_model.plan_type,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "trx_id": trx_id }))))
}

pub async fn find_by_trx_id<T, U>(
    State(transaction_usecase): State<Arc<TransactionUseCase<T, U>>>,
    _admin: AdminUser,
    Path(trx_id): Path<String>,
) -> Result<impl IntoResponse, AppError>
where
    T: TransactionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let transaction = transaction_usecase.find_by_trx_id(&trx_id).await?;

    Ok(Json(transaction))
}

pub async fn list_by_status<T, U>(
    State(transaction_usecase): State<Arc<TransactionUseCase<T, U>>>,
    _admin: AdminUser,
    Query(filter): Query<ListTransactionsFilter>,
) -> Result<impl IntoResponse, AppError>
where
    T: TransactionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let status = match filter.status.as_deref() {
        None => TransactionStatus::Pending,
        Some(value) => TransactionStatus::from_str(value)
            .ok_or_else(|| AppError::BadRequest(format!("unknown status filter: {}", value)))?,
    };

    let transactions = transaction_usecase.list_by_status(status).await?;

    Ok(Json(transactions))
}

pub async fn list_plans<T, U>(
    State(transaction_usecase): State<Arc<TransactionUseCase<T, U>>>,
) -> impl IntoResponse
where
    T: TransactionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    Json(transaction_usecase.list_plans())
}

pub async fn payment_info<T, U>(
    State(transaction_usecase): State<Arc<TransactionUseCase<T, U>>>,
) -> impl IntoResponse
where
    T: TransactionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    Json(transaction_usecase.payment_info())
}
