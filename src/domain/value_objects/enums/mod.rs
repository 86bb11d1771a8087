pub mod plan_types;
pub mod subscription_statuses;
pub mod transaction_statuses;
