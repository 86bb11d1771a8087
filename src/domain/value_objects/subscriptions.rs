use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::subscription_statuses::SubscriptionStatus;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentSubscriptionModel {
    pub status: SubscriptionStatus,
    pub expiry: Option<DateTime<Utc>>,
}
