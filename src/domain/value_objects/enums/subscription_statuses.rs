use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    Free,
    Active,
    Expired,
}

impl SubscriptionStatus {
    pub fn from_str(value: &str) -> Self {
        match value {
            "free" => SubscriptionStatus::Free,
            "active" => SubscriptionStatus::Active,
            "expired" => SubscriptionStatus::Expired,
            _ => SubscriptionStatus::Free,
        }
    }
}

impl Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            SubscriptionStatus::Free => "free",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Expired => "expired",
        };
        write!(f, "{}", status)
    }
}
