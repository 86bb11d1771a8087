use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Monthly,
    Quarterly,
    Yearly,
    Lifetime,
}

impl PlanType {
    pub const ALL: [PlanType; 4] = [
        PlanType::Monthly,
        PlanType::Quarterly,
        PlanType::Yearly,
        PlanType::Lifetime,
    ];

    /// Unknown plan types are rejected, never defaulted.
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "monthly" => Some(PlanType::Monthly),
            "quarterly" => Some(PlanType::Quarterly),
            "yearly" => Some(PlanType::Yearly),
            "lifetime" => Some(PlanType::Lifetime),
            _ => None,
        }
    }
}

impl Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let plan_type = match self {
            PlanType::Monthly => "monthly",
            PlanType::Quarterly => "quarterly",
            PlanType::Yearly => "yearly",
            PlanType::Lifetime => "lifetime",
        };
        write!(f, "{}", plan_type)
    }
}
