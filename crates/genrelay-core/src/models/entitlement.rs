use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Capability;
use crate::constants::FREE_GENERATION_LIMIT;

/// A user's subscription tier, controlling quota and capability access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Premium,
}

impl FromStr for Tier {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Tier::Free),
            "premium" => Ok(Tier::Premium),
            _ => Err(anyhow::anyhow!("Invalid tier: {}", s)),
        }
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Tier::Free => write!(f, "free"),
            Tier::Premium => write!(f, "premium"),
        }
    }
}

/// A user's entitlement state, read fresh at the start of each request.
///
/// `free_usage` is meaningful only when `plan` is `Free`; it never decreases
/// except by external reset. Snapshots are never cached across requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementSnapshot {
    pub plan: Tier,
    pub free_usage: u32,
}

impl EntitlementSnapshot {
    pub fn premium() -> Self {
        Self {
            plan: Tier::Premium,
            free_usage: 0,
        }
    }

    pub fn free(free_usage: u32) -> Self {
        Self {
            plan: Tier::Free,
            free_usage,
        }
    }

    pub fn has_free_quota(&self) -> bool {
        self.free_usage < FREE_GENERATION_LIMIT
    }
}

/// Outcome of the admission check for one request.
///
/// Rejection is a normal negative outcome, not a fault: it carries a
/// human-readable reason and is never logged as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionDecision {
    Admitted,
    Rejected(RejectionReason),
}

/// Why a request was not admitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// The free-tier quota is exhausted.
    FreeQuotaExhausted { used: u32, limit: u32 },
    /// The capability requires a premium subscription.
    PremiumRequired { capability: Capability },
}

impl RejectionReason {
    /// Client-facing explanation for the rejection.
    pub fn message(&self) -> String {
        match self {
            RejectionReason::FreeQuotaExhausted { .. } => {
                "Limit reached. Upgrade to continue.".to_string()
            }
            RejectionReason::PremiumRequired { .. } => {
                "This feature is only available for premium subscriptions.".to_string()
            }
        }
    }
}
