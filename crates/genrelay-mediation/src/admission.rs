//! Admission policy
//!
//! One declarative table maps each capability to its plan requirement; it is
//! consulted exactly once per request, here. Adapters never re-check
//! entitlements.

use genrelay_core::constants::FREE_GENERATION_LIMIT;
use genrelay_core::models::{
    AdmissionDecision, Capability, EntitlementSnapshot, RejectionReason, Tier,
};

/// What a capability demands of the caller's plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityAccess {
    /// Available on the free tier, counted against the free-usage quota.
    Metered,
    /// Requires a premium subscription regardless of the counter.
    PremiumOnly,
}

/// The capability -> requirement table.
pub fn access_for(capability: Capability) -> CapabilityAccess {
    match capability {
        Capability::Article | Capability::BlogTitle => CapabilityAccess::Metered,
        Capability::ImageGeneration
        | Capability::BackgroundRemoval
        | Capability::ObjectRemoval
        | Capability::ResumeReview => CapabilityAccess::PremiumOnly,
    }
}

/// Decide admission for one request from a fresh entitlement snapshot.
///
/// Premium users are admitted unconditionally. Free users are admitted to
/// metered capabilities while `free_usage < FREE_GENERATION_LIMIT`.
pub fn admit(snapshot: &EntitlementSnapshot, capability: Capability) -> AdmissionDecision {
    if snapshot.plan == Tier::Premium {
        return AdmissionDecision::Admitted;
    }

    match access_for(capability) {
        CapabilityAccess::PremiumOnly => {
            AdmissionDecision::Rejected(RejectionReason::PremiumRequired { capability })
        }
        CapabilityAccess::Metered => {
            if snapshot.has_free_quota() {
                AdmissionDecision::Admitted
            } else {
                AdmissionDecision::Rejected(RejectionReason::FreeQuotaExhausted {
                    used: snapshot.free_usage,
                    limit: FREE_GENERATION_LIMIT,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premium_admitted_everywhere() {
        let snapshot = EntitlementSnapshot::premium();
        for capability in Capability::ALL {
            assert_eq!(admit(&snapshot, capability), AdmissionDecision::Admitted);
        }
    }

    #[test]
    fn test_premium_ignores_counter() {
        // A premium snapshot with a stale counter is still admitted.
        let snapshot = EntitlementSnapshot {
            plan: Tier::Premium,
            free_usage: 999,
        };
        assert_eq!(
            admit(&snapshot, Capability::Article),
            AdmissionDecision::Admitted
        );
    }

    #[test]
    fn test_free_user_metered_quota() {
        assert_eq!(
            admit(&EntitlementSnapshot::free(9), Capability::Article),
            AdmissionDecision::Admitted
        );
        assert_eq!(
            admit(&EntitlementSnapshot::free(10), Capability::Article),
            AdmissionDecision::Rejected(RejectionReason::FreeQuotaExhausted {
                used: 10,
                limit: FREE_GENERATION_LIMIT
            })
        );
    }

    #[test]
    fn test_free_user_premium_gate_ignores_quota() {
        // Plenty of quota left, still rejected: the capability is premium-only.
        let snapshot = EntitlementSnapshot::free(0);
        for capability in [
            Capability::ImageGeneration,
            Capability::BackgroundRemoval,
            Capability::ObjectRemoval,
            Capability::ResumeReview,
        ] {
            assert_eq!(
                admit(&snapshot, capability),
                AdmissionDecision::Rejected(RejectionReason::PremiumRequired { capability })
            );
        }
    }
}
