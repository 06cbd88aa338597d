use crate::types::{BillingCycle, SubscriptionPlan};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanTier {
    Solo,
    Business,
    Oem,
}

impl PlanTier {
    /// Tier a user can subscribe to directly; OEM is sales-led.
    pub fn subscription(self) -> Option<SubscriptionPlan> {
        match self {
            PlanTier::Solo => Some(SubscriptionPlan::Solo),
            PlanTier::Business => Some(SubscriptionPlan::Business),
            PlanTier::Oem => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct PlanDetails {
    pub tier: PlanTier,
    pub name: &'static str,
    pub monthly: &'static str,
    pub annual: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
}

impl PlanDetails {
    pub fn price(&self, cycle: BillingCycle) -> &'static str {
        match cycle {
            BillingCycle::Monthly => self.monthly,
            BillingCycle::Annual => self.annual,
        }
    }
}

pub const PLAN_CATALOG: &[PlanDetails] = &[
    PlanDetails {
        tier: PlanTier::Solo,
        name: "SMEPro Solo",
        monthly: "9.99",
        annual: "99.99",
        description: "For individuals, artists, and freelancers seeking specialized knowledge.",
        features: &[
            "1 User Account",
            "Access to all Solo SMEs",
            "Standard Guided Sessions",
            "SMEPro Vault (1GB)",
            "Community Support",
        ],
    },
    PlanDetails {
        tier: PlanTier::Business,
        name: "SMEPro Business",
        monthly: "17.99",
        annual: "179.99",
        description: "For teams, startups, and established companies needing deep operational insights.",
        features: &[
            "Up to 5 User Accounts",
            "Access to all Business SMEs",
            "Advanced Guided Sessions",
            "Collaborative Workspaces",
            "SMEPro Vault (10GB)",
            "Priority Email Support",
        ],
    },
    PlanDetails {
        tier: PlanTier::Oem,
        name: "SMEPro OEM",
        monthly: "Custom",
        annual: "Custom",
        description: "For enterprises seeking to integrate specialized AI into their own platforms.",
        features: &[
            "Unlimited User Accounts",
            "Custom-Trained SMEs",
            "Full API Access",
            "White-labeling Options",
            "Dedicated Support & Onboarding",
            "Enterprise-grade Security",
        ],
    },
];

pub fn plan_details(plan: SubscriptionPlan) -> &'static PlanDetails {
    let tier = match plan {
        SubscriptionPlan::Solo => PlanTier::Solo,
        SubscriptionPlan::Business => PlanTier::Business,
    };
    // The catalog lists every tier.
    PLAN_CATALOG
        .iter()
        .find(|details| details.tier == tier)
        .unwrap_or(&PLAN_CATALOG[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prices_by_cycle() {
        let business = plan_details(SubscriptionPlan::Business);
        assert_eq!(business.price(BillingCycle::Monthly), "17.99");
        assert_eq!(business.price(BillingCycle::Annual), "179.99");
    }

    #[test]
    fn test_oem_is_not_self_serve() {
        assert_eq!(PlanTier::Oem.subscription(), None);
        assert_eq!(
            PlanTier::Solo.subscription(),
            Some(SubscriptionPlan::Solo)
        );
    }
}
