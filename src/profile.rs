use crate::backend::ProfileStore;
use crate::types::UserProfile;

/// Result of the one-shot startup profile check.
#[derive(Clone, Debug, PartialEq)]
pub enum GateOutcome {
    /// A profile exists; the authenticated shell takes over.
    Authenticated(UserProfile),
    /// The store answered and nobody is onboarded.
    Anonymous,
    /// The store could not be reached. Routed like `Anonymous`, but nothing
    /// durable is cleared on the strength of it.
    Unavailable,
}

impl GateOutcome {
    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            GateOutcome::Authenticated(profile) => Some(profile),
            _ => None,
        }
    }
}

pub async fn check_profile(store: &dyn ProfileStore) -> GateOutcome {
    match store.fetch_user_profile().await {
        Ok(Some(profile)) => {
            tracing::debug!(email = %profile.email, "profile found");
            GateOutcome::Authenticated(profile)
        }
        Ok(None) => GateOutcome::Anonymous,
        Err(err) => {
            tracing::warn!(error = %err, "profile fetch failed, continuing without a profile");
            GateOutcome::Unavailable
        }
    }
}

/// Key the session resolver runs against. Two profiles with the same key are
/// the same person, so editing a name never re-resolves the session.
pub fn profile_identity(profile: &UserProfile) -> String {
    profile.email.trim().to_lowercase()
}
