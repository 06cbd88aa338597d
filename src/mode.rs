//! Top-level UI mode, derived from shell state on every render.

use crate::types::{ChatSession, PlanIntent, UserProfile};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MarketingPage {
    #[default]
    Home,
    Features,
    HowItWorks,
    Plans,
}

impl MarketingPage {
    pub const ALL: [MarketingPage; 4] = [
        MarketingPage::Home,
        MarketingPage::Features,
        MarketingPage::HowItWorks,
        MarketingPage::Plans,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MarketingPage::Home => "Home",
            MarketingPage::Features => "Features",
            MarketingPage::HowItWorks => "How It Works",
            MarketingPage::Plans => "Plans",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiMode {
    Marketing(MarketingPage),
    Onboarding,
    SmeSelection,
    Chat,
    Vault,
    Dashboard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modal {
    EditProfile,
    ChangeSme,
    ManageCategories,
}

/// Independent overlay flags. Their only coupling is the priority in [`resolve_mode`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Overlays {
    pub vault: bool,
    pub dashboard: bool,
    pub edit_profile: bool,
    pub change_sme: bool,
    pub manage_categories: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShellState {
    pub profile: Option<UserProfile>,
    pub session: Option<ChatSession>,
    pub show_marketing: bool,
    pub marketing_page: MarketingPage,
    pub plan_intent: Option<PlanIntent>,
    pub overlays: Overlays,
    /// Bumped after a vault sync so the vault view remounts from scratch.
    pub vault_reload_key: u64,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            profile: None,
            session: None,
            show_marketing: true,
            marketing_page: MarketingPage::Home,
            plan_intent: None,
            overlays: Overlays::default(),
            vault_reload_key: 0,
        }
    }
}

/// Marketing short-circuits everything. Without a profile the overlays are
/// ignored, so chat, vault and dashboard are unreachable until onboarding.
pub fn resolve_mode(state: &ShellState) -> UiMode {
    if state.show_marketing {
        return UiMode::Marketing(state.marketing_page);
    }
    if state.profile.is_none() {
        return UiMode::Onboarding;
    }
    if state.overlays.dashboard {
        return UiMode::Dashboard;
    }
    if state.overlays.vault {
        return UiMode::Vault;
    }
    if state.session.is_none() {
        return UiMode::SmeSelection;
    }
    UiMode::Chat
}

/// Modals layered over the authenticated shell, in stacking order. Edit
/// profile needs a profile and change SME needs a session.
pub fn visible_modals(state: &ShellState) -> Vec<Modal> {
    if state.show_marketing || state.profile.is_none() {
        return Vec::new();
    }
    let mut modals = Vec::new();
    if state.overlays.edit_profile {
        modals.push(Modal::EditProfile);
    }
    if state.overlays.change_sme && state.session.is_some() {
        modals.push(Modal::ChangeSme);
    }
    if state.overlays.manage_categories {
        modals.push(Modal::ManageCategories);
    }
    modals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SmeConfig, SubscriptionPlan};

    fn profile() -> UserProfile {
        UserProfile {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            account_type: SubscriptionPlan::Solo,
            billing_cycle: None,
            api_connectors: None,
        }
    }

    fn session() -> ChatSession {
        ChatSession {
            session_id: "abc123".into(),
            plan: SubscriptionPlan::Solo,
            sme_config: SmeConfig::new("Health", "Clinics", "Billing"),
            messages: Vec::new(),
            participants: Vec::new(),
            last_modified: 0,
            title: None,
        }
    }

    fn shell(profile_present: bool, session_present: bool) -> ShellState {
        ShellState {
            profile: profile_present.then(profile),
            session: session_present.then(session),
            show_marketing: false,
            ..ShellState::default()
        }
    }

    #[test]
    fn test_default_state_is_marketing_home() {
        assert_eq!(
            resolve_mode(&ShellState::default()),
            UiMode::Marketing(MarketingPage::Home)
        );
    }

    #[test]
    fn test_authenticated_shell_priority() {
        assert_eq!(resolve_mode(&shell(false, false)), UiMode::Onboarding);
        assert_eq!(resolve_mode(&shell(true, false)), UiMode::SmeSelection);
        assert_eq!(resolve_mode(&shell(true, true)), UiMode::Chat);

        let mut state = shell(true, true);
        state.overlays.vault = true;
        assert_eq!(resolve_mode(&state), UiMode::Vault);
        state.overlays.dashboard = true;
        assert_eq!(resolve_mode(&state), UiMode::Dashboard);
    }

    #[test]
    fn test_overlays_never_show_without_profile() {
        let mut state = shell(false, true);
        state.overlays = Overlays {
            vault: true,
            dashboard: true,
            edit_profile: true,
            change_sme: true,
            manage_categories: true,
        };
        assert_eq!(resolve_mode(&state), UiMode::Onboarding);
        assert!(visible_modals(&state).is_empty());
    }

    #[test]
    fn test_marketing_keeps_shell_state() {
        let mut state = shell(true, true);
        state.show_marketing = true;
        state.marketing_page = MarketingPage::Plans;
        state.overlays.edit_profile = true;
        assert_eq!(resolve_mode(&state), UiMode::Marketing(MarketingPage::Plans));
        assert!(visible_modals(&state).is_empty());
        assert!(state.session.is_some());
    }

    #[test]
    fn test_change_sme_modal_needs_session() {
        let mut state = shell(true, false);
        state.overlays.change_sme = true;
        assert!(visible_modals(&state).is_empty());
    }
}
