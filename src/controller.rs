//! Shell controller: owns the profile, the current session and the overlay
//! flags, and performs every transition that touches them.
//!
//! Views never mutate [`ShellState`] directly. They signal intent, the
//! controller performs the transition, and the UI re-renders from a snapshot.
//! A [`SharedController`] hands out the controller to one transition at a
//! time, so a slow network call cannot interleave with a second transition.

use crate::backend::{CollaborationBackend, ProfileStore, StoreError};
use crate::mode::{MarketingPage, Modal, ShellState, UiMode, resolve_mode, visible_modals};
use crate::pointer::SessionPointer;
use crate::profile::{GateOutcome, check_profile, profile_identity};
use crate::resolver::resolve_session;
use crate::types::{
    BillingCycle, ChatSession, PlanIntent, ProfileDraft, SmeConfig, SubscriptionPlan, UserProfile,
};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("another transition is still in flight")]
    Busy,

    #[error("no profile is loaded")]
    NoProfile,

    #[error("session '{0}' could not be opened")]
    SessionUnavailable(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Something a view asks the shell to do. Views carry no state of their own
/// beyond form fields; every change to [`ShellState`] goes through here.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    GetStarted,
    ShowPage(MarketingPage),
    ChoosePlan(SubscriptionPlan, BillingCycle),
    ConfirmOnboarding(ProfileDraft),
    ConfirmSme(SmeConfig, String),
    SaveProfile(UserProfile),
    StartFreshChat,
    KeepAndSwitchSme,
    NavigateToPlans,
    SyncComplete,
    SignOut,
    SetVaultOpen(bool),
    SetDashboardOpen(bool),
    SetModalOpen(Modal, bool),
}

pub struct ShellController {
    state: ShellState,
    pointer: SessionPointer,
    profiles: Arc<dyn ProfileStore>,
    sessions: Arc<dyn CollaborationBackend>,
    gate_checked: bool,
    /// Identity the current session was resolved for.
    resolved_for: Option<String>,
}

impl ShellController {
    pub fn new(
        pointer: SessionPointer,
        profiles: Arc<dyn ProfileStore>,
        sessions: Arc<dyn CollaborationBackend>,
    ) -> Self {
        Self {
            state: ShellState::default(),
            pointer,
            profiles,
            sessions,
            gate_checked: false,
            resolved_for: None,
        }
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn mode(&self) -> UiMode {
        resolve_mode(&self.state)
    }

    pub fn modals(&self) -> Vec<Modal> {
        visible_modals(&self.state)
    }

    pub fn pointer(&self) -> &SessionPointer {
        &self.pointer
    }

    // ============================================
    // Profile gate and resolution
    // ============================================

    /// Run the profile gate. Only the first call per controller does anything.
    pub async fn start(&mut self) -> GateOutcome {
        if self.gate_checked {
            return match &self.state.profile {
                Some(profile) => GateOutcome::Authenticated(profile.clone()),
                None => GateOutcome::Anonymous,
            };
        }
        self.gate_checked = true;

        let outcome = check_profile(self.profiles.as_ref()).await;
        match &outcome {
            GateOutcome::Authenticated(profile) => {
                self.state.show_marketing = false;
                self.set_profile(Some(profile.clone())).await;
            }
            GateOutcome::Anonymous => {
                self.state.show_marketing = true;
                self.set_profile(None).await;
            }
            GateOutcome::Unavailable => {
                self.state.show_marketing = true;
                self.state.session = None;
            }
        }
        outcome
    }

    /// Adopt `profile` as the current identity.
    ///
    /// Absence clears the session and the stored pointer before returning, so
    /// no state exists with a session but no profile. A new identity triggers
    /// session resolution; the same identity (e.g. a renamed profile) does not.
    /// A session already on screen is only ever replaced, never dropped, by
    /// resolution.
    pub async fn set_profile(&mut self, profile: Option<UserProfile>) {
        let Some(profile) = profile else {
            self.state.profile = None;
            self.state.session = None;
            self.state.overlays = Default::default();
            self.resolved_for = None;
            self.pointer.clear_stored();
            return;
        };

        let identity = profile_identity(&profile);
        self.state.profile = Some(profile);
        if self.resolved_for.as_deref() == Some(identity.as_str()) {
            return;
        }

        self.resolved_for = Some(identity);
        let Some(resolved) = resolve_session(&self.pointer, self.sessions.as_ref()).await else {
            return;
        };
        tracing::info!(
            session_id = %resolved.session.session_id,
            source = ?resolved.source,
            "resumed session"
        );
        self.state.session = Some(resolved.session);
    }

    // ============================================
    // Transitions
    // ============================================

    /// Finish onboarding: attach the pending billing cycle, save, and enter the shell.
    pub async fn confirm_onboarding(&mut self, draft: ProfileDraft) -> Result<(), TransitionError> {
        let billing_cycle = self
            .state
            .plan_intent
            .map(|intent| intent.billing_cycle)
            .unwrap_or(BillingCycle::Monthly);
        let saved = self
            .profiles
            .save_user_profile(draft.with_billing_cycle(billing_cycle))
            .await?;
        self.set_profile(Some(saved)).await;
        self.state.plan_intent = None;
        self.state.show_marketing = false;
        Ok(())
    }

    /// Open `session_id` for `config`, creating it when new, and make it the
    /// shareable current session.
    pub async fn confirm_sme(
        &mut self,
        config: SmeConfig,
        session_id: &str,
    ) -> Result<(), TransitionError> {
        let tier = self
            .state
            .profile
            .as_ref()
            .map(|profile| profile.account_type)
            .ok_or(TransitionError::NoProfile)?;
        let session = self
            .sessions
            .get_session(session_id, Some(&config), Some(tier))
            .await?
            .ok_or_else(|| TransitionError::SessionUnavailable(session_id.to_string()))?;

        self.adopt_session(session);
        if let Err(err) = self.pointer.record(session_id, true) {
            tracing::warn!(session_id, error = %err, "could not remember session");
        }
        Ok(())
    }

    pub async fn save_profile(&mut self, profile: UserProfile) -> Result<(), TransitionError> {
        let saved = self.profiles.save_user_profile(profile).await?;
        self.set_profile(Some(saved)).await;
        self.state.overlays.edit_profile = false;
        Ok(())
    }

    /// Drop the current session and both pointer slots. The profile stays.
    pub fn start_fresh_chat(&mut self) {
        self.state.session = None;
        self.pointer.clear_stored();
        self.pointer.clear_fragment();
        self.state.overlays.change_sme = false;
    }

    /// Legacy "keep history and switch expert". Switching now always starts a
    /// fresh chat; the action stays so the change-SME modal can render it disabled.
    pub fn keep_and_switch_sme(&mut self) {
        tracing::debug!("keep-and-switch is disabled, ignoring");
    }

    /// Forget the profile and every trace of its session, including the URL
    /// fragment, so the next identity on this device starts clean.
    pub async fn sign_out(&mut self) {
        if let Err(err) = self.profiles.clear_user_profile().await {
            tracing::warn!(error = %err, "could not clear stored profile");
        }
        self.pointer.clear_fragment();
        self.set_profile(None).await;
        self.state.show_marketing = true;
        self.state.marketing_page = MarketingPage::Home;
    }

    pub fn get_started(&mut self) {
        self.state.show_marketing = false;
    }

    pub fn choose_plan(&mut self, plan: SubscriptionPlan, billing_cycle: BillingCycle) {
        self.state.plan_intent = Some(PlanIntent {
            plan,
            billing_cycle,
        });
        self.get_started();
    }

    pub fn show_page(&mut self, page: MarketingPage) {
        self.state.marketing_page = page;
    }

    /// "Manage plans" from the shell. Profile and session stay in memory.
    pub fn navigate_to_plans(&mut self) {
        self.state.overlays.edit_profile = false;
        self.state.show_marketing = true;
        self.state.marketing_page = MarketingPage::Plans;
    }

    pub fn sync_complete(&mut self) {
        self.state.vault_reload_key = self.state.vault_reload_key.wrapping_add(1);
    }

    pub fn set_vault_open(&mut self, open: bool) {
        self.state.overlays.vault = open;
    }

    pub fn set_dashboard_open(&mut self, open: bool) {
        self.state.overlays.dashboard = open;
    }

    pub fn set_modal_open(&mut self, modal: Modal, open: bool) {
        let overlays = &mut self.state.overlays;
        match modal {
            Modal::EditProfile => overlays.edit_profile = open,
            Modal::ChangeSme => overlays.change_sme = open,
            Modal::ManageCategories => overlays.manage_categories = open,
        }
    }

    pub async fn apply(&mut self, intent: Intent) -> Result<(), TransitionError> {
        match intent {
            Intent::GetStarted => self.get_started(),
            Intent::ShowPage(page) => self.show_page(page),
            Intent::ChoosePlan(plan, cycle) => self.choose_plan(plan, cycle),
            Intent::ConfirmOnboarding(draft) => return self.confirm_onboarding(draft).await,
            Intent::ConfirmSme(config, session_id) => {
                return self.confirm_sme(config, &session_id).await;
            }
            Intent::SaveProfile(profile) => return self.save_profile(profile).await,
            Intent::StartFreshChat => self.start_fresh_chat(),
            Intent::KeepAndSwitchSme => self.keep_and_switch_sme(),
            Intent::NavigateToPlans => self.navigate_to_plans(),
            Intent::SyncComplete => self.sync_complete(),
            Intent::SignOut => self.sign_out().await,
            Intent::SetVaultOpen(open) => self.set_vault_open(open),
            Intent::SetDashboardOpen(open) => self.set_dashboard_open(open),
            Intent::SetModalOpen(modal, open) => self.set_modal_open(modal, open),
        }
        Ok(())
    }

    fn adopt_session(&mut self, session: ChatSession) {
        tracing::info!(session_id = %session.session_id, "entered session");
        self.state.session = Some(session);
    }
}

/// Controller shared with the UI. One transition holds it at a time.
#[derive(Clone)]
pub struct SharedController {
    inner: Arc<Mutex<ShellController>>,
}

impl SharedController {
    pub fn new(controller: ShellController) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    /// Claim the controller for one transition, or `Busy` if another is running.
    pub fn begin(&self) -> Result<OwnedMutexGuard<ShellController>, TransitionError> {
        self.inner.clone().try_lock_owned().map_err(|_| {
            tracing::debug!("transition rejected, another one is in flight");
            TransitionError::Busy
        })
    }

    /// Wait for the controller; for work that must not be dropped, like the startup gate.
    pub async fn lock(&self) -> OwnedMutexGuard<ShellController> {
        self.inner.clone().lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LocalBackend;
    use crate::pointer::{FragmentSlot, MemoryFragment, StoredSlot};
    use crate::storage::{KeyValueStore, MemoryStore, StorageError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Local sessions that can be switched to failing lookups mid-test.
    struct FlakySessions {
        inner: LocalBackend,
        offline: AtomicBool,
    }

    #[async_trait]
    impl CollaborationBackend for FlakySessions {
        async fn get_session(
            &self,
            session_id: &str,
            sme_config: Option<&SmeConfig>,
            account_tier: Option<SubscriptionPlan>,
        ) -> Result<Option<ChatSession>, StoreError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(StoreError::Transport("connection reset".into()));
            }
            self.inner.get_session(session_id, sme_config, account_tier).await
        }
    }

    /// Reads nothing and refuses every write.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write {
                key: key.to_string(),
                message: "quota exceeded".into(),
            })
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn controller() -> ShellController {
        let store = Arc::new(MemoryStore::new());
        let backend = Arc::new(LocalBackend::new(store.clone()));
        let pointer = SessionPointer::new(
            Box::new(FragmentSlot::new(MemoryFragment::default())),
            Box::new(StoredSlot::new(store)),
        );
        ShellController::new(pointer, backend.clone(), backend)
    }

    fn draft() -> ProfileDraft {
        ProfileDraft {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            account_type: SubscriptionPlan::Business,
            api_connectors: None,
        }
    }

    #[tokio::test]
    async fn test_onboarding_uses_plan_intent_cycle() {
        let mut controller = controller();
        controller.start().await;
        controller.choose_plan(SubscriptionPlan::Business, BillingCycle::Annual);
        assert_eq!(controller.mode(), UiMode::Onboarding);

        controller.confirm_onboarding(draft()).await.unwrap();
        let profile = controller.state().profile.clone().unwrap();
        assert_eq!(profile.billing_cycle, Some(BillingCycle::Annual));
        assert_eq!(controller.state().plan_intent, None);
        assert_eq!(controller.mode(), UiMode::SmeSelection);
    }

    #[tokio::test]
    async fn test_onboarding_defaults_to_monthly() {
        let mut controller = controller();
        controller.start().await;
        controller.get_started();
        controller.confirm_onboarding(draft()).await.unwrap();
        assert_eq!(
            controller.state().profile.as_ref().unwrap().billing_cycle,
            Some(BillingCycle::Monthly)
        );
    }

    #[tokio::test]
    async fn test_confirm_sme_requires_profile() {
        let mut controller = controller();
        let err = controller
            .confirm_sme(SmeConfig::new("Legal", "Contracts", "SMB"), "s1")
            .await
            .unwrap_err();
        assert!(matches!(err, TransitionError::NoProfile));
        assert!(controller.state().session.is_none());
    }

    #[tokio::test]
    async fn test_save_profile_closes_modal_and_keeps_session() {
        let mut controller = controller();
        controller.start().await;
        controller.confirm_onboarding(draft()).await.unwrap();
        controller
            .confirm_sme(SmeConfig::new("Legal", "Contracts", "SMB"), "s1")
            .await
            .unwrap();
        controller.set_modal_open(Modal::EditProfile, true);
        assert_eq!(controller.modals(), vec![Modal::EditProfile]);

        let mut edited = controller.state().profile.clone().unwrap();
        edited.name = "Ada L.".into();
        controller.save_profile(edited).await.unwrap();

        assert!(controller.modals().is_empty());
        assert_eq!(controller.state().profile.as_ref().unwrap().name, "Ada L.");
        assert_eq!(
            controller.state().session.as_ref().map(|s| s.session_id.as_str()),
            Some("s1")
        );
    }

    #[tokio::test]
    async fn test_navigate_to_plans_and_back() {
        let mut controller = controller();
        controller.start().await;
        controller.confirm_onboarding(draft()).await.unwrap();
        controller
            .confirm_sme(SmeConfig::new("Legal", "Contracts", "SMB"), "s1")
            .await
            .unwrap();
        controller.set_modal_open(Modal::EditProfile, true);

        controller.navigate_to_plans();
        assert_eq!(controller.mode(), UiMode::Marketing(MarketingPage::Plans));
        assert!(!controller.state().overlays.edit_profile);

        controller.get_started();
        assert_eq!(controller.mode(), UiMode::Chat);
    }

    #[tokio::test]
    async fn test_sync_complete_only_bumps_reload_key() {
        let mut controller = controller();
        let before = controller.state().clone();
        controller.sync_complete();
        assert_eq!(controller.state().vault_reload_key, before.vault_reload_key + 1);
        assert_eq!(controller.state().session, before.session);
        assert_eq!(controller.state().profile, before.profile);
    }

    #[tokio::test]
    async fn test_keep_and_switch_is_noop() {
        let mut controller = controller();
        let before = controller.state().clone();
        controller.keep_and_switch_sme();
        assert_eq!(controller.state(), &before);
    }

    #[tokio::test]
    async fn test_gate_runs_once() {
        let mut controller = controller();
        assert_eq!(controller.start().await, GateOutcome::Anonymous);
        controller.confirm_onboarding(draft()).await.unwrap();
        let again = controller.start().await;
        assert!(matches!(again, GateOutcome::Authenticated(_)));
        assert_eq!(controller.mode(), UiMode::SmeSelection);
    }

    #[tokio::test]
    async fn test_intents_drive_overlays() {
        let mut controller = controller();
        controller.start().await;
        controller
            .apply(Intent::ConfirmOnboarding(draft()))
            .await
            .unwrap();
        controller.apply(Intent::SetVaultOpen(true)).await.unwrap();
        assert_eq!(controller.mode(), UiMode::Vault);
        controller.apply(Intent::SetDashboardOpen(true)).await.unwrap();
        assert_eq!(controller.mode(), UiMode::Dashboard);
        controller.apply(Intent::SetDashboardOpen(false)).await.unwrap();
        controller.apply(Intent::SetVaultOpen(false)).await.unwrap();
        assert_eq!(controller.mode(), UiMode::SmeSelection);
    }

    #[tokio::test]
    async fn test_identity_change_keeps_session_when_lookup_fails() {
        let store = Arc::new(MemoryStore::new());
        let profiles = Arc::new(LocalBackend::new(store.clone()));
        let sessions = Arc::new(FlakySessions {
            inner: LocalBackend::new(store.clone()),
            offline: AtomicBool::new(false),
        });
        let pointer = SessionPointer::new(
            Box::new(FragmentSlot::new(MemoryFragment::default())),
            Box::new(StoredSlot::new(store)),
        );
        let mut controller = ShellController::new(pointer, profiles, sessions.clone());
        controller.start().await;
        controller.confirm_onboarding(draft()).await.unwrap();
        controller
            .confirm_sme(SmeConfig::new("Legal", "Contracts", "SMB"), "s1")
            .await
            .unwrap();

        sessions.offline.store(true, Ordering::SeqCst);
        let mut edited = controller.state().profile.clone().unwrap();
        edited.email = "ada.l@example.com".into();
        controller.save_profile(edited).await.unwrap();

        assert_eq!(controller.mode(), UiMode::Chat);
        assert_eq!(
            controller.state().session.as_ref().map(|s| s.session_id.as_str()),
            Some("s1")
        );
    }

    #[tokio::test]
    async fn test_sign_out_clears_url_fragment() {
        let mut controller = controller();
        controller.start().await;
        controller.confirm_onboarding(draft()).await.unwrap();
        controller
            .confirm_sme(SmeConfig::new("Legal", "Contracts", "SMB"), "s1")
            .await
            .unwrap();
        assert_eq!(controller.pointer().fragment_id().as_deref(), Some("s1"));

        controller.sign_out().await;

        assert_eq!(controller.pointer().fragment_id(), None);
        assert_eq!(controller.pointer().stored_id(), None);
    }

    #[tokio::test]
    async fn test_confirm_sme_survives_unwritable_storage() {
        let backend = Arc::new(LocalBackend::new(Arc::new(MemoryStore::new())));
        let pointer = SessionPointer::new(
            Box::new(FragmentSlot::new(MemoryFragment::default())),
            Box::new(StoredSlot::new(Arc::new(ReadOnlyStore))),
        );
        let mut controller = ShellController::new(pointer, backend.clone(), backend);
        controller.start().await;
        controller.confirm_onboarding(draft()).await.unwrap();

        controller
            .confirm_sme(SmeConfig::new("Legal", "Contracts", "SMB"), "s1")
            .await
            .unwrap();

        assert_eq!(controller.mode(), UiMode::Chat);
        assert_eq!(controller.pointer().stored_id(), None);
        assert_eq!(controller.pointer().fragment_id().as_deref(), Some("s1"));
    }

    #[tokio::test]
    async fn test_second_transition_is_rejected_while_one_runs() {
        let shared = SharedController::new(controller());
        let guard = shared.begin().unwrap();
        assert!(matches!(shared.begin(), Err(TransitionError::Busy)));
        drop(guard);
        assert!(shared.begin().is_ok());
    }
}
