use super::{CollaborationBackend, ProfileStore, StoreError};
use crate::storage::KeyValueStore;
use crate::types::{BillingCycle, ChatSession, SmeConfig, SubscriptionPlan, UserProfile};
use async_trait::async_trait;
use std::sync::Arc;
use time::OffsetDateTime;

pub const PROFILE_KEY: &str = "userProfile";

pub fn session_key(session_id: &str) -> String {
    format!("session_{}", session_id)
}

/// Profile store and session backend kept entirely in device storage.
pub struct LocalBackend {
    store: Arc<dyn KeyValueStore>,
}

impl LocalBackend {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn read_profile(&self) -> Result<Option<UserProfile>, StoreError> {
        match self.store.get(PROFILE_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn read_session(&self, session_id: &str) -> Result<Option<ChatSession>, StoreError> {
        match self.store.get(&session_key(session_id))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn write_session(&self, session: &ChatSession) -> Result<(), StoreError> {
        let raw = serde_json::to_string(session)?;
        self.store.set(&session_key(&session.session_id), &raw)?;
        Ok(())
    }

    fn create_session(
        &self,
        session_id: &str,
        sme_config: &SmeConfig,
        account_tier: Option<SubscriptionPlan>,
    ) -> Result<ChatSession, StoreError> {
        if session_id.trim().is_empty() {
            return Err(StoreError::Rejected("session id must not be empty".into()));
        }
        let participants = self.read_profile()?.into_iter().collect();
        let session = ChatSession {
            session_id: session_id.to_string(),
            plan: account_tier.unwrap_or_default(),
            sme_config: sme_config.clone(),
            messages: Vec::new(),
            participants,
            last_modified: now_millis(),
            title: Some(format!("{} Expert", sme_config.sub_type.trim())),
        };
        self.write_session(&session)?;
        tracing::debug!(session_id, "created local session");
        Ok(session)
    }
}

/// Trim the name, lowercase the email, and fill in optional fields.
pub(crate) fn normalize_profile(mut profile: UserProfile) -> UserProfile {
    profile.name = profile.name.trim().to_string();
    profile.email = profile.email.trim().to_lowercase();
    profile.billing_cycle = Some(profile.billing_cycle.unwrap_or(BillingCycle::Monthly));
    profile.api_connectors = Some(profile.api_connectors.unwrap_or_default());
    profile
}

fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl ProfileStore for LocalBackend {
    async fn fetch_user_profile(&self) -> Result<Option<UserProfile>, StoreError> {
        self.read_profile()
    }

    async fn save_user_profile(&self, profile: UserProfile) -> Result<UserProfile, StoreError> {
        let profile = normalize_profile(profile);
        let raw = serde_json::to_string(&profile)?;
        self.store.set(PROFILE_KEY, &raw)?;
        Ok(profile)
    }

    async fn clear_user_profile(&self) -> Result<(), StoreError> {
        self.store.remove(PROFILE_KEY)?;
        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl CollaborationBackend for LocalBackend {
    async fn get_session(
        &self,
        session_id: &str,
        sme_config: Option<&SmeConfig>,
        account_tier: Option<SubscriptionPlan>,
    ) -> Result<Option<ChatSession>, StoreError> {
        if let Some(existing) = self.read_session(session_id)? {
            return Ok(Some(existing));
        }
        match sme_config {
            Some(config) => self
                .create_session(session_id, config, account_tier)
                .map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn backend() -> LocalBackend {
        LocalBackend::new(Arc::new(MemoryStore::new()))
    }

    fn profile() -> UserProfile {
        UserProfile {
            name: "  Grace Hopper ".into(),
            email: "Grace@Example.COM".into(),
            account_type: SubscriptionPlan::Business,
            billing_cycle: None,
            api_connectors: None,
        }
    }

    #[tokio::test]
    async fn test_save_normalizes_profile() {
        let backend = backend();
        let saved = backend.save_user_profile(profile()).await.unwrap();
        assert_eq!(saved.name, "Grace Hopper");
        assert_eq!(saved.email, "grace@example.com");
        assert_eq!(saved.billing_cycle, Some(BillingCycle::Monthly));
        assert_eq!(saved.api_connectors, Some(Vec::new()));
        assert_eq!(backend.fetch_user_profile().await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn test_clear_profile() {
        let backend = backend();
        backend.save_user_profile(profile()).await.unwrap();
        backend.clear_user_profile().await.unwrap();
        assert_eq!(backend.fetch_user_profile().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_lookup_without_config_does_not_create() {
        let backend = backend();
        let found = backend.get_session("missing", None, None).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_get_session_creates_then_resumes() {
        let backend = backend();
        let saved = backend.save_user_profile(profile()).await.unwrap();
        let config = SmeConfig::new("Finance", "Tax", "Freelancers");

        let created = backend
            .get_session("new001", Some(&config), Some(SubscriptionPlan::Business))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.plan, SubscriptionPlan::Business);
        assert!(created.messages.is_empty());
        assert_eq!(created.participants, vec![saved]);
        assert_eq!(created.title.as_deref(), Some("Tax Expert"));

        let resumed = backend.get_session("new001", None, None).await.unwrap();
        assert_eq!(resumed, Some(created));
    }

    #[tokio::test]
    async fn test_empty_session_id_is_rejected() {
        let backend = backend();
        let config = SmeConfig::new("Finance", "Tax", "Freelancers");
        let err = backend
            .get_session(" ", Some(&config), None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
    }
}
