/// Profile store and collaboration backend
///
/// The shell talks to two remote collaborators through narrow async traits:
///
/// - `ProfileStore` - who the current user is (absent means "not onboarded")
/// - `CollaborationBackend` - chat sessions by id, created on demand
///
/// `Backend::from_config` picks the hosted HTTP API when an endpoint is
/// configured and falls back to `LocalBackend`, which keeps everything in
/// device storage.
mod http;
mod local;

pub use http::HttpBackend;
pub use local::{LocalBackend, PROFILE_KEY, session_key};

use crate::config::AppConfig;
use crate::storage::{KeyValueStore, StorageError};
use crate::types::{ChatSession, SmeConfig, SubscriptionPlan, UserProfile};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("backend error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ProfileStore: Send + Sync {
    /// `Ok(None)` when nobody has onboarded on this device/account.
    async fn fetch_user_profile(&self) -> Result<Option<UserProfile>, StoreError>;

    /// Persist `profile`; the returned value may be normalized by the store.
    async fn save_user_profile(&self, profile: UserProfile) -> Result<UserProfile, StoreError>;

    async fn clear_user_profile(&self) -> Result<(), StoreError>;
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait CollaborationBackend: Send + Sync {
    /// Look up `session_id`. With `sme_config`, a missing session is created
    /// using the entitlements of `account_tier`; without it this is a pure
    /// lookup and `Ok(None)` means the id is unknown.
    async fn get_session(
        &self,
        session_id: &str,
        sme_config: Option<&SmeConfig>,
        account_tier: Option<SubscriptionPlan>,
    ) -> Result<Option<ChatSession>, StoreError>;
}

/// Backend selected from configuration.
#[derive(Clone)]
pub enum Backend {
    Hosted(Arc<HttpBackend>),
    Local(Arc<LocalBackend>),
}

impl Backend {
    pub fn from_config(config: &AppConfig, store: Arc<dyn KeyValueStore>) -> Self {
        match &config.api_endpoint {
            Some(endpoint) => {
                tracing::info!(endpoint, "using hosted backend");
                Self::Hosted(Arc::new(HttpBackend::new(
                    endpoint.clone(),
                    config.api_key.clone(),
                )))
            }
            None => {
                tracing::info!("no api endpoint configured, using local backend");
                Self::Local(Arc::new(LocalBackend::new(store)))
            }
        }
    }

    pub fn profiles(&self) -> Arc<dyn ProfileStore> {
        match self {
            Self::Hosted(backend) => backend.clone(),
            Self::Local(backend) => backend.clone(),
        }
    }

    pub fn sessions(&self) -> Arc<dyn CollaborationBackend> {
        match self {
            Self::Hosted(backend) => backend.clone(),
            Self::Local(backend) => backend.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_backend_selection_follows_endpoint() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let local = Backend::from_config(&AppConfig::default(), store.clone());
        assert!(matches!(local, Backend::Local(_)));

        let hosted_config = AppConfig {
            api_endpoint: Some("https://api.example.com".into()),
            ..AppConfig::default()
        };
        let hosted = Backend::from_config(&hosted_config, store);
        assert!(matches!(hosted, Backend::Hosted(_)));
    }
}
