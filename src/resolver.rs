//! Session resolution.
//!
//! Decides which session to show once a profile is known: the URL fragment
//! first, then the id remembered in device storage. Stale ids are expected
//! (deleted sessions, links from another account) and degrade to "no session".

use crate::backend::CollaborationBackend;
use crate::pointer::SessionPointer;
use crate::types::ChatSession;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedFrom {
    Fragment,
    Storage,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    pub session: ChatSession,
    pub source: ResolvedFrom,
}

/// Resolve the active session. Returns `None` when neither slot points at a
/// session the backend still knows.
pub async fn resolve_session(
    pointer: &SessionPointer,
    backend: &dyn CollaborationBackend,
) -> Option<Resolved> {
    if let Some(session_id) = pointer.fragment_id() {
        match lookup(backend, &session_id).await {
            Some(session) => {
                if let Err(err) = pointer.record(&session_id, false) {
                    tracing::warn!(session_id, error = %err, "could not remember session");
                }
                return Some(Resolved {
                    session,
                    source: ResolvedFrom::Fragment,
                });
            }
            None => {
                tracing::warn!(session_id, "session id from url not found, starting fresh");
                pointer.clear_fragment();
            }
        }
    }

    let session_id = pointer.stored_id()?;
    match lookup(backend, &session_id).await {
        Some(session) => Some(Resolved {
            session,
            source: ResolvedFrom::Storage,
        }),
        None => {
            tracing::info!(session_id, "stored session id no longer resolves");
            None
        }
    }
}

/// Pure lookup; backend failures count as "not found".
async fn lookup(backend: &dyn CollaborationBackend, session_id: &str) -> Option<ChatSession> {
    match backend.get_session(session_id, None, None).await {
        Ok(session) => session,
        Err(err) => {
            tracing::warn!(session_id, error = %err, "session fetch failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::StoreError;
    use crate::pointer::{FragmentSlot, MemoryFragment, StoredSlot};
    use crate::storage::MemoryStore;
    use crate::types::{SmeConfig, SubscriptionPlan};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Unreachable;

    #[async_trait]
    impl CollaborationBackend for Unreachable {
        async fn get_session(
            &self,
            _session_id: &str,
            _sme_config: Option<&SmeConfig>,
            _account_tier: Option<SubscriptionPlan>,
        ) -> Result<Option<ChatSession>, StoreError> {
            Err(StoreError::Status {
                status: 503,
                body: "maintenance".into(),
            })
        }
    }

    #[tokio::test]
    async fn test_backend_failure_resolves_to_nothing() {
        let pointer = SessionPointer::new(
            Box::new(FragmentSlot::new(MemoryFragment::new("sessionId=abc"))),
            Box::new(StoredSlot::new(Arc::new(MemoryStore::new()))),
        );
        assert_eq!(resolve_session(&pointer, &Unreachable).await, None);
        assert_eq!(pointer.fragment_id(), None);
    }

    #[tokio::test]
    async fn test_nothing_to_resolve() {
        let pointer = SessionPointer::new(
            Box::new(FragmentSlot::new(MemoryFragment::default())),
            Box::new(StoredSlot::new(Arc::new(MemoryStore::new()))),
        );
        assert_eq!(resolve_session(&pointer, &Unreachable).await, None);
    }
}
