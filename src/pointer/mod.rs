//! Durable session pointer.
//!
//! "Which session is active" is recorded in two places: the URL fragment
//! (`#sessionId=...`, shareable) and a single device-storage key (returning
//! users). Both are exposed through the same [`PointerSlot`] capability so the
//! resolver and transition handlers are written once against the pair.

mod fragment;
mod stored;

pub use fragment::{
    FragmentHost, FragmentSlot, MemoryFragment, SESSION_ID_PARAM, parse_fragment,
    session_fragment,
};
pub use stored::{LAST_SESSION_ID_KEY, StoredSlot};

#[cfg(target_arch = "wasm32")]
pub use fragment::BrowserFragment;

use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum PointerError {
    #[error("url fragment unavailable: {0}")]
    FragmentUnavailable(String),

    #[error("url fragment write rejected: {0}")]
    FragmentWrite(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// One backing store for the active session id.
pub trait PointerSlot: Send + Sync {
    fn read(&self) -> Result<Option<String>, PointerError>;
    fn write(&self, session_id: &str) -> Result<(), PointerError>;
    fn clear(&self) -> Result<(), PointerError>;
}

/// The fragment and storage slots, consulted in that order.
pub struct SessionPointer {
    fragment: Box<dyn PointerSlot>,
    stored: Box<dyn PointerSlot>,
}

impl SessionPointer {
    pub fn new(fragment: Box<dyn PointerSlot>, stored: Box<dyn PointerSlot>) -> Self {
        Self { fragment, stored }
    }

    pub fn fragment(&self) -> &dyn PointerSlot {
        self.fragment.as_ref()
    }

    pub fn stored(&self) -> &dyn PointerSlot {
        self.stored.as_ref()
    }

    /// Fragment id, with read failures logged and treated as absent.
    pub fn fragment_id(&self) -> Option<String> {
        read_or_log(self.fragment(), "url fragment")
    }

    /// Stored id, with read failures logged and treated as absent.
    pub fn stored_id(&self) -> Option<String> {
        read_or_log(self.stored(), "device storage")
    }

    /// Record `session_id` in storage. The fragment is only touched when
    /// `share` is set; a fragment failure is logged and tolerated, a storage
    /// failure is returned.
    pub fn record(&self, session_id: &str, share: bool) -> Result<(), PointerError> {
        let stored = self.stored.write(session_id);
        if share && let Err(err) = self.fragment.write(session_id) {
            tracing::warn!(session_id, error = %err, "could not set url fragment");
        }
        stored
    }

    /// Clear the fragment, logging rather than propagating failures.
    pub fn clear_fragment(&self) {
        if let Err(err) = self.fragment.clear() {
            tracing::warn!(error = %err, "could not clear url fragment");
        }
    }

    /// Clear the stored id, logging rather than propagating failures.
    pub fn clear_stored(&self) {
        if let Err(err) = self.stored.clear() {
            tracing::warn!(error = %err, "could not clear stored session id");
        }
    }
}

fn read_or_log(slot: &dyn PointerSlot, origin: &str) -> Option<String> {
    match slot.read() {
        Ok(id) => id.filter(|id| !id.trim().is_empty()),
        Err(err) => {
            tracing::warn!(origin, error = %err, "session pointer unreadable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    struct BlockedFragment;

    impl FragmentHost for BlockedFragment {
        fn hash(&self) -> Result<String, PointerError> {
            Ok(String::new())
        }

        fn set_hash(&self, _value: &str) -> Result<(), PointerError> {
            Err(PointerError::FragmentWrite("blocked by sandbox".into()))
        }
    }

    fn pointer_with(fragment: impl FragmentHost + 'static) -> (SessionPointer, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let pointer = SessionPointer::new(
            Box::new(FragmentSlot::new(fragment)),
            Box::new(StoredSlot::new(store.clone())),
        );
        (pointer, store)
    }

    #[test]
    fn test_record_with_share_writes_both_slots() {
        let (pointer, _store) = pointer_with(MemoryFragment::default());
        pointer.record("new001", true).unwrap();
        assert_eq!(pointer.fragment_id().as_deref(), Some("new001"));
        assert_eq!(pointer.stored_id().as_deref(), Some("new001"));
    }

    #[test]
    fn test_record_without_share_leaves_fragment() {
        let (pointer, _store) = pointer_with(MemoryFragment::default());
        pointer.record("abc", false).unwrap();
        assert_eq!(pointer.fragment_id(), None);
        assert_eq!(pointer.stored_id().as_deref(), Some("abc"));
    }

    #[test]
    fn test_fragment_write_failure_is_tolerated() {
        let (pointer, store) = pointer_with(BlockedFragment);
        assert!(pointer.record("new001", true).is_ok());
        assert_eq!(
            crate::storage::KeyValueStore::get(store.as_ref(), LAST_SESSION_ID_KEY)
                .unwrap()
                .as_deref(),
            Some("new001")
        );
        pointer.clear_fragment();
    }

    #[test]
    fn test_blank_ids_read_as_absent() {
        let (pointer, _store) = pointer_with(MemoryFragment::new("#sessionId="));
        assert_eq!(pointer.fragment_id(), None);
    }
}
