use super::{PointerError, PointerSlot};
use crate::storage::KeyValueStore;
use std::sync::Arc;

/// Device-storage key holding the last active session id.
pub const LAST_SESSION_ID_KEY: &str = "smeProLastSessionId";

pub struct StoredSlot {
    store: Arc<dyn KeyValueStore>,
}

impl StoredSlot {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

impl PointerSlot for StoredSlot {
    fn read(&self) -> Result<Option<String>, PointerError> {
        Ok(self.store.get(LAST_SESSION_ID_KEY)?)
    }

    fn write(&self, session_id: &str) -> Result<(), PointerError> {
        Ok(self.store.set(LAST_SESSION_ID_KEY, session_id)?)
    }

    fn clear(&self) -> Result<(), PointerError> {
        Ok(self.store.remove(LAST_SESSION_ID_KEY)?)
    }
}
