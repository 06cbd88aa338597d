use super::{PointerError, PointerSlot};
use std::collections::HashMap;
use std::sync::Mutex;

/// Fragment query parameter carrying the session id.
pub const SESSION_ID_PARAM: &str = "sessionId";

/// Parse `#a=1&b=2` (leading `#` optional) into a map. Later keys win.
pub fn parse_fragment(raw: &str) -> HashMap<String, String> {
    let trimmed = raw.strip_prefix('#').unwrap_or(raw);
    url::form_urlencoded::parse(trimmed.as_bytes())
        .into_owned()
        .collect()
}

/// Fragment value (without `#`) naming `session_id`.
pub fn session_fragment(session_id: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair(SESSION_ID_PARAM, session_id)
        .finish()
}

/// Raw access to wherever the fragment lives.
pub trait FragmentHost: Send + Sync {
    fn hash(&self) -> Result<String, PointerError>;
    fn set_hash(&self, value: &str) -> Result<(), PointerError>;
}

pub struct FragmentSlot<H> {
    host: H,
}

impl<H: FragmentHost> FragmentSlot<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }
}

impl<H: FragmentHost> PointerSlot for FragmentSlot<H> {
    fn read(&self) -> Result<Option<String>, PointerError> {
        let raw = self.host.hash()?;
        Ok(parse_fragment(&raw).remove(SESSION_ID_PARAM))
    }

    fn write(&self, session_id: &str) -> Result<(), PointerError> {
        self.host.set_hash(&session_fragment(session_id))
    }

    fn clear(&self) -> Result<(), PointerError> {
        self.host.set_hash("")
    }
}

/// Fragment held in memory. Native builds seed it from a deep link such as
/// `smepro://open#sessionId=abc123` passed on the command line.
#[derive(Default)]
pub struct MemoryFragment {
    value: Mutex<String>,
}

impl MemoryFragment {
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(hash.into()),
        }
    }

    /// Take the fragment of the first argument that carries one.
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Self {
        let hash = args
            .into_iter()
            .find_map(|arg| arg.split_once('#').map(|(_, hash)| hash.to_string()))
            .unwrap_or_default();
        Self::new(hash)
    }
}

impl FragmentHost for MemoryFragment {
    fn hash(&self) -> Result<String, PointerError> {
        self.value
            .lock()
            .map(|value| value.clone())
            .map_err(|e| PointerError::FragmentUnavailable(e.to_string()))
    }

    fn set_hash(&self, value: &str) -> Result<(), PointerError> {
        let mut current = self
            .value
            .lock()
            .map_err(|e| PointerError::FragmentWrite(e.to_string()))?;
        *current = value.to_string();
        Ok(())
    }
}

/// `window.location.hash`.
#[cfg(target_arch = "wasm32")]
#[derive(Default)]
pub struct BrowserFragment;

// Only ever touched from the browser main thread.
#[cfg(target_arch = "wasm32")]
unsafe impl Send for BrowserFragment {}
#[cfg(target_arch = "wasm32")]
unsafe impl Sync for BrowserFragment {}

#[cfg(target_arch = "wasm32")]
impl BrowserFragment {
    fn location() -> Result<web_sys::Location, PointerError> {
        web_sys::window()
            .map(|window| window.location())
            .ok_or_else(|| PointerError::FragmentUnavailable("window is unavailable".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl FragmentHost for BrowserFragment {
    fn hash(&self) -> Result<String, PointerError> {
        Self::location()?
            .hash()
            .map_err(|_| PointerError::FragmentUnavailable("location.hash unreadable".into()))
    }

    fn set_hash(&self, value: &str) -> Result<(), PointerError> {
        Self::location()?
            .set_hash(value)
            .map_err(|_| PointerError::FragmentWrite("location.hash rejected".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment_with_and_without_hash() {
        let with = parse_fragment("#sessionId=abc123&view=vault");
        assert_eq!(with.get("sessionId").map(String::as_str), Some("abc123"));
        assert_eq!(with.get("view").map(String::as_str), Some("vault"));
        let without = parse_fragment("sessionId=abc123");
        assert_eq!(without.get("sessionId").map(String::as_str), Some("abc123"));
        assert!(parse_fragment("").is_empty());
    }

    #[test]
    fn test_session_fragment_encodes_id() {
        assert_eq!(session_fragment("new001"), "sessionId=new001");
        let encoded = session_fragment("a b&c");
        assert_eq!(
            parse_fragment(&encoded).get(SESSION_ID_PARAM).map(String::as_str),
            Some("a b&c")
        );
    }

    #[test]
    fn test_from_args_picks_deep_link_fragment() {
        let fragment = MemoryFragment::from_args(vec![
            "smepro".to_string(),
            "smepro://open#sessionId=xyz789".to_string(),
        ]);
        let slot = FragmentSlot::new(fragment);
        assert_eq!(slot.read().unwrap().as_deref(), Some("xyz789"));
    }

    #[test]
    fn test_clear_empties_fragment() {
        let slot = FragmentSlot::new(MemoryFragment::new("sessionId=abc"));
        slot.clear().unwrap();
        assert_eq!(slot.read().unwrap(), None);
    }
}
