use crate::pointer::session_fragment;
use comrak::plugins::syntect::SyntectAdapter;
use comrak::{ComrakOptions, ComrakPlugins, markdown_to_html_with_plugins};
use once_cell::sync::Lazy;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

static MARKDOWN_OPTIONS: Lazy<ComrakOptions> = Lazy::new(|| {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.extension.autolink = true;
    options
});

const LAST_MODIFIED_FORMAT: &[FormatItem<'static>] = format_description!(
    "[month repr:short] [day padding:none], [hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]"
);

pub const INDUSTRY_SUGGESTIONS: &[&str] = &[
    "Healthcare",
    "Finance",
    "Legal",
    "Real Estate",
    "Construction",
    "Retail",
    "Education",
    "Creative Arts",
];

pub fn markdown_to_html(md: &str) -> String {
    let adapter = SyntectAdapter::new(Some("base16-ocean.dark"));
    let mut plugins = ComrakPlugins::default();
    plugins.render.codefence_syntax_highlighter = Some(&adapter);
    markdown_to_html_with_plugins(md, &MARKDOWN_OPTIONS, &plugins)
}

/// Fresh id for a session about to be created.
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Fragment that reopens `session_id` when appended to the app URL.
pub fn share_fragment(session_id: &str) -> String {
    format!("#{}", session_fragment(session_id))
}

/// Deep link native builds register; the fragment is read back from argv.
#[cfg(not(target_arch = "wasm32"))]
pub const DEEP_LINK_BASE: &str = "smepro://open";

/// Complete link another user can open to join `session_id`.
pub fn share_link(session_id: &str) -> String {
    format!("{}{}", share_base(), share_fragment(session_id))
}

#[cfg(target_arch = "wasm32")]
fn share_base() -> String {
    web_sys::window()
        .and_then(|window| {
            let location = window.location();
            Some(format!("{}{}", location.origin().ok()?, location.pathname().ok()?))
        })
        .unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
fn share_base() -> String {
    DEEP_LINK_BASE.to_string()
}

/// Put `text` on the system clipboard. Returns whether it landed there.
#[cfg(any(feature = "desktop", feature = "mobile"))]
pub fn copy_to_clipboard(text: &str) -> bool {
    match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.to_string())) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "clipboard unavailable");
            false
        }
    }
}

/// No clipboard access from the web build; the caller shows the link instead.
#[cfg(not(any(feature = "desktop", feature = "mobile")))]
pub fn copy_to_clipboard(_text: &str) -> bool {
    false
}

pub fn format_last_modified(epoch_millis: i64) -> Option<String> {
    let nanos = i128::from(epoch_millis) * 1_000_000;
    let mut datetime = OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()?;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(LAST_MODIFIED_FORMAT).ok()
}

pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_fragment() {
        assert_eq!(share_fragment("abc123"), "#sessionId=abc123");
    }

    #[test]
    fn test_share_link_reopens_session_from_argv() {
        use crate::pointer::{FragmentSlot, MemoryFragment, PointerSlot};

        let link = share_link("abc123");
        assert_eq!(link, "smepro://open#sessionId=abc123");

        let slot = FragmentSlot::new(MemoryFragment::from_args(vec!["smepro".to_string(), link]));
        assert_eq!(slot.read().unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_new_session_ids_are_unique() {
        let a = new_session_id();
        let b = new_session_id();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("grace brewster hopper"), "GB");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn test_format_last_modified_rejects_out_of_range() {
        assert!(format_last_modified(0).is_some());
        assert!(format_last_modified(i64::MAX).is_none());
    }
}
