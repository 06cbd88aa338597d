use std::env;

pub const DEFAULT_STORAGE_NAMESPACE: &str = "smepro";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime configuration, read from the environment after `.env` / bundled
/// config have been applied.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Base URL of the hosted profile/session API; `None` selects the local backend.
    pub api_endpoint: Option<String>,
    pub api_key: Option<String>,
    pub storage_namespace: String,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_endpoint: None,
            api_key: None,
            storage_namespace: DEFAULT_STORAGE_NAMESPACE.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();
        Self {
            api_endpoint: read("SMEPRO_API_ENDPOINT"),
            api_key: read("SMEPRO_API_KEY"),
            storage_namespace: read("SMEPRO_STORAGE_NAMESPACE")
                .unwrap_or(defaults.storage_namespace),
            log_filter: read("SMEPRO_LOG").unwrap_or(defaults.log_filter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SMEPRO_API_ENDPOINT", "  "),
            ("SMEPRO_STORAGE_NAMESPACE", "staging"),
            ("SMEPRO_LOG", "smepro=debug"),
        ]);
        let config = AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.api_endpoint, None);
        assert_eq!(config.storage_namespace, "staging");
        assert_eq!(config.log_filter, "smepro=debug");
    }
}
