use anyhow::Context;
use tracing_subscriber::EnvFilter;

/// Defaults shipped inside the binary; mobile and web have no `.env` to read.
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

#[cfg(not(target_arch = "wasm32"))]
fn load_dotenv() {
    // A local .env wins during desktop development
    if dotenvy::dotenv().is_ok() {
        return;
    }

    load_bundled_config();
}

#[cfg(target_arch = "wasm32")]
fn load_dotenv() {
    load_bundled_config();
}

fn load_bundled_config() {
    for line in BUNDLED_CONFIG.lines() {
        let line = line.trim();
        // Skip comments and empty lines
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim();
            // Only set if not already set (allow env override)
            if std::env::var(key).is_err() {
                // SAFETY: We're setting env vars at startup before any threads are spawned
                unsafe {
                    std::env::set_var(key, value);
                }
            }
        }
    }
}

fn init_tracing(filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter)
        .with_context(|| format!("invalid SMEPRO_LOG filter {filter:?}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(anyhow::Error::msg)
        .context("tracing subscriber already installed")
}

fn main() {
    load_dotenv();
    let config = smepro::config::AppConfig::from_env();
    if let Err(err) = init_tracing(&config.log_filter) {
        eprintln!("{err:#}, logging at info");
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("info"))
            .try_init();
    }
    tracing::debug!(?config.api_endpoint, namespace = %config.storage_namespace, "starting");
    dioxus::launch(smepro::ui::App);
}
