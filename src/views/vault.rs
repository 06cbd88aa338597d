use crate::controller::Intent;
use crate::mode::Modal;
use crate::types::{ApiConnector, ConnectorSyncStatus, UserProfile};
use crate::views::shared::format_last_modified;
use dioxus::prelude::*;

fn sync_label(connector: &ApiConnector) -> String {
    match connector.sync_status {
        ConnectorSyncStatus::Syncing => "Syncing…".to_string(),
        ConnectorSyncStatus::Error => "Sync failed".to_string(),
        ConnectorSyncStatus::Idle | ConnectorSyncStatus::Synced => connector
            .last_synced
            .and_then(format_last_modified)
            .map(|at| format!("Last synced {at}"))
            .unwrap_or_else(|| "Never synced".to_string()),
    }
}

/// The user's vault. The shell remounts it whenever `reload_key` changes.
#[component]
pub fn VaultView(profile: UserProfile, reload_key: u64, on_intent: EventHandler<Intent>) -> Element {
    let connectors = profile
        .api_connectors
        .clone()
        .unwrap_or_default()
        .into_iter()
        .filter(|connector| connector.is_enabled)
        .collect::<Vec<_>>();

    tracing::debug!(reload_key, connectors = connectors.len(), "vault mounted");

    rsx! {
        div { class: "main-container vault",
            header { class: "vault-header",
                h2 { class: "section-title", "{profile.name}'s Vault" }
                div { class: "actions",
                    button {
                        class: "btn",
                        r#type: "button",
                        onclick: move |_| on_intent.call(Intent::SetModalOpen(Modal::ManageCategories, true)),
                        "Manage categories"
                    }
                    button {
                        class: "btn",
                        r#type: "button",
                        onclick: move |_| on_intent.call(Intent::SyncComplete),
                        "Sync now"
                    }
                    button {
                        class: "btn btn-link",
                        r#type: "button",
                        onclick: move |_| on_intent.call(Intent::SetVaultOpen(false)),
                        "Close"
                    }
                }
            }
            section { class: "settings-section",
                h3 { class: "section-title", "Connected sources" }
                if connectors.is_empty() {
                    p { class: "text-muted", "No AI sources connected. Add one from your profile." }
                }
                ul { class: "connector-list",
                    for connector in connectors.iter() {
                        li { key: "{connector.provider:?}",
                            span { class: "badge", "{connector.provider:?}" }
                            span { class: "text-muted", "{sync_label(connector)}" }
                        }
                    }
                }
            }
        }
    }
}
