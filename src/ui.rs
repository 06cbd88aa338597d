use crate::backend::Backend;
use crate::config::AppConfig;
use crate::controller::{Intent, SharedController, ShellController};
use crate::mode::{Modal, ShellState, UiMode, resolve_mode, visible_modals};
use crate::pointer::{FragmentSlot, SessionPointer, StoredSlot};
use crate::storage::{DeviceStore, KeyValueStore};
use crate::views::{
    ChangeSmeModal, ChatWindow, DashboardView, EditProfileModal, ManageCategoriesModal,
    MarketingSite, SmeSelector, UserIdentity, VaultView,
};
use dioxus::prelude::*;
use std::sync::Arc;

const SMEPRO_CSS: Asset = asset!("/assets/smepro.css");

#[cfg(target_arch = "wasm32")]
fn platform_fragment() -> crate::pointer::BrowserFragment {
    crate::pointer::BrowserFragment
}

#[cfg(not(target_arch = "wasm32"))]
fn platform_fragment() -> crate::pointer::MemoryFragment {
    crate::pointer::MemoryFragment::from_args(std::env::args())
}

fn build_controller() -> SharedController {
    let config = AppConfig::from_env();
    let store: Arc<dyn KeyValueStore> = Arc::new(DeviceStore::open(&config.storage_namespace));
    let backend = Backend::from_config(&config, store.clone());
    let pointer = SessionPointer::new(
        Box::new(FragmentSlot::new(platform_fragment())),
        Box::new(StoredSlot::new(store)),
    );
    SharedController::new(ShellController::new(
        pointer,
        backend.profiles(),
        backend.sessions(),
    ))
}

#[component]
pub fn App() -> Element {
    let controller = use_hook(build_controller);
    let shell = use_signal(ShellState::default);
    let ready = use_signal(|| false);

    use_profile_gate(controller.clone(), shell, ready);

    let on_intent = use_callback(move |intent: Intent| {
        let Ok(mut guard) = controller.begin() else {
            return;
        };
        let mut shell = shell;
        spawn(async move {
            if let Err(err) = guard.apply(intent).await {
                tracing::warn!(error = %err, "transition failed");
            }
            shell.set(guard.state().clone());
        });
    });

    let state = shell();
    let body = if !ready() {
        rsx! {
            div { class: "boot-screen", aria_busy: "true",
                div { class: "boot-mark", "SMEPro" }
            }
        }
    } else {
        match resolve_mode(&state) {
            UiMode::Marketing(page) => rsx! {
                MarketingSite { page, on_intent }
            },
            mode => rsx! {
                AppShell { state, mode, on_intent }
            },
        }
    };

    rsx! {
        document::Link { rel: "stylesheet", href: SMEPRO_CSS }
        {body}
    }
}

/// Run the profile gate exactly once per mount.
fn use_profile_gate(controller: SharedController, shell: Signal<ShellState>, ready: Signal<bool>) {
    use_hook(move || {
        let mut shell = shell;
        let mut ready = ready;
        spawn(async move {
            let mut guard = controller.lock().await;
            guard.start().await;
            shell.set(guard.state().clone());
            ready.set(true);
        });
    });
}

#[component]
fn AppShell(state: ShellState, mode: UiMode, on_intent: EventHandler<Intent>) -> Element {
    let modals = visible_modals(&state);
    rsx! {
        div { class: "shell",
            main { class: "shell-main",
                ShellContent { state: state.clone(), mode, on_intent }
            }
            footer { class: "shell-footer",
                p { "SMEPro · subject-matter expertise on demand" }
            }
            for modal in modals {
                ShellModal { key: "{modal:?}", modal, state: state.clone(), on_intent }
            }
        }
    }
}

#[component]
fn ShellContent(state: ShellState, mode: UiMode, on_intent: EventHandler<Intent>) -> Element {
    match (mode, state.profile, state.session) {
        (UiMode::Dashboard, Some(profile), _) => rsx! {
            DashboardView { profile, on_intent }
        },
        (UiMode::Vault, Some(profile), _) => rsx! {
            VaultView {
                key: "{state.vault_reload_key}",
                profile,
                reload_key: state.vault_reload_key,
                on_intent,
            }
        },
        (UiMode::SmeSelection, Some(profile), _) => rsx! {
            SmeSelector { plan: profile.account_type, on_intent }
        },
        (UiMode::Chat, Some(profile), Some(session)) => rsx! {
            ChatWindow {
                key: "{session.session_id}",
                session,
                profile,
                on_intent,
            }
        },
        _ => rsx! {
            UserIdentity {
                initial_plan: state.plan_intent.map(|intent| intent.plan),
                on_intent,
            }
        },
    }
}

#[component]
fn ShellModal(modal: Modal, state: ShellState, on_intent: EventHandler<Intent>) -> Element {
    match (modal, state.profile, state.session) {
        (Modal::EditProfile, Some(profile), _) => rsx! {
            EditProfileModal { profile, on_intent }
        },
        (Modal::ChangeSme, _, Some(session)) => rsx! {
            ChangeSmeModal { sme_config: session.sme_config, on_intent }
        },
        (Modal::ManageCategories, _, _) => rsx! {
            ManageCategoriesModal { on_intent }
        },
        _ => rsx! {},
    }
}
