use crate::controller::Intent;
use crate::mode::Modal;
use crate::plans::plan_details;
use crate::types::{SmeConfig, UserProfile};
use dioxus::prelude::*;

#[component]
fn ModalFrame(title: String, modal: Modal, on_intent: EventHandler<Intent>, children: Element) -> Element {
    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal", role: "dialog", aria_label: "{title}",
                header { class: "modal-header",
                    h3 { "{title}" }
                    button {
                        class: "action-btn",
                        r#type: "button",
                        title: "Close",
                        onclick: move |_| on_intent.call(Intent::SetModalOpen(modal, false)),
                        "×"
                    }
                }
                {children}
            }
        }
    }
}

#[component]
pub fn EditProfileModal(profile: UserProfile, on_intent: EventHandler<Intent>) -> Element {
    let mut name = use_signal(|| profile.name.clone());
    let mut error = use_signal(|| None::<&'static str>);
    let plan = plan_details(profile.account_type);

    let current = profile.clone();
    let save = move |evt: FormEvent| {
        evt.prevent_default();
        let trimmed = name().trim().to_string();
        if trimmed.is_empty() {
            error.set(Some("Please enter your name."));
            return;
        }
        error.set(None);
        on_intent.call(Intent::SaveProfile(UserProfile {
            name: trimmed,
            ..current.clone()
        }));
    };

    rsx! {
        ModalFrame { title: "Edit profile", modal: Modal::EditProfile, on_intent,
            form { class: "stack", onsubmit: save,
                label { class: "field",
                    span { "Name" }
                    input {
                        r#type: "text",
                        value: "{name}",
                        oninput: move |evt| name.set(evt.value()),
                    }
                }
                label { class: "field",
                    span { "Email" }
                    div { class: "locked-input",
                        input { r#type: "email", value: "{profile.email}", readonly: true, disabled: true }
                        span { class: "lock-icon", dangerous_inner_html: "&#128274;" }
                    }
                }
                if let Some(reason) = error() {
                    p { class: "form-error", role: "alert", "{reason}" }
                }
                button { class: "btn btn-primary", r#type: "submit", "Save" }
            }
            div { class: "settings-section",
                h3 { class: "section-title", "Plan" }
                p { "{plan.name}" }
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| on_intent.call(Intent::NavigateToPlans),
                    "Manage plans"
                }
            }
            div { class: "settings-section",
                h3 { class: "section-title", "AI sources" }
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| on_intent.call(Intent::SyncComplete),
                    "Sync to Vault"
                }
            }
            button {
                class: "btn btn-danger",
                r#type: "button",
                onclick: move |_| on_intent.call(Intent::SignOut),
                "Sign out"
            }
        }
    }
}

#[component]
pub fn ChangeSmeModal(sme_config: SmeConfig, on_intent: EventHandler<Intent>) -> Element {
    rsx! {
        ModalFrame { title: "Switch expert", modal: Modal::ChangeSme, on_intent,
            p { class: "text-muted", "Current expert: {sme_config.label()}" }
            div { class: "stack",
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| on_intent.call(Intent::StartFreshChat),
                    "Start a fresh chat"
                }
                button {
                    class: "btn",
                    r#type: "button",
                    disabled: true,
                    title: "Switching experts always starts a new chat",
                    onclick: move |_| on_intent.call(Intent::KeepAndSwitchSme),
                    "Keep history and switch"
                }
            }
        }
    }
}

#[component]
pub fn ManageCategoriesModal(on_intent: EventHandler<Intent>) -> Element {
    rsx! {
        ModalFrame { title: "Manage categories", modal: Modal::ManageCategories, on_intent,
            p { class: "text-muted", "Vault categories are created as you save items." }
            button {
                class: "btn",
                r#type: "button",
                onclick: move |_| on_intent.call(Intent::SetModalOpen(Modal::ManageCategories, false)),
                "Done"
            }
        }
    }
}
