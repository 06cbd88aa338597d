use crate::controller::Intent;
use crate::mode::Modal;
use crate::plans::plan_details;
use crate::types::{SmeConfig, SubscriptionPlan};
use crate::views::shared::{INDUSTRY_SUGGESTIONS, new_session_id};
use dioxus::prelude::*;

#[component]
pub fn SmeSelector(plan: SubscriptionPlan, on_intent: EventHandler<Intent>) -> Element {
    let mut industry = use_signal(String::new);
    let mut sub_type = use_signal(String::new);
    let mut segment = use_signal(String::new);

    let config = SmeConfig::new(industry().trim(), sub_type().trim(), segment().trim());
    let ready = config.is_complete();
    let start = move |evt: FormEvent| {
        evt.prevent_default();
        if config.is_complete() {
            on_intent.call(Intent::ConfirmSme(config.clone(), new_session_id()));
        }
    };

    rsx! {
        div { class: "main-container sme-selector",
            div { class: "sme-header",
                h2 { class: "section-title", "Choose your expert" }
                span { class: "badge", "{plan_details(plan).name}" }
            }
            form { class: "stack", onsubmit: start,
                label { class: "field",
                    span { "Industry" }
                    input {
                        r#type: "text",
                        list: "industry-suggestions",
                        placeholder: "e.g. Healthcare",
                        value: "{industry}",
                        oninput: move |evt| industry.set(evt.value()),
                    }
                    datalist { id: "industry-suggestions",
                        for suggestion in INDUSTRY_SUGGESTIONS.iter() {
                            option { key: "{suggestion}", value: "{suggestion}" }
                        }
                    }
                }
                label { class: "field",
                    span { "Specialty" }
                    input {
                        r#type: "text",
                        placeholder: "e.g. Outpatient clinics",
                        value: "{sub_type}",
                        oninput: move |evt| sub_type.set(evt.value()),
                    }
                }
                label { class: "field",
                    span { "Segment" }
                    input {
                        r#type: "text",
                        placeholder: "e.g. Medical billing",
                        value: "{segment}",
                        oninput: move |evt| segment.set(evt.value()),
                    }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: !ready,
                    "Start session"
                }
            }
            div { class: "sme-shortcuts",
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| on_intent.call(Intent::SetVaultOpen(true)),
                    "Open Vault"
                }
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| on_intent.call(Intent::SetDashboardOpen(true)),
                    "Dashboard"
                }
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| on_intent.call(Intent::SetModalOpen(Modal::EditProfile, true)),
                    "Profile"
                }
            }
        }
    }
}
