use crate::controller::Intent;
use crate::plans::plan_details;
use crate::types::{BillingCycle, UserProfile};
use dioxus::prelude::*;

#[component]
pub fn DashboardView(profile: UserProfile, on_intent: EventHandler<Intent>) -> Element {
    let plan = plan_details(profile.account_type);
    let cycle = profile.billing_cycle.unwrap_or_default();
    let billing = match cycle {
        BillingCycle::Monthly => format!("${}/mo", plan.price(cycle)),
        BillingCycle::Annual => format!("${}/yr", plan.price(cycle)),
    };
    let connected = profile
        .api_connectors
        .as_ref()
        .map(|connectors| connectors.iter().filter(|c| c.is_enabled).count())
        .unwrap_or(0);

    rsx! {
        div { class: "main-container dashboard",
            header { class: "dashboard-header",
                h2 { class: "section-title", "Dashboard" }
                button {
                    class: "btn btn-link",
                    r#type: "button",
                    onclick: move |_| on_intent.call(Intent::SetDashboardOpen(false)),
                    "Close"
                }
            }
            div { class: "card-grid",
                div { class: "card",
                    h3 { "Plan" }
                    p { "{plan.name}" }
                    p { class: "text-muted", "{billing}" }
                    button {
                        class: "btn",
                        r#type: "button",
                        onclick: move |_| on_intent.call(Intent::NavigateToPlans),
                        "Manage plan"
                    }
                }
                div { class: "card",
                    h3 { "Account" }
                    p { "{profile.name}" }
                    p { class: "text-muted", "{profile.email}" }
                }
                div { class: "card",
                    h3 { "Connected sources" }
                    p { "{connected}" }
                }
            }
        }
    }
}
