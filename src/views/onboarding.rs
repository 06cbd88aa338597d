use crate::controller::Intent;
use crate::plans::plan_details;
use crate::types::{ProfileDraft, SubscriptionPlan};
use dioxus::prelude::*;

const PLAN_CHOICES: [SubscriptionPlan; 2] = [SubscriptionPlan::Solo, SubscriptionPlan::Business];

/// Onboarding form. Submitting creates the profile and leaves the marketing site.
#[component]
pub fn UserIdentity(
    initial_plan: Option<SubscriptionPlan>,
    on_intent: EventHandler<Intent>,
) -> Element {
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut plan = use_signal(move || initial_plan.unwrap_or_default());
    let mut error = use_signal(|| None::<&'static str>);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let draft = ProfileDraft {
            name: name().trim().to_string(),
            email: email().trim().to_string(),
            account_type: plan(),
            api_connectors: None,
        };
        if let Some(reason) = draft.validation_error() {
            error.set(Some(reason));
            return;
        }
        error.set(None);
        on_intent.call(Intent::ConfirmOnboarding(draft));
    };

    rsx! {
        div { class: "main-container onboarding",
            h2 { class: "section-title", "Create your profile" }
            form { class: "stack", onsubmit: submit,
                label { class: "field",
                    span { "Name" }
                    input {
                        r#type: "text",
                        value: "{name}",
                        autocomplete: "name",
                        oninput: move |evt| name.set(evt.value()),
                    }
                }
                label { class: "field",
                    span { "Email" }
                    input {
                        r#type: "email",
                        value: "{email}",
                        autocomplete: "email",
                        oninput: move |evt| email.set(evt.value()),
                    }
                }
                div { class: "plan-picker",
                    for choice in PLAN_CHOICES {
                        button {
                            key: "{choice}",
                            class: format_args!(
                                "theme-option {}",
                                if plan() == choice { "active" } else { "" }
                            ),
                            r#type: "button",
                            onclick: move |_| plan.set(choice),
                            "{plan_details(choice).name}"
                        }
                    }
                }
                if let Some(reason) = error() {
                    p { class: "form-error", role: "alert", "{reason}" }
                }
                button { class: "btn btn-primary", r#type: "submit", "Continue" }
            }
            button {
                class: "btn btn-link",
                r#type: "button",
                onclick: move |_| on_intent.call(Intent::NavigateToPlans),
                "Compare plans"
            }
        }
    }
}
