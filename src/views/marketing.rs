use crate::controller::Intent;
use crate::mode::MarketingPage;
use crate::plans::{PLAN_CATALOG, PlanTier};
use crate::types::BillingCycle;
use dioxus::prelude::*;

#[component]
pub fn MarketingSite(page: MarketingPage, on_intent: EventHandler<Intent>) -> Element {
    rsx! {
        div { class: "marketing",
            MarketingHeader { page, on_intent }
            match page {
                MarketingPage::Home => rsx! { HomePage { on_intent } },
                MarketingPage::Features => rsx! { FeaturesPage { on_intent } },
                MarketingPage::HowItWorks => rsx! { HowItWorksPage { on_intent } },
                MarketingPage::Plans => rsx! { PlansPage { on_intent } },
            }
        }
    }
}

#[component]
fn MarketingHeader(page: MarketingPage, on_intent: EventHandler<Intent>) -> Element {
    rsx! {
        header { class: "marketing-header",
            button {
                class: "brand",
                r#type: "button",
                onclick: move |_| on_intent.call(Intent::ShowPage(MarketingPage::Home)),
                "SMEPro"
            }
            nav { class: "tabs",
                for target in MarketingPage::ALL {
                    button {
                        key: "{target:?}",
                        class: format_args!("tab {}", if target == page { "active" } else { "" }),
                        r#type: "button",
                        onclick: move |_| on_intent.call(Intent::ShowPage(target)),
                        "{target.label()}"
                    }
                }
            }
            GetStartedButton { on_intent, label: "Get Started" }
        }
    }
}

#[component]
fn GetStartedButton(on_intent: EventHandler<Intent>, label: &'static str) -> Element {
    rsx! {
        button {
            class: "btn btn-primary",
            r#type: "button",
            onclick: move |_| on_intent.call(Intent::GetStarted),
            "{label}"
        }
    }
}

#[component]
fn HomePage(on_intent: EventHandler<Intent>) -> Element {
    rsx! {
        section { class: "hero",
            h1 { "Expert answers for the work you actually do." }
            p { class: "text-muted",
                "Pick an industry, a specialty and a segment. SMEPro sets up a subject-matter expert for exactly that context and keeps every session ready to resume."
            }
            GetStartedButton { on_intent, label: "Start for free" }
        }
    }
}

const FEATURES: &[(&str, &str)] = &[
    (
        "Configurable experts",
        "Industry, sub-type and segment narrow every answer to your situation.",
    ),
    (
        "Guided sessions",
        "Step-by-step procedures, forms and contacts instead of walls of text.",
    ),
    (
        "The Vault",
        "Save the answers that matter, organized by category, synced from the AI tools you already use.",
    ),
    (
        "Collaboration",
        "Share a session link and work through a problem with your team.",
    ),
];

#[component]
fn FeaturesPage(on_intent: EventHandler<Intent>) -> Element {
    rsx! {
        section { class: "page",
            h2 { "Features" }
            div { class: "card-grid",
                for (title, body) in FEATURES.iter().copied() {
                    div { key: "{title}", class: "card",
                        h3 { "{title}" }
                        p { class: "text-muted", "{body}" }
                    }
                }
            }
            GetStartedButton { on_intent, label: "Get Started" }
        }
    }
}

const STEPS: &[&str] = &[
    "Create your profile and choose a plan.",
    "Select the expert: industry, specialty, segment.",
    "Ask questions, follow guided sessions, save what you learn to the Vault.",
    "Come back any time. Your last session reopens where you left it.",
];

#[component]
fn HowItWorksPage(on_intent: EventHandler<Intent>) -> Element {
    rsx! {
        section { class: "page",
            h2 { "How it works" }
            ol { class: "steps",
                for (i, step) in STEPS.iter().enumerate() {
                    li { key: "{i}", "{step}" }
                }
            }
            GetStartedButton { on_intent, label: "Get Started" }
        }
    }
}

#[component]
fn PlansPage(on_intent: EventHandler<Intent>) -> Element {
    let mut cycle = use_signal(|| BillingCycle::Monthly);
    let current = cycle();

    rsx! {
        section { class: "page",
            h2 { "Plans" }
            div { class: "theme-toggle",
                button {
                    class: format_args!(
                        "theme-option {}",
                        if current == BillingCycle::Monthly { "active" } else { "" }
                    ),
                    r#type: "button",
                    onclick: move |_| cycle.set(BillingCycle::Monthly),
                    "Monthly"
                }
                button {
                    class: format_args!(
                        "theme-option {}",
                        if current == BillingCycle::Annual { "active" } else { "" }
                    ),
                    r#type: "button",
                    onclick: move |_| cycle.set(BillingCycle::Annual),
                    "Annual"
                }
            }
            div { class: "card-grid",
                for details in PLAN_CATALOG.iter() {
                    PlanCard { key: "{details.name}", tier: details.tier, cycle: current, on_intent }
                }
            }
        }
    }
}

#[component]
fn PlanCard(tier: PlanTier, cycle: BillingCycle, on_intent: EventHandler<Intent>) -> Element {
    let Some(details) = PLAN_CATALOG.iter().find(|details| details.tier == tier) else {
        return rsx! {};
    };
    let price = details.price(cycle);
    let suffix = match cycle {
        BillingCycle::Monthly => "/mo",
        BillingCycle::Annual => "/yr",
    };
    let subscription = tier.subscription();

    rsx! {
        div { class: "card plan-card",
            h3 { "{details.name}" }
            p { class: "plan-price",
                if subscription.is_some() { "${price}{suffix}" } else { "{price}" }
            }
            p { class: "text-muted", "{details.description}" }
            ul {
                for feature in details.features.iter() {
                    li { key: "{feature}", "{feature}" }
                }
            }
            if let Some(plan) = subscription {
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| on_intent.call(Intent::ChoosePlan(plan, cycle)),
                    "Choose {details.name}"
                }
            } else {
                a { class: "btn", href: "mailto:sales@smepro.example", "Contact sales" }
            }
        }
    }
}
