use crate::controller::Intent;
use crate::mode::Modal;
use crate::types::{ChatSession, Message, Role, UserProfile};
use crate::views::shared::{
    copy_to_clipboard, format_last_modified, initials, markdown_to_html, share_link,
};
use dioxus::prelude::*;

/// Read-only transcript of the active session with the shell's navigation controls.
#[component]
pub fn ChatWindow(
    session: ChatSession,
    profile: UserProfile,
    on_intent: EventHandler<Intent>,
) -> Element {
    let title = session.display_title();
    let updated = format_last_modified(session.last_modified);
    let link = share_link(&session.session_id);
    let mut copied = use_signal(|| false);
    let mut show_link = use_signal(|| false);

    let copy_payload = link.clone();
    let on_share = move |_| {
        let raw = copy_payload.clone();
        spawn(async move {
            if copy_to_clipboard(&raw) {
                copied.set(true);
            } else {
                show_link.set(true);
            }
        });
    };

    rsx! {
        div { class: "chat-container",
            header { class: "chat-header",
                div { class: "chat-title",
                    h2 { "{title}" }
                    p { class: "text-muted", "{session.sme_config.label()}" }
                    if let Some(updated) = updated {
                        p { class: "chat-updated", "Updated {updated}" }
                    }
                }
                div { class: "participants",
                    for participant in session.participants.iter() {
                        span {
                            key: "{participant.email}",
                            class: "avatar",
                            title: "{participant.name}",
                            "{initials(&participant.name)}"
                        }
                    }
                }
                nav { class: "chat-actions",
                    button {
                        class: "action-btn",
                        r#type: "button",
                        onclick: move |_| on_intent.call(Intent::SetModalOpen(Modal::ChangeSme, true)),
                        "Switch SME"
                    }
                    button {
                        class: "action-btn",
                        r#type: "button",
                        onclick: move |_| on_intent.call(Intent::SetVaultOpen(true)),
                        "Vault"
                    }
                    button {
                        class: "action-btn",
                        r#type: "button",
                        onclick: move |_| on_intent.call(Intent::SetDashboardOpen(true)),
                        "Dashboard"
                    }
                    button {
                        class: "action-btn",
                        r#type: "button",
                        title: "{profile.email}",
                        onclick: move |_| on_intent.call(Intent::SetModalOpen(Modal::EditProfile, true)),
                        "{initials(&profile.name)}"
                    }
                    button {
                        class: "action-btn",
                        r#type: "button",
                        title: "Copy share link",
                        onclick: on_share,
                        if copied() { "Copied" } else { "Share" }
                    }
                }
            }
            if show_link() {
                div { class: "share-link",
                    span { class: "text-muted", "Copy this link to share the session:" }
                    input { r#type: "text", value: "{link}", readonly: true }
                }
            }
            div { class: "messages",
                if session.messages.is_empty() {
                    p { class: "empty-state", "Ask your {session.sme_config.sub_type} expert anything to get started." }
                }
                for (index, message) in session.messages.iter().enumerate() {
                    MessageBubble { key: "{index}", message: message.clone() }
                }
            }
        }
    }
}

#[component]
fn MessageBubble(message: Message) -> Element {
    let text = message.text();
    match message.role {
        Role::User => {
            let author = message.user_name.clone().unwrap_or_else(|| "You".to_string());
            rsx! {
                div { class: "bubble user",
                    span { class: "bubble-author", "{author}" }
                    p { "{text}" }
                }
            }
        }
        Role::Model => {
            let content_html = markdown_to_html(&text);
            let citations = message.citations.clone().unwrap_or_default();
            let prompts = message.suggested_prompts.clone().unwrap_or_default();
            rsx! {
                div { class: "bubble assistant",
                    div { class: "markdown", dangerous_inner_html: "{content_html}" }
                    if let Some(guided) = message.guided_session_data.as_ref() {
                        div { class: "guided-session",
                            h4 { "{guided.title}" }
                            p { class: "text-muted", "{guided.objective}" }
                            ol {
                                for step in guided.steps.iter() {
                                    li { key: "{step.title}", class: "step {step.status:?}",
                                        strong { "{step.title}" }
                                        " {step.description}"
                                    }
                                }
                            }
                        }
                    }
                    if let Some(actions) = message.action_type_data.as_ref() {
                        div { class: "action-types",
                            p { "{actions.introduction}" }
                            for action in actions.actions.iter() {
                                div { key: "{action.title}", class: "card",
                                    span { class: "badge", "{action.kind:?}" }
                                    h4 { "{action.title}" }
                                    p { class: "text-muted", "{action.description}" }
                                }
                            }
                        }
                    }
                    if let Some(interactive) = message.interactive_data.as_ref() {
                        div { class: "interactive",
                            p { "{interactive.introduction}" }
                            for item in interactive.items.iter() {
                                div { key: "{item.title}", class: "card",
                                    h4 { "{item.title}" }
                                    p { class: "text-muted", "{item.summary}" }
                                }
                            }
                        }
                    }
                    if !citations.is_empty() {
                        ul { class: "citations",
                            for citation in citations {
                                li { key: "{citation.uri}",
                                    a { href: "{citation.uri}", target: "_blank", "{citation.title}" }
                                }
                            }
                        }
                    }
                    if !prompts.is_empty() {
                        div { class: "suggested-prompts",
                            for prompt in prompts {
                                span { key: "{prompt}", class: "chip", "{prompt}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
