use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    #[default]
    Solo,
    Business,
}

impl SubscriptionPlan {
    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionPlan::Solo => "solo",
            SubscriptionPlan::Business => "business",
        }
    }
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    #[default]
    Monthly,
    Annual,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiProvider {
    OpenAi,
    Grok,
    Aws,
    Gemini,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorSyncStatus {
    #[default]
    Idle,
    Syncing,
    Synced,
    Error,
}

/// Third-party chat history source the vault can import from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConnector {
    pub provider: ApiProvider,
    pub api_key: String,
    pub is_enabled: bool,
    #[serde(default)]
    pub sync_status: ConnectorSyncStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_synced: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub account_type: SubscriptionPlan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_cycle: Option<BillingCycle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_connectors: Option<Vec<ApiConnector>>,
}

/// Profile fields collected by onboarding, before a billing cycle is attached.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileDraft {
    pub name: String,
    pub email: String,
    pub account_type: SubscriptionPlan,
    pub api_connectors: Option<Vec<ApiConnector>>,
}

impl ProfileDraft {
    /// Reason the draft cannot be submitted yet, if any.
    pub fn validation_error(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            return Some("Please enter your name.");
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => None,
            _ => Some("Please enter a valid email address."),
        }
    }

    pub fn with_billing_cycle(self, billing_cycle: BillingCycle) -> UserProfile {
        UserProfile {
            name: self.name,
            email: self.email,
            account_type: self.account_type,
            billing_cycle: Some(billing_cycle),
            api_connectors: self.api_connectors,
        }
    }
}

/// The (industry, sub-type, segment) triple naming an expert persona.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmeConfig {
    pub industry: String,
    pub sub_type: String,
    pub segment: String,
}

impl SmeConfig {
    pub fn new(
        industry: impl Into<String>,
        sub_type: impl Into<String>,
        segment: impl Into<String>,
    ) -> Self {
        Self {
            industry: industry.into(),
            sub_type: sub_type.into(),
            segment: segment.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.industry.trim().is_empty()
            && !self.sub_type.trim().is_empty()
            && !self.segment.trim().is_empty()
    }

    pub fn label(&self) -> String {
        format!("{} / {} / {}", self.industry, self.sub_type, self.segment)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub uri: String,
    pub title: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Up,
    Down,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub vote: Vote,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractiveItem {
    pub title: String,
    pub summary: String,
    pub follow_up_prompt: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InteractiveResponseData {
    pub introduction: String,
    pub items: Vec<InteractiveItem>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Procedure,
    Forms,
    Information,
    Contacts,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionTypeItem {
    #[serde(rename = "type")]
    pub kind: ActionType,
    pub title: String,
    pub description: String,
    pub follow_up_prompt: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionTypeResponseData {
    pub topic: String,
    pub introduction: String,
    pub actions: Vec<ActionTypeItem>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Active,
    Complete,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub title: String,
    pub description: String,
    pub status: StepStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuidedSessionData {
    pub title: String,
    pub objective: String,
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<Citation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactive_data: Option<InteractiveResponseData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guided_session_data: Option<GuidedSessionData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type_data: Option<ActionTypeResponseData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_prompts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

impl Message {
    /// Concatenated text parts; inline media is skipped.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub session_id: String,
    pub plan: SubscriptionPlan,
    pub sme_config: SmeConfig,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub participants: Vec<UserProfile>,
    pub last_modified: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ChatSession {
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) if !title.trim().is_empty() => title.clone(),
            _ => self.sme_config.label(),
        }
    }
}

/// Plan tier and billing cycle picked on the plans page before onboarding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanIntent {
    pub plan: SubscriptionPlan,
    pub billing_cycle: BillingCycle,
}
