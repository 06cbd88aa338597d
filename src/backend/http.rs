use super::{CollaborationBackend, ProfileStore, StoreError};
use crate::types::{ChatSession, SmeConfig, SubscriptionPlan, UserProfile};
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use url::Url;

/// Client for the hosted SMEPro API.
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OpenSessionRequest<'a> {
    session_id: &'a str,
    sme_config: &'a SmeConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    account_tier: Option<SubscriptionPlan>,
}

impl HttpBackend {
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// `{endpoint}/sessions/{id}` with the id escaped as a single path segment.
    pub(crate) fn session_url(&self, session_id: &str) -> Result<Url, StoreError> {
        let base = self.url("sessions");
        let mut url = Url::parse(&base)
            .map_err(|e| StoreError::Rejected(format!("invalid endpoint '{}': {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Rejected(format!("endpoint '{}' cannot carry a path", base)))?
            .push(session_id);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Send and decode a JSON body, mapping 404 to `None`.
    async fn send_optional<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<T>, StoreError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        if body.trim().is_empty() || body.trim() == "null" {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&body)?))
    }

    async fn send_required<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, StoreError> {
        self.send_optional(request)
            .await?
            .ok_or_else(|| StoreError::Decode(format!("{} missing from response", what)))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl ProfileStore for HttpBackend {
    async fn fetch_user_profile(&self) -> Result<Option<UserProfile>, StoreError> {
        self.send_optional(self.client.get(self.url("profile")))
            .await
    }

    async fn save_user_profile(&self, profile: UserProfile) -> Result<UserProfile, StoreError> {
        let request = self.client.put(self.url("profile")).json(&profile);
        self.send_required(request, "profile").await
    }

    async fn clear_user_profile(&self) -> Result<(), StoreError> {
        let response = self
            .authorize(self.client.delete(self.url("profile")))
            .send()
            .await?;
        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl CollaborationBackend for HttpBackend {
    async fn get_session(
        &self,
        session_id: &str,
        sme_config: Option<&SmeConfig>,
        account_tier: Option<SubscriptionPlan>,
    ) -> Result<Option<ChatSession>, StoreError> {
        match sme_config {
            Some(sme_config) => {
                let request = self.client.post(self.url("sessions")).json(&OpenSessionRequest {
                    session_id,
                    sme_config,
                    account_tier,
                });
                self.send_required(request, "session").await.map(Some)
            }
            None => {
                let url = self.session_url(session_id)?;
                self.send_optional(self.client.get(url)).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining_ignores_extra_slashes() {
        let backend = HttpBackend::new("https://api.example.com/v1/".into(), None);
        assert_eq!(backend.url("/profile"), "https://api.example.com/v1/profile");
        assert_eq!(backend.url("sessions"), "https://api.example.com/v1/sessions");
    }

    #[test]
    fn test_session_url_escapes_id() {
        let backend = HttpBackend::new("https://api.example.com".into(), None);
        assert_eq!(
            backend.session_url("abc123").unwrap().as_str(),
            "https://api.example.com/sessions/abc123"
        );
        assert_eq!(
            backend.session_url("a/b c+d").unwrap().as_str(),
            "https://api.example.com/sessions/a%2Fb%20c+d"
        );
    }

    #[test]
    fn test_session_url_keeps_endpoint_prefix() {
        let backend = HttpBackend::new("https://api.example.com/v1/".into(), None);
        assert_eq!(
            backend.session_url("abc123").unwrap().as_str(),
            "https://api.example.com/v1/sessions/abc123"
        );
    }

    #[test]
    fn test_session_url_rejects_bad_endpoint() {
        let backend = HttpBackend::new("not a url".into(), None);
        assert!(matches!(
            backend.session_url("abc123"),
            Err(StoreError::Rejected(_))
        ));
    }

    #[test]
    fn test_open_session_request_shape() {
        let config = SmeConfig::new("Retail", "E-commerce", "DTC");
        let body = serde_json::to_value(OpenSessionRequest {
            session_id: "new001",
            sme_config: &config,
            account_tier: Some(SubscriptionPlan::Solo),
        })
        .unwrap();
        assert_eq!(body["sessionId"], "new001");
        assert_eq!(body["smeConfig"]["subType"], "E-commerce");
        assert_eq!(body["accountTier"], "solo");
    }
}
