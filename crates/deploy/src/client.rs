//! Management API client for assistant provisioning.
//!
//! Two vendor surfaces are involved: the Assistants API (JSON bodies) for
//! the assistant, its tools, and knowledge, and the Intelligence API
//! (form-encoded, classic REST) for call analytics. Attachment endpoints on
//! both may answer `204 No Content`; an empty 2xx body is success, not an
//! error.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::instrument;

use crate::descriptors::{KnowledgeDescriptor, ToolDescriptor};
use crate::error::DeployError;

const ASSISTANTS_API_URL: &str = "https://assistants.twilio.com/v1";
const INTELLIGENCE_API_URL: &str = "https://intelligence.twilio.com/v2";

/// Prompt for the call-scoring analytics operator.
const CALL_SCORING_PROMPT: &str = "Use the following parameters to evaluate the phone call between the agent and the customer. Assign scores (1 to 5) to each KPI and provide comments to justify the score. \nEach KPI assesses the agent's performance in various aspects of the call.\n1. Greeting & Professionalism: Was the agent friendly, clear, and professional? (1\u{2013}5)\n2. Listening & Empathy: Did the agent actively listen and show empathy? (1\u{2013}5)\n3. Communication & Clarity: Was the information clear and easy to understand? (1\u{2013}5)\n4. Problem-Solving: Did the agent resolve the issue efficiently? (1\u{2013}5)\n5. Overall Experience: Was the customer satisfied, and was the call handled well? (1\u{2013}5)";

/// An assistant resource.
#[derive(Debug, Deserialize)]
pub struct AssistantResource {
    pub id: String,
    pub name: String,
}

/// A tool resource.
#[derive(Debug, Deserialize)]
pub struct ToolResource {
    pub id: String,
    pub name: String,
}

/// A knowledge resource.
#[derive(Debug, Deserialize)]
pub struct KnowledgeResource {
    pub id: String,
    pub name: String,
}

/// A call-analytics service resource.
#[derive(Debug, Deserialize)]
pub struct ServiceResource {
    pub sid: String,
    #[serde(default)]
    pub unique_name: Option<String>,
}

/// A custom analytics operator resource.
#[derive(Debug, Deserialize)]
pub struct OperatorResource {
    pub sid: String,
}

#[derive(Debug, Deserialize)]
struct AssistantList {
    assistants: Vec<AssistantResource>,
}

#[derive(Debug, Deserialize)]
struct ToolList {
    tools: Vec<ToolResource>,
}

#[derive(Debug, Deserialize)]
struct KnowledgeList {
    knowledge: Vec<KnowledgeResource>,
}

/// Vendor error payload; both API surfaces use this shape.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for the assistant management APIs.
pub struct ManagementClient {
    client: reqwest::Client,
    account_sid: String,
    auth_token: SecretString,
}

impl ManagementClient {
    /// Create a new management client.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be built.
    #[must_use]
    pub fn new(account_sid: String, auth_token: SecretString) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            account_sid,
            auth_token,
        }
    }

    /// Probe the webhook deployment's health endpoint.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::WebhooksUnreachable` if the probe fails or the
    /// server answers with a non-success status.
    #[instrument(skip(self))]
    pub async fn check_webhooks(&self, base_url: &str) -> Result<(), DeployError> {
        let url = format!("{}/health", base_url.trim_end_matches('/'));
        let response =
            self.client
                .get(&url)
                .send()
                .await
                .map_err(|e| DeployError::WebhooksUnreachable {
                    url: url.clone(),
                    reason: e.to_string(),
                })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(DeployError::WebhooksUnreachable {
                url,
                reason: format!("unexpected status {status}"),
            })
        }
    }

    // =========================================================================
    // Assistants
    // =========================================================================

    /// List all assistants on the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    pub async fn list_assistants(&self) -> Result<Vec<AssistantResource>, DeployError> {
        let list: AssistantList = self
            .get_json(&format!("{ASSISTANTS_API_URL}/Assistants"))
            .await?;
        Ok(list.assistants)
    }

    /// Create an assistant with the given name and personality prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self, personality_prompt))]
    pub async fn create_assistant(
        &self,
        name: &str,
        personality_prompt: &str,
    ) -> Result<AssistantResource, DeployError> {
        self.post_json(
            &format!("{ASSISTANTS_API_URL}/Assistants"),
            &json!({
                "name": name,
                "personality_prompt": personality_prompt,
            }),
        )
        .await
    }

    // =========================================================================
    // Tools
    // =========================================================================

    /// List all tools on the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    pub async fn list_tools(&self) -> Result<Vec<ToolResource>, DeployError> {
        let list: ToolList = self.get_json(&format!("{ASSISTANTS_API_URL}/Tools")).await?;
        Ok(list.tools)
    }

    /// Create a webhook tool from a descriptor, with its URL rooted at
    /// `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self, descriptor), fields(tool = descriptor.name))]
    pub async fn create_tool(
        &self,
        descriptor: &ToolDescriptor,
        base_url: &str,
    ) -> Result<ToolResource, DeployError> {
        let mut meta = Map::new();
        meta.insert("url".to_owned(), json!(descriptor.url(base_url)));
        meta.insert("method".to_owned(), json!(descriptor.method));
        if let Some(schema) = &descriptor.input_schema {
            meta.insert("input_schema".to_owned(), schema.clone());
        }

        self.post_json(
            &format!("{ASSISTANTS_API_URL}/Tools"),
            &json!({
                "name": descriptor.name,
                "type": "WEBHOOK",
                "description": descriptor.description,
                "enabled": true,
                "meta": meta,
            }),
        )
        .await
    }

    /// Attach a tool to an assistant. Empty-body responses are success.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    pub async fn attach_tool(&self, assistant_id: &str, tool_id: &str) -> Result<(), DeployError> {
        self.post_empty(&format!(
            "{ASSISTANTS_API_URL}/Assistants/{assistant_id}/Tools/{tool_id}"
        ))
        .await
    }

    // =========================================================================
    // Knowledge
    // =========================================================================

    /// List all knowledge sources on the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    pub async fn list_knowledge(&self) -> Result<Vec<KnowledgeResource>, DeployError> {
        let list: KnowledgeList = self
            .get_json(&format!("{ASSISTANTS_API_URL}/Knowledge"))
            .await?;
        Ok(list.knowledge)
    }

    /// Create a knowledge source from a descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self, descriptor), fields(knowledge = descriptor.name))]
    pub async fn create_knowledge(
        &self,
        descriptor: &KnowledgeDescriptor,
    ) -> Result<KnowledgeResource, DeployError> {
        self.post_json(
            &format!("{ASSISTANTS_API_URL}/Knowledge"),
            &json!({
                "name": descriptor.name,
                "type": descriptor.kind,
                "description": descriptor.description,
                "knowledge_source_details": {
                    "source": descriptor.source,
                },
            }),
        )
        .await
    }

    /// Attach a knowledge source to an assistant. Empty-body responses are
    /// success.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    pub async fn attach_knowledge(
        &self,
        assistant_id: &str,
        knowledge_id: &str,
    ) -> Result<(), DeployError> {
        self.post_empty(&format!(
            "{ASSISTANTS_API_URL}/Assistants/{assistant_id}/Knowledge/{knowledge_id}"
        ))
        .await
    }

    // =========================================================================
    // Call analytics (Intelligence)
    // =========================================================================

    /// Fetch a call-analytics service by unique name, if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason other than the
    /// service not existing.
    pub async fn find_intelligence_service(
        &self,
        unique_name: &str,
    ) -> Result<Option<ServiceResource>, DeployError> {
        let url = format!("{INTELLIGENCE_API_URL}/Services/{unique_name}");
        let response = self.authorized(self.client.get(&url)).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let service = Self::decode_response(response).await?;
        Ok(Some(service))
    }

    /// Create a call-analytics service.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self))]
    pub async fn create_intelligence_service(
        &self,
        unique_name: &str,
    ) -> Result<ServiceResource, DeployError> {
        self.post_form(
            &format!("{INTELLIGENCE_API_URL}/Services"),
            &[("UniqueName", unique_name.to_owned())],
        )
        .await
    }

    /// Create the call-scoring custom operator (1-5 KPI scores per call).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self))]
    pub async fn create_call_scoring_operator(&self) -> Result<OperatorResource, DeployError> {
        let config = json!({
            "prompt": CALL_SCORING_PROMPT,
            "result_schema": {
                "$schema": "http://json-schema.org/draft-04/schema#",
                "type": "object",
                "properties": {
                    "greeting_professionalism": { "type": "integer" },
                    "listening_empathy": { "type": "integer" },
                    "communication_clarity": { "type": "integer" },
                    "problem_solving": { "type": "integer" },
                    "overall_experience": { "type": "integer" }
                }
            },
            "examples": []
        });

        self.post_form(
            &format!("{INTELLIGENCE_API_URL}/Operators/Custom"),
            &[
                ("FriendlyName", "CallScoring".to_owned()),
                ("OperatorType", "PromptUserDefined".to_owned()),
                ("Config", config.to_string()),
            ],
        )
        .await
    }

    /// Attach an operator to a call-analytics service. Empty-body responses
    /// are success.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    pub async fn attach_operator(
        &self,
        service_sid: &str,
        operator_sid: &str,
    ) -> Result<(), DeployError> {
        self.post_empty(&format!(
            "{INTELLIGENCE_API_URL}/Services/{service_sid}/Operators/{operator_sid}"
        ))
        .await
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, DeployError> {
        let response = self.authorized(self.client.get(url)).send().await?;
        Self::decode_response(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &Value,
    ) -> Result<T, DeployError> {
        let response = self.authorized(self.client.post(url).json(body)).send().await?;
        Self::decode_response(response).await
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        url: &str,
        form: &[(&str, String)],
    ) -> Result<T, DeployError> {
        let response = self.authorized(self.client.post(url).form(form)).send().await?;
        Self::decode_response(response).await
    }

    /// POST expecting no usable body; any 2xx (204 included) is success.
    async fn post_empty(&self, url: &str) -> Result<(), DeployError> {
        let response = self.authorized(self.client.post(url)).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from_response(response).await)
        }
    }

    async fn decode_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, DeployError> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| DeployError::Parse(format!("Failed to parse response: {e}")))
    }

    /// Surface the vendor error payload; fall back to the raw body when it
    /// is not the expected JSON shape.
    async fn error_from_response(response: reqwest::Response) -> DeployError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map_or(body, |parsed| parsed.message);
        DeployError::Api { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_error_payload_deserializes() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"code": 20409, "message": "Resource already exists", "status": 409}"#)
                .expect("deserialize");
        assert_eq!(body.message, "Resource already exists");
    }

    #[test]
    fn assistant_list_deserializes() {
        let list: AssistantList = serde_json::from_str(
            r#"{"assistants": [{"id": "aia_01", "name": "Retail Demo Assistant - Owl Shoes"}], "meta": {"page": 0}}"#,
        )
        .expect("deserialize");
        assert_eq!(list.assistants.len(), 1);
        assert_eq!(list.assistants[0].id, "aia_01");
    }

    #[test]
    fn service_resource_tolerates_missing_unique_name() {
        let service: ServiceResource =
            serde_json::from_str(r#"{"sid": "GA123"}"#).expect("deserialize");
        assert_eq!(service.sid, "GA123");
        assert!(service.unique_name.is_none());
    }
}
