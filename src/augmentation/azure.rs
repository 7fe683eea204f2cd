use serde::{Deserialize, Serialize};

use super::types::LlmClient;
use super::AugmentationError;
use crate::config::AzureSettings;

/// Sampling temperature for explanations and drafts.
const AZURE_TEMPERATURE: f32 = 0.7;

/// Azure OpenAI chat-completions client bound to one deployment.
pub struct AzureOpenAiClient {
    endpoint: String,
    deployment: String,
    api_version: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl AzureOpenAiClient {
    pub fn new(settings: &AzureSettings, timeout_secs: u64) -> Result<Self, AugmentationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AugmentationError::HttpClient(e.to_string()))?;

        Ok(Self {
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            deployment: settings.deployment.clone(),
            api_version: settings.api_version.clone(),
            api_key: settings.api_key.clone(),
            client,
            timeout_secs,
        })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Pull the first completion's text out of a chat-completions response body.
fn extract_completion(body: &str) -> Result<String, AugmentationError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| AugmentationError::ResponseParsing(e.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(AugmentationError::EmptyResponse)
}

impl LlmClient for AzureOpenAiClient {
    fn generate(&self, system: &str, prompt: &str) -> Result<String, AugmentationError> {
        let body = ChatRequest {
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: AZURE_TEMPERATURE,
        };

        let response = self
            .client
            .post(self.completions_url())
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| AugmentationError::from_transport(e, &self.endpoint, self.timeout_secs))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| AugmentationError::from_transport(e, &self.endpoint, self.timeout_secs))?;

        if !status.is_success() {
            return Err(AugmentationError::Service {
                status: status.as_u16(),
                body: text,
            });
        }

        extract_completion(&text)
    }

    fn provider(&self) -> &'static str {
        "azure_openai"
    }

    fn model(&self) -> &str {
        &self.deployment
    }
}
