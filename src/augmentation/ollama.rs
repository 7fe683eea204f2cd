use serde::{Deserialize, Serialize};

use super::types::LlmClient;
use super::AugmentationError;
use crate::config::OllamaSettings;

/// Sampling temperature for drafting; matches the hosted provider.
const OLLAMA_TEMPERATURE: f32 = 0.7;

/// Ollama HTTP client for local LLM inference.
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Create a client for the Ollama instance at `base_url`.
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Result<Self, AugmentationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AugmentationError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn from_settings(settings: &OllamaSettings, timeout_secs: u64) -> Result<Self, AugmentationError> {
        Self::new(&settings.base_url, &settings.model, timeout_secs)
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl LlmClient for OllamaClient {
    fn generate(&self, system: &str, prompt: &str) -> Result<String, AugmentationError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
            options: OllamaOptions {
                temperature: OLLAMA_TEMPERATURE,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| AugmentationError::from_transport(e, &self.base_url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AugmentationError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| AugmentationError::ResponseParsing(e.to_string()))?;

        Ok(parsed.response)
    }

    fn provider(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ollama_client_constructor() {
        let client = OllamaClient::new("http://localhost:11434", "medgemma:4b", 120).unwrap();
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(client.timeout_secs, 120);
        assert_eq!(client.model(), "medgemma:4b");
        assert_eq!(client.provider(), "ollama");
    }

    #[test]
    fn ollama_client_trims_trailing_slash() {
        let client = OllamaClient::new("http://localhost:11434/", "llama3", 60).unwrap();
        assert_eq!(client.base_url, "http://localhost:11434");
    }

    #[test]
    fn from_settings_copies_model() {
        let settings = OllamaSettings {
            base_url: "http://gpu-box:11434".into(),
            model: "medgemma:27b".into(),
        };
        let client = OllamaClient::from_settings(&settings, 30).unwrap();
        assert_eq!(client.model(), "medgemma:27b");
        assert_eq!(client.base_url, "http://gpu-box:11434");
    }

    #[test]
    fn request_body_disables_streaming() {
        let body = OllamaGenerateRequest {
            model: "m",
            prompt: "p",
            system: "s",
            stream: false,
            options: OllamaOptions { temperature: 0.7 },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["system"], "s");
    }
}
