use super::azure::AzureOpenAiClient;
use super::fallback::FallbackBackend;
use super::live::LiveBackend;
use super::ollama::OllamaClient;
use super::types::{AugmentationBackend, LlmClient};
use super::AugmentationError;
use crate::config::{AugmentationConfig, LetterSettings};

/// Build the generative client for the first fully configured provider.
///
/// Azure OpenAI wins over Ollama when both are configured.
pub fn build_client(
    config: &AugmentationConfig,
) -> Result<Box<dyn LlmClient + Send + Sync>, AugmentationError> {
    if let Some(azure) = &config.azure {
        return Ok(Box::new(AzureOpenAiClient::new(azure, config.timeout_secs)?));
    }
    if let Some(ollama) = &config.ollama {
        return Ok(Box::new(OllamaClient::from_settings(ollama, config.timeout_secs)?));
    }
    Err(AugmentationError::NotConfigured(
        "no Azure OpenAI or Ollama settings".into(),
    ))
}

/// Choose the augmentation variant for a workflow instance.
///
/// Falls back to the template generators when nothing is configured or the
/// client cannot be built. Selection never fails.
pub fn select_backend(
    config: &AugmentationConfig,
    letter: &LetterSettings,
) -> Box<dyn AugmentationBackend> {
    match build_client(config) {
        Ok(client) => {
            tracing::info!(
                provider = client.provider(),
                model = client.model(),
                timeout_secs = config.timeout_secs,
                "Live augmentation backend selected"
            );
            Box::new(LiveBackend::new(client, letter.clone()))
        }
        Err(AugmentationError::NotConfigured(detail)) => {
            tracing::info!(%detail, "Using fallback generators");
            Box::new(FallbackBackend::new(letter.clone()))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Generative client unavailable, using fallback generators");
            Box::new(FallbackBackend::new(letter.clone()))
        }
    }
}
