use std::fmt;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "priorauth";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ── Environment variables ───────────────────────────────────

pub const ENV_AZURE_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
pub const ENV_AZURE_API_KEY: &str = "AZURE_OPENAI_API_KEY";
pub const ENV_AZURE_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT_NAME";
pub const ENV_AZURE_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";
pub const ENV_OLLAMA_BASE_URL: &str = "OLLAMA_BASE_URL";
pub const ENV_OLLAMA_MODEL: &str = "OLLAMA_MODEL";
pub const ENV_LLM_TIMEOUT_SECS: &str = "PRIORAUTH_LLM_TIMEOUT_SECS";
pub const ENV_RULES_PATH: &str = "PRIORAUTH_RULES_PATH";
pub const ENV_PHYSICIAN_NAME: &str = "PRIORAUTH_PHYSICIAN_NAME";
pub const ENV_INSTITUTION: &str = "PRIORAUTH_INSTITUTION";

/// Azure OpenAI API version used when none is configured.
pub const DEFAULT_AZURE_API_VERSION: &str = "2024-02-01";

/// Upper bound on a single generative call before it is abandoned.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// Signature used on drafted letters when no physician is configured.
pub const DEFAULT_PHYSICIAN_NAME: &str = "Attending Physician";

/// Log filter applied when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "priorauth=info,priorauth_lib=info,warn"
}

// ═══════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════

/// Connection settings for an Azure OpenAI chat deployment.
#[derive(Clone, PartialEq, Eq)]
pub struct AzureSettings {
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
    pub api_version: String,
}

impl fmt::Debug for AzureSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureSettings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .finish()
    }
}

/// Connection settings for a local Ollama instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaSettings {
    pub base_url: String,
    pub model: String,
}

/// Generative backend configuration. A provider is `None` unless every
/// element it requires is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentationConfig {
    pub azure: Option<AzureSettings>,
    pub ollama: Option<OllamaSettings>,
    pub timeout_secs: u64,
}

impl AugmentationConfig {
    /// No provider configured. Selects the deterministic fallback.
    pub fn unconfigured() -> Self {
        Self {
            azure: None,
            ollama: None,
            timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.azure.is_some() || self.ollama.is_some()
    }
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self::unconfigured()
    }
}

/// Signature block for drafted letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterSettings {
    pub physician_name: String,
    pub institution: Option<String>,
}

impl Default for LetterSettings {
    fn default() -> Self {
        Self {
            physician_name: DEFAULT_PHYSICIAN_NAME.to_string(),
            institution: None,
        }
    }
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub augmentation: AugmentationConfig,
    /// Optional JSON rule table replacing the built-in rules.
    pub rules_path: Option<PathBuf>,
    pub letter: LetterSettings,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as absent. An incomplete provider block is
    /// dropped (logged, not an error) so that selection falls through to the
    /// next provider or to the fallback generators.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let azure = match (
            get(ENV_AZURE_ENDPOINT),
            get(ENV_AZURE_API_KEY),
            get(ENV_AZURE_DEPLOYMENT),
        ) {
            (Some(endpoint), Some(api_key), Some(deployment)) => Some(AzureSettings {
                endpoint,
                api_key,
                deployment,
                api_version: get(ENV_AZURE_API_VERSION)
                    .unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.to_string()),
            }),
            (None, None, None) => None,
            (endpoint, api_key, deployment) => {
                tracing::info!(
                    endpoint_set = endpoint.is_some(),
                    api_key_set = api_key.is_some(),
                    deployment_set = deployment.is_some(),
                    "Azure OpenAI configuration incomplete, ignoring"
                );
                None
            }
        };

        let ollama = match (get(ENV_OLLAMA_BASE_URL), get(ENV_OLLAMA_MODEL)) {
            (Some(base_url), Some(model)) => Some(OllamaSettings { base_url, model }),
            (None, None) => None,
            (base_url, model) => {
                tracing::info!(
                    base_url_set = base_url.is_some(),
                    model_set = model.is_some(),
                    "Ollama configuration incomplete, ignoring"
                );
                None
            }
        };

        let timeout_secs = match get(ENV_LLM_TIMEOUT_SECS) {
            None => DEFAULT_LLM_TIMEOUT_SECS,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    tracing::warn!(
                        value = %raw,
                        default = DEFAULT_LLM_TIMEOUT_SECS,
                        "Invalid PRIORAUTH_LLM_TIMEOUT_SECS, using default"
                    );
                    DEFAULT_LLM_TIMEOUT_SECS
                }
            },
        };

        Self {
            augmentation: AugmentationConfig {
                azure,
                ollama,
                timeout_secs,
            },
            rules_path: get(ENV_RULES_PATH).map(PathBuf::from),
            letter: LetterSettings {
                physician_name: get(ENV_PHYSICIAN_NAME)
                    .unwrap_or_else(|| DEFAULT_PHYSICIAN_NAME.to_string()),
                institution: get(ENV_INSTITUTION),
            },
        }
    }
}
