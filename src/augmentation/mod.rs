pub mod azure;
pub mod fallback;
pub mod live;
pub mod mock;
pub mod ollama;
pub mod parser;
pub mod prompt;
pub mod sanitize;
pub mod selector;
pub mod types;

pub use azure::*;
pub use fallback::*;
pub use live::*;
pub use mock::*;
pub use ollama::*;
pub use parser::*;
pub use prompt::*;
pub use sanitize::*;
pub use selector::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AugmentationError {
    #[error("Generative backend not configured: {0}")]
    NotConfigured(String),

    #[error("Generative service unreachable at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Generative service returned error (status {status}): {body}")]
    Service { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Malformed generated output: {0}")]
    MalformedOutput(String),

    #[error("Generative service returned an empty response")]
    EmptyResponse,
}

impl AugmentationError {
    /// Map a transport error the same way for every HTTP-backed client.
    pub(crate) fn from_transport(e: reqwest::Error, base_url: &str, timeout_secs: u64) -> Self {
        if e.is_timeout() {
            Self::Timeout(timeout_secs)
        } else if e.is_connect() {
            Self::Connection(base_url.to_string())
        } else {
            Self::HttpClient(e.to_string())
        }
    }
}
