use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::types::LlmClient;
use super::AugmentationError;

/// Mock LLM client for testing — returns a configurable response or failure.
pub struct MockLlmClient {
    response: Option<String>,
    timeout: bool,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
            timeout: false,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// A client whose every call fails with a connection error.
    pub fn unreachable() -> Self {
        Self {
            response: None,
            timeout: false,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// A client whose every call times out.
    pub fn timing_out() -> Self {
        Self {
            timeout: true,
            ..Self::unreachable()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok()?.clone()
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, _system: &str, prompt: &str) -> Result<String, AugmentationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }
        if self.timeout {
            return Err(AugmentationError::Timeout(1));
        }
        self.response
            .clone()
            .ok_or_else(|| AugmentationError::Connection("mock://unreachable".into()))
    }

    fn provider(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}
