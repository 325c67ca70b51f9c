//! Core LLM client types and trait definitions

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stateless LLM client - each call is one independent model invocation.
///
/// Implementations return the decoded response envelope as-is; the pipeline
/// normalizes it to text with [`crate::llm::extract_text`], which tolerates
/// every envelope shape the providers have been seen to produce.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Perform one model call and return the decoded response envelope.
    async fn call(
        &self,
        system: Option<&str>,
        messages: &[ChatMessage],
    ) -> Result<Value, LlmError>;

    /// The model identifier this client targets.
    fn model(&self) -> &str;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Errors that can occur during LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Missing API key: environment variable {env_var} not set")]
    MissingApiKey { env_var: String },
}

impl LlmError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::RateLimited { .. } => true,
            LlmError::ApiError { status, .. } => *status >= 500,
            LlmError::Network(_) => true,
            LlmError::InvalidResponse(_) => false,
            LlmError::MissingApiKey { .. } => false,
        }
    }
}

/// Scripted mock client for tests.
///
/// Responses are popped in FIFO order; once the script is exhausted every
/// further call fails. Prompts are recorded for assertion.
pub struct MockLlmClient {
    script: Mutex<VecDeque<Result<Value, String>>>,
    calls: Mutex<Vec<String>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response envelope.
    pub fn push_response(&self, envelope: Value) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(envelope));
    }

    /// Queue a plain-text success in the standard blocks shape.
    pub fn push_text(&self, text: &str) {
        self.push_response(serde_json::json!({
            "content": [{ "type": "text", "text": text }]
        }));
    }

    /// Queue a failure.
    pub fn push_error(&self, message: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    /// Prompts seen so far, in call order.
    pub fn recorded_prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn call(
        &self,
        _system: Option<&str>,
        messages: &[ChatMessage],
    ) -> Result<Value, LlmError> {
        let prompt = messages
            .first()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.calls.lock().unwrap().push(prompt);

        match self.script.lock().unwrap().pop_front() {
            Some(Ok(envelope)) => Ok(envelope),
            Some(Err(message)) => Err(LlmError::ApiError {
                status: 500,
                message,
            }),
            None => Err(LlmError::InvalidResponse(
                "mock script exhausted".to_string(),
            )),
        }
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_constructors() {
        let user = ChatMessage::user("hello");
        assert_eq!(user.role, ChatRole::User);
        assert_eq!(user.content, "hello");

        let assistant = ChatMessage::assistant("hi");
        assert_eq!(assistant.role, ChatRole::Assistant);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&ChatRole::User).unwrap();
        assert_eq!(json, "\"user\"");

        let json = serde_json::to_string(&ChatRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn test_llm_error_is_retryable() {
        assert!(
            LlmError::RateLimited {
                retry_after: Duration::from_secs(60)
            }
            .is_retryable()
        );

        assert!(
            LlmError::ApiError {
                status: 500,
                message: "Internal error".to_string()
            }
            .is_retryable()
        );

        assert!(
            !LlmError::ApiError {
                status: 400,
                message: "Bad request".to_string()
            }
            .is_retryable()
        );

        assert!(!LlmError::InvalidResponse("bad".to_string()).is_retryable());

        assert!(
            !LlmError::MissingApiKey {
                env_var: "ANTHROPIC_API_KEY".to_string()
            }
            .is_retryable()
        );
    }

    #[tokio::test]
    async fn test_mock_pops_in_order() {
        let mock = MockLlmClient::new();
        mock.push_text("first");
        mock.push_text("second");

        let a = mock.call(None, &[ChatMessage::user("p1")]).await.unwrap();
        let b = mock.call(None, &[ChatMessage::user("p2")]).await.unwrap();

        assert_eq!(a["content"][0]["text"], "first");
        assert_eq!(b["content"][0]["text"], "second");
        assert_eq!(mock.recorded_prompts(), vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn test_mock_scripted_error() {
        let mock = MockLlmClient::new();
        mock.push_error("scripted failure");

        let err = mock.call(None, &[ChatMessage::user("p")]).await.unwrap_err();
        assert!(err.to_string().contains("scripted failure"));
    }

    #[tokio::test]
    async fn test_mock_exhausted_script_fails() {
        let mock = MockLlmClient::new();
        let err = mock.call(None, &[ChatMessage::user("p")]).await.unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MockLlmClient>();
    }
}
