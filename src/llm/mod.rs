//! LLM client layer - Anthropic API integration
//!
//! This module provides:
//! - Message types and the LlmClient trait for API abstraction
//! - AnthropicClient implementation
//! - Best-effort text extraction over heterogeneous response envelopes

pub mod anthropic;
pub mod client;
pub mod envelope;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use client::{ChatMessage, ChatRole, LlmClient, LlmError, MockLlmClient};
pub use envelope::extract_text;
