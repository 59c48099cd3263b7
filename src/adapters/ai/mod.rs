//! AI adapter module. Implements TextGenerationPort for LLM integration.
//!
//! Provides Gemini and OpenAI-compatible adapters, plus a mock adapter for dry runs.

pub mod gemini_adapter;
pub mod mock_adapter;
pub mod openai_adapter;

pub use gemini_adapter::GeminiAdapter;
pub use mock_adapter::MockAiAdapter;
pub use openai_adapter::OpenAiAdapter;
