//! LLM backend implementations for VitalChat.
//!
//! One concrete backend: the OpenAI-compatible chat-completions client,
//! which covers OpenAI, OpenRouter, Ollama, vLLM, and most hosted
//! endpoints. Backends without tool calling are driven in legacy
//! data-dump mode by the session layer.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
