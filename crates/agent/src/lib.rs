//! Prompt building and chat session orchestration for VitalChat.
//!
//! Two pieces: the prompt builder (system instructions for tool-use mode
//! and the legacy 14-day data-dump mode) and the [`ChatSession`] loop that
//! drives the LLM, executes requested tool calls, and feeds results back
//! until a text answer emerges.

pub mod prompt;
pub mod session;

pub use prompt::{DailySummary, PromptMode, legacy_data_instructions, tool_use_instructions};
pub use session::ChatSession;
