//! # VitalChat Core
//!
//! Domain types, traits, and error definitions for the VitalChat health
//! assistant. This crate has **zero framework dependencies** — it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The two external capabilities — the health-data store and the LLM
//! backend — are defined as traits here. Implementations live in their
//! respective crates. This enables:
//! - Exercising the data layer against an in-memory store in tests
//! - Swapping LLM backends via configuration
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod message;
pub mod metric;
pub mod provider;
pub mod store;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use message::{Conversation, ConversationId, Message, Role};
pub use metric::{AggregateKind, HealthMetric, QuantitySpec};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition};
pub use store::{DailyDataPoint, DateRange, HealthStore, IntervalSample, SampleKind, SleepDataPoint};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
