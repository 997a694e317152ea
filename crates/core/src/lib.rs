//! Shared domain types, configuration, and error taxonomy for replyline.
//!
//! Everything in this crate is deterministic and model-free: the
//! conversation window, the structured-facts schema and its
//! normalization rules, the layered error types, and the config loader.
//! The model-facing pipeline lives in `replyline-agent`.

pub mod config;
pub mod conversation;
pub mod errors;
pub mod facts;

pub use conversation::{Conversation, Speaker, Utterance};
pub use errors::{InterfaceError, PipelineError};
pub use facts::StructuredFacts;

/// Placeholder for structured fields that cannot be determined.
pub const NOT_AVAILABLE: &str = "Not Available";
