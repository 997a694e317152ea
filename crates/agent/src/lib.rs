//! Reply pipeline - LLM-backed extraction, synthesis, and guardrails
//!
//! This crate is the "brain" of the replyline service. Each request
//! flows one way through four stages:
//!
//! 1. **Normalization** (`replyline-core`) - raw history → bounded,
//!    role-tagged conversation window
//! 2. **Fact Extraction** (`extraction`) - one model call constrained
//!    to strict JSON, normalized into `StructuredFacts`
//! 3. **Reply Synthesis** (`synthesis`) - one model call drafting the
//!    candidate reply from transcript + facts
//! 4. **Guardrail Rewrite** (`guardrails`) - deterministic softening
//!    and unverified-claim removal; always yields a non-empty reply
//!
//! # Key Types
//!
//! - `AgentRuntime` - per-request orchestrator (see `runtime` module)
//! - `LlmClient` - pluggable trait for the generative-model collaborator
//! - `OpenRouterClient` - reqwest implementation of `LlmClient`
//!
//! # Safety Principle
//!
//! The model drafts; it never decides what reaches the user. The
//! guardrail rewriter is total and non-generative: it either passes a
//! sentence through, rewrites guarantee language, or drops a
//! resolution claim the conversation does not corroborate.

pub mod extraction;
pub mod guardrails;
pub mod llm;
pub mod openrouter;
pub mod runtime;
pub mod synthesis;

pub use llm::{ChatMessage, LlmClient, MessageRole};
pub use openrouter::OpenRouterClient;
pub use runtime::AgentRuntime;

#[cfg(test)]
pub(crate) mod testing;
