use thiserror::Error;

/// Failures the reply pipeline can surface to its caller.
///
/// The guardrail rewriter is total and never appears here; only the two
/// model-facing stages and request validation can fail.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("model call failed: {0}")]
    ModelCall(String),
    #[error("model response violated the JSON contract: {0}")]
    ModelProtocol(String),
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

/// Transport-boundary error categories with correlation ids.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("upstream model unavailable: {message}")]
    UpstreamUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::UpstreamUnavailable { .. } => {
                "The assistant is temporarily unavailable. Please retry shortly."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::UpstreamUnavailable { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl PipelineError {
    /// Maps a pipeline failure to its externally visible category.
    ///
    /// A protocol violation and a transport failure land in the same
    /// category: both mean the upstream model is unusable for this turn.
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        match self {
            Self::MalformedRequest(message) => {
                InterfaceError::BadRequest { message, correlation_id }
            }
            Self::ModelCall(message) | Self::ModelProtocol(message) => {
                InterfaceError::UpstreamUnavailable { message, correlation_id }
            }
        }
    }
}
