/// Convenience result type used across Framelet.
pub type FrameletResult<T> = Result<T, FrameletError>;

/// Top-level error taxonomy used by the worklet pipeline.
///
/// Compile and validation failures are terminal for a program and surface at
/// authoring time. Transport failures surface at envelope delivery.
/// Evaluation failures are transient and scoped to a single frame.
#[derive(thiserror::Error, Debug)]
pub enum FrameletError {
    /// Unsupported construct encountered while compiling worklet source.
    #[error("compile error: {0}")]
    Compile(String),

    /// Unresolved name, duplicate parameter, or bad arity in a compiled program.
    #[error("validation error: {0}")]
    Validation(String),

    /// Envelope could not be delivered to the execution domain.
    #[error("transport error: {0}")]
    Transport(String),

    /// Runtime failure inside a single interpreter invocation.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing the wire format.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FrameletError {
    /// Build a [`FrameletError::Compile`] value.
    pub fn compile(msg: impl Into<String>) -> Self {
        Self::Compile(msg.into())
    }

    /// Build a [`FrameletError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FrameletError::Transport`] value.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Build a [`FrameletError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`FrameletError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
