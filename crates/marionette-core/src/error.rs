/// Core error types for the Marionette editor.

/// A specialized Result type for Marionette operations.
pub type MarionetteResult<T> = Result<T, MarionetteError>;

/// Top-level error type encompassing all Marionette subsystems.
#[derive(Debug, thiserror::Error)]
pub enum MarionetteError {
    /// A time value that is negative or not finite.
    #[error("invalid time: {0} (must be finite and non-negative)")]
    InvalidTime(f64),

    /// A child that cannot be attached: unknown handle, self-attachment or cycle.
    #[error("invalid child: {0}")]
    InvalidChild(String),

    #[error("unknown actor: {0}")]
    UnknownActor(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}

impl MarionetteError {
    /// Create an invalid-child error.
    pub fn invalid_child(message: impl Into<String>) -> Self {
        MarionetteError::InvalidChild(message.into())
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        MarionetteError::InvalidArgument(message.into())
    }
}

/// Reject negative, NaN and infinite time values.
pub fn check_time(time: f64) -> MarionetteResult<f64> {
    if time.is_finite() && time >= 0.0 {
        // -0.0 passes the comparison; fold it into 0.0.
        Ok(time + 0.0)
    } else {
        Err(MarionetteError::InvalidTime(time))
    }
}
