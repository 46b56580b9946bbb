/// Result alias that carries the custom [`BardError`] type.
pub type Result<T> = std::result::Result<T, BardError>;

/// Common error type for the core crate.
///
/// Nothing on the per-tick path returns this type. It only shows up where the
/// engine touches the outside world: config files and saved weapons.
#[derive(Debug, thiserror::Error)]
pub enum BardError {
    /// Free-form message for failures without a more specific variant.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON in a config or save file.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

impl BardError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for BardError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for BardError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
