use dark_value::ValueError;
use thiserror::Error;

/// Encode/decode failure at a codec boundary.
#[derive(Debug, Error)]
pub enum ReprError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The value (named by its type) is outside the codec's supported subset.
    #[error("{0} values are not supported in this representation")]
    UnsupportedValue(String),

    #[error("expected an object at the top level, got {0}")]
    TopLevelNotObject(String),

    #[error("unknown envelope type `{0}`")]
    UnknownEnvelope(String),

    #[error("invalid `{tag}` envelope: {reason}")]
    InvalidEnvelope { tag: String, reason: String },

    #[error("unsupported hash version {0}")]
    UnsupportedHashVersion(u32),

    #[error(transparent)]
    InvalidCharacter(#[from] ValueError),
}

impl ReprError {
    pub(crate) fn invalid_envelope(tag: &str, reason: impl Into<String>) -> Self {
        ReprError::InvalidEnvelope {
            tag: tag.to_string(),
            reason: reason.into(),
        }
    }
}
