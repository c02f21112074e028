use thiserror::Error;

/// Construction-time validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("a character must be exactly one grapheme cluster, got {count} in {text:?}")]
    InvalidCharacter { text: String, count: usize },
}
