use std::path::PathBuf;

use dark_repr::ReprError;

/// Anything that stops the driver. Program errors are not among them:
/// those are values and get printed like any other result.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid program: {0}")]
    Program(#[from] serde_json::Error),

    #[error(transparent)]
    Repr(#[from] ReprError),

    #[error("cannot start the async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl CliError {
    pub(crate) fn usage(msg: impl Into<String>) -> Self {
        CliError::Usage(msg.into())
    }
}
