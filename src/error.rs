use std::path::PathBuf;
use thiserror::Error;

/// Errors that `fetch` propagates to its caller.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// A required connection parameter was not supplied.
    #[error("missing connection parameter '{key}'")]
    MissingParameter { key: String },

    /// The target directory did not exist and could not be created.
    #[error("cannot create directory '{}': {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Outcome of a failed `p4 sync` invocation. Logged by the connector, never propagated.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{0}")]
    ClientNotFound(String),

    /// The client ran and exited unsuccessfully.
    #[error("exit code {code:?}: {stderr}")]
    CommandFailed { code: Option<i32>, stderr: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
