//! Error types for Shellkit
//!
//! Every failure that can occur during normal usage maps onto a small
//! taxonomy with a fixed exit code, and is rendered as a single diagnostic
//! line on the command's output stream rather than propagated out of the
//! engine. Only construction-time failures (e.g. the sandbox root cannot
//! be created) abort the process.

use thiserror::Error;

/// Result type alias using Shellkit's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Shellkit error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed redirection or control-flow nesting.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Command name not present in the registry.
    #[error("{0}: command not found")]
    CommandNotFound(String),

    /// Script invoked by path without execute permission.
    #[error("{0}: permission denied")]
    PermissionDenied(String),

    /// Resolved path escapes the sandbox root.
    #[error("security: path escapes sandbox root")]
    Sandbox,

    /// I/O error from file store operations.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Exit code associated with this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Syntax(_) => 2,
            Error::CommandNotFound(_) => 127,
            Error::PermissionDenied(_) => 126,
            Error::Sandbox | Error::Io(_) => 1,
        }
    }
}
