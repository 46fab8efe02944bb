//! Interpreter state types

/// Result of executing shell input.
///
/// The shell has a single output stream; ordinary output and diagnostics
/// both land in `stdout`.
#[derive(Debug, Clone, Default)]
pub struct ExecResult {
    /// Combined output
    pub stdout: String,
    /// Exit code
    pub exit_code: i32,
}

impl ExecResult {
    /// Check if the result indicates success.
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}
