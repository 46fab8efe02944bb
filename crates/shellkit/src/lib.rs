//! Shellkit - Sandboxed interactive shell over a directory-backed file store
//!
//! Every path a command touches is resolved inside a single "virtual root"
//! directory; nothing can read, write, or traverse outside it. On top of
//! that sandbox sits a small POSIX-like engine: quoting, variable
//! expansion, pipelines, redirection, and a line-oriented `if/elif/else/fi`
//! scripting dialect.
//!
//! # Example
//!
//! ```rust
//! use shellkit::Shell;
//!
//! #[tokio::main]
//! async fn main() -> shellkit::Result<()> {
//!     let dir = tempfile::tempdir()?;
//!     let mut shell = Shell::new(dir.path())?;
//!     let result = shell.exec("echo hello").await;
//!     assert_eq!(result.stdout, "hello\n");
//!     assert_eq!(result.exit_code, 0);
//!     Ok(())
//! }
//! ```

mod builtins;
mod env;
mod error;
mod execdb;
mod fs;
mod interpreter;
mod interrupt;
mod parser;

pub use builtins::{Command, Context, Registry};
pub use env::Environment;
pub use error::{Error, Result};
pub use fs::{DirEntry, DirStore, FileStore, StatInfo};
pub use interpreter::ExecResult;
pub use interrupt::InterruptFlag;

use std::path::Path;
use std::sync::Arc;

use interpreter::Interpreter;

/// Main entry point for Shellkit.
///
/// Owns the sandboxed file store and the line-execution engine. One
/// `Shell` is one session: environment and working directory persist
/// across [`exec`](Shell::exec) calls.
pub struct Shell {
    fs: Arc<dyn FileStore>,
    interpreter: Interpreter,
}

impl Shell {
    /// Create a shell sandboxed under `root`, creating the directory if
    /// needed. This is the only fallible construction step; once the root
    /// exists, normal usage errors never abort the process.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let fs: Arc<dyn FileStore> = Arc::new(DirStore::new(root.as_ref())?);
        let interpreter = Interpreter::new(Arc::clone(&fs));
        Ok(Self { fs, interpreter })
    }

    /// Create a new ShellBuilder for customized configuration.
    pub fn builder() -> ShellBuilder {
        ShellBuilder::default()
    }

    /// Execute shell input (a single line or a whole script).
    ///
    /// Diagnostics share the output stream with ordinary output; the exit
    /// code distinguishes success from failure.
    pub async fn exec(&mut self, text: &str) -> ExecResult {
        self.interpreter.execute(text).await
    }

    /// Shell environment, read-only.
    pub fn env(&self) -> &Environment {
        self.interpreter.env()
    }

    /// Set an environment variable for the session.
    pub fn set_env(&mut self, key: &str, value: &str) {
        self.interpreter.set_env(key, value);
    }

    /// Current virtual working directory.
    pub fn cwd(&self) -> &str {
        self.interpreter.cwd()
    }

    /// The sandboxed file store backing this session.
    pub fn store(&self) -> &Arc<dyn FileStore> {
        &self.fs
    }
}

/// Builder for customized Shell configuration.
#[derive(Default)]
pub struct ShellBuilder {
    root: Option<std::path::PathBuf>,
    env: Vec<(String, String)>,
    cwd: Option<String>,
}

impl ShellBuilder {
    /// Set the sandbox root directory.
    pub fn root(mut self, root: impl Into<std::path::PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Set the initial virtual working directory.
    pub fn cwd(mut self, cwd: impl Into<String>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Build the Shell instance.
    pub fn build(self) -> Result<Shell> {
        let Some(root) = self.root else {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "sandbox root not set",
            )));
        };
        let mut shell = Shell::new(root)?;
        for (key, value) in self.env {
            shell.interpreter.set_env(&key, &value);
        }
        if let Some(cwd) = self.cwd {
            shell.interpreter.set_cwd(cwd);
        }
        Ok(shell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn shell() -> (TempDir, Shell) {
        let dir = TempDir::new().unwrap();
        let shell = Shell::new(dir.path()).unwrap();
        (dir, shell)
    }

    #[tokio::test]
    async fn test_echo() {
        let (_dir, mut shell) = shell();
        let result = shell.exec("echo hello world").await;
        assert_eq!(result.stdout, "hello world\n");
        assert_eq!(result.exit_code, 0);
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_quoting() {
        let (_dir, mut shell) = shell();
        let result = shell.exec("echo 'a  b' \"c|d\" e\\ f").await;
        assert_eq!(result.stdout, "a  b c|d e f\n");
    }

    #[tokio::test]
    async fn test_variable_expansion() {
        let (_dir, mut shell) = shell();
        shell.exec("USER=alice").await;
        let result = shell.exec("echo $USER ${USER} $UNDEFINED!").await;
        assert_eq!(result.stdout, "alice alice !\n");
    }

    #[tokio::test]
    async fn test_exit_code_variable() {
        let (_dir, mut shell) = shell();
        shell.exec("no-such-cmd").await;
        let result = shell.exec("echo $?").await;
        assert_eq!(result.stdout, "127\n");
        shell.exec("echo ok").await;
        let result = shell.exec("echo $?").await;
        assert_eq!(result.stdout, "0\n");
    }

    #[tokio::test]
    async fn test_assignment_requires_no_whitespace() {
        let (_dir, mut shell) = shell();
        // Whitespace anywhere disqualifies the assignment path; this is
        // looked up as a command named "X=1".
        let result = shell.exec("X=1 2").await;
        assert_eq!(result.exit_code, 127);
        assert_eq!(shell.env().get("X"), None);
    }

    #[tokio::test]
    async fn test_assignment_strips_symmetric_quotes() {
        let (_dir, mut shell) = shell();
        shell.exec("GREETING='hi'").await;
        assert_eq!(shell.env().get("GREETING"), Some("hi"));
    }

    #[tokio::test]
    async fn test_command_not_found() {
        let (_dir, mut shell) = shell();
        let result = shell.exec("frobnicate").await;
        assert_eq!(result.exit_code, 127);
        assert_eq!(result.stdout, "frobnicate: command not found\n");
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_pipeline() {
        let (_dir, mut shell) = shell();
        shell
            .exec("echo one > /data.txt")
            .await;
        shell.exec("echo two >> /data.txt").await;
        let result = shell.exec("cat /data.txt | grep two").await;
        assert_eq!(result.stdout, "two\n");
        assert_eq!(result.exit_code, 0);
    }

    #[tokio::test]
    async fn test_pipeline_aborts_on_failure() {
        let (_dir, mut shell) = shell();
        // First stage fails (cat on a missing file); second never runs.
        let result = shell.exec("cat /missing.txt | echo reached").await;
        assert_eq!(result.exit_code, 1);
        assert!(!result.stdout.contains("reached"));
    }

    #[tokio::test]
    async fn test_empty_pipe_segment_is_syntax_error() {
        let (_dir, mut shell) = shell();
        let result = shell.exec("echo hi |").await;
        assert_eq!(result.exit_code, 2);
        let result = shell.exec("| echo hi").await;
        assert_eq!(result.exit_code, 2);
    }

    #[tokio::test]
    async fn test_missing_redirect_target() {
        let (_dir, mut shell) = shell();
        let result = shell.exec("echo hi >").await;
        assert_eq!(result.exit_code, 2);
        assert!(result.stdout.contains("missing redirection target"));
    }

    #[tokio::test]
    async fn test_redirect_round_trip() {
        let (_dir, mut shell) = shell();
        let result = shell.exec("echo hi > /out.txt").await;
        assert_eq!(result.stdout, "");
        assert_eq!(result.exit_code, 0);
        let result = shell.exec("cat /out.txt").await;
        assert_eq!(result.stdout, "hi\n");
    }

    #[tokio::test]
    async fn test_input_redirect() {
        let (_dir, mut shell) = shell();
        shell.exec("echo needle > /in.txt").await;
        let result = shell.exec("grep needle < /in.txt").await;
        assert_eq!(result.stdout, "needle\n");
    }

    #[tokio::test]
    async fn test_cd_and_pwd() {
        let (_dir, mut shell) = shell();
        shell.exec("mkdir -p /home/alice").await;
        let result = shell.exec("cd /home/alice").await;
        assert_eq!(result.exit_code, 0);
        let result = shell.exec("pwd").await;
        assert_eq!(result.stdout, "/home/alice\n");
        assert_eq!(shell.cwd(), "/home/alice");
    }

    #[tokio::test]
    async fn test_cd_stays_inside_sandbox() {
        let (_dir, mut shell) = shell();
        shell.exec("cd ../../..").await;
        assert_eq!(shell.cwd(), "/");
        let result = shell.exec("cat /../../etc/passwd").await;
        assert_ne!(result.exit_code, 0);
        assert!(!result.stdout.contains("root:"));
    }

    #[tokio::test]
    async fn test_source_mutates_live_environment() {
        let (_dir, mut shell) = shell();
        shell.exec("echo FROM_SCRIPT=yes > /setup.sh").await;
        let result = shell.exec("source /setup.sh").await;
        assert_eq!(result.exit_code, 0);
        assert_eq!(shell.env().get("FROM_SCRIPT"), Some("yes"));
    }

    #[tokio::test]
    async fn test_source_missing_operand() {
        let (_dir, mut shell) = shell();
        let result = shell.exec("source").await;
        assert_eq!(result.exit_code, 2);
    }

    #[tokio::test]
    async fn test_script_by_path_requires_permission() {
        let (_dir, mut shell) = shell();
        shell.exec("echo echo ran > /run.sh").await;
        let result = shell.exec("/run.sh").await;
        assert_eq!(result.exit_code, 126);
        assert_eq!(result.stdout, "/run.sh: permission denied\n");

        shell.exec("chmod +x /run.sh").await;
        let result = shell.exec("/run.sh").await;
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "ran\n");
    }

    #[tokio::test]
    async fn test_script_by_path_isolated_environment() {
        let (_dir, mut shell) = shell();
        shell.exec("echo LEAK=yes > /leak.sh").await;
        shell.exec("chmod +x /leak.sh").await;
        shell.exec("/leak.sh").await;
        assert_eq!(shell.env().get("LEAK"), None);
    }

    #[tokio::test]
    async fn test_script_positional_parameters() {
        let (dir, mut shell) = shell();
        // Written host-side: expansion would otherwise consume $1/$2/$#
        // before the file content reaches the sandbox.
        std::fs::write(dir.path().join("args.sh"), "echo $0 $1 $2 $#\n").unwrap();
        shell.exec("chmod +x /args.sh").await;
        let result = shell.exec("/args.sh foo bar").await;
        assert_eq!(result.stdout, "/args.sh foo bar 2\n");
    }

    #[tokio::test]
    async fn test_if_else_branching() {
        let (_dir, mut shell) = shell();
        let script = "if [ -f /a.txt ] then\necho yes\nelse\necho no\nfi";
        let result = shell.exec(script).await;
        assert_eq!(result.stdout, "no\n");
        assert_eq!(result.exit_code, 0);

        shell.exec("touch /a.txt").await;
        let result = shell.exec(script).await;
        assert_eq!(result.stdout, "yes\n");
    }

    #[tokio::test]
    async fn test_elif_exclusivity() {
        let (_dir, mut shell) = shell();
        shell.exec("MODE=two").await;
        let script = "if [ $MODE = one ]; then\necho first\nelif [ $MODE = two ]; then\necho second\nelif [ $MODE = two ]; then\necho shadowed\nelse\necho fallback\nfi";
        let result = shell.exec(script).await;
        assert_eq!(result.stdout, "second\n");
    }

    #[tokio::test]
    async fn test_nested_if() {
        let (_dir, mut shell) = shell();
        shell.exec("touch /a.txt").await;
        let script = "if [ -f /a.txt ]; then\nif [ -f /b.txt ]; then\necho both\nelse\necho only-a\nfi\nfi";
        let result = shell.exec(script).await;
        assert_eq!(result.stdout, "only-a\n");
    }

    #[tokio::test]
    async fn test_inline_then_body() {
        let (_dir, mut shell) = shell();
        let result = shell.exec("if [ a = a ]; then echo inline; fi").await;
        assert_eq!(result.stdout, "inline\n");
        assert_eq!(result.exit_code, 0);
    }

    #[tokio::test]
    async fn test_mismatched_fi_is_fatal() {
        let (_dir, mut shell) = shell();
        let result = shell.exec("fi").await;
        assert_eq!(result.exit_code, 2);
    }

    #[tokio::test]
    async fn test_missing_then_is_fatal() {
        let (_dir, mut shell) = shell();
        let result = shell.exec("if [ a = a ]\necho body\nfi").await;
        assert_eq!(result.exit_code, 2);
        assert!(result.stdout.contains("expected 'then'"));
    }

    #[tokio::test]
    async fn test_self_sourcing_script_hits_depth_limit() {
        let (_dir, mut shell) = shell();
        shell.exec("echo source /loop.sh > /loop.sh").await;
        let result = shell.exec("source /loop.sh").await;
        assert_eq!(result.exit_code, 1);
        assert!(result.stdout.contains("nesting too deep"));
    }

    #[tokio::test]
    async fn test_comment_and_blank_lines() {
        let (_dir, mut shell) = shell();
        let result = shell.exec("# just a comment\n\necho after").await;
        assert_eq!(result.stdout, "after\n");
        assert_eq!(result.exit_code, 0);
    }

    #[tokio::test]
    async fn test_builder_seeds_env_and_cwd() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("work")).unwrap();
        let mut shell = Shell::builder()
            .root(dir.path())
            .env("USER", "alice")
            .cwd("/work")
            .build()
            .unwrap();
        let result = shell.exec("echo $USER").await;
        assert_eq!(result.stdout, "alice\n");
        assert_eq!(shell.cwd(), "/work");
    }

    #[tokio::test]
    async fn test_help_lists_commands() {
        let (_dir, mut shell) = shell();
        let result = shell.exec("help").await;
        assert!(result.stdout.contains("echo"));
        assert!(result.stdout.contains("grep"));
        let result = shell.exec("help echo").await;
        assert!(result.stdout.contains("echo"));
        assert_eq!(result.exit_code, 0);
    }
}
