//! Shellkit CLI - Interactive sandboxed shell
//!
//! Usage:
//!   shellkit                       # Interactive REPL
//!   shellkit -c 'echo hello'       # Execute a command string
//!   shellkit script.sh arg1 arg2   # Execute a host-side script file
//!   shellkit --root ./rootfs       # Use a specific sandbox root

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use shellkit::{FileStore, InterruptFlag, Shell};

/// Shellkit - Sandboxed interactive shell
#[derive(Parser, Debug)]
#[command(name = "shellkit")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Sandbox root directory (created if missing)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Execute the given command string
    #[arg(short = 'c')]
    command: Option<String>,

    /// Script file to execute (read from the host filesystem)
    #[arg()]
    script: Option<PathBuf>,

    /// Arguments to pass to the script
    #[arg(trailing_var_arg = true)]
    args: Vec<String>,
}

fn default_root() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".local/share/shellkit/rootfs"),
        None => std::env::temp_dir().join("shellkit-rootfs"),
    }
}

/// Where the session username persists inside the sandbox.
const USERNAME_PATH: &str = "/etc/username";

/// Determine the session user, persisting it across sessions.
///
/// A name stored at `/etc/username` inside the sandbox wins. Otherwise fall
/// back to the host `$USER`; an interactive session additionally gets a
/// one-time prompt and the chosen name is written back for the next run.
async fn session_user(shell: &Shell, interactive: bool) -> Result<String> {
    let store = shell.store();
    if let Ok(host) = store.resolve_secure("/", USERNAME_PATH) {
        if let Ok(saved) = store.read_file(&host).await {
            let saved = saved.trim();
            if !saved.is_empty() {
                return Ok(saved.to_string());
            }
        }
    }

    let fallback = std::env::var("USER").unwrap_or_else(|_| "user".to_string());
    if !interactive {
        return Ok(fallback);
    }

    print!("Username [{fallback}]: ");
    use std::io::Write;
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let name = match line.trim() {
        "" => fallback,
        typed => typed.to_string(),
    };

    let host = store
        .resolve_secure("/", USERNAME_PATH)
        .context("username path escapes the sandbox")?;
    store
        .write_file(&host, &format!("{name}\n"), false)
        .await
        .context("failed to persist username")?;
    println!("Welcome, {name}! Your name is saved for future sessions.");
    Ok(name)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let root = args.root.unwrap_or_else(default_root);

    let mut builder = Shell::builder().root(&root);
    if let Some(script_path) = &args.script {
        builder = builder.env("0", script_path.display().to_string());
        builder = builder.env("#", args.args.len().to_string());
        for (i, arg) in args.args.iter().enumerate() {
            builder = builder.env((i + 1).to_string(), arg);
        }
    }
    let mut shell = builder
        .build()
        .with_context(|| format!("failed to create sandbox root at {}", root.display()))?;
    tracing::debug!(root = %root.display(), "sandbox ready");

    let interactive = args.command.is_none() && args.script.is_none();
    let user = session_user(&shell, interactive).await?;
    shell.set_env("USER", &user);

    // Execute command string if provided
    if let Some(cmd) = args.command {
        let result = shell.exec(&cmd).await;
        print!("{}", result.stdout);
        std::process::exit(result.exit_code);
    }

    // Execute script file if provided
    if let Some(script_path) = args.script {
        let script = std::fs::read_to_string(&script_path)
            .with_context(|| format!("failed to read script: {}", script_path.display()))?;
        let result = shell.exec(&script).await;
        print!("{}", result.stdout);
        std::process::exit(result.exit_code);
    }

    repl(&mut shell, &user).await
}

/// Interactive loop. Ctrl-C only sets a flag; it is polled between prompt
/// iterations, so a running command is never cancelled mid-flight.
async fn repl(shell: &mut Shell, user: &str) -> Result<()> {
    let interrupt = InterruptFlag::new();
    {
        let interrupt = interrupt.clone();
        tokio::spawn(async move {
            loop {
                if tokio::signal::ctrl_c().await.is_err() {
                    return;
                }
                interrupt.set();
            }
        });
    }

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if interrupt.take() {
            stdout.write_all(b"^C\n").await?;
        }
        let cwd = if shell.cwd() == "/" { "~" } else { shell.cwd() };
        let prompt = format!("{user}@shellkit:{cwd}$ ");
        stdout.write_all(prompt.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            stdout.write_all(b"\n").await?;
            return Ok(());
        };
        let trimmed = line.trim();
        if trimmed == "exit" || trimmed == "quit" {
            return Ok(());
        }
        let result = shell.exec(&line).await;
        stdout.write_all(result.stdout.as_bytes()).await?;
        stdout.flush().await?;
        // Drop anything typed while the command ran if Ctrl-C fired.
        interrupt.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_session_user_reads_persisted_name() {
        let dir = TempDir::new().unwrap();
        let shell = Shell::new(dir.path()).unwrap();
        let store = shell.store();
        let host = store.resolve_secure("/", USERNAME_PATH).unwrap();
        store.write_file(&host, "alice\n", false).await.unwrap();

        let user = session_user(&shell, false).await.unwrap();
        assert_eq!(user, "alice");
    }

    #[tokio::test]
    async fn test_session_user_falls_back_when_absent() {
        let dir = TempDir::new().unwrap();
        let shell = Shell::new(dir.path()).unwrap();
        // Non-interactive: no prompt, no persistence, just the host fallback.
        let user = session_user(&shell, false).await.unwrap();
        assert!(!user.is_empty());
        let host = shell.store().resolve_secure("/", USERNAME_PATH).unwrap();
        assert!(!shell.store().exists(&host).await.unwrap());
    }
}
