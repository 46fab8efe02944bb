//! Line-execution engine.
//!
//! One raw line flows through: trim and comment strip, assignment
//! short-circuit, tokenize, per-token expansion, then dispatch — `source`,
//! script-by-path, or pipeline. Script interpretation recurses back into
//! this engine one line at a time, so condition lines and sourced files
//! get the full treatment.

mod script;
mod state;

pub use state::ExecResult;

use futures_util::future::BoxFuture;
use std::mem;
use std::sync::Arc;

use crate::builtins::{Context, Registry};
use crate::env::Environment;
use crate::error::Error;
use crate::execdb;
use crate::fs::FileStore;
use crate::parser;

/// One pipeline segment after redirection stripping.
#[derive(Debug)]
struct Segment {
    args: Vec<String>,
    input: Option<String>,
    output: Option<(String, bool)>,
}

/// The shell engine: owns the environment and virtual working directory,
/// executes lines against a sandboxed file store.
pub struct Interpreter {
    fs: Arc<dyn FileStore>,
    registry: Arc<Registry>,
    env: Environment,
    cwd: String,
    depth: usize,
}

/// Nesting bound for `source` and script-by-path recursion. A script that
/// sources itself hits this instead of overflowing the stack.
const MAX_SCRIPT_DEPTH: usize = 64;

impl Interpreter {
    /// Create an interpreter with the full builtin registry, rooted at the
    /// virtual `/`.
    pub fn new(fs: Arc<dyn FileStore>) -> Self {
        Self {
            fs,
            registry: Arc::new(Registry::with_builtins()),
            env: Environment::new(),
            cwd: "/".to_string(),
            depth: 0,
        }
    }

    /// Set an environment variable.
    pub fn set_env(&mut self, key: &str, value: &str) {
        self.env.set(key, value);
    }

    /// Set the virtual working directory.
    pub fn set_cwd(&mut self, cwd: impl Into<String>) {
        self.cwd = cwd.into();
    }

    /// Shell environment, read-only.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Current virtual working directory.
    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    /// Register an additional command.
    pub fn register(&mut self, cmd: Box<dyn crate::builtins::Command>) {
        let registry = Arc::get_mut(&mut self.registry);
        if let Some(registry) = registry {
            registry.add(cmd);
        }
    }

    /// Execute shell input (a single line or a whole script) and collect
    /// its output and exit code.
    pub async fn execute(&mut self, text: &str) -> ExecResult {
        let mut out = String::new();
        let exit_code = self.run_script(text, &mut out).await;
        ExecResult {
            stdout: out,
            exit_code,
        }
    }

    /// Execute one line. Boxed because script interpretation recurses back
    /// into line execution.
    pub(crate) fn run_line<'a>(
        &'a mut self,
        line: String,
        out: &'a mut String,
    ) -> BoxFuture<'a, i32> {
        Box::pin(async move {
            let line = line.trim().to_string();
            if line.is_empty() || line.starts_with('#') {
                return 0;
            }

            // Assignment short-circuit: '=' present and no whitespace
            // anywhere in the line. Whitespace disqualifies this path even
            // inside an intended value; `?` is left untouched.
            if line.contains('=') && !line.contains(char::is_whitespace) {
                if let Some((key, value)) = line.split_once('=') {
                    let value = strip_symmetric_quotes(value);
                    let value = parser::expand(value, &self.env);
                    self.env.set(key, value);
                    return 0;
                }
            }

            let mut tokens = parser::tokenize(&line);
            if tokens.is_empty() {
                return 0;
            }
            tracing::trace!(command = %tokens[0], count = tokens.len(), "executing line");
            for token in &mut tokens {
                if !parser::is_operator(token) {
                    *token = parser::expand(token, &self.env);
                }
            }

            let code = if tokens[0] == "source" {
                self.run_source(&tokens, out).await
            } else if looks_like_path(&tokens[0]) {
                match self.run_script_by_path(&tokens, out).await {
                    Some(code) => code,
                    // Not an existing file; fall through to the registry.
                    None => self.run_pipeline(tokens, out).await,
                }
            } else {
                self.run_pipeline(tokens, out).await
            };

            self.env.set_exit_code(code);
            code
        })
    }

    /// `source <path>`: interpret a file with the caller's live environment.
    async fn run_source(&mut self, tokens: &[String], out: &mut String) -> i32 {
        let Some(path) = tokens.get(1) else {
            out.push_str("source: missing operand\n");
            return 2;
        };
        let data = match self.read_script(path).await {
            Ok(data) => data,
            Err(e) => {
                out.push_str(&format!("source: {e}\n"));
                return 1;
            }
        };
        self.run_script(&data, out).await
    }

    /// Direct script invocation by path.
    ///
    /// Returns `None` when the token resolves but names no existing file,
    /// so the caller can fall through to pipeline handling. An existing
    /// file runs only if the execute-permission database lists it, with a
    /// cloned environment seeded with positional parameters.
    async fn run_script_by_path(&mut self, tokens: &[String], out: &mut String) -> Option<i32> {
        let path = &tokens[0];
        let host = match self.fs.resolve_secure(&self.cwd, path) {
            Ok(host) => host,
            Err(e) => {
                out.push_str(&format!("{e}\n"));
                return Some(e.exit_code());
            }
        };
        if !self.fs.exists(&host).await.unwrap_or(false) {
            return None;
        }
        match self.fs.stat(&host).await {
            Ok(info) if info.is_dir => return None,
            Ok(_) => {}
            Err(e) => {
                out.push_str(&format!("{path}: {e}\n"));
                return Some(1);
            }
        }
        if !execdb::contains(self.fs.as_ref(), &host).await {
            tracing::debug!(%path, "script not in execute-permission set");
            let e = Error::PermissionDenied(path.clone());
            out.push_str(&format!("{e}\n"));
            return Some(e.exit_code());
        }
        let data = match self.fs.read_file(&host).await {
            Ok(data) => data,
            Err(e) => {
                out.push_str(&format!("{path}: {e}\n"));
                return Some(1);
            }
        };

        let virt = self
            .fs
            .virtual_path(&host)
            .unwrap_or_else(|_| path.clone());
        let mut script_env = self.env.clone();
        script_env.set("0", virt);
        script_env.set("#", (tokens.len() - 1).to_string());
        for (i, arg) in tokens[1..].iter().enumerate() {
            script_env.set((i + 1).to_string(), arg.clone());
        }
        script_env.set("?", "0");

        // Isolated scope: swap in the seeded clone, restore on return.
        let saved = mem::replace(&mut self.env, script_env);
        let code = self.run_script(&data, out).await;
        self.env = saved;
        Some(code)
    }

    async fn read_script(&self, path: &str) -> crate::Result<String> {
        let host = self.fs.resolve_secure(&self.cwd, path)?;
        self.fs.read_file(&host).await
    }

    /// Split tokens on `|`, strip redirections, and run the stages in
    /// order. A failing stage aborts the pipeline and its code becomes the
    /// line's result; later stages never run.
    async fn run_pipeline(&mut self, tokens: Vec<String>, out: &mut String) -> i32 {
        let segments = match split_pipeline(tokens) {
            Ok(segments) => segments,
            Err(e) => {
                out.push_str(&format!("{e}\n"));
                return e.exit_code();
            }
        };

        let mut input: Option<String> = None;
        if let Some(file) = segments[0].input.as_deref() {
            match self.read_script(file).await {
                Ok(data) => input = Some(data),
                Err(e) => {
                    out.push_str(&format!("redirect: {e}\n"));
                    return 1;
                }
            }
        }

        let registry = Arc::clone(&self.registry);
        let last = segments.len() - 1;
        for (i, segment) in segments.iter().enumerate() {
            let name = &segment.args[0];
            let Some(cmd) = registry.find(name) else {
                let e = Error::CommandNotFound(name.clone());
                out.push_str(&format!("{e}\n"));
                return e.exit_code();
            };

            let mut stage_out = String::new();
            let ctx = Context {
                args: &segment.args,
                stdin: input.as_deref(),
                out: &mut stage_out,
                fs: Arc::clone(&self.fs),
                env: &mut self.env,
                cwd: &mut self.cwd,
                registry: &registry,
            };
            let code = cmd.execute(ctx).await;

            if i == last && segment.output.is_none() {
                out.push_str(&stage_out);
            }
            if code != 0 {
                return code;
            }
            if i == last {
                if let Some((file, append)) = &segment.output {
                    if let Err(e) = self.write_redirect(file, &stage_out, *append).await {
                        out.push_str(&format!("redirect: {e}\n"));
                        return 1;
                    }
                }
                return 0;
            }
            input = Some(stage_out);
        }
        0
    }

    async fn write_redirect(&self, file: &str, data: &str, append: bool) -> crate::Result<()> {
        let host = self.fs.resolve_secure(&self.cwd, file)?;
        self.fs.write_file(&host, data, append).await
    }
}

fn looks_like_path(token: &str) -> bool {
    token.starts_with('/') || token.starts_with('.') || token.contains('/')
}

fn strip_symmetric_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Split expanded tokens into pipeline segments and extract redirections.
///
/// Input redirection is honored on the first segment only, output
/// redirection on the last; `>>` selects append mode. An empty segment
/// (leading, trailing, or doubled pipe) is a syntax error, as is a segment
/// left with no arguments after stripping.
fn split_pipeline(tokens: Vec<String>) -> crate::Result<Vec<Segment>> {
    let raw: Vec<Vec<String>> = tokens
        .split(|t| t == "|")
        .map(<[String]>::to_vec)
        .collect();
    let last = raw.len() - 1;

    let mut segments = Vec::with_capacity(raw.len());
    for (i, seg) in raw.into_iter().enumerate() {
        if seg.is_empty() {
            return Err(Error::Syntax("empty command".to_string()));
        }
        let segment = strip_redirections(seg, i == 0, i == last)?;
        if segment.args.is_empty() {
            return Err(Error::Syntax("empty command".to_string()));
        }
        segments.push(segment);
    }
    Ok(segments)
}

fn strip_redirections(tokens: Vec<String>, allow_in: bool, allow_out: bool) -> crate::Result<Segment> {
    let mut args = Vec::with_capacity(tokens.len());
    let mut input = None;
    let mut output = None;

    let mut iter = tokens.into_iter();
    while let Some(token) = iter.next() {
        if let Some(rest) = token.strip_prefix('<') {
            if !allow_in {
                return Err(Error::Syntax("misplaced redirection".to_string()));
            }
            let file = if rest.is_empty() {
                iter.next()
                    .ok_or_else(|| Error::Syntax("missing redirection target".to_string()))?
            } else {
                rest.to_string()
            };
            input = Some(file);
        } else if token.starts_with('>') {
            if !allow_out {
                return Err(Error::Syntax("misplaced redirection".to_string()));
            }
            let (append, rest) = match token.strip_prefix(">>") {
                Some(rest) => (true, rest),
                None => (false, &token[1..]),
            };
            let file = if rest.is_empty() {
                iter.next()
                    .ok_or_else(|| Error::Syntax("missing redirection target".to_string()))?
            } else {
                rest.to_string()
            };
            output = Some((file, append));
        } else {
            args.push(token);
        }
    }
    Ok(Segment {
        args,
        input,
        output,
    })
}
