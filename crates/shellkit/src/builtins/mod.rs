//! Built-in shell commands.
//!
//! This module provides the [`Command`] trait every builtin implements and
//! the [`Context`] bundle the engine hands to each pipeline stage. The
//! engine consumes builtins purely through the registry; a command's only
//! channels to the world are its context.

mod cat;
mod echo;
mod environ;
mod fileops;
mod grep;
mod headtail;
mod inspect;
mod ls;
mod navigation;
mod system;
mod test;

pub use cat::Cat;
pub use echo::Echo;
pub use environ::{Env, Set, Unset};
pub use fileops::{Chmod, Cp, Mkdir, Mv, Rm, Touch};
pub use grep::Grep;
pub use headtail::{Head, Tail};
pub use inspect::Stat;
pub use ls::{Find, Ls};
pub use navigation::{Cd, Pwd};
pub use system::{Help, Version};
pub use test::Test;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::env::Environment;
use crate::fs::FileStore;

/// Execution context for one pipeline stage.
///
/// Constructed fresh per executed segment; commands read and write through
/// it but own none of its parts. There is a single output stream: ordinary
/// output and diagnostics both go to `out`.
pub struct Context<'a> {
    /// Command arguments; index 0 is the invoked name.
    pub args: &'a [String],

    /// Input from the previous pipeline stage or an input redirect.
    pub stdin: Option<&'a str>,

    /// Output buffer for this stage.
    pub out: &'a mut String,

    /// Sandboxed file store.
    pub fs: Arc<dyn FileStore>,

    /// Shell environment (live; mutations persist).
    pub env: &'a mut Environment,

    /// Virtual working directory; only `cd` reassigns it, and only from a
    /// successfully resolved, re-virtualized path.
    pub cwd: &'a mut String,

    /// Command registry, for `help`.
    pub registry: &'a Registry,
}

/// Trait for builtin commands.
#[async_trait]
pub trait Command: Send + Sync {
    /// Registry name.
    fn name(&self) -> &str;

    /// Help text shown by the `help` builtin.
    fn help(&self) -> &str;

    /// Execute the command, returning its exit code.
    async fn execute(&self, ctx: Context<'_>) -> i32;
}

/// Name-keyed table of builtins, ordered for stable listings.
#[derive(Default)]
pub struct Registry {
    commands: BTreeMap<String, Box<dyn Command>>,
}

impl Registry {
    /// Registry with the full builtin set.
    pub fn with_builtins() -> Self {
        let mut registry = Self::default();
        registry.add(Box::new(Pwd));
        registry.add(Box::new(Cd));
        registry.add(Box::new(Ls));
        registry.add(Box::new(Echo));
        registry.add(Box::new(Mkdir));
        registry.add(Box::new(Touch));
        registry.add(Box::new(Cat));
        registry.add(Box::new(Rm));
        registry.add(Box::new(Cp));
        registry.add(Box::new(Mv));
        registry.add(Box::new(Env));
        registry.add(Box::new(Set));
        registry.add(Box::new(Unset));
        registry.add(Box::new(Help));
        registry.add(Box::new(Version));
        registry.add(Box::new(Stat));
        registry.add(Box::new(Head));
        registry.add(Box::new(Tail));
        registry.add(Box::new(Find));
        registry.add(Box::new(Grep));
        registry.add(Box::new(Chmod));
        registry.add(Box::new(Test::test()));
        registry.add(Box::new(Test::bracket()));
        registry
    }

    /// Register a command under its own name.
    pub fn add(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    /// Look up a command by name.
    pub fn find(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(Box::as_ref)
    }

    /// Registered names in order.
    pub fn names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }
}
