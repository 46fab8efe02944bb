//! Environment builtins: env, set, unset.

use async_trait::async_trait;

use super::{Command, Context};

/// The env builtin command.
pub struct Env;

#[async_trait]
impl Command for Env {
    fn name(&self) -> &str {
        "env"
    }

    fn help(&self) -> &str {
        "env: print shell environment variables\n\
         Synopsis:\n  env\n"
    }

    async fn execute(&self, ctx: Context<'_>) -> i32 {
        for (key, value) in ctx.env.list() {
            ctx.out.push_str(&format!("{key}={value}\n"));
        }
        0
    }
}

/// The set builtin command.
pub struct Set;

#[async_trait]
impl Command for Set {
    fn name(&self) -> &str {
        "set"
    }

    fn help(&self) -> &str {
        "set: set an environment variable\n\
         Synopsis:\n  set KEY=VALUE\n\
         Examples:\n  set USER=alice\n"
    }

    async fn execute(&self, ctx: Context<'_>) -> i32 {
        let Some(arg) = ctx.args.get(1) else {
            ctx.out.push_str("set: missing KEY=VALUE\n");
            return 2;
        };
        let Some((key, value)) = arg.split_once('=') else {
            ctx.out.push_str("set: format KEY=VALUE\n");
            return 2;
        };
        ctx.env.set(key, value);
        0
    }
}

/// The unset builtin command.
pub struct Unset;

#[async_trait]
impl Command for Unset {
    fn name(&self) -> &str {
        "unset"
    }

    fn help(&self) -> &str {
        "unset: remove an environment variable\n\
         Synopsis:\n  unset KEY\n\
         Examples:\n  unset USER\n"
    }

    async fn execute(&self, ctx: Context<'_>) -> i32 {
        let Some(key) = ctx.args.get(1) else {
            ctx.out.push_str("unset: missing KEY\n");
            return 2;
        };
        ctx.env.unset(key);
        0
    }
}
