//! echo builtin command

use async_trait::async_trait;

use super::{Command, Context};

/// The echo builtin command.
pub struct Echo;

#[async_trait]
impl Command for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn help(&self) -> &str {
        "echo: write arguments to standard output\n\
         Synopsis:\n  echo [args...]\n\
         Examples:\n  echo hello world\n"
    }

    async fn execute(&self, ctx: Context<'_>) -> i32 {
        let line = ctx.args[1..].join(" ");
        ctx.out.push_str(&line);
        ctx.out.push('\n');
        0
    }
}
