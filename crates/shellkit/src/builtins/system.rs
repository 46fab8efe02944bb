//! help and version builtin commands

use async_trait::async_trait;

use super::{Command, Context};

/// The help builtin command.
pub struct Help;

#[async_trait]
impl Command for Help {
    fn name(&self) -> &str {
        "help"
    }

    fn help(&self) -> &str {
        "help: display information about builtin commands\n\
         Synopsis:\n  help [command]\n\
         Notes:\n  Without an argument, lists all available commands.\n\
         Examples:\n  help\n  help grep\n"
    }

    async fn execute(&self, ctx: Context<'_>) -> i32 {
        match ctx.args.get(1) {
            None => {
                ctx.out.push_str("Available commands:\n");
                for name in ctx.registry.names() {
                    ctx.out.push_str("  ");
                    ctx.out.push_str(name);
                    ctx.out.push('\n');
                }
                ctx.out
                    .push_str("Use 'help <command>' for details on a command.\n");
                0
            }
            Some(name) => match ctx.registry.find(name) {
                Some(cmd) => {
                    ctx.out.push_str(cmd.help());
                    if !cmd.help().ends_with('\n') {
                        ctx.out.push('\n');
                    }
                    0
                }
                None => {
                    ctx.out.push_str(&format!("help: no such command: {name}\n"));
                    1
                }
            },
        }
    }
}

/// The version builtin command.
pub struct Version;

#[async_trait]
impl Command for Version {
    fn name(&self) -> &str {
        "version"
    }

    fn help(&self) -> &str {
        "version: print the shell version\n\
         Synopsis:\n  version\n"
    }

    async fn execute(&self, ctx: Context<'_>) -> i32 {
        ctx.out
            .push_str(&format!("shellkit {}\n", env!("CARGO_PKG_VERSION")));
        0
    }
}
