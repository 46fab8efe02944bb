//! pwd and cd builtin commands

use async_trait::async_trait;

use super::{Command, Context};

/// The pwd builtin command.
pub struct Pwd;

#[async_trait]
impl Command for Pwd {
    fn name(&self) -> &str {
        "pwd"
    }

    fn help(&self) -> &str {
        "pwd: print the current working directory\n\
         Synopsis:\n  pwd\n"
    }

    async fn execute(&self, ctx: Context<'_>) -> i32 {
        ctx.out.push_str(ctx.cwd);
        ctx.out.push('\n');
        0
    }
}

/// The cd builtin command.
pub struct Cd;

#[async_trait]
impl Command for Cd {
    fn name(&self) -> &str {
        "cd"
    }

    fn help(&self) -> &str {
        "cd: change the working directory\n\
         Synopsis:\n  cd [dir]\n\
         Notes:\n  Without arguments, changes to '/'. Accepts absolute or relative paths.\n\
         Examples:\n  cd /projects/demo\n  cd ..\n"
    }

    async fn execute(&self, ctx: Context<'_>) -> i32 {
        let target = ctx.args.get(1).map(String::as_str).unwrap_or("/");
        let host = match ctx.fs.resolve_secure(ctx.cwd, target) {
            Ok(host) => host,
            Err(e) => {
                ctx.out.push_str(&format!("cd: {e}\n"));
                return 13;
            }
        };
        match ctx.fs.stat(&host).await {
            Ok(info) if info.is_dir => {}
            Ok(_) | Err(_) => {
                ctx.out.push_str(&format!("cd: not a directory: {target}\n"));
                return 1;
            }
        }
        // The cwd is only ever assigned from a resolved, re-virtualized path.
        match ctx.fs.virtual_path(&host) {
            Ok(virt) => {
                *ctx.cwd = virt;
                0
            }
            Err(e) => {
                ctx.out.push_str(&format!("cd: {e}\n"));
                13
            }
        }
    }
}
