//! stat builtin command

use async_trait::async_trait;

use super::{Command, Context};

/// The stat builtin command.
pub struct Stat;

#[async_trait]
impl Command for Stat {
    fn name(&self) -> &str {
        "stat"
    }

    fn help(&self) -> &str {
        "stat: display file status\n\
         Synopsis:\n  stat <path>\n\
         Examples:\n  stat /etc/execdb\n"
    }

    async fn execute(&self, ctx: Context<'_>) -> i32 {
        let Some(target) = ctx.args.get(1) else {
            ctx.out.push_str("stat: missing operand\n");
            return 2;
        };
        let host = match ctx.fs.resolve_secure(ctx.cwd, target) {
            Ok(host) => host,
            Err(e) => {
                ctx.out.push_str(&format!("stat: {e}\n"));
                return 1;
            }
        };
        match ctx.fs.stat(&host).await {
            Ok(info) => {
                let kind = if info.is_dir { "dir" } else { "file" };
                ctx.out
                    .push_str(&format!("name={} size={} type={kind}\n", info.name, info.size));
                0
            }
            Err(e) => {
                ctx.out.push_str(&format!("stat: {e}\n"));
                1
            }
        }
    }
}
