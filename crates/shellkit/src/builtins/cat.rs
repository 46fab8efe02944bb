//! cat builtin command

use async_trait::async_trait;

use super::{Command, Context};

/// The cat builtin command.
pub struct Cat;

#[async_trait]
impl Command for Cat {
    fn name(&self) -> &str {
        "cat"
    }

    fn help(&self) -> &str {
        "cat: concatenate and print files\n\
         Synopsis:\n  cat [file]\n\
         Notes:\n  When no file is provided, reads from standard input.\n\
         Examples:\n  cat a.txt\n  cat < a.txt\n"
    }

    async fn execute(&self, ctx: Context<'_>) -> i32 {
        let Some(file) = ctx.args.get(1) else {
            if let Some(stdin) = ctx.stdin {
                ctx.out.push_str(stdin);
            }
            return 0;
        };
        let host = match ctx.fs.resolve_secure(ctx.cwd, file) {
            Ok(host) => host,
            Err(e) => {
                ctx.out.push_str(&format!("cat: {e}\n"));
                return 1;
            }
        };
        match ctx.fs.read_file(&host).await {
            Ok(data) => {
                ctx.out.push_str(&data);
                0
            }
            Err(e) => {
                ctx.out.push_str(&format!("cat: {e}\n"));
                1
            }
        }
    }
}
