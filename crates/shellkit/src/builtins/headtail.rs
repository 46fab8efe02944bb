//! head and tail builtin commands

use async_trait::async_trait;
use std::collections::VecDeque;

use super::{Command, Context};

struct LineArgs {
    count: usize,
    file: Option<String>,
}

fn parse_line_args(name: &str, ctx: &mut Context<'_>) -> Result<LineArgs, i32> {
    let mut count = 10usize;
    let mut file = None;
    let mut i = 1;
    while i < ctx.args.len() {
        let arg = &ctx.args[i];
        if arg == "-n" && i + 1 < ctx.args.len() {
            i += 1;
            count = match ctx.args[i].parse() {
                Ok(n) => n,
                Err(_) => {
                    ctx.out.push_str(&format!("{name}: invalid line count\n"));
                    return Err(2);
                }
            };
        } else if let Some(rest) = arg.strip_prefix("-n").filter(|r| !r.is_empty()) {
            count = match rest.parse() {
                Ok(n) => n,
                Err(_) => {
                    ctx.out.push_str(&format!("{name}: invalid line count\n"));
                    return Err(2);
                }
            };
        } else {
            file = Some(arg.clone());
        }
        i += 1;
    }
    Ok(LineArgs { count, file })
}

async fn read_input(name: &str, ctx: &mut Context<'_>, file: Option<String>) -> Result<String, i32> {
    match file {
        Some(file) => {
            let host = match ctx.fs.resolve_secure(ctx.cwd, &file) {
                Ok(host) => host,
                Err(e) => {
                    ctx.out.push_str(&format!("{name}: {e}\n"));
                    return Err(1);
                }
            };
            match ctx.fs.read_file(&host).await {
                Ok(data) => Ok(data),
                Err(e) => {
                    ctx.out.push_str(&format!("{name}: {e}\n"));
                    Err(1)
                }
            }
        }
        None => Ok(ctx.stdin.unwrap_or("").to_string()),
    }
}

/// The head builtin command.
pub struct Head;

#[async_trait]
impl Command for Head {
    fn name(&self) -> &str {
        "head"
    }

    fn help(&self) -> &str {
        "head: output the first part of files\n\
         Synopsis:\n  head [-n N] [file]\n\
         Options:\n  -n N   Print the first N lines (default 10)\n\
         Notes:\n  Without a file, reads from standard input.\n\
         Examples:\n  head -n 5 a.txt\n  cat a.txt | head -n 3\n"
    }

    async fn execute(&self, mut ctx: Context<'_>) -> i32 {
        let parsed = match parse_line_args("head", &mut ctx) {
            Ok(parsed) => parsed,
            Err(code) => return code,
        };
        let data = match read_input("head", &mut ctx, parsed.file).await {
            Ok(data) => data,
            Err(code) => return code,
        };
        for line in data.lines().take(parsed.count) {
            ctx.out.push_str(line);
            ctx.out.push('\n');
        }
        0
    }
}

/// The tail builtin command.
pub struct Tail;

#[async_trait]
impl Command for Tail {
    fn name(&self) -> &str {
        "tail"
    }

    fn help(&self) -> &str {
        "tail: output the last part of files\n\
         Synopsis:\n  tail [-n N] [file]\n\
         Options:\n  -n N   Print the last N lines (default 10)\n\
         Notes:\n  Without a file, reads from standard input.\n\
         Examples:\n  tail -n 20 a.txt\n  cat a.txt | tail -n 2\n"
    }

    async fn execute(&self, mut ctx: Context<'_>) -> i32 {
        let parsed = match parse_line_args("tail", &mut ctx) {
            Ok(parsed) => parsed,
            Err(code) => return code,
        };
        let data = match read_input("tail", &mut ctx, parsed.file).await {
            Ok(data) => data,
            Err(code) => return code,
        };
        let mut window: VecDeque<&str> = VecDeque::with_capacity(parsed.count + 1);
        for line in data.lines() {
            window.push_back(line);
            if window.len() > parsed.count {
                window.pop_front();
            }
        }
        for line in window {
            ctx.out.push_str(line);
            ctx.out.push('\n');
        }
        0
    }
}
