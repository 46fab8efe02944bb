//! grep builtin command

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{Command, Context};
use crate::fs::FileStore;

/// The grep builtin command.
pub struct Grep;

struct Options {
    line_numbers: bool,
    ignore_case: bool,
    recursive: bool,
}

fn search_lines(data: &str, pattern: &str, opts: &Options, prefix: Option<&str>, out: &mut String) {
    for (idx, line) in data.lines().enumerate() {
        let hay = if opts.ignore_case {
            line.to_lowercase()
        } else {
            line.to_string()
        };
        if hay.contains(pattern) {
            if let Some(prefix) = prefix {
                out.push_str(prefix);
                out.push(':');
            }
            if opts.line_numbers {
                out.push_str(&format!("{}:", idx + 1));
            }
            out.push_str(line);
            out.push('\n');
        }
    }
}

async fn search_file(
    fs: &dyn FileStore,
    host: &Path,
    pattern: &str,
    opts: &Options,
    with_prefix: bool,
    out: &mut String,
) {
    match fs.read_file(host).await {
        Ok(data) => {
            // File names are shown only when more than one file can match,
            // as with a recursive walk or several operands.
            let prefix = if with_prefix {
                Some(fs.virtual_path(host).unwrap_or_default())
            } else {
                None
            };
            search_lines(&data, pattern, opts, prefix.as_deref(), out);
        }
        Err(e) => out.push_str(&format!("grep: {e}\n")),
    }
}

#[async_trait]
impl Command for Grep {
    fn name(&self) -> &str {
        "grep"
    }

    fn help(&self) -> &str {
        "grep: print lines matching a pattern\n\
         Synopsis:\n  grep [-n] [-i] [-r] PATTERN [path]\n\
         Options:\n  -n   Prefix each line with line number\n  -i   Ignore case distinctions\n  \
         -r   Read all files under each directory, recursively\n\
         Notes:\n  Without a path, reads from standard input. Matching is plain substring.\n\
         Examples:\n  grep -n error app.log\n  grep -ri todo /projects\n"
    }

    async fn execute(&self, ctx: Context<'_>) -> i32 {
        let mut opts = Options {
            line_numbers: false,
            ignore_case: false,
            recursive: false,
        };
        let mut pattern = String::new();
        let mut paths: Vec<String> = Vec::new();
        for arg in &ctx.args[1..] {
            // Flags may be clustered (-ri); anything after PATTERN is a path.
            if pattern.is_empty()
                && let Some(flags) = arg.strip_prefix('-').filter(|f| !f.is_empty())
            {
                for flag in flags.chars() {
                    match flag {
                        'n' => opts.line_numbers = true,
                        'i' => opts.ignore_case = true,
                        'r' => opts.recursive = true,
                        other => {
                            ctx.out.push_str(&format!("grep: unknown option -{other}\n"));
                            return 2;
                        }
                    }
                }
            } else if pattern.is_empty() {
                pattern = arg.clone();
            } else {
                paths.push(arg.clone());
            }
        }
        if pattern.is_empty() {
            ctx.out.push_str("grep: missing PATTERN\n");
            return 2;
        }
        if opts.ignore_case {
            pattern = pattern.to_lowercase();
        }

        if paths.is_empty() {
            search_lines(ctx.stdin.unwrap_or(""), &pattern, &opts, None, ctx.out);
            return 0;
        }

        let fs = ctx.fs.clone();
        let with_prefix = opts.recursive || paths.len() > 1;
        for path in &paths {
            let host = match fs.resolve_secure(ctx.cwd, path) {
                Ok(host) => host,
                Err(e) => {
                    ctx.out.push_str(&format!("grep: {e}\n"));
                    continue;
                }
            };
            let stat = match fs.stat(&host).await {
                Ok(info) => info,
                Err(_) => {
                    ctx.out.push_str(&format!("grep: cannot access: {path}\n"));
                    continue;
                }
            };
            if !stat.is_dir {
                search_file(fs.as_ref(), &host, &pattern, &opts, with_prefix, ctx.out).await;
                continue;
            }
            if !opts.recursive {
                ctx.out
                    .push_str(&format!("grep: {path}: Is a directory (use -r)\n"));
                continue;
            }
            let mut stack: Vec<PathBuf> = vec![host];
            while let Some(dir) = stack.pop() {
                let entries = match fs.list(&dir).await {
                    Ok(entries) => entries,
                    Err(_) => continue,
                };
                for entry in entries {
                    let child = dir.join(&entry.name);
                    if entry.is_dir {
                        stack.push(child);
                    } else {
                        search_file(fs.as_ref(), &child, &pattern, &opts, true, ctx.out).await;
                    }
                }
            }
        }
        0
    }
}
