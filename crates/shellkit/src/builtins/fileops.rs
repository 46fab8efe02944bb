//! File manipulation builtins: mkdir, touch, rm, cp, mv, chmod.

use async_trait::async_trait;
use std::path::PathBuf;

use super::{Command, Context};
use crate::execdb;

fn resolve_or_report(ctx: &mut Context<'_>, name: &str, input: &str) -> Option<PathBuf> {
    match ctx.fs.resolve_secure(ctx.cwd, input) {
        Ok(host) => Some(host),
        Err(e) => {
            ctx.out.push_str(&format!("{name}: {e}\n"));
            None
        }
    }
}

/// The mkdir builtin command.
pub struct Mkdir;

#[async_trait]
impl Command for Mkdir {
    fn name(&self) -> &str {
        "mkdir"
    }

    fn help(&self) -> &str {
        "mkdir: create directories\n\
         Synopsis:\n  mkdir [-p] <dir>\n\
         Options:\n  -p   Make parent directories as needed (no error if existing)\n\
         Examples:\n  mkdir demo\n  mkdir -p projects/demo/src\n"
    }

    async fn execute(&self, mut ctx: Context<'_>) -> i32 {
        let mut idx = 1;
        let recursive = ctx.args.get(idx).is_some_and(|a| a == "-p");
        if recursive {
            idx += 1;
        }
        let Some(target) = ctx.args.get(idx).cloned() else {
            ctx.out.push_str("mkdir: missing operand\n");
            return 2;
        };
        let Some(host) = resolve_or_report(&mut ctx, "mkdir", &target) else {
            return 1;
        };
        match ctx.fs.mkdir(&host, recursive).await {
            Ok(()) => 0,
            Err(e) => {
                ctx.out.push_str(&format!("mkdir: {e}\n"));
                1
            }
        }
    }
}

/// The touch builtin command.
pub struct Touch;

#[async_trait]
impl Command for Touch {
    fn name(&self) -> &str {
        "touch"
    }

    fn help(&self) -> &str {
        "touch: create file or update its timestamp\n\
         Synopsis:\n  touch <file>\n\
         Examples:\n  touch a.txt\n"
    }

    async fn execute(&self, mut ctx: Context<'_>) -> i32 {
        let Some(target) = ctx.args.get(1).cloned() else {
            ctx.out.push_str("touch: missing file\n");
            return 2;
        };
        let Some(host) = resolve_or_report(&mut ctx, "touch", &target) else {
            return 1;
        };
        match ctx.fs.touch(&host).await {
            Ok(()) => 0,
            Err(e) => {
                ctx.out.push_str(&format!("touch: {e}\n"));
                1
            }
        }
    }
}

/// The rm builtin command.
pub struct Rm;

#[async_trait]
impl Command for Rm {
    fn name(&self) -> &str {
        "rm"
    }

    fn help(&self) -> &str {
        "rm: remove files or directories\n\
         Synopsis:\n  rm [-r] <path>\n\
         Options:\n  -r   Remove directories and their contents recursively\n\
         Notes:\n  Non-recursive remove fails if <path> is a non-empty directory.\n\
         Examples:\n  rm file.txt\n  rm -r old_project\n"
    }

    async fn execute(&self, mut ctx: Context<'_>) -> i32 {
        let mut idx = 1;
        let recursive = ctx.args.get(idx).is_some_and(|a| a == "-r");
        if recursive {
            idx += 1;
        }
        let Some(target) = ctx.args.get(idx).cloned() else {
            ctx.out.push_str("rm: missing operand\n");
            return 2;
        };
        let Some(host) = resolve_or_report(&mut ctx, "rm", &target) else {
            return 1;
        };
        match ctx.fs.remove(&host, recursive).await {
            Ok(()) => 0,
            Err(e) => {
                ctx.out.push_str(&format!("rm: {e}\n"));
                1
            }
        }
    }
}

/// The cp builtin command.
pub struct Cp;

#[async_trait]
impl Command for Cp {
    fn name(&self) -> &str {
        "cp"
    }

    fn help(&self) -> &str {
        "cp: copy files and directories\n\
         Synopsis:\n  cp [-r] <src> <dst>\n\
         Options:\n  -r   Copy directories recursively\n\
         Notes:\n  Overwrites existing files.\n\
         Examples:\n  cp a.txt b.txt\n  cp -r dir1 dir2\n"
    }

    async fn execute(&self, mut ctx: Context<'_>) -> i32 {
        let mut idx = 1;
        let recursive = ctx.args.get(idx).is_some_and(|a| a == "-r");
        if recursive {
            idx += 1;
        }
        let (Some(src), Some(dst)) = (ctx.args.get(idx).cloned(), ctx.args.get(idx + 1).cloned())
        else {
            ctx.out.push_str("cp: missing operand\n");
            return 2;
        };
        let Some(src_host) = resolve_or_report(&mut ctx, "cp", &src) else {
            return 1;
        };
        let Some(dst_host) = resolve_or_report(&mut ctx, "cp", &dst) else {
            return 1;
        };
        match ctx.fs.copy(&src_host, &dst_host, recursive).await {
            Ok(()) => 0,
            Err(e) => {
                ctx.out.push_str(&format!("cp: {e}\n"));
                1
            }
        }
    }
}

/// The mv builtin command.
pub struct Mv;

#[async_trait]
impl Command for Mv {
    fn name(&self) -> &str {
        "mv"
    }

    fn help(&self) -> &str {
        "mv: move or rename files\n\
         Synopsis:\n  mv <src> <dst>\n\
         Notes:\n  Overwrites existing files.\n\
         Examples:\n  mv a.txt b.txt\n  mv dir1 dir2\n"
    }

    async fn execute(&self, mut ctx: Context<'_>) -> i32 {
        let (Some(src), Some(dst)) = (ctx.args.get(1).cloned(), ctx.args.get(2).cloned()) else {
            ctx.out.push_str("mv: missing operand\n");
            return 2;
        };
        let Some(src_host) = resolve_or_report(&mut ctx, "mv", &src) else {
            return 1;
        };
        let Some(dst_host) = resolve_or_report(&mut ctx, "mv", &dst) else {
            return 1;
        };
        match ctx.fs.rename(&src_host, &dst_host).await {
            Ok(()) => 0,
            Err(e) => {
                ctx.out.push_str(&format!("mv: {e}\n"));
                1
            }
        }
    }
}

/// The chmod builtin command; only the execute bit is tracked.
pub struct Chmod;

#[async_trait]
impl Command for Chmod {
    fn name(&self) -> &str {
        "chmod"
    }

    fn help(&self) -> &str {
        "chmod: set or clear execute permission\n\
         Synopsis:\n  chmod +x <path>\n  chmod -x <path>\n\
         Notes:\n  Only the execute bit is tracked.\n"
    }

    async fn execute(&self, mut ctx: Context<'_>) -> i32 {
        let (Some(flag), Some(target)) = (ctx.args.get(1).cloned(), ctx.args.get(2).cloned())
        else {
            ctx.out.push_str("chmod: usage: chmod [+x|-x] <path>\n");
            return 2;
        };
        if flag != "+x" && flag != "-x" {
            ctx.out.push_str("chmod: support only +x or -x\n");
            return 2;
        }
        let Some(host) = resolve_or_report(&mut ctx, "chmod", &target) else {
            return 1;
        };
        match ctx.fs.stat(&host).await {
            Ok(info) if info.is_dir => {
                ctx.out.push_str("chmod: not a file\n");
                return 2;
            }
            Ok(_) => {}
            Err(e) => {
                ctx.out.push_str(&format!("chmod: {e}\n"));
                return 1;
            }
        }
        match execdb::set(ctx.fs.as_ref(), &host, flag == "+x").await {
            Ok(_) => 0,
            Err(e) => {
                ctx.out.push_str(&format!("chmod: {e}\n"));
                1
            }
        }
    }
}
