//! ls and find builtin commands

use async_trait::async_trait;
use std::path::PathBuf;

use super::{Command, Context};

/// The ls builtin command.
pub struct Ls;

#[async_trait]
impl Command for Ls {
    fn name(&self) -> &str {
        "ls"
    }

    fn help(&self) -> &str {
        "ls: list directory contents\n\
         Synopsis:\n  ls [-l] [-a] [path]\n\
         Options:\n  -l   Use a long listing format (type/size/name)\n  -a   Include entries starting with '.'\n\
         Notes:\n  Only a single [path] is supported.\n\
         Examples:\n  ls\n  ls -la /etc\n"
    }

    async fn execute(&self, ctx: Context<'_>) -> i32 {
        let mut long = false;
        let mut all = false;
        let mut target = ".".to_string();
        for arg in &ctx.args[1..] {
            if let Some(flags) = arg.strip_prefix('-').filter(|f| !f.is_empty()) {
                for flag in flags.chars() {
                    match flag {
                        'l' => long = true,
                        'a' => all = true,
                        other => {
                            ctx.out.push_str(&format!("ls: unknown option -{other}\n"));
                            return 2;
                        }
                    }
                }
            } else {
                target = arg.clone();
            }
        }
        let host = match ctx.fs.resolve_secure(ctx.cwd, &target) {
            Ok(host) => host,
            Err(e) => {
                ctx.out.push_str(&format!("ls: {e}\n"));
                return 1;
            }
        };
        let entries = match ctx.fs.list(&host).await {
            Ok(entries) => entries,
            Err(e) => {
                ctx.out.push_str(&format!("ls: {e}\n"));
                return 1;
            }
        };
        for entry in entries {
            if !all && entry.name.starts_with('.') {
                continue;
            }
            if long {
                let kind = if entry.is_dir { 'd' } else { '-' };
                ctx.out
                    .push_str(&format!("{kind} {} {}\n", entry.size, entry.name));
            } else if entry.is_dir {
                ctx.out.push_str(&format!("{}/\n", entry.name));
            } else {
                ctx.out.push_str(&format!("{}\n", entry.name));
            }
        }
        0
    }
}

/// Minimal glob match supporting `*` and `?` only.
pub(crate) fn match_glob(name: &str, pattern: &str) -> bool {
    let name: Vec<char> = name.chars().collect();
    let pat: Vec<char> = pattern.chars().collect();
    let (mut n, mut p) = (0usize, 0usize);
    let mut star: Option<usize> = None;
    let mut mark = 0usize;
    while n < name.len() {
        if p < pat.len() && (pat[p] == '?' || pat[p] == name[n]) {
            n += 1;
            p += 1;
        } else if p < pat.len() && pat[p] == '*' {
            star = Some(p);
            p += 1;
            mark = n;
        } else if let Some(s) = star {
            p = s + 1;
            mark += 1;
            n = mark;
        } else {
            return false;
        }
    }
    while p < pat.len() && pat[p] == '*' {
        p += 1;
    }
    p == pat.len()
}

#[derive(Clone, Copy, PartialEq)]
enum SizeMode {
    Less,
    Exact,
    Greater,
}

struct FindFilter {
    name_pat: Option<String>,
    type_filter: Option<char>,
    size_filter: Option<(SizeMode, u64)>,
}

impl FindFilter {
    fn matches(&self, name: &str, is_dir: bool, size: u64) -> bool {
        if self.type_filter == Some('d') && !is_dir {
            return false;
        }
        if self.type_filter == Some('f') && is_dir {
            return false;
        }
        if let Some(pat) = &self.name_pat {
            if !match_glob(name, pat) {
                return false;
            }
        }
        if let Some((mode, want)) = self.size_filter {
            if !is_dir {
                let ok = match mode {
                    SizeMode::Less => size < want,
                    SizeMode::Exact => size == want,
                    SizeMode::Greater => size > want,
                };
                if !ok {
                    return false;
                }
            }
        }
        true
    }
}

/// The find builtin command.
pub struct Find;

#[async_trait]
impl Command for Find {
    fn name(&self) -> &str {
        "find"
    }

    fn help(&self) -> &str {
        "find: search for files in a directory hierarchy\n\
         Synopsis:\n  find <path> [-name PAT] [-type f|d] [-size +N|-N|N] [-maxdepth D]\n\
         Options:\n  -name PAT     Filter by glob pattern on basename (* and ? supported)\n  \
         -type f|d     Filter by type: f=file, d=directory\n  \
         -size +/-N|N  File size in bytes: + greater than, - less than, exact otherwise\n  \
         -maxdepth D   Descend at most D levels (0 means only the start path)\n\
         Examples:\n  find . -name \"*.txt\" -maxdepth 1\n  find /projects -type f -size +1024\n"
    }

    async fn execute(&self, ctx: Context<'_>) -> i32 {
        let mut start = ".".to_string();
        let mut filter = FindFilter {
            name_pat: None,
            type_filter: None,
            size_filter: None,
        };
        let mut maxdepth = usize::MAX;

        let mut i = 1;
        if ctx.args.get(i).is_some_and(|a| !a.starts_with('-')) {
            start = ctx.args[i].clone();
            i += 1;
        }
        while i < ctx.args.len() {
            let arg = &ctx.args[i];
            let value = ctx.args.get(i + 1);
            match (arg.as_str(), value) {
                ("-name", Some(pat)) => {
                    filter.name_pat = Some(pat.clone());
                    i += 2;
                }
                ("-type", Some(t)) if t == "f" || t == "d" => {
                    filter.type_filter = t.chars().next();
                    i += 2;
                }
                ("-size", Some(spec)) => {
                    let (mode, digits) = match spec.as_bytes().first() {
                        Some(b'+') => (SizeMode::Greater, &spec[1..]),
                        Some(b'-') => (SizeMode::Less, &spec[1..]),
                        _ => (SizeMode::Exact, spec.as_str()),
                    };
                    match digits.parse() {
                        Ok(n) => filter.size_filter = Some((mode, n)),
                        Err(_) => {
                            ctx.out
                                .push_str(&format!("find: unknown or malformed option: {spec}\n"));
                            return 2;
                        }
                    }
                    i += 2;
                }
                ("-maxdepth", Some(d)) => {
                    match d.parse() {
                        Ok(n) => maxdepth = n,
                        Err(_) => {
                            ctx.out
                                .push_str(&format!("find: unknown or malformed option: {d}\n"));
                            return 2;
                        }
                    }
                    i += 2;
                }
                _ => {
                    ctx.out
                        .push_str(&format!("find: unknown or malformed option: {arg}\n"));
                    return 2;
                }
            }
        }

        let start_host = match ctx.fs.resolve_secure(ctx.cwd, &start) {
            Ok(host) => host,
            Err(e) => {
                ctx.out.push_str(&format!("find: {e}\n"));
                return 1;
            }
        };
        let start_stat = match ctx.fs.stat(&start_host).await {
            Ok(info) => info,
            Err(_) => {
                ctx.out.push_str("find: cannot access start path\n");
                return 1;
            }
        };

        let print = |out: &mut String, virt: &str| {
            out.push_str(virt);
            out.push('\n');
        };

        let start_virt = match ctx.fs.virtual_path(&start_host) {
            Ok(virt) => virt,
            Err(e) => {
                ctx.out.push_str(&format!("find: {e}\n"));
                return 1;
            }
        };
        if filter.matches(&start_stat.name, start_stat.is_dir, start_stat.size) {
            print(ctx.out, &start_virt);
        }
        if !start_stat.is_dir {
            return 0;
        }

        // Depth-first walk with an explicit stack. A directory popped at
        // maxdepth is not listed: its children would sit one level deeper.
        let mut stack: Vec<(PathBuf, usize)> = vec![(start_host, 0)];
        while let Some((dir, depth)) = stack.pop() {
            if depth >= maxdepth {
                continue;
            }
            let entries = match ctx.fs.list(&dir).await {
                Ok(entries) => entries,
                Err(_) => continue,
            };
            for entry in entries {
                let child = dir.join(&entry.name);
                if filter.matches(&entry.name, entry.is_dir, entry.size) {
                    if let Ok(virt) = ctx.fs.virtual_path(&child) {
                        print(ctx.out, &virt);
                    }
                }
                if entry.is_dir && depth + 1 <= maxdepth {
                    stack.push((child, depth + 1));
                }
            }
        }
        0
    }
}
