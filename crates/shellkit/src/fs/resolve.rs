//! Secure path resolution.
//!
//! Maps (sandbox root, virtual cwd, user input) onto a host path that is
//! guaranteed to lie inside the root. The input is first normalized in the
//! virtual namespace, where `..` clamps at the virtual `/` (so `/../../x`
//! collapses to `/x` instead of escaping), then re-rooted onto the host
//! root and canonicalized without requiring the target to exist.
//!
//! Containment is checked component-wise with [`Path::starts_with`], so a
//! sibling whose name merely extends the root's name (`/a/b` vs `/a/bc`)
//! is rejected; a raw string-prefix comparison would accept it.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Normalize `input` against `cwd` in the virtual namespace.
///
/// Returns an absolute virtual path (`/`-rooted, `/`-separated) with all
/// `.` and `..` components resolved; `..` never climbs above `/`.
pub(crate) fn normalize_virtual(cwd: &str, input: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if !input.starts_with('/') {
        for part in cwd.split('/') {
            apply_part(&mut parts, part);
        }
    }
    for part in input.split('/') {
        apply_part(&mut parts, part);
    }
    let mut out = String::from("/");
    out.push_str(&parts.join("/"));
    out
}

fn apply_part<'a>(parts: &mut Vec<&'a str>, part: &'a str) {
    match part {
        "" | "." => {}
        ".." => {
            parts.pop();
        }
        other => parts.push(other),
    }
}

/// Canonicalize a path without requiring it to exist: the longest existing
/// prefix is resolved through the real filesystem (following symlinks),
/// and the non-existing remainder is appended as-is.
fn weakly_canonicalize(path: &Path) -> PathBuf {
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => weakly_canonicalize(parent).join(name),
        _ => lexical_normal(path),
    }
}

fn lexical_normal(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::RootDir => out.push("/"),
            Component::Normal(name) => out.push(name),
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir | Component::Prefix(_) => {}
        }
    }
    if out.as_os_str().is_empty() {
        out.push("/");
    }
    out
}

/// Resolve a user-supplied path to a contained host path.
pub fn resolve_secure(root: &Path, cwd: &str, input: &str) -> Result<PathBuf> {
    let virt = normalize_virtual(cwd, input);
    let host = root.join(virt.trim_start_matches('/'));
    let host = weakly_canonicalize(&host);
    let root = weakly_canonicalize(root);
    if !host.starts_with(&root) {
        tracing::debug!(input, %virt, "path escapes sandbox root");
        return Err(Error::Sandbox);
    }
    Ok(host)
}

/// Map a resolved host path back to its virtual form.
pub fn virtual_path(root: &Path, host: &Path) -> Result<String> {
    let root = weakly_canonicalize(root);
    let host = weakly_canonicalize(host);
    let rel = host.strip_prefix(&root).map_err(|_| Error::Sandbox)?;
    let mut out = String::from("/");
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    out.push_str(&parts.join("/"));
    Ok(out)
}
