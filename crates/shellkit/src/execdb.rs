//! Execute-permission database.
//!
//! A newline-separated set of canonical host paths stored at `/etc/execdb`
//! inside the sandbox. Scripts invoked by path must be listed here; `chmod
//! +x` / `chmod -x` rewrite the set. A missing or unreadable database
//! reads as empty, which means "not executable", never an error.

use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;
use crate::fs::FileStore;

const DB_PATH: &str = "/etc/execdb";

/// Load the execute-permission set.
pub async fn load(fs: &dyn FileStore) -> HashSet<String> {
    let mut entries = HashSet::new();
    let Ok(host) = fs.resolve_secure("/", DB_PATH) else {
        return entries;
    };
    let Ok(data) = fs.read_file(&host).await else {
        return entries;
    };
    for line in data.lines() {
        let line = line.trim();
        if !line.is_empty() {
            entries.insert(line.to_string());
        }
    }
    entries
}

/// Persist the execute-permission set.
pub async fn save(fs: &dyn FileStore, entries: &HashSet<String>) -> Result<()> {
    let mut sorted: Vec<&String> = entries.iter().collect();
    sorted.sort();
    let mut data = String::new();
    for entry in sorted {
        data.push_str(entry);
        data.push('\n');
    }
    let host = fs.resolve_secure("/", DB_PATH)?;
    fs.write_file(&host, &data, false).await
}

/// True if the host path is marked executable.
pub async fn contains(fs: &dyn FileStore, host_path: &Path) -> bool {
    load(fs).await.contains(&host_path.to_string_lossy().into_owned())
}

/// Enable or disable execute permission for a host path.
///
/// Returns whether the set changed.
pub async fn set(fs: &dyn FileStore, host_path: &Path, enable: bool) -> Result<bool> {
    let mut db = load(fs).await;
    let key = host_path.to_string_lossy().into_owned();
    let changed = if enable {
        db.insert(key)
    } else {
        db.remove(&key)
    };
    if changed {
        save(fs, &db).await?;
    }
    Ok(changed)
}
