//! Shell environment: ordered key/value string store.
//!
//! Carries ordinary variables alongside the special entries the engine
//! maintains itself: `?` (last exit code) and the positional parameters
//! `0`, `#`, `1..N` seeded when a script is invoked by path. Scripts run
//! with a clone of the caller's environment; `source` reuses it live.

use std::collections::HashMap;

/// Key/value string store for shell variables.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Create an empty environment with `?` initialized to `0`.
    pub fn new() -> Self {
        let mut env = Self::default();
        env.set("?", "0");
        env
    }

    /// Look up a variable. Undefined names return `None`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Value of a variable, empty string when unset.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// Set a variable, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Remove a variable if present.
    pub fn unset(&mut self, key: &str) {
        self.vars.remove(key);
    }

    /// All variables sorted by name.
    pub fn list(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        out.sort();
        out
    }

    /// Record the exit code of the last executed line in `?`.
    pub fn set_exit_code(&mut self, code: i32) {
        self.set("?", code.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_unset() {
        let mut env = Environment::new();
        assert_eq!(env.get("USER"), None);
        env.set("USER", "alice");
        assert_eq!(env.get("USER"), Some("alice"));
        env.unset("USER");
        assert_eq!(env.value("USER"), "");
    }

    #[test]
    fn test_exit_code_starts_at_zero() {
        let env = Environment::new();
        assert_eq!(env.value("?"), "0");
    }

    #[test]
    fn test_list_sorted() {
        let mut env = Environment::default();
        env.set("B", "2");
        env.set("A", "1");
        let list = env.list();
        assert_eq!(list[0].0, "A");
        assert_eq!(list[1].0, "B");
    }
}
