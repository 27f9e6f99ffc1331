//! Snapshot of the process environment.
//!
//! Working directory and environment variables are read once, up front, and
//! passed explicitly to validation and assembly. Nothing downstream touches
//! `std::env` directly, which keeps assembly deterministic under test.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Variable holding the environment name (`development`, `production`, ...).
pub const ENVIRONMENT_VAR: &str = "NODE_ENV";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmbientEnv {
    cwd: PathBuf,
    vars: BTreeMap<String, String>,
}

impl AmbientEnv {
    /// Empty snapshot rooted at `cwd`.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            vars: BTreeMap::new(),
        }
    }

    /// Capture the current process working directory and environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn capture() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Ok(Self { cwd, vars })
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Environment name from `NODE_ENV`, if set and non-empty.
    pub fn environment_name(&self) -> Option<&str> {
        self.var(ENVIRONMENT_VAR).filter(|name| !name.is_empty())
    }

    /// All variable names, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.vars.keys().cloned().collect()
    }

    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_sorted() {
        let env = AmbientEnv::new("/project")
            .with_var("ZED", "1")
            .with_var("ALPHA", "2")
            .with_var("MIDDLE", "3");
        assert_eq!(env.keys(), vec!["ALPHA", "MIDDLE", "ZED"]);
    }

    #[test]
    fn empty_node_env_is_treated_as_unset() {
        let env = AmbientEnv::new("/project").with_var(ENVIRONMENT_VAR, "");
        assert_eq!(env.environment_name(), None);

        let env = env.with_var(ENVIRONMENT_VAR, "production");
        assert_eq!(env.environment_name(), Some("production"));
    }

    #[test]
    fn capture_reads_working_directory() {
        let env = AmbientEnv::capture().expect("capture");
        assert_eq!(env.cwd(), std::env::current_dir().unwrap());
    }
}
