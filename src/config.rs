//! Persistent settings, stored with confy under the `howdy-op` application name,
//! plus the environment overrides the host sets up for an op run.
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::client::BackendName;

pub const APP_NAME: &str = "howdy-op";

/// Port of the host SDK daemon, exported into the op's environment.
pub const SPEAK_PORT_VAR: &str = "SDK_SPEAK_PORT";
pub const BACKEND_VAR: &str = "HOWDY_OP_BACKEND";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Forces a backend. When unset the daemon is used if its port is known.
    pub backend: Option<BackendName>,
    pub daemon_host: String,
    /// Applies to track and print requests, never to prompts.
    pub timeout_secs: u64,
    #[serde(skip)]
    pub speak_port: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend: None,
            daemon_host: "127.0.0.1".to_owned(),
            timeout_secs: 5,
            speak_port: None,
        }
    }
}

impl Config {
    /// Reads the config file (creating it with defaults on first run) and applies
    /// environment overrides on top. An unreadable or unwritable config directory
    /// only costs the stored settings; the run continues on defaults.
    pub fn load_or_default() -> anyhow::Result<Self> {
        Config::stored_or_default(confy::load(APP_NAME, None))
            .with_env(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::load_or_default`] for an explicit file, without environment overrides.
    pub fn load_path_or_default(path: impl AsRef<Path>) -> Self {
        Config::stored_or_default(confy::load_path(path))
    }

    fn stored_or_default(stored: Result<Config, confy::ConfyError>) -> Self {
        stored.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "unable to use {APP_NAME} configuration file, falling back to defaults");
            Config::default()
        })
    }

    /// Defaults plus environment overrides, without touching the disk.
    pub fn from_env() -> anyhow::Result<Self> {
        Config::default().with_env(|key| std::env::var(key).ok())
    }

    pub fn with_env<F>(mut self, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(SPEAK_PORT_VAR).filter(|port| !port.trim().is_empty()) {
            self.speak_port = Some(port.trim().to_owned());
        }

        if let Some(name) = lookup(BACKEND_VAR).filter(|name| !name.trim().is_empty()) {
            let backend = BackendName::from_str(name.trim()).with_context(|| {
                format!("{BACKEND_VAR} must be one of 'daemon' or 'terminal', got '{name}'")
            })?;
            self.backend = Some(backend);
        }

        Ok(self)
    }

    pub fn resolve_backend(&self) -> BackendName {
        match self.backend {
            Some(backend) => backend,
            None if self.speak_port.is_some() => BackendName::Daemon,
            None => BackendName::Terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_resolve_to_terminal() {
        let config = Config::default().with_env(env(&[])).unwrap();
        assert_eq!(config.speak_port, None);
        assert_eq!(config.resolve_backend(), BackendName::Terminal);
    }

    #[test]
    fn test_speak_port_selects_daemon() {
        let config = Config::default()
            .with_env(env(&[(SPEAK_PORT_VAR, "4242")]))
            .unwrap();
        assert_eq!(config.speak_port.as_deref(), Some("4242"));
        assert_eq!(config.resolve_backend(), BackendName::Daemon);
    }

    #[test]
    fn test_blank_speak_port_is_ignored() {
        let config = Config::default()
            .with_env(env(&[(SPEAK_PORT_VAR, "  ")]))
            .unwrap();
        assert_eq!(config.resolve_backend(), BackendName::Terminal);
    }

    #[test]
    fn test_explicit_backend_wins_over_port() {
        let config = Config::default()
            .with_env(env(&[(SPEAK_PORT_VAR, "4242"), (BACKEND_VAR, "terminal")]))
            .unwrap();
        assert_eq!(config.resolve_backend(), BackendName::Terminal);
    }

    #[test]
    fn test_invalid_backend_name() {
        let result = Config::default().with_env(env(&[(BACKEND_VAR, "carrier-pigeon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("howdy-op.toml");

        let config = Config {
            backend: Some(BackendName::Daemon),
            daemon_host: "10.0.0.7".to_owned(),
            timeout_secs: 12,
            speak_port: Some("9999".to_owned()),
        };
        confy::store_path(&path, &config).unwrap();

        let loaded: Config = confy::load_path(&path).unwrap();
        assert_eq!(loaded.backend, Some(BackendName::Daemon));
        assert_eq!(loaded.daemon_host, "10.0.0.7");
        assert_eq!(loaded.timeout_secs, 12);
        // the port belongs to a single run and is never written out
        assert_eq!(loaded.speak_port, None);
    }

    #[test]
    fn test_unusable_config_path_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("plain-file");
        std::fs::write(&not_a_dir, "").unwrap();

        // the parent of the config file is a regular file, so confy can neither read nor create it
        let loaded = Config::load_path_or_default(not_a_dir.join("howdy-op.toml"));
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_load_path_or_default_reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("howdy-op.toml");
        std::fs::write(&path, "daemon_host = \"10.1.2.3\"\n").unwrap();

        let loaded = Config::load_path_or_default(&path);
        assert_eq!(loaded.daemon_host, "10.1.2.3");
        assert_eq!(loaded.timeout_secs, 5);
    }

    #[test]
    fn test_partial_config_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("howdy-op.toml");
        std::fs::write(&path, "timeout_secs = 30\n").unwrap();

        let loaded: Config = confy::load_path(&path).unwrap();
        assert_eq!(loaded.timeout_secs, 30);
        assert_eq!(loaded.daemon_host, "127.0.0.1");
        assert_eq!(loaded.backend, None);
    }
}
