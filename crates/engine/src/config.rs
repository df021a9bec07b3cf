//! Local engine configuration.

use std::num::NonZeroUsize;

use crate::error::EngineError;

/// Environment variable overriding the worker count.
pub const WORKERS_ENV: &str = "DISTCAST_WORKERS";
/// Environment variable naming the engine (used as a thread-name prefix and in logs).
pub const ENGINE_NAME_ENV: &str = "DISTCAST_ENGINE_NAME";

/// Local engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Fixed worker count; `None` means "ask the host".
    pub workers: Option<NonZeroUsize>,
    /// Name for logging and worker threads.
    pub name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: None,
            name: "local".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn with_workers(mut self, workers: NonZeroUsize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup` (unset variables keep their defaults).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(WORKERS_ENV) {
            let workers = raw
                .trim()
                .parse::<NonZeroUsize>()
                .map_err(|e| EngineError::config(format!("{WORKERS_ENV}={raw:?}: {e}")))?;
            config.workers = Some(workers);
        }

        if let Some(name) = lookup(ENGINE_NAME_ENV).filter(|n| !n.trim().is_empty()) {
            config.name = name.trim().to_string();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_environment_keeps_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn worker_override_is_parsed() {
        let config = EngineConfig::from_lookup(lookup(&[(WORKERS_ENV, " 6 "), (ENGINE_NAME_ENV, "batch")]))
            .unwrap();
        assert_eq!(config.workers.map(NonZeroUsize::get), Some(6));
        assert_eq!(config.name, "batch");
    }

    #[test]
    fn zero_workers_is_a_config_error() {
        let err = EngineConfig::from_lookup(lookup(&[(WORKERS_ENV, "0")])).unwrap_err();
        assert!(matches!(err, EngineError::Config(msg) if msg.contains(WORKERS_ENV)));
    }

    #[test]
    fn garbage_workers_is_a_config_error() {
        assert!(EngineConfig::from_lookup(lookup(&[(WORKERS_ENV, "many")])).is_err());
    }
}
