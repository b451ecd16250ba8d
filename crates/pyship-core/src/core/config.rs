use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalOptions {
    pub quiet: bool,
    pub verbose: u8,
    pub trace: bool,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub(crate) fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub(crate) fn flag_is_enabled(&self, key: &str) -> bool {
        matches!(self.vars.get(key).map(String::as_str), Some("1"))
    }

    pub(crate) fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    #[cfg(test)]
    pub(crate) fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

#[derive(Debug)]
pub struct Config {
    pub(crate) network: NetworkConfig,
    pub(crate) publish: PublishConfig,
    pub(crate) toolchain: ToolchainConfig,
}

impl Config {
    pub(crate) fn from_snapshot(snapshot: &EnvSnapshot) -> Self {
        Self {
            network: NetworkConfig {
                // Uploads are opt-in; anything but an explicit truthy value
                // keeps pyship offline.
                online: match snapshot.var("PYSHIP_ONLINE") {
                    Some(value) => {
                        let lowered = value.to_ascii_lowercase();
                        matches!(lowered.as_str(), "1" | "true" | "yes" | "on")
                    }
                    None => false,
                },
            },
            publish: PublishConfig {
                assume_yes: snapshot.flag_is_enabled("PYSHIP_YES"),
            },
            toolchain: ToolchainConfig {
                python: snapshot
                    .var("PYSHIP_PYTHON")
                    .filter(|value| !value.trim().is_empty())
                    .unwrap_or("python3")
                    .to_string(),
                twine: snapshot
                    .var("PYSHIP_TWINE")
                    .filter(|value| !value.trim().is_empty())
                    .unwrap_or("twine")
                    .to_string(),
            },
        }
    }

    #[must_use]
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    #[must_use]
    pub fn publish(&self) -> &PublishConfig {
        &self.publish
    }

    #[must_use]
    pub fn toolchain(&self) -> &ToolchainConfig {
        &self.toolchain
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NetworkConfig {
    pub online: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct PublishConfig {
    pub assume_yes: bool,
}

#[derive(Debug, Clone)]
pub struct ToolchainConfig {
    pub python: String,
    pub twine: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pyship_online_requires_explicit_truthy_value() {
        let snapshot = EnvSnapshot::testing(&[]);
        let config = Config::from_snapshot(&snapshot);
        assert!(!config.network().online);

        let snapshot = EnvSnapshot::testing(&[("PYSHIP_ONLINE", "0")]);
        let config = Config::from_snapshot(&snapshot);
        assert!(!config.network().online);

        let snapshot = EnvSnapshot::testing(&[("PYSHIP_ONLINE", "1")]);
        let config = Config::from_snapshot(&snapshot);
        assert!(config.network().online);

        let snapshot = EnvSnapshot::testing(&[("PYSHIP_ONLINE", "yes")]);
        let config = Config::from_snapshot(&snapshot);
        assert!(config.network().online);
    }

    #[test]
    fn toolchain_overrides_fall_back_to_defaults() {
        let snapshot = EnvSnapshot::testing(&[("PYSHIP_PYTHON", "  ")]);
        let config = Config::from_snapshot(&snapshot);
        assert_eq!(config.toolchain().python, "python3");
        assert_eq!(config.toolchain().twine, "twine");

        let snapshot = EnvSnapshot::testing(&[
            ("PYSHIP_PYTHON", "/opt/python/bin/python"),
            ("PYSHIP_TWINE", "/opt/python/bin/twine"),
        ]);
        let config = Config::from_snapshot(&snapshot);
        assert_eq!(config.toolchain().python, "/opt/python/bin/python");
        assert_eq!(config.toolchain().twine, "/opt/python/bin/twine");
    }

    #[test]
    fn assume_yes_flag_reads_pyship_yes() {
        let snapshot = EnvSnapshot::testing(&[("PYSHIP_YES", "1")]);
        assert!(Config::from_snapshot(&snapshot).publish().assume_yes);

        let snapshot = EnvSnapshot::testing(&[("PYSHIP_YES", "true")]);
        assert!(!Config::from_snapshot(&snapshot).publish().assume_yes);
    }
}
