use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub use relay_chunker::limits::{DEFAULT_MAX_LINES, DEFAULT_MAX_PARAGRAPHS};
pub const DEFAULT_MAX_BATCH: usize = 10;

/// Top-level config (relay.toml + RELAY_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub split: SplitConfig,
    #[serde(default)]
    pub hooks: HooksConfig,
}

/// Outbound reply splitting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SplitConfig {
    /// When false, reply payloads (and `relay-split split` input) go out whole.
    /// Override with env var: RELAY_SPLIT__ENABLED=false
    #[serde(default = "bool_true")]
    pub enabled: bool,
    /// Line budget per outbound message. Blank-line separators are not counted.
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
    /// Paragraph (chunk) budget per outbound message.
    #[serde(default = "default_max_paragraphs")]
    pub max_paragraphs: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_lines: DEFAULT_MAX_LINES,
            max_paragraphs: DEFAULT_MAX_PARAGRAPHS,
        }
    }
}

/// Inbound hook + batching.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HooksConfig {
    /// Explicit hook manifest path. Falls back to RELAY_HOOK_PATH, then
    /// ~/.relay/hooks/inbound/hook.toml.
    pub path: Option<String>,
    /// Quiet period before a sender's buffered messages are flushed.
    /// 0 disables batching entirely.
    #[serde(default)]
    pub debounce_ms: u64,
    /// Flush early once this many messages are buffered for one sender.
    #[serde(default = "default_max_batch")]
    pub max_batch: usize,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            path: None,
            debounce_ms: 0,
            max_batch: DEFAULT_MAX_BATCH,
        }
    }
}

fn bool_true() -> bool {
    true
}
fn default_max_lines() -> usize {
    DEFAULT_MAX_LINES
}
fn default_max_paragraphs() -> usize {
    DEFAULT_MAX_PARAGRAPHS
}
fn default_max_batch() -> usize {
    DEFAULT_MAX_BATCH
}

impl RelayConfig {
    /// Load config from a TOML file with RELAY_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.relay/relay.toml
    ///
    /// A missing file is not an error; every field has a default.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: RelayConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("RELAY_").split("__"))
            .extract()
            .map_err(|e| crate::error::RelayError::Config(e.to_string()))?;

        tracing::debug!(path = %path, "relay config loaded");
        Ok(config)
    }
}

/// `$HOME/.relay`, or `./.relay` when HOME is unset.
pub fn relay_home() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.relay", home)
}

fn default_config_path() -> String {
    format!("{}/relay.toml", relay_home())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let config = RelayConfig::load(Some("does-not-exist.toml"))
                .map_err(|e| e.to_string())?;
            assert!(config.split.enabled);
            assert_eq!(config.split.max_lines, 20);
            assert_eq!(config.split.max_paragraphs, 4);
            assert_eq!(config.hooks.debounce_ms, 0);
            assert_eq!(config.hooks.max_batch, DEFAULT_MAX_BATCH);
            Ok(())
        });
    }

    #[test]
    fn split_defaults_match_chunker_limits() {
        let split = SplitConfig::default();
        let limits = relay_chunker::Limits::default();
        assert_eq!(split.max_lines, limits.max_lines);
        assert_eq!(split.max_paragraphs, limits.max_paragraphs);
    }

    #[test]
    fn file_values_are_read() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "relay.toml",
                r#"
                [split]
                max_lines = 8

                [hooks]
                path = "/tmp/hook.toml"
                debounce_ms = 1500
                "#,
            )?;
            let config = RelayConfig::load(Some("relay.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.split.max_lines, 8);
            // unset fields keep their defaults
            assert_eq!(config.split.max_paragraphs, 4);
            assert_eq!(config.hooks.path.as_deref(), Some("/tmp/hook.toml"));
            assert_eq!(config.hooks.debounce_ms, 1500);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("relay.toml", "[split]\nmax_paragraphs = 2\n")?;
            jail.set_env("RELAY_SPLIT__MAX_PARAGRAPHS", "7");
            jail.set_env("RELAY_SPLIT__ENABLED", "false");
            let config = RelayConfig::load(Some("relay.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.split.max_paragraphs, 7);
            assert!(!config.split.enabled);
            Ok(())
        });
    }

    #[test]
    fn malformed_file_is_config_error() {
        Jail::expect_with(|jail| {
            jail.create_file("relay.toml", "[split]\nmax_lines = \"many\"\n")?;
            let err = RelayConfig::load(Some("relay.toml")).unwrap_err();
            assert_eq!(err.code(), "CONFIG_ERROR");
            Ok(())
        });
    }
}
