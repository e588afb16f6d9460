// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::DEFAULT_LOG_LEVEL;
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Router-wide configuration.
///
/// Every field is optional; an empty file yields the permissive defaults.
///
/// # Fields
/// * `matching` - How the schema matcher treats events accepted by several workflows
/// * `root_handler_policy` - What happens when a second root exception handler is registered
/// * `logging` - Log subscriber settings used by `observability::init_tracing`
///
/// # Example
/// ```yaml
/// matching: strict
/// root_handler_policy: reject
/// logging:
///   level: debug
///   format: pretty
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct RouterConfig {
    #[serde(default)]
    pub matching: MatchMode,
    #[serde(default)]
    pub root_handler_policy: RootHandlerPolicy,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RouterConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // serde_yaml reads an empty document as null rather than an empty map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Policy for events that more than one workflow schema accepts.
///
/// # Variants
/// * `FirstMatch` - The earliest registered workflow wins (default)
/// * `Strict` - Ambiguity is an error, both at registration and at dispatch
#[derive(Debug, Default, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    FirstMatch,
    Strict,
}

/// Policy for registering a root exception handler when one already exists.
///
/// # Variants
/// * `Overwrite` - The new handler replaces the old one (default)
/// * `Reject` - Registration fails
#[derive(Debug, Default, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum RootHandlerPolicy {
    #[default]
    Overwrite,
    Reject,
}

/// Log output settings.
///
/// # Fields
/// * `level` - Filter directive such as `info` or `event_router=debug` (defaults to `info`)
/// * `format` - Line format (defaults to `full`)
/// * `with_target` - Include the module path in each line (defaults to `true`)
#[derive(Debug, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_with_target")]
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            with_target: default_with_target(),
        }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_with_target() -> bool {
    true
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Pretty,
}

/// Load a config from a YAML (`.yaml`, `.yml`) or TOML (`.toml`) file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RouterConfig, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let parse: fn(&str) -> Result<RouterConfig, ConfigError> = match extension.as_deref() {
        Some("yaml") | Some("yml") => RouterConfig::from_yaml_str,
        Some("toml") => RouterConfig::from_toml_str,
        _ => {
            return Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content)
}
