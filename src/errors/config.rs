// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use thiserror::Error;

/// Errors loading router configuration or installing the log subscriber.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported config format for {} (expected .yaml, .yml or .toml)", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("cannot install log subscriber: {0}")]
    Logging(String),
}
