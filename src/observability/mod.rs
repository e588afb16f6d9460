// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! All diagnostic output from the router goes through the message types in
//! [`messages`]. Message types follow a struct-based pattern with a `Display`
//! implementation and a [`messages::StructuredLog`] implementation to:
//!
//! * Keep magic strings out of engine code
//! * Attach the same structured fields to every occurrence of an event
//! * Choose the log level in one place per event
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::router` - workflow selection and root exception handling
//! * `messages::pipeline` - workflow runs and step progress
//! * `messages::registry` - dependency registration and resolution
//!
//! Each workflow run is wrapped in a `workflow_run` span, so step-level lines
//! carry the workflow name even under concurrent invocations.
//!
//! # Usage
//!
//! ```rust
//! use event_router::observability::messages::pipeline::PipelineEndedEarly;
//! use event_router::observability::messages::StructuredLog;
//!
//! let msg = PipelineEndedEarly {
//!     workflow: "sharpen_pencils",
//!     ended_by: "check_supply",
//!     skipped: 3,
//! };
//!
//! msg.log();
//! ```

pub mod messages;

use tracing_subscriber::EnvFilter;

use crate::config::consts::LOG_FILTER_ENV;
use crate::config::{LogFormat, LoggingConfig};
use crate::errors::ConfigError;

/// Install the global `tracing` subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from `config.level`.
/// Fails if the level is not a valid filter directive or a subscriber is
/// already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ConfigError::Logging(format!("invalid log level '{}': {}", config.level, e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target);

    let installed = match config.format {
        LogFormat::Full => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    installed.map_err(|e| ConfigError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_subscriber_is_rejected() {
        let config = LoggingConfig::default();
        let _ = init_tracing(&config);

        assert!(matches!(init_tracing(&config), Err(ConfigError::Logging(_))));
    }
}
