// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Log level used when neither the config file nor `RUST_LOG` sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Environment variable that overrides the configured log filter
pub const LOG_FILTER_ENV: &str = "RUST_LOG";
