// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod argument;
mod config;
mod definition;
mod dispatch;
mod validation;

pub use argument::ArgumentError;
pub use config::ConfigError;
pub use definition::DefinitionError;
pub use dispatch::{DispatchError, Rejection};
pub use validation::ValidationError;
