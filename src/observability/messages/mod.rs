// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Every log line emitted by the engine is a struct in one of these modules. The
//! struct's `Display` impl is the human-readable message; its [`StructuredLog`]
//! impl picks the level and attaches the fields.
//!
//! # Organization
//!
//! * `router` - workflow selection and root exception handling
//! * `pipeline` - workflow runs, step completion and state transitions
//! * `registry` - dependency registration and resolution
//!
//! # Usage Pattern
//!
//! ```rust
//! use event_router::observability::messages::router::WorkflowMatched;
//! use event_router::observability::messages::StructuredLog;
//!
//! let msg = WorkflowMatched {
//!     workflow: "sharpen_pencils",
//!     index: 0,
//!     rejected: 0,
//! };
//!
//! msg.log();
//! tracing::info!("{}", msg);
//! ```

use tracing::Span;

pub mod pipeline;
pub mod registry;
pub mod router;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the message at its level.
    fn log(&self);

    /// A span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
