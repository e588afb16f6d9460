// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for dependency registration and resolution.

use crate::engine::registry::ResolutionKey;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A dependency was registered under a key that already held a value.
///
/// # Log Level
/// `debug!` - Last write wins; expected when the init hook refines caller dependencies
pub struct DependencyOverwritten<'a> {
    pub key: &'a ResolutionKey,
    pub previous_type: &'a str,
}

impl Display for DependencyOverwritten<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dependency {} overwritten (previous value was `{}`)",
            self.key, self.previous_type
        )
    }
}

impl StructuredLog for DependencyOverwritten<'_> {
    fn log(&self) {
        tracing::debug!(
            key = %self.key,
            previous_type = self.previous_type,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "dependency_overwritten",
            span_name = name,
            key = %self.key,
            previous_type = self.previous_type,
        )
    }
}

/// A value was refused by the registry.
///
/// # Log Level
/// `warn!` - The step keeps running; later lookups of `key` find nothing
pub struct DependencyRejected<'a> {
    pub key: &'a ResolutionKey,
    pub reason: &'a str,
}

impl Display for DependencyRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Dependency {} not registered: {}", self.key, self.reason)
    }
}

impl StructuredLog for DependencyRejected<'_> {
    fn log(&self) {
        tracing::warn!(
            key = %self.key,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "dependency_rejected",
            span_name = name,
            key = %self.key,
            reason = self.reason,
        )
    }
}

/// A required step parameter had nothing to resolve to.
///
/// # Log Level
/// `error!` - The run fails
///
/// # Example
/// ```
/// use event_router::observability::messages::registry::DependencyUnresolved;
///
/// let msg = DependencyUnresolved {
///     workflow: "sharpen_pencils",
///     step: "sharpen",
///     parameter: "pencil_type",
///     key: "name `pencil_type`",
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Cannot resolve parameter 'pencil_type' of step 'sharpen' in workflow 'sharpen_pencils' from name `pencil_type`"
/// );
/// ```
pub struct DependencyUnresolved<'a> {
    pub workflow: &'a str,
    pub step: &'a str,
    pub parameter: &'a str,
    pub key: &'a str,
}

impl Display for DependencyUnresolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Cannot resolve parameter '{}' of step '{}' in workflow '{}' from {}",
            self.parameter, self.step, self.workflow, self.key
        )
    }
}

impl StructuredLog for DependencyUnresolved<'_> {
    fn log(&self) {
        tracing::error!(
            workflow = self.workflow,
            step = self.step,
            parameter = self.parameter,
            key = self.key,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "dependency_unresolved",
            span_name = name,
            workflow = self.workflow,
            step = self.step,
            parameter = self.parameter,
            key = self.key,
        )
    }
}
