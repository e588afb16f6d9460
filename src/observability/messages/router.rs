// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for routing events to workflows.
//!
//! This module contains message types for logging events related to:
//! * Router construction
//! * Schema matching outcomes
//! * Root exception handler registration and use

use crate::config::{MatchMode, RootHandlerPolicy};
use crate::errors::{DispatchError, Rejection};
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A router was built.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RouterConfigured {
    pub workflow_count: usize,
    pub matching: MatchMode,
    pub root_handler_policy: RootHandlerPolicy,
}

impl Display for RouterConfigured {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Router configured with {} workflows, matching={:?}, root_handler_policy={:?}",
            self.workflow_count, self.matching, self.root_handler_policy
        )
    }
}

impl StructuredLog for RouterConfigured {
    fn log(&self) {
        tracing::info!(
            workflow_count = self.workflow_count,
            matching = ?self.matching,
            root_handler_policy = ?self.root_handler_policy,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "router_configured",
            span_name = name,
            workflow_count = self.workflow_count,
            matching = ?self.matching,
        )
    }
}

/// A schema accepted the event.
///
/// # Log Level
/// `debug!` - Detailed progress
///
/// # Example
/// ```
/// use event_router::observability::messages::router::WorkflowMatched;
///
/// let msg = WorkflowMatched {
///     workflow: "erase",
///     index: 1,
///     rejected: 1,
/// };
///
/// assert_eq!(msg.to_string(), "Event matched workflow 'erase' (#1) after 1 rejections");
/// ```
pub struct WorkflowMatched<'a> {
    pub workflow: &'a str,
    pub index: usize,
    pub rejected: usize,
}

impl Display for WorkflowMatched<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Event matched workflow '{}' (#{}) after {} rejections",
            self.workflow, self.index, self.rejected
        )
    }
}

impl StructuredLog for WorkflowMatched<'_> {
    fn log(&self) {
        tracing::debug!(
            workflow = self.workflow,
            index = self.index,
            rejected = self.rejected,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "workflow_matched",
            span_name = name,
            workflow = self.workflow,
            index = self.index,
        )
    }
}

/// Every schema rejected the event.
///
/// # Log Level
/// `warn!` - Caller error, not a router failure
pub struct NoWorkflowMatched<'a> {
    pub candidates: usize,
    pub rejections: &'a [Rejection],
}

impl Display for NoWorkflowMatched<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "No workflow accepted the event ({} candidates)", self.candidates)?;
        for rejection in self.rejections {
            write!(f, "; {}", rejection)?;
        }
        Ok(())
    }
}

impl StructuredLog for NoWorkflowMatched<'_> {
    fn log(&self) {
        tracing::warn!(
            candidates = self.candidates,
            rejections = self.rejections.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "no_workflow_matched",
            span_name = name,
            candidates = self.candidates,
        )
    }
}

/// Strict matching found more than one accepting schema.
///
/// # Log Level
/// `error!` - Misconfigured router
pub struct AmbiguousMatchDetected<'a> {
    pub workflows: &'a [String],
}

impl Display for AmbiguousMatchDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Event accepted by several workflows: {}", self.workflows.join(", "))
    }
}

impl StructuredLog for AmbiguousMatchDetected<'_> {
    fn log(&self) {
        tracing::error!(
            workflows = ?self.workflows,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "ambiguous_match",
            span_name = name,
            workflows = ?self.workflows,
        )
    }
}

/// A second root exception handler replaced the first.
///
/// # Log Level
/// `warn!` - Usually a wiring mistake
pub struct RootHandlerReplaced<'a> {
    pub previous: &'a str,
    pub replacement: &'a str,
}

impl Display for RootHandlerReplaced<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Root exception handler ({}) replaced by a {} handler",
            self.previous, self.replacement
        )
    }
}

impl StructuredLog for RootHandlerReplaced<'_> {
    fn log(&self) {
        tracing::warn!(
            previous = self.previous,
            replacement = self.replacement,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "root_handler_replaced",
            span_name = name,
            previous = self.previous,
            replacement = self.replacement,
        )
    }
}

/// A workflow failure was handed to the root exception handler.
///
/// # Log Level
/// `warn!` - The failure is handled, but still worth seeing
pub struct RootHandlerInvoked<'a> {
    pub workflow: &'a str,
    pub handler: &'a str,
    pub error: &'a DispatchError,
}

impl Display for RootHandlerInvoked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Workflow '{}' failed, invoking {} root exception handler: {}",
            self.workflow, self.handler, self.error
        )
    }
}

impl StructuredLog for RootHandlerInvoked<'_> {
    fn log(&self) {
        tracing::warn!(
            workflow = self.workflow,
            handler = self.handler,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "root_handler",
            span_name = name,
            workflow = self.workflow,
            handler = self.handler,
        )
    }
}
