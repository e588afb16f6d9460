// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for workflow runs.
//!
//! This module contains message types for logging events related to:
//! * Run lifecycle (start, completion, failure)
//! * Step completion and early termination
//! * Run state transitions

use crate::engine::context::RunState;
use crate::errors::DispatchError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A workflow run started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use event_router::observability::messages::pipeline::WorkflowRunStarted;
///
/// let msg = WorkflowRunStarted {
///     workflow: "sharpen_pencils",
///     step_count: 4,
///     has_init: true,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct WorkflowRunStarted<'a> {
    pub workflow: &'a str,
    pub step_count: usize,
    pub has_init: bool,
}

impl Display for WorkflowRunStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Running workflow '{}': {} steps, init hook {}",
            self.workflow,
            self.step_count,
            if self.has_init { "present" } else { "absent" }
        )
    }
}

impl StructuredLog for WorkflowRunStarted<'_> {
    fn log(&self) {
        tracing::info!(
            workflow = self.workflow,
            step_count = self.step_count,
            has_init = self.has_init,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "workflow_run",
            span_name = name,
            workflow = self.workflow,
            step_count = self.step_count,
        )
    }
}

/// The run moved to a new state.
///
/// # Log Level
/// `debug!` - Detailed progress
pub struct StateChanged<'a> {
    pub workflow: &'a str,
    pub from: RunState,
    pub to: RunState,
}

impl Display for StateChanged<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Workflow '{}': {} -> {}", self.workflow, self.from, self.to)
    }
}

impl StructuredLog for StateChanged<'_> {
    fn log(&self) {
        tracing::debug!(
            workflow = self.workflow,
            from = %self.from,
            to = %self.to,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "state_changed",
            span_name = name,
            workflow = self.workflow,
            from = %self.from,
            to = %self.to,
        )
    }
}

/// A step returned successfully.
///
/// # Log Level
/// `debug!` - Detailed progress
pub struct StepCompleted<'a> {
    pub workflow: &'a str,
    pub step: &'a str,
    pub index: usize,
    pub result_type: &'a str,
    pub duration: Duration,
}

impl Display for StepCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Step '{}' (#{}) of workflow '{}' returned `{}` in {:?}",
            self.step, self.index, self.workflow, self.result_type, self.duration
        )
    }
}

impl StructuredLog for StepCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            workflow = self.workflow,
            step = self.step,
            index = self.index,
            result_type = self.result_type,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "step",
            span_name = name,
            workflow = self.workflow,
            step = self.step,
            index = self.index,
        )
    }
}

/// A step (or the init hook) called `end`; the remaining steps are skipped.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use event_router::observability::messages::pipeline::PipelineEndedEarly;
///
/// let msg = PipelineEndedEarly {
///     workflow: "sharpen_pencils",
///     ended_by: "prepare",
///     skipped: 2,
/// };
///
/// assert_eq!(msg.to_string(), "Workflow 'sharpen_pencils' ended by 'prepare', skipping 2 steps");
/// ```
pub struct PipelineEndedEarly<'a> {
    pub workflow: &'a str,
    pub ended_by: &'a str,
    pub skipped: usize,
}

impl Display for PipelineEndedEarly<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Workflow '{}' ended by '{}', skipping {} steps",
            self.workflow, self.ended_by, self.skipped
        )
    }
}

impl StructuredLog for PipelineEndedEarly<'_> {
    fn log(&self) {
        tracing::info!(
            workflow = self.workflow,
            ended_by = self.ended_by,
            skipped = self.skipped,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline_ended_early",
            span_name = name,
            workflow = self.workflow,
            ended_by = self.ended_by,
        )
    }
}

/// A workflow run finished without error.
///
/// # Log Level
/// `info!` - Important operational event
pub struct WorkflowRunCompleted<'a> {
    pub workflow: &'a str,
    pub final_state: RunState,
    pub duration: Duration,
}

impl Display for WorkflowRunCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Workflow '{}' finished ({}) in {:?}",
            self.workflow, self.final_state, self.duration
        )
    }
}

impl StructuredLog for WorkflowRunCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            workflow = self.workflow,
            final_state = %self.final_state,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "workflow_run_completed",
            span_name = name,
            workflow = self.workflow,
            duration = ?self.duration,
        )
    }
}

/// A workflow run failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct WorkflowRunFailed<'a> {
    pub workflow: &'a str,
    pub error: &'a DispatchError,
}

impl Display for WorkflowRunFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Workflow '{}' failed: {}", self.workflow, self.error)
    }
}

impl StructuredLog for WorkflowRunFailed<'_> {
    fn log(&self) {
        let cause = std::error::Error::source(self.error).map(|source| source.to_string());
        tracing::error!(
            workflow = self.workflow,
            error = %self.error,
            cause = cause.as_deref(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "workflow_run_failed",
            span_name = name,
            workflow = self.workflow,
            error = %self.error,
        )
    }
}
