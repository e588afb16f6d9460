// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use thiserror::Error;

use crate::errors::ValidationError;

/// One workflow's reason for not accepting an event.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub workflow: String,
    pub error: ValidationError,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.workflow, self.error)
    }
}

/// Errors raised while dispatching an event.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No registered schema accepted the event.
    #[error("no workflow accepted the event ({} rejected)", .rejections.len())]
    NoMatchingWorkflow { rejections: Vec<Rejection> },

    /// Strict matching only: more than one schema accepted the event.
    #[error("event matches several workflows: {}", .workflows.join(", "))]
    AmbiguousMatch { workflows: Vec<String> },

    /// A required step parameter had no value in the run's registry.
    #[error("cannot resolve parameter '{parameter}' of '{step}' in workflow '{workflow}' ({key})")]
    UnresolvedDependency {
        workflow: String,
        step: String,
        parameter: String,
        key: String,
    },

    #[error("init hook of workflow '{workflow}' failed")]
    InitFailed {
        workflow: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("step '{step}' of workflow '{workflow}' failed")]
    StepFailed {
        workflow: String,
        step: String,
        #[source]
        source: anyhow::Error,
    },

    /// The transport adapter cannot represent the workflow's result.
    #[error("result of type `{type_name}` cannot be encoded as a response")]
    UnencodableResult { type_name: &'static str },
}

impl DispatchError {
    /// `true` when no workflow ran at all.
    pub fn is_routing_failure(&self) -> bool {
        matches!(
            self,
            DispatchError::NoMatchingWorkflow { .. } | DispatchError::AmbiguousMatch { .. }
        )
    }

    /// Name of the workflow that was running, if one was selected.
    pub fn workflow(&self) -> Option<&str> {
        match self {
            DispatchError::UnresolvedDependency { workflow, .. }
            | DispatchError::InitFailed { workflow, .. }
            | DispatchError::StepFailed { workflow, .. } => Some(workflow),
            _ => None,
        }
    }
}
