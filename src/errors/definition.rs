// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised while building workflows and routers.
///
/// These are configuration mistakes: they surface at registration, before any
/// event is dispatched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefinitionError {
    /// A result back-reference points at a step that has not run by the time the
    /// referencing step runs, or at a step outside the workflow.
    #[error("parameter '{parameter}' of '{step}' in workflow '{workflow}' references {reference}: {reason}")]
    InvalidStepReference {
        workflow: String,
        step: String,
        parameter: String,
        reference: String,
        reason: &'static str,
    },

    #[error("workflow '{workflow}' already has a step named '{step}'")]
    DuplicateStepName { workflow: String, step: String },

    #[error("step '{step}' in workflow '{workflow}' declares parameter '{parameter}' twice")]
    DuplicateParameter {
        workflow: String,
        step: String,
        parameter: String,
    },

    #[error("workflow '{workflow}' already has an init hook")]
    InitAlreadyDefined { workflow: String },

    #[error("workflow '{workflow}' is registered more than once")]
    DuplicateWorkflowName { workflow: String },

    #[error("a router needs at least one workflow")]
    NoWorkflows,

    /// Strict matching only: two schemas share a discriminator and could both accept an event.
    #[error("workflows '{first}' and '{second}' both match on {field} = {value}")]
    AmbiguousSchemas {
        first: String,
        second: String,
        field: String,
        value: String,
    },

    #[error("a root exception handler is already registered")]
    RootHandlerAlreadyRegistered,
}
