// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Selects the workflow whose schema accepts an event.
//!
//! Workflows are tried in registration order. In [`MatchMode::FirstMatch`] the first
//! schema that validates the event wins; in [`MatchMode::Strict`] every schema is
//! tried and more than one acceptance is an error. Discriminator fields are a
//! convention of the schemas, not something the matcher enforces; it only uses
//! them in strict mode to reject workflows that can never be told apart.

use std::collections::HashMap;

use crate::config::MatchMode;
use crate::engine::value::Shared;
use crate::engine::workflow::Workflow;
use crate::errors::{DefinitionError, DispatchError, Rejection};
use crate::observability::messages::router::{AmbiguousMatchDetected, NoWorkflowMatched, WorkflowMatched};
use crate::observability::messages::StructuredLog;
use crate::traits::Event;

/// The selected workflow plus the typed event its schema produced.
#[derive(Debug)]
pub struct Match<'a> {
    pub workflow: &'a Workflow,
    pub index: usize,
    pub validated: Shared,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaMatcher {
    mode: MatchMode,
}

impl SchemaMatcher {
    pub fn new(mode: MatchMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Registration-time check. Only strict mode rejects anything: two workflows
    /// whose schemas declare the same discriminator field and value.
    pub fn check_registration(&self, workflows: &[Workflow]) -> Result<(), DefinitionError> {
        if self.mode != MatchMode::Strict {
            return Ok(());
        }

        let mut claimed: HashMap<(String, String), &str> = HashMap::new();
        for workflow in workflows {
            let Some((field, value)) = workflow.schema().discriminator() else {
                continue;
            };
            let key = (field.to_string(), value.to_string());
            if let Some(first) = claimed.get(&key) {
                return Err(DefinitionError::AmbiguousSchemas {
                    first: first.to_string(),
                    second: workflow.name().to_string(),
                    field: key.0,
                    value: key.1,
                });
            }
            claimed.insert(key, workflow.name());
        }
        Ok(())
    }

    /// Pick the workflow for `event`.
    pub fn select<'a>(&self, workflows: &'a [Workflow], event: &Event) -> Result<Match<'a>, DispatchError> {
        let mut rejections = Vec::new();
        let mut accepted: Vec<Match<'a>> = Vec::new();

        for (index, workflow) in workflows.iter().enumerate() {
            match workflow.schema().validate(event) {
                Ok(validated) => {
                    accepted.push(Match {
                        workflow,
                        index,
                        validated,
                    });
                    if self.mode == MatchMode::FirstMatch {
                        break;
                    }
                }
                Err(error) => rejections.push(Rejection {
                    workflow: workflow.name().to_string(),
                    error,
                }),
            }
        }

        if accepted.len() > 1 {
            let names: Vec<String> = accepted.iter().map(|m| m.workflow.name().to_string()).collect();
            AmbiguousMatchDetected { workflows: &names }.log();
            return Err(DispatchError::AmbiguousMatch { workflows: names });
        }

        match accepted.pop() {
            Some(selected) => {
                WorkflowMatched {
                    workflow: selected.workflow.name(),
                    index: selected.index,
                    rejected: rejections.len(),
                }
                .log();
                Ok(selected)
            }
            None => {
                NoWorkflowMatched {
                    candidates: workflows.len(),
                    rejections: &rejections,
                }
                .log();
                Err(DispatchError::NoMatchingWorkflow { rejections })
            }
        }
    }
}
