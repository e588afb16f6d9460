// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Step parameter declarations and their resolution plans.
//!
//! Every step declares its parameters up front as a list of [`Param`]s. When the
//! step is registered the list is compiled into a [`ResolutionPlan`]: names of
//! earlier steps are bound to their [`StepId`]s and references that could never
//! resolve are rejected. At call time the plan is evaluated against the run's
//! registry and produces the [`Args`] handed to the step.
//!
//! ```text
//! Param::named("pencil_type")      -> registry[Name("pencil_type")]
//! Param::typed::<Client>("client") -> registry[Type(Client)]
//! Param::result_of("count", step)  -> registry[StepResult(step)]
//! Param::event("event")            -> validated event
//! Param::context("ctx")            -> orchestration context
//! ```

use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::engine::context::OrchestrationContext;
use crate::engine::registry::{ResolutionKey, TypeKey};
use crate::engine::value::Shared;
use crate::engine::workflow::StepId;
use crate::errors::{ArgumentError, DefinitionError, DispatchError};
use crate::observability::messages::registry::DependencyUnresolved;
use crate::observability::messages::StructuredLog;

/// Reference to another step of the same workflow.
///
/// Prefer [`StepRef::Id`]: the id returned when the step was registered stays valid
/// if the step is renamed. Name references are bound once at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepRef {
    Id(StepId),
    Name(String),
}

impl From<StepId> for StepRef {
    fn from(id: StepId) -> Self {
        StepRef::Id(id)
    }
}

impl From<&str> for StepRef {
    fn from(name: &str) -> Self {
        StepRef::Name(name.to_string())
    }
}

impl From<String> for StepRef {
    fn from(name: String) -> Self {
        StepRef::Name(name)
    }
}

impl fmt::Display for StepRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepRef::Id(id) => write!(f, "{}", id),
            StepRef::Name(name) => write!(f, "step '{}'", name),
        }
    }
}

/// Where a parameter's value comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamSource {
    ByType(TypeKey),
    ByName(String),
    ResultOf(StepRef),
    Event,
    Context,
}

/// A declared step parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    label: String,
    source: ParamSource,
    optional: bool,
}

impl Param {
    fn new(label: impl Into<String>, source: ParamSource) -> Self {
        Self {
            label: label.into(),
            source,
            optional: false,
        }
    }

    /// Resolve by the concrete type `T`.
    pub fn typed<T: Any>(label: impl Into<String>) -> Self {
        Self::new(label, ParamSource::ByType(TypeKey::of::<T>()))
    }

    /// Resolve by name, using the label as the registry name.
    pub fn named(label: impl Into<String>) -> Self {
        let label = label.into();
        let key = label.clone();
        Self::new(label, ParamSource::ByName(key))
    }

    /// Resolve by a registry name that differs from the label.
    pub fn named_as(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new(label, ParamSource::ByName(key.into()))
    }

    /// Resolve to the return value of an earlier step.
    pub fn result_of(label: impl Into<String>, step: impl Into<StepRef>) -> Self {
        Self::new(label, ParamSource::ResultOf(step.into()))
    }

    /// The validated event produced by the matching schema.
    pub fn event(label: impl Into<String>) -> Self {
        Self::new(label, ParamSource::Event)
    }

    /// The orchestration context of the current run.
    pub fn context(label: impl Into<String>) -> Self {
        Self::new(label, ParamSource::Context)
    }

    /// Resolve to nothing instead of failing when the value is missing.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self) -> &ParamSource {
        &self.source
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

#[derive(Debug, Clone)]
enum PlannedSource {
    Registry(ResolutionKey),
    Event,
    Context,
}

impl fmt::Display for PlannedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannedSource::Registry(key) => write!(f, "{}", key),
            PlannedSource::Event => write!(f, "validated event"),
            PlannedSource::Context => write!(f, "orchestration context"),
        }
    }
}

#[derive(Debug, Clone)]
struct PlannedParam {
    label: String,
    source: PlannedSource,
    optional: bool,
}

/// Parameter list compiled at registration time.
#[derive(Debug, Clone, Default)]
pub struct ResolutionPlan {
    params: Vec<PlannedParam>,
}

impl ResolutionPlan {
    /// Compile `params` for step `step` of workflow `workflow`.
    ///
    /// `bind` turns a step reference into the id of an already registered step, or
    /// fails with `InvalidStepReference`.
    pub(crate) fn build<F>(
        workflow: &str,
        step: &str,
        params: Vec<Param>,
        mut bind: F,
    ) -> Result<Self, DefinitionError>
    where
        F: FnMut(&Param, &StepRef) -> Result<StepId, DefinitionError>,
    {
        let mut seen = HashSet::new();
        let mut planned = Vec::with_capacity(params.len());

        for param in params {
            if !seen.insert(param.label.clone()) {
                return Err(DefinitionError::DuplicateParameter {
                    workflow: workflow.to_string(),
                    step: step.to_string(),
                    parameter: param.label,
                });
            }

            let source = match &param.source {
                ParamSource::ByType(key) if *key == TypeKey::of::<OrchestrationContext>() => {
                    PlannedSource::Context
                }
                ParamSource::ByType(key) => PlannedSource::Registry(ResolutionKey::Type(*key)),
                ParamSource::ByName(name) => PlannedSource::Registry(ResolutionKey::Name(name.clone())),
                ParamSource::ResultOf(reference) => {
                    PlannedSource::Registry(ResolutionKey::StepResult(bind(&param, reference)?))
                }
                ParamSource::Event => PlannedSource::Event,
                ParamSource::Context => PlannedSource::Context,
            };

            planned.push(PlannedParam {
                label: param.label,
                source,
                optional: param.optional,
            });
        }

        Ok(Self { params: planned })
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Evaluate the plan against a live run.
    pub(crate) fn resolve(
        &self,
        step: &str,
        context: &OrchestrationContext,
    ) -> Result<Args, DispatchError> {
        let mut values = Vec::with_capacity(self.params.len());

        for param in &self.params {
            let value = match &param.source {
                PlannedSource::Registry(key) => context.resolve(key),
                PlannedSource::Event => Some(context.event().clone()),
                PlannedSource::Context => Some(Shared::new(context.clone())),
            };

            if value.is_none() && !param.optional {
                let key = param.source.to_string();
                DependencyUnresolved {
                    workflow: context.workflow(),
                    step,
                    parameter: &param.label,
                    key: &key,
                }
                .log();
                return Err(DispatchError::UnresolvedDependency {
                    workflow: context.workflow().to_string(),
                    step: step.to_string(),
                    parameter: param.label.clone(),
                    key,
                });
            }

            values.push((param.label.clone(), value));
        }

        Ok(Args {
            step: step.to_string(),
            event: context.event().clone(),
            values,
        })
    }
}

/// Resolved arguments handed to a step, looked up by parameter label.
#[derive(Debug, Clone)]
pub struct Args {
    step: String,
    event: Shared,
    values: Vec<(String, Option<Shared>)>,
}

impl Args {
    /// Name of the step these arguments were resolved for.
    pub fn step(&self) -> &str {
        &self.step
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The raw value bound to `label`; `Ok(None)` for an unresolved optional parameter.
    pub fn shared(&self, label: &str) -> Result<Option<&Shared>, ArgumentError> {
        self.values
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, value)| value.as_ref())
            .ok_or_else(|| ArgumentError::UnknownParameter {
                step: self.step.clone(),
                label: label.to_string(),
            })
    }

    /// The value bound to `label` as a `T`.
    pub fn get<T: Any + Send + Sync>(&self, label: &str) -> Result<Arc<T>, ArgumentError> {
        match self.shared(label)? {
            Some(value) => self.downcast(label, value),
            None => Err(ArgumentError::Absent {
                step: self.step.clone(),
                label: label.to_string(),
            }),
        }
    }

    /// Like [`Args::get`], but an unresolved optional parameter yields `None`.
    pub fn optional<T: Any + Send + Sync>(&self, label: &str) -> Result<Option<Arc<T>>, ArgumentError> {
        self.shared(label)?
            .map(|value| self.downcast(label, value))
            .transpose()
    }

    /// The validated event, whether or not the step declared it.
    pub fn event<T: Any + Send + Sync>(&self) -> Result<Arc<T>, ArgumentError> {
        self.downcast("event", &self.event)
    }

    /// The orchestration context, if the step declared it.
    pub fn context(&self) -> Result<OrchestrationContext, ArgumentError> {
        self.values
            .iter()
            .filter_map(|(_, value)| value.as_ref())
            .find_map(|value| value.downcast_ref::<OrchestrationContext>().cloned())
            .ok_or_else(|| ArgumentError::NoContext {
                step: self.step.clone(),
            })
    }

    fn downcast<T: Any + Send + Sync>(&self, label: &str, value: &Shared) -> Result<Arc<T>, ArgumentError> {
        value.downcast::<T>().ok_or_else(|| ArgumentError::TypeMismatch {
            step: self.step.clone(),
            label: label.to_string(),
            expected: std::any::type_name::<T>(),
            actual: value.type_name(),
        })
    }
}
