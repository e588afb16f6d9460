// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The live handle for a single workflow run.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::engine::registry::{Dependencies, DependencyRegistry, ResolutionKey, TypeKey};
use crate::engine::value::Shared;
use crate::engine::workflow::StepId;

/// Lifecycle of one workflow run.
///
/// ```text
/// NotStarted -> Initializing -> RunningStep(0) -> ... -> RunningStep(n-1) -> Completed
///                                    |                         |
///                                    +------> Ended <----------+   (context.end)
/// any state -> Failed                                              (hook or step error)
/// ```
///
/// `Ended`, `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Initializing,
    RunningStep(usize),
    /// A step called [`OrchestrationContext::end`].
    Ended,
    /// Every step ran without an explicit end.
    Completed,
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Ended | RunState::Completed | RunState::Failed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::NotStarted => write!(f, "not_started"),
            RunState::Initializing => write!(f, "initializing"),
            RunState::RunningStep(index) => write!(f, "running_step({})", index),
            RunState::Ended => write!(f, "ended"),
            RunState::Completed => write!(f, "completed"),
            RunState::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug)]
struct Progress {
    state: RunState,
    result: Option<Shared>,
    ended: bool,
}

struct ContextInner {
    workflow: String,
    event: Shared,
    platform: Option<Shared>,
    registry: Mutex<DependencyRegistry>,
    progress: Mutex<Progress>,
}

/// Per-run orchestration context.
///
/// Owns the run's [`DependencyRegistry`], the final result slot and the early
/// termination flag. Steps that declare it as a parameter receive a clone; every
/// clone refers to the same run. A context can only be created by a workflow run,
/// so its registry is never reachable from another invocation.
#[derive(Clone)]
pub struct OrchestrationContext {
    inner: Arc<ContextInner>,
}

// A panicking step must not make the rest of the run unusable
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl OrchestrationContext {
    pub(crate) fn new(workflow: &str, event: Shared, platform: Option<Shared>) -> Self {
        let mut registry = DependencyRegistry::new();
        registry.insert(ResolutionKey::Type(TypeKey::of_shared(&event)), event.clone());

        Self {
            inner: Arc::new(ContextInner {
                workflow: workflow.to_string(),
                event,
                platform,
                registry: Mutex::new(registry),
                progress: Mutex::new(Progress {
                    state: RunState::NotStarted,
                    result: None,
                    ended: false,
                }),
            }),
        }
    }

    /// Name of the workflow being run.
    pub fn workflow(&self) -> &str {
        &self.inner.workflow
    }

    /// The validated event.
    pub fn event(&self) -> &Shared {
        &self.inner.event
    }

    /// The platform invocation context passed to `Router::invoke`, if any.
    pub fn platform_context(&self) -> Option<&Shared> {
        self.inner.platform.as_ref()
    }

    /// Register a dependency by type for the remaining steps.
    pub fn add<T: Any + Send + Sync>(&self, value: T) {
        lock(&self.inner.registry).add(value);
    }

    /// Register a dependency by name for the remaining steps.
    pub fn add_named<T: Any + Send + Sync>(&self, name: impl Into<String>, value: T) {
        lock(&self.inner.registry).add_named(name, value);
    }

    pub fn add_many(&self, dependencies: Dependencies) {
        lock(&self.inner.registry).add_many(dependencies);
    }

    pub fn resolve(&self, key: &ResolutionKey) -> Option<Shared> {
        lock(&self.inner.registry).resolve(key)
    }

    /// Result of an already completed step.
    pub fn step_result(&self, step: StepId) -> Option<Shared> {
        self.resolve(&ResolutionKey::StepResult(step))
    }

    /// Set the final result and skip every remaining step.
    ///
    /// The calling step still runs to completion.
    pub fn end<T: Any + Send + Sync>(&self, value: T) {
        let mut progress = lock(&self.inner.progress);
        progress.result = Some(Shared::new(value));
        progress.ended = true;
    }

    /// Set the final result without stopping the pipeline.
    ///
    /// Ignored once [`OrchestrationContext::end`] has been called.
    pub fn set_result<T: Any + Send + Sync>(&self, value: T) {
        let mut progress = lock(&self.inner.progress);
        if !progress.ended {
            progress.result = Some(Shared::new(value));
        }
    }

    pub fn is_ended(&self) -> bool {
        lock(&self.inner.progress).ended
    }

    pub fn state(&self) -> RunState {
        lock(&self.inner.progress).state
    }

    /// Move to `next`, returning the previous state.
    pub(crate) fn transition(&self, next: RunState) -> RunState {
        let mut progress = lock(&self.inner.progress);
        std::mem::replace(&mut progress.state, next)
    }

    pub(crate) fn store_step_result(&self, step: StepId, value: Shared) {
        lock(&self.inner.registry).insert(ResolutionKey::StepResult(step), value);
    }

    pub(crate) fn take_result(&self) -> Option<Shared> {
        lock(&self.inner.progress).result.take()
    }
}

impl fmt::Debug for OrchestrationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = lock(&self.inner.progress);
        f.debug_struct("OrchestrationContext")
            .field("workflow", &self.inner.workflow)
            .field("event", &self.inner.event)
            .field("state", &progress.state)
            .field("ended", &progress.ended)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::params::Args;
    use crate::engine::workflow::{Step, Workflow};
    use crate::traits::SerdeSchema;

    fn context() -> OrchestrationContext {
        OrchestrationContext::new("sharpen_pencils", Shared::new(5_u8), None)
    }

    #[test]
    fn test_validated_event_is_resolvable_by_type() {
        let ctx = context();
        let event = ctx.resolve(&ResolutionKey::of::<u8>()).unwrap();
        assert_eq!(event.downcast_ref::<u8>(), Some(&5));
        assert!(ctx.platform_context().is_none());
    }

    #[test]
    fn test_end_sets_result_and_flag() {
        let ctx = context();
        assert!(!ctx.is_ended());

        ctx.end(String::from("done"));

        assert!(ctx.is_ended());
        let result = ctx.take_result().unwrap();
        assert_eq!(result.downcast_ref::<String>().unwrap(), "done");
        assert!(ctx.take_result().is_none());
    }

    #[test]
    fn test_set_result_does_not_end() {
        let ctx = context();
        ctx.set_result(1_i32);
        ctx.set_result(2_i32);

        assert!(!ctx.is_ended());
        assert_eq!(ctx.take_result().unwrap().downcast_ref::<i32>(), Some(&2));
    }

    #[test]
    fn test_set_result_after_end_keeps_end_value() {
        let ctx = context();
        ctx.end("ended");
        ctx.set_result("overwritten");

        assert_eq!(ctx.take_result().unwrap().downcast_ref::<&str>(), Some(&"ended"));
    }

    #[test]
    fn test_context_cannot_be_registered_in_its_own_registry() {
        let mut workflow = Workflow::new("sharpen_pencils", SerdeSchema::<u8>::new());
        let step = workflow
            .step(Step::new("leak", |_: Args| async { Ok(()) }))
            .unwrap();

        let ctx = context();
        ctx.add(ctx.clone());
        ctx.add_named("me", ctx.clone());
        ctx.add_many(Dependencies::new().with(ctx.clone()));
        ctx.store_step_result(step, Shared::new(ctx.clone()));

        assert!(ctx.resolve(&ResolutionKey::of::<OrchestrationContext>()).is_none());
        assert!(ctx.resolve(&ResolutionKey::named("me")).is_none());
        assert!(ctx.step_result(step).is_none());
        assert_eq!(Arc::strong_count(&ctx.inner), 1);
    }

    #[test]
    fn test_clones_share_registry_and_state() {
        let ctx = context();
        let clone = ctx.clone();

        clone.add_named("pencil_type", "2B");
        assert!(ctx.resolve(&ResolutionKey::named("pencil_type")).is_some());

        assert_eq!(ctx.transition(RunState::Initializing), RunState::NotStarted);
        assert_eq!(clone.state(), RunState::Initializing);
    }

    #[test]
    fn test_terminal_states() {
        let cases = vec![
            (RunState::NotStarted, false),
            (RunState::Initializing, false),
            (RunState::RunningStep(3), false),
            (RunState::Ended, true),
            (RunState::Completed, true),
            (RunState::Failed, true),
        ];

        for (state, terminal) in cases {
            assert_eq!(state.is_terminal(), terminal, "state {}", state);
        }
    }
}
