// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Workflow definitions and the sequential step pipeline.
//!
//! A [`Workflow`] is a schema, an optional init hook and an ordered list of steps.
//! Steps are added with [`Workflow::step`], which compiles the step's parameters
//! into a resolution plan and hands back the step's [`StepId`] so later steps can
//! depend on its result.
//!
//! # Execution Flow
//!
//! 1. A fresh [`OrchestrationContext`] is created; the validated event is registered
//! 2. Caller-supplied dependencies are added to the registry
//! 3. The init hook (if any) runs and seeds further dependencies
//! 4. Steps run in declaration order; each return value is stored under the step's id
//!    before the next step resolves its parameters
//! 5. The run stops after the last step, or right after a step calls `end`
//!
//! Failures are never caught here: they end the run and propagate to the router.
//!
//! # Examples
//! ```
//! use event_router::engine::{Param, Shared, Step, Workflow};
//! use event_router::traits::{Schema, SerdeSchema};
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Deserialize)]
//! struct Order {
//!     count: u32,
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut workflow = Workflow::new("orders", SerdeSchema::<Order>::named("orders"));
//!
//! let double = workflow.step(
//!     Step::new("double", |args| async move {
//!         let order = args.get::<Order>("order")?;
//!         Ok(order.count * 2)
//!     })
//!     .param(Param::event("order")),
//! )?;
//!
//! workflow.step(
//!     Step::new("describe", |args| async move {
//!         let doubled = args.get::<u32>("doubled")?;
//!         Ok(format!("{} items", doubled))
//!     })
//!     .param(Param::result_of("doubled", double)),
//! )?;
//!
//! let validated = workflow.schema().validate(&json!({"count": 4}))?;
//! let result: Shared = workflow.run(validated, None, None).await?;
//! assert_eq!(result.downcast_ref::<String>().unwrap(), "8 items");
//! # Ok(())
//! # }
//! ```

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::Instrument;

use crate::engine::context::{OrchestrationContext, RunState};
use crate::engine::params::{Args, Param, ResolutionPlan, StepRef};
use crate::engine::registry::Dependencies;
use crate::engine::value::Shared;
use crate::errors::{DefinitionError, DispatchError};
use crate::observability::messages::pipeline::{
    PipelineEndedEarly, StateChanged, StepCompleted, WorkflowRunCompleted, WorkflowRunFailed,
    WorkflowRunStarted,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{Schema, StepDecorator, StepHandler};

const INIT_HOOK_NAME: &str = "init";

static NEXT_WORKFLOW_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a workflow definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkflowId(u64);

/// Stable identity of a registered step.
///
/// Assigned by [`Workflow::step`]; unaffected by renaming the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepId {
    workflow: WorkflowId,
    index: usize,
}

impl StepId {
    /// Position of the step in its workflow.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn workflow(&self) -> WorkflowId {
        self.workflow
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step #{}", self.index)
    }
}

/// A step (or init hook) waiting to be registered.
pub struct Step {
    name: String,
    params: Vec<Param>,
    decorators: Vec<Arc<dyn StepDecorator>>,
    handler: Arc<dyn StepHandler>,
}

impl Step {
    /// A step backed by an async closure.
    pub fn new<F, Fut, O>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<O>> + Send + 'static,
        O: Any + Send + Sync,
    {
        Self::from_handler(name, handler)
    }

    /// A step backed by any [`StepHandler`] implementation.
    pub fn from_handler<H: StepHandler + 'static>(name: impl Into<String>, handler: H) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            decorators: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = Param>) -> Self {
        self.params.extend(params);
        self
    }

    /// Add a decorator. Decorators are applied outermost-first in the order added.
    pub fn decorate<D: StepDecorator + 'static>(mut self, decorator: D) -> Self {
        self.decorators.push(Arc::new(decorator));
        self
    }

    fn wrapped_handler(&self) -> Arc<dyn StepHandler> {
        self.decorators
            .iter()
            .rev()
            .fold(Arc::clone(&self.handler), |inner, decorator| {
                decorator.decorate(&self.name, inner)
            })
    }
}

/// A registered step: identity, resolution plan and (decorated) handler.
pub struct StepDescriptor {
    id: StepId,
    name: String,
    plan: ResolutionPlan,
    handler: Arc<dyn StepHandler>,
}

impl StepDescriptor {
    pub fn id(&self) -> StepId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn plan(&self) -> &ResolutionPlan {
        &self.plan
    }
}

impl fmt::Debug for StepDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("param_count", &self.plan.len())
            .finish()
    }
}

struct InitDescriptor {
    name: String,
    plan: ResolutionPlan,
    handler: Arc<dyn StepHandler>,
}

/// Schema plus an ordered pipeline of steps.
///
/// Steps can only be appended, never reordered or removed. Once moved into a
/// `Router` the workflow is read-only.
pub struct Workflow {
    id: WorkflowId,
    name: String,
    schema: Box<dyn Schema>,
    init: Option<InitDescriptor>,
    steps: Vec<StepDescriptor>,
}

impl Workflow {
    pub fn new<S: Schema + 'static>(name: impl Into<String>, schema: S) -> Self {
        Self {
            id: WorkflowId(NEXT_WORKFLOW_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
            schema: Box::new(schema),
            init: None,
            steps: Vec::new(),
        }
    }

    pub fn id(&self) -> WorkflowId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &dyn Schema {
        self.schema.as_ref()
    }

    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    pub fn has_init(&self) -> bool {
        self.init.is_some()
    }

    /// Look up a step id by name.
    pub fn step_id(&self, name: &str) -> Option<StepId> {
        self.steps.iter().find(|s| s.name == name).map(|s| s.id)
    }

    /// Set the init hook, which runs before the first step.
    ///
    /// The hook typically declares the context as a parameter and seeds dependencies
    /// with `add`/`add_named`. It cannot reference step results.
    pub fn on_init(&mut self, hook: Step) -> Result<(), DefinitionError> {
        if self.init.is_some() {
            return Err(DefinitionError::InitAlreadyDefined {
                workflow: self.name.clone(),
            });
        }

        let handler = hook.wrapped_handler();
        let workflow = self.name.clone();
        let plan = ResolutionPlan::build(&self.name, &hook.name, hook.params, |param, reference| {
            Err(DefinitionError::InvalidStepReference {
                workflow: workflow.clone(),
                step: INIT_HOOK_NAME.to_string(),
                parameter: param.label().to_string(),
                reference: reference.to_string(),
                reason: "the init hook runs before every step",
            })
        })?;

        self.init = Some(InitDescriptor {
            name: hook.name,
            plan,
            handler,
        });
        Ok(())
    }

    /// Append a step, returning its id.
    ///
    /// Result references must point at steps already registered on this workflow.
    pub fn step(&mut self, step: Step) -> Result<StepId, DefinitionError> {
        if self.step_id(&step.name).is_some() {
            return Err(DefinitionError::DuplicateStepName {
                workflow: self.name.clone(),
                step: step.name,
            });
        }

        let id = StepId {
            workflow: self.id,
            index: self.steps.len(),
        };
        let handler = step.wrapped_handler();
        let plan = ResolutionPlan::build(&self.name, &step.name, step.params, |param, reference| {
            self.bind_reference(&step.name, id, param, reference)
        })?;

        self.steps.push(StepDescriptor {
            id,
            name: step.name,
            plan,
            handler,
        });
        Ok(id)
    }

    fn bind_reference(
        &self,
        step: &str,
        id: StepId,
        param: &Param,
        reference: &StepRef,
    ) -> Result<StepId, DefinitionError> {
        let invalid = |reason: &'static str| DefinitionError::InvalidStepReference {
            workflow: self.name.clone(),
            step: step.to_string(),
            parameter: param.label().to_string(),
            reference: reference.to_string(),
            reason,
        };

        let target = match reference {
            StepRef::Id(target) if target.workflow != self.id => {
                return Err(invalid("the step belongs to another workflow"))
            }
            StepRef::Id(target) => *target,
            StepRef::Name(name) if *name == step => return Err(invalid("a step cannot use its own result")),
            StepRef::Name(name) => self
                .step_id(name)
                .ok_or_else(|| invalid("no earlier step has that name"))?,
        };

        if target.index >= id.index {
            return Err(invalid("the referenced step does not run before this one"));
        }
        Ok(target)
    }

    /// Execute the pipeline for an already validated event.
    pub async fn run(
        &self,
        validated: Shared,
        deps: Option<Dependencies>,
        platform: Option<Shared>,
    ) -> Result<Shared, DispatchError> {
        let context = OrchestrationContext::new(&self.name, validated, platform);
        if let Some(deps) = deps {
            context.add_many(deps);
        }

        let started = WorkflowRunStarted {
            workflow: &self.name,
            step_count: self.steps.len(),
            has_init: self.init.is_some(),
        };
        let span = started.span("workflow_run");

        async move {
            started.log();
            let start_time = Instant::now();

            match self.execute(&context).await {
                Ok(result) => {
                    WorkflowRunCompleted {
                        workflow: &self.name,
                        final_state: context.state(),
                        duration: start_time.elapsed(),
                    }
                    .log();
                    Ok(result)
                }
                Err(error) => {
                    // A pending result may hold a clone of the context
                    drop(context.take_result());
                    self.transition(&context, RunState::Failed);
                    WorkflowRunFailed {
                        workflow: &self.name,
                        error: &error,
                    }
                    .log();
                    Err(error)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, context: &OrchestrationContext) -> Result<Shared, DispatchError> {
        if let Some(init) = &self.init {
            self.transition(context, RunState::Initializing);
            let args = init.plan.resolve(&init.name, context)?;
            init.handler
                .call(args)
                .await
                .map_err(|source| DispatchError::InitFailed {
                    workflow: self.name.clone(),
                    source,
                })?;

            if context.is_ended() {
                self.transition(context, RunState::Ended);
                PipelineEndedEarly {
                    workflow: &self.name,
                    ended_by: &init.name,
                    skipped: self.steps.len(),
                }
                .log();
                return Ok(context.take_result().unwrap_or_else(Shared::unit));
            }
        }

        let mut last = None;
        for step in &self.steps {
            self.transition(context, RunState::RunningStep(step.id.index));

            let args = step.plan.resolve(&step.name, context)?;
            let start_time = Instant::now();
            let value = step
                .handler
                .call(args)
                .await
                .map_err(|source| DispatchError::StepFailed {
                    workflow: self.name.clone(),
                    step: step.name.clone(),
                    source,
                })?;

            StepCompleted {
                workflow: &self.name,
                step: &step.name,
                index: step.id.index,
                result_type: value.type_name(),
                duration: start_time.elapsed(),
            }
            .log();

            context.store_step_result(step.id, value.clone());
            last = Some(value);

            if context.is_ended() {
                self.transition(context, RunState::Ended);
                PipelineEndedEarly {
                    workflow: &self.name,
                    ended_by: &step.name,
                    skipped: self.steps.len() - step.id.index - 1,
                }
                .log();
                break;
            }
        }

        if !context.is_ended() {
            self.transition(context, RunState::Completed);
        }

        Ok(context
            .take_result()
            .or(last)
            .unwrap_or_else(Shared::unit))
    }

    fn transition(&self, context: &OrchestrationContext, next: RunState) {
        let previous = context.transition(next);
        StateChanged {
            workflow: &self.name,
            from: previous,
            to: next,
        }
        .log();
    }
}

impl fmt::Debug for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("schema", &self.schema.name())
            .field("has_init", &self.init.is_some())
            .field("steps", &self.steps)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::registry::ResolutionKey;
    use crate::traits::SerdeSchema;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Deserialize)]
    struct Sharpen {
        pencil_type: String,
    }

    fn workflow() -> Workflow {
        Workflow::new("sharpen_pencils", SerdeSchema::<Sharpen>::named("sharpen"))
    }

    fn validated(pencil_type: &str) -> Shared {
        Shared::new(Sharpen {
            pencil_type: pencil_type.to_string(),
        })
    }

    fn constant(value: u32) -> Step {
        Step::new(format!("const_{}", value), move |_: Args| async move { Ok(value) })
    }

    #[tokio::test]
    async fn test_steps_run_in_declaration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut wf = workflow();

        for name in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            wf.step(Step::new(name, move |args: Args| {
                let order = Arc::clone(&order);
                async move {
                    order.lock().unwrap().push(args.step().to_string());
                    Ok(())
                }
            }))
            .unwrap();
        }

        wf.run(validated("HB"), None, None).await.unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_result_reference_by_id_and_by_name() {
        let mut wf = workflow();
        let seven = wf.step(constant(7)).unwrap();
        wf.step(constant(5)).unwrap();
        wf.step(
            Step::new("sum", |args: Args| async move {
                Ok(*args.get::<u32>("a")? + *args.get::<u32>("b")?)
            })
            .param(Param::result_of("a", seven))
            .param(Param::result_of("b", "const_5")),
        )
        .unwrap();

        let result = wf.run(validated("HB"), None, None).await.unwrap();
        assert_eq!(result.downcast_ref::<u32>(), Some(&12));
    }

    #[test]
    fn test_invalid_step_references_are_rejected_at_registration() {
        let mut other = workflow();
        let foreign = other.step(constant(1)).unwrap();

        let mut wf = workflow();
        wf.step(constant(1)).unwrap();

        let cases: Vec<(&str, Param)> = vec![
            ("unknown name", Param::result_of("x", "missing")),
            ("own name", Param::result_of("x", "self_ref")),
            ("other workflow", Param::result_of("x", foreign)),
        ];

        for (name, param) in cases {
            let result = wf.step(Step::new("self_ref", |_: Args| async { Ok(()) }).param(param));
            assert!(
                matches!(result, Err(DefinitionError::InvalidStepReference { .. })),
                "case '{}': got {:?}",
                name,
                result
            );
        }
        assert_eq!(wf.steps().len(), 1);
    }

    #[test]
    fn test_reference_to_later_step_is_rejected() {
        let mut wf = workflow();
        let first = wf.step(constant(1)).unwrap();
        let second = wf.step(constant(2)).unwrap();

        let later = StepId {
            workflow: wf.id(),
            index: second.index() + 1,
        };
        let result = wf.step(Step::new("late", |_: Args| async { Ok(()) }).param(Param::result_of("x", later)));
        assert!(matches!(result, Err(DefinitionError::InvalidStepReference { .. })));

        assert!(wf
            .step(Step::new("ok", |_: Args| async { Ok(()) }).param(Param::result_of("x", first)))
            .is_ok());
    }

    #[test]
    fn test_duplicate_definitions() {
        let mut wf = workflow();
        wf.step(constant(1)).unwrap();
        assert!(matches!(wf.step(constant(1)), Err(DefinitionError::DuplicateStepName { .. })));

        wf.on_init(Step::new("init", |_: Args| async { Ok(()) })).unwrap();
        assert!(matches!(
            wf.on_init(Step::new("init", |_: Args| async { Ok(()) })),
            Err(DefinitionError::InitAlreadyDefined { .. })
        ));
    }

    #[test]
    fn test_init_hook_cannot_reference_steps() {
        let mut wf = workflow();
        let first = wf.step(constant(1)).unwrap();
        let result = wf.on_init(Step::new("init", |_: Args| async { Ok(()) }).param(Param::result_of("x", first)));
        assert!(matches!(result, Err(DefinitionError::InvalidStepReference { .. })));
        assert!(!wf.has_init());
    }

    #[tokio::test]
    async fn test_init_hook_seeds_dependencies() {
        let mut wf = workflow();
        wf.on_init(
            Step::new("init", |args: Args| async move {
                let event = args.get::<Sharpen>("event")?;
                args.context()?.add_named("pencil_type", event.pencil_type.clone());
                Ok(())
            })
            .param(Param::event("event"))
            .param(Param::context("ctx")),
        )
        .unwrap();
        wf.step(
            Step::new("read", |args: Args| async move {
                Ok(format!("sharpening {}", args.get::<String>("pencil_type")?))
            })
            .param(Param::named("pencil_type")),
        )
        .unwrap();

        let result = wf.run(validated("2B"), None, None).await.unwrap();
        assert_eq!(result.downcast_ref::<String>().unwrap(), "sharpening 2B");
    }

    #[tokio::test]
    async fn test_end_short_circuits_remaining_steps() {
        let ran_last = Arc::new(Mutex::new(false));
        let captured = Arc::new(Mutex::new(None));
        let mut wf = workflow();

        wf.step(constant(1)).unwrap();
        {
            let captured = Arc::clone(&captured);
            wf.step(
                Step::new("stop", move |args: Args| {
                    let captured = Arc::clone(&captured);
                    async move {
                        let ctx = args.context()?;
                        ctx.end(String::from("stopped"));
                        *captured.lock().unwrap() = Some(ctx);
                        Ok(99_u32)
                    }
                })
                .param(Param::context("ctx")),
            )
            .unwrap();
        }
        {
            let ran_last = Arc::clone(&ran_last);
            wf.step(Step::new("never", move |_: Args| {
                let ran_last = Arc::clone(&ran_last);
                async move {
                    *ran_last.lock().unwrap() = true;
                    Ok(())
                }
            }))
            .unwrap();
        }

        let result = wf.run(validated("HB"), None, None).await.unwrap();

        assert_eq!(result.downcast_ref::<String>().unwrap(), "stopped");
        assert!(!*ran_last.lock().unwrap());
        let ctx = captured.lock().unwrap().take().unwrap();
        assert_eq!(ctx.state(), RunState::Ended);
    }

    #[tokio::test]
    async fn test_result_precedence() {
        // No steps: unit
        let empty = workflow();
        assert!(empty.run(validated("HB"), None, None).await.unwrap().is::<()>());

        // set_result beats the last return value
        let mut wf = workflow();
        wf.step(
            Step::new("set", |args: Args| async move {
                args.context()?.set_result("explicit");
                Ok(1_u8)
            })
            .param(Param::context("ctx")),
        )
        .unwrap();
        wf.step(constant(2)).unwrap();
        let result = wf.run(validated("HB"), None, None).await.unwrap();
        assert_eq!(result.downcast_ref::<&str>(), Some(&"explicit"));
    }

    #[tokio::test]
    async fn test_set_result_after_end_does_not_replace_end_value() {
        let mut wf = workflow();
        wf.step(
            Step::new("stop", |args: Args| async move {
                let ctx = args.context()?;
                ctx.end("ended");
                ctx.set_result("overwritten");
                Ok(())
            })
            .param(Param::context("ctx")),
        )
        .unwrap();

        let result = wf.run(validated("HB"), None, None).await.unwrap();
        assert_eq!(result.downcast_ref::<&str>(), Some(&"ended"));
    }

    #[tokio::test]
    async fn test_context_does_not_outlive_its_run() {
        let captured = Arc::new(Mutex::new(None));
        let mut wf = workflow();
        {
            let captured = Arc::clone(&captured);
            wf.step(
                Step::new("escape", move |args: Args| {
                    let captured = Arc::clone(&captured);
                    async move {
                        let ctx = args.context()?;
                        ctx.add(ctx.clone());
                        ctx.add_named("ctx", ctx.clone());
                        ctx.set_result(ctx.clone());
                        *captured.lock().unwrap() = Some(ctx.clone());
                        Ok(ctx)
                    }
                })
                .param(Param::context("ctx")),
            )
            .unwrap();
        }
        wf.step(Step::new("explode", |_: Args| async { Err::<(), _>(anyhow::anyhow!("lead broke")) }))
            .unwrap();

        assert!(wf.run(validated("HB"), None, None).await.is_err());

        let ctx = captured.lock().unwrap().take().unwrap();
        assert!(ctx.resolve(&ResolutionKey::of::<OrchestrationContext>()).is_none());
        assert!(ctx.resolve(&ResolutionKey::named("ctx")).is_none());
        assert!(ctx.step_result(wf.steps()[0].id()).is_none());
        assert!(ctx.take_result().is_none());
    }

    #[tokio::test]
    async fn test_step_failure_stops_pipeline() {
        let mut wf = workflow();
        wf.step(Step::new("explode", |_: Args| async move {
            Err::<(), _>(anyhow::anyhow!("lead broke"))
        }))
        .unwrap();
        wf.step(constant(1)).unwrap();

        match wf.run(validated("HB"), None, None).await {
            Err(DispatchError::StepFailed { step, source, .. }) => {
                assert_eq!(step, "explode");
                assert_eq!(source.to_string(), "lead broke");
            }
            other => panic!("expected StepFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_dependency_fails_at_run_time() {
        let mut wf = workflow();
        wf.step(Step::new("needs_blade", |_: Args| async { Ok(()) }).param(Param::named("blade")))
            .unwrap();

        let err = wf.run(validated("HB"), None, None).await.unwrap_err();
        assert!(matches!(err, DispatchError::UnresolvedDependency { ref parameter, .. } if parameter == "blade"));

        let ok = wf
            .run(validated("HB"), Some(Dependencies::new().with_named("blade", 1_u8)), None)
            .await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn test_decorators_wrap_outermost_first() {
        struct Tag {
            label: &'static str,
            inner: Arc<dyn StepHandler>,
        }

        #[async_trait::async_trait]
        impl StepHandler for Tag {
            async fn call(&self, args: Args) -> anyhow::Result<Shared> {
                let inner = self.inner.call(args).await?;
                let text = inner.downcast_ref::<String>().cloned().unwrap_or_default();
                Ok(Shared::new(format!("{}({})", self.label, text)))
            }
        }

        fn tag(label: &'static str) -> impl StepDecorator {
            move |_: &str, inner: Arc<dyn StepHandler>| -> Arc<dyn StepHandler> { Arc::new(Tag { label, inner }) }
        }

        let mut wf = workflow();
        wf.step(
            Step::new("core", |_: Args| async { Ok(String::from("x")) })
                .decorate(tag("outer"))
                .decorate(tag("inner")),
        )
        .unwrap();

        let result = wf.run(validated("HB"), None, None).await.unwrap();
        assert_eq!(result.downcast_ref::<String>().unwrap(), "outer(inner(x))");
    }

    #[test]
    fn test_step_id_lookup_and_display() {
        let mut wf = workflow();
        let id = wf.step(constant(3)).unwrap();
        assert_eq!(wf.step_id("const_3"), Some(id));
        assert_eq!(wf.step_id("missing"), None);
        assert_eq!(id.to_string(), "step #0");
        assert_eq!(wf.steps()[0].name(), "const_3");
    }
}
