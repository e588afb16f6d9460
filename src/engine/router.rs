// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Top-level entry point: match an event to a workflow and run it.
//!
//! A [`Router`] owns its workflows. It is built once by the entry-point assembly
//! code and is read-only afterwards, so it can be shared through an `Arc` by any
//! number of concurrent invocations. Every invocation gets its own orchestration
//! context and dependency registry.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{RootHandlerPolicy, RouterConfig};
use crate::engine::matcher::SchemaMatcher;
use crate::engine::registry::Dependencies;
use crate::engine::transport::AdaptedHandler;
use crate::engine::value::Shared;
use crate::engine::workflow::Workflow;
use crate::errors::{DefinitionError, DispatchError};
use crate::observability::messages::router::{
    RootHandlerInvoked, RootHandlerReplaced, RouterConfigured,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{Event, EventHandler, HandlerDecorator, TransportAdapter};

type BareHandler = dyn Fn() -> Shared + Send + Sync;
type ContextualHandler = dyn Fn(&Event, &DispatchError) -> Shared + Send + Sync;

/// Last-resort handler for failures raised while a workflow runs.
///
/// Its return value becomes the result of `invoke`. Routing failures (no match,
/// ambiguous match) never reach it.
#[derive(Clone)]
pub enum RootExceptionHandler {
    /// Called with no arguments.
    Bare(Arc<BareHandler>),
    /// Called with the original event and the error.
    Contextual(Arc<ContextualHandler>),
}

impl RootExceptionHandler {
    pub fn bare<F, O>(handler: F) -> Self
    where
        F: Fn() -> O + Send + Sync + 'static,
        O: Any + Send + Sync,
    {
        RootExceptionHandler::Bare(Arc::new(move || Shared::new(handler())))
    }

    pub fn contextual<F, O>(handler: F) -> Self
    where
        F: Fn(&Event, &DispatchError) -> O + Send + Sync + 'static,
        O: Any + Send + Sync,
    {
        RootExceptionHandler::Contextual(Arc::new(move |event: &Event, error: &DispatchError| {
            Shared::new(handler(event, error))
        }))
    }

    fn handle(&self, event: &Event, error: &DispatchError) -> Shared {
        match self {
            RootExceptionHandler::Bare(handler) => handler(),
            RootExceptionHandler::Contextual(handler) => handler(event, error),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            RootExceptionHandler::Bare(_) => "bare",
            RootExceptionHandler::Contextual(_) => "contextual",
        }
    }
}

impl fmt::Debug for RootExceptionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RootExceptionHandler::{}", self.kind())
    }
}

pub struct Router {
    workflows: Vec<Workflow>,
    matcher: SchemaMatcher,
    root_handler: Option<RootExceptionHandler>,
    root_handler_policy: RootHandlerPolicy,
}

impl Router {
    /// Router with default (permissive, first-match) settings.
    pub fn new(workflows: Vec<Workflow>) -> Result<Self, DefinitionError> {
        Self::with_config(workflows, &RouterConfig::default())
    }

    /// Router with explicit matching and root handler policies.
    ///
    /// Workflows are tried in the order given.
    pub fn with_config(workflows: Vec<Workflow>, config: &RouterConfig) -> Result<Self, DefinitionError> {
        if workflows.is_empty() {
            return Err(DefinitionError::NoWorkflows);
        }

        for (index, workflow) in workflows.iter().enumerate() {
            if workflows[..index].iter().any(|w| w.name() == workflow.name()) {
                return Err(DefinitionError::DuplicateWorkflowName {
                    workflow: workflow.name().to_string(),
                });
            }
        }

        let matcher = SchemaMatcher::new(config.matching);
        matcher.check_registration(&workflows)?;

        RouterConfigured {
            workflow_count: workflows.len(),
            matching: config.matching,
            root_handler_policy: config.root_handler_policy,
        }
        .log();

        Ok(Self {
            workflows,
            matcher,
            root_handler: None,
            root_handler_policy: config.root_handler_policy,
        })
    }

    /// Workflow names in matching order.
    pub fn workflow_names(&self) -> impl Iterator<Item = &str> {
        self.workflows.iter().map(|w| w.name())
    }

    pub fn has_root_exception_handler(&self) -> bool {
        self.root_handler.is_some()
    }

    /// Register the root exception handler.
    ///
    /// With `RootHandlerPolicy::Overwrite` a second registration replaces the first;
    /// with `RootHandlerPolicy::Reject` it fails.
    pub fn register_root_exception_handler(
        &mut self,
        handler: RootExceptionHandler,
    ) -> Result<(), DefinitionError> {
        if let Some(previous) = &self.root_handler {
            if self.root_handler_policy == RootHandlerPolicy::Reject {
                return Err(DefinitionError::RootHandlerAlreadyRegistered);
            }
            RootHandlerReplaced {
                previous: previous.kind(),
                replacement: handler.kind(),
            }
            .log();
        }
        self.root_handler = Some(handler);
        Ok(())
    }

    /// Route `event` to its workflow and run it.
    ///
    /// - `platform`: platform invocation context, available to steps via the context
    /// - `deps`: dependencies registered before the init hook runs
    pub async fn invoke(
        &self,
        event: Event,
        platform: Option<Shared>,
        deps: Option<Dependencies>,
    ) -> Result<Shared, DispatchError> {
        let selected = self.matcher.select(&self.workflows, &event)?;

        match selected.workflow.run(selected.validated, deps, platform).await {
            Ok(result) => Ok(result),
            Err(error) => match &self.root_handler {
                Some(handler) => {
                    RootHandlerInvoked {
                        workflow: selected.workflow.name(),
                        handler: handler.kind(),
                        error: &error,
                    }
                    .log();
                    Ok(handler.handle(&event, &error))
                }
                None => Err(error),
            },
        }
    }

    /// Build the entry point: this router wrapped in `decorators`, outermost-first.
    pub fn create_handler(self: Arc<Self>, decorators: Vec<Arc<dyn HandlerDecorator>>) -> Arc<dyn EventHandler> {
        decorators
            .iter()
            .rev()
            .fold(self as Arc<dyn EventHandler>, |inner, decorator| decorator.decorate(inner))
    }

    /// Like [`Router::create_handler`], behind a transport adapter.
    pub fn create_handler_with<A: TransportAdapter>(
        self: Arc<Self>,
        adapter: A,
        decorators: Vec<Arc<dyn HandlerDecorator>>,
    ) -> AdaptedHandler<A> {
        AdaptedHandler::new(adapter, self.create_handler(decorators))
    }
}

#[async_trait]
impl EventHandler for Router {
    async fn handle(
        &self,
        event: Event,
        platform: Option<Shared>,
        deps: Option<Dependencies>,
    ) -> Result<Shared, DispatchError> {
        self.invoke(event, platform, deps).await
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("workflows", &self.workflow_names().collect::<Vec<_>>())
            .field("matching", &self.matcher.mode())
            .field("root_handler", &self.root_handler)
            .field("root_handler_policy", &self.root_handler_policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchMode;
    use crate::engine::params::{Args, Param};
    use crate::engine::workflow::Step;
    use crate::traits::SerdeSchema;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Deserialize)]
    struct Ping {
        #[allow(dead_code)]
        workflow: String,
    }

    fn workflow(name: &str, fail: bool) -> Workflow {
        let mut wf = Workflow::new(
            name,
            SerdeSchema::<Ping>::named(name).with_discriminator("workflow", name),
        );
        let label = name.to_string();
        wf.step(Step::new("only", move |_: Args| {
            let label = label.clone();
            async move {
                if fail {
                    anyhow::bail!("{} failed", label);
                }
                Ok(label)
            }
        }))
        .unwrap();
        wf
    }

    #[test]
    fn test_construction_errors() {
        assert!(matches!(Router::new(vec![]), Err(DefinitionError::NoWorkflows)));

        let duplicate = Router::new(vec![workflow("a", false), workflow("a", false)]);
        assert!(matches!(duplicate, Err(DefinitionError::DuplicateWorkflowName { .. })));

        let config = RouterConfig {
            matching: MatchMode::Strict,
            ..RouterConfig::default()
        };
        let twins = vec![
            Workflow::new("one", SerdeSchema::<Ping>::new().with_discriminator("workflow", "x")),
            Workflow::new("two", SerdeSchema::<Ping>::new().with_discriminator("workflow", "x")),
        ];
        assert!(matches!(
            Router::with_config(twins, &config),
            Err(DefinitionError::AmbiguousSchemas { .. })
        ));
    }

    #[tokio::test]
    async fn test_invoke_routes_by_schema() {
        let router = Router::new(vec![workflow("a", false), workflow("b", false)]).unwrap();
        assert_eq!(router.workflow_names().collect::<Vec<_>>(), vec!["a", "b"]);

        let result = router.invoke(json!({"workflow": "b"}), None, None).await.unwrap();
        assert_eq!(result.downcast_ref::<String>().unwrap(), "b");
    }

    #[tokio::test]
    async fn test_failure_without_root_handler_propagates() {
        let router = Router::new(vec![workflow("a", true)]).unwrap();
        let err = router.invoke(json!({"workflow": "a"}), None, None).await.unwrap_err();
        assert!(matches!(err, DispatchError::StepFailed { .. }));
    }

    #[tokio::test]
    async fn test_root_handler_result_replaces_failure() {
        let mut router = Router::new(vec![workflow("a", true)]).unwrap();
        router
            .register_root_exception_handler(RootExceptionHandler::bare(|| "recovered"))
            .unwrap();

        let result = router.invoke(json!({"workflow": "a"}), None, None).await.unwrap();
        assert_eq!(result.downcast_ref::<&str>(), Some(&"recovered"));
    }

    #[tokio::test]
    async fn test_contextual_root_handler_sees_event_and_error() {
        let mut router = Router::new(vec![workflow("a", true)]).unwrap();
        router
            .register_root_exception_handler(RootExceptionHandler::contextual(|event: &Event, error: &DispatchError| {
                format!("{} / {}", event["workflow"], error)
            }))
            .unwrap();

        let result = router.invoke(json!({"workflow": "a"}), None, None).await.unwrap();
        assert_eq!(
            result.downcast_ref::<String>().unwrap(),
            "\"a\" / step 'only' of workflow 'a' failed"
        );
    }

    #[tokio::test]
    async fn test_root_handler_does_not_see_routing_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut router = Router::new(vec![workflow("a", true)]).unwrap();
        {
            let calls = Arc::clone(&calls);
            router
                .register_root_exception_handler(RootExceptionHandler::bare(move || {
                    calls.fetch_add(1, Ordering::SeqCst);
                }))
                .unwrap();
        }

        let err = router.invoke(json!({"workflow": "zzz"}), None, None).await.unwrap_err();
        assert!(err.is_routing_failure());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_root_handler_registration_policies() {
        let mut overwrite = Router::new(vec![workflow("a", true)]).unwrap();
        overwrite
            .register_root_exception_handler(RootExceptionHandler::bare(|| 1_u8))
            .unwrap();
        overwrite
            .register_root_exception_handler(RootExceptionHandler::bare(|| 2_u8))
            .unwrap();
        let result = overwrite.invoke(json!({"workflow": "a"}), None, None).await.unwrap();
        assert_eq!(result.downcast_ref::<u8>(), Some(&2));

        let config = RouterConfig {
            root_handler_policy: RootHandlerPolicy::Reject,
            ..RouterConfig::default()
        };
        let mut reject = Router::with_config(vec![workflow("a", true)], &config).unwrap();
        reject
            .register_root_exception_handler(RootExceptionHandler::bare(|| 1_u8))
            .unwrap();
        assert_eq!(
            reject.register_root_exception_handler(RootExceptionHandler::bare(|| 2_u8)),
            Err(DefinitionError::RootHandlerAlreadyRegistered)
        );
        assert!(reject.has_root_exception_handler());
    }

    #[tokio::test]
    async fn test_platform_context_and_initial_deps_reach_steps() {
        let mut wf = Workflow::new("ctx", SerdeSchema::<Ping>::new());
        wf.step(
            Step::new("read", |args: Args| async move {
                let ctx = args.context()?;
                let request_id = ctx
                    .platform_context()
                    .and_then(|p| p.downcast_ref::<&str>().copied())
                    .unwrap_or("none");
                let region = args.get::<&str>("region")?;
                Ok(format!("{}@{}", request_id, region))
            })
            .param(Param::context("ctx"))
            .param(Param::named("region")),
        )
        .unwrap();
        let router = Router::new(vec![wf]).unwrap();

        let result = router
            .invoke(
                json!({"workflow": "any"}),
                Some(Shared::new("req-42")),
                Some(Dependencies::new().with_named("region", "eu-west-1")),
            )
            .await
            .unwrap();
        assert_eq!(result.downcast_ref::<String>().unwrap(), "req-42@eu-west-1");
    }

    #[tokio::test]
    async fn test_create_handler_applies_decorators_outermost_first() {
        struct Prefix {
            tag: &'static str,
            inner: Arc<dyn EventHandler>,
        }

        #[async_trait]
        impl EventHandler for Prefix {
            async fn handle(
                &self,
                event: Event,
                platform: Option<Shared>,
                deps: Option<Dependencies>,
            ) -> Result<Shared, DispatchError> {
                let result = self.inner.handle(event, platform, deps).await?;
                let text = result.downcast_ref::<String>().cloned().unwrap_or_default();
                Ok(Shared::new(format!("{}:{}", self.tag, text)))
            }
        }

        fn prefix(tag: &'static str) -> Arc<dyn HandlerDecorator> {
            Arc::new(move |inner: Arc<dyn EventHandler>| -> Arc<dyn EventHandler> {
                Arc::new(Prefix { tag, inner })
            })
        }

        let router = Arc::new(Router::new(vec![workflow("a", false)]).unwrap());
        let handler = router.create_handler(vec![prefix("outer"), prefix("inner")]);

        let result = handler.handle(json!({"workflow": "a"}), None, None).await.unwrap();
        assert_eq!(result.downcast_ref::<String>().unwrap(), "outer:inner:a");
    }
}
