// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::engine::params::Args;
use crate::engine::value::Shared;

/// One unit of work in a workflow (or its init hook).
///
/// Any `Fn(Args) -> impl Future<Output = anyhow::Result<T>>` is a step handler, so
/// most steps are plain async closures. Implement the trait directly for handlers
/// that carry state, such as decorators.
#[async_trait]
pub trait StepHandler: Send + Sync {
    async fn call(&self, args: Args) -> anyhow::Result<Shared>;
}

#[async_trait]
impl<F, Fut, O> StepHandler for F
where
    F: Fn(Args) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<O>> + Send + 'static,
    O: Any + Send + Sync,
{
    async fn call(&self, args: Args) -> anyhow::Result<Shared> {
        (self)(args).await.map(Shared::new)
    }
}

/// Wraps a step handler at registration time.
///
/// Receives the name of the step being decorated.
pub trait StepDecorator: Send + Sync {
    fn decorate(&self, step: &str, inner: Arc<dyn StepHandler>) -> Arc<dyn StepHandler>;
}

impl<F> StepDecorator for F
where
    F: Fn(&str, Arc<dyn StepHandler>) -> Arc<dyn StepHandler> + Send + Sync,
{
    fn decorate(&self, step: &str, inner: Arc<dyn StepHandler>) -> Arc<dyn StepHandler> {
        (self)(step, inner)
    }
}
