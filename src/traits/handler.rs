// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use async_trait::async_trait;

use crate::engine::registry::Dependencies;
use crate::engine::value::Shared;
use crate::errors::DispatchError;
use crate::traits::schema::Event;

/// The entry point produced by `Router::create_handler`.
///
/// `Router` implements this directly; handler decorators wrap one `EventHandler`
/// in another.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Dispatch one event.
    ///
    /// - `event`: raw event from the transport adapter
    /// - `platform`: platform invocation context, made available to steps
    /// - `deps`: dependencies seeded into the run before the init hook
    async fn handle(
        &self,
        event: Event,
        platform: Option<Shared>,
        deps: Option<Dependencies>,
    ) -> Result<Shared, DispatchError>;
}

/// Wraps the router's entry point, e.g. for logging or auth checks.
pub trait HandlerDecorator: Send + Sync {
    fn decorate(&self, inner: Arc<dyn EventHandler>) -> Arc<dyn EventHandler>;
}

impl<F> HandlerDecorator for F
where
    F: Fn(Arc<dyn EventHandler>) -> Arc<dyn EventHandler> + Send + Sync,
{
    fn decorate(&self, inner: Arc<dyn EventHandler>) -> Arc<dyn EventHandler> {
        (self)(inner)
    }
}

/// Converts between a platform's invocation format and the router's.
pub trait TransportAdapter: Send + Sync {
    type Payload: Send;
    type Response: Send;

    /// Split an invocation payload into the raw event and the platform context.
    fn decode(&self, payload: Self::Payload) -> (Event, Option<Shared>);

    /// Turn the router's outcome into the platform response.
    fn encode(&self, outcome: Result<Shared, DispatchError>) -> Self::Response;
}
