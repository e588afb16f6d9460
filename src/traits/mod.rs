// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod handler;
pub mod schema;
pub mod step;

pub use handler::{EventHandler, HandlerDecorator, TransportAdapter};
pub use schema::{Event, Schema, SerdeSchema};
pub use step::{StepDecorator, StepHandler};
