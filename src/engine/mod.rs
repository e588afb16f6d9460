// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod context;
pub mod matcher;
pub mod params;
pub mod registry;
pub mod router;
pub mod transport;
pub mod value;
pub mod workflow;

pub use context::{OrchestrationContext, RunState};
pub use matcher::{Match, SchemaMatcher};
pub use params::{Args, Param, ParamSource, ResolutionPlan, StepRef};
pub use registry::{Dependencies, DependencyRegistry, ResolutionKey, TypeKey};
pub use router::{RootExceptionHandler, Router};
pub use transport::{AdaptedHandler, JsonPassthrough};
pub use value::Shared;
pub use workflow::{Step, StepDescriptor, StepId, Workflow, WorkflowId};
