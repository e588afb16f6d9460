// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The "sharpen pencils" router used by the binary and the integration tests.
//!
//! Two workflows, discriminated by the event's `workflow` field:
//!
//! * `sharpen_pencils` - init hook seeds `pencil_type` and a [`Sharpener`], then
//!   `gather -> sharpen -> inspect -> report`; `report` ends the run with a JSON summary
//! * `erase` - a single step that describes the erased page
//!
//! ```json
//! {"workflow": "sharpen_pencils", "pencil_type": "HB", "count": 3}
//! {"workflow": "erase", "page": 12}
//! ```

use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::RouterConfig;
use crate::engine::{Args, Param, RootExceptionHandler, Router, Step, Workflow};
use crate::errors::{DefinitionError, DispatchError};
use crate::traits::{Event, SerdeSchema};

pub const SHARPEN_PENCILS: &str = "sharpen_pencils";
pub const ERASE: &str = "erase";

#[derive(Debug, Clone, Deserialize)]
pub struct SharpenPencils {
    pub pencil_type: String,
    pub count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErasePage {
    pub page: u32,
    #[serde(default)]
    pub smudges: u32,
}

/// Resolved by type. Callers may pass their own through the invocation dependencies.
#[derive(Debug, Clone, PartialEq)]
pub struct Sharpener {
    pub blade: String,
}

impl Default for Sharpener {
    fn default() -> Self {
        Self {
            blade: "steel".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Inspection {
    pub summary: String,
    pub passed: bool,
}

pub fn sharpen_pencils_workflow() -> Result<Workflow, DefinitionError> {
    let mut workflow = Workflow::new(
        SHARPEN_PENCILS,
        SerdeSchema::<SharpenPencils>::named(SHARPEN_PENCILS).with_discriminator("workflow", SHARPEN_PENCILS),
    );

    workflow.on_init(
        Step::new("prepare", |args: Args| async move {
            let event = args.get::<SharpenPencils>("event")?;
            let ctx = args.context()?;
            ctx.add_named("pencil_type", event.pencil_type.clone());
            if args.optional::<Sharpener>("sharpener")?.is_none() {
                ctx.add(Sharpener::default());
            }
            Ok(())
        })
        .param(Param::event("event"))
        .param(Param::context("ctx"))
        .param(Param::typed::<Sharpener>("sharpener").optional()),
    )?;

    let gather = workflow.step(
        Step::new("gather", |args: Args| async move {
            let event = args.get::<SharpenPencils>("event")?;
            if event.count == 0 {
                anyhow::bail!("no {} pencils to sharpen", event.pencil_type);
            }
            Ok(event.count)
        })
        .param(Param::event("event")),
    )?;

    let sharpen = workflow.step(
        Step::new("sharpen", |args: Args| async move {
            let count = args.get::<u32>("count")?;
            let pencil_type = args.get::<String>("pencil_type")?;
            let sharpener = args.get::<Sharpener>("sharpener")?;
            Ok(format!(
                "sharpened {} {} pencils with a {} blade",
                count, pencil_type, sharpener.blade
            ))
        })
        .param(Param::result_of("count", gather))
        .param(Param::named("pencil_type"))
        .param(Param::typed::<Sharpener>("sharpener")),
    )?;

    let inspect = workflow.step(
        Step::new("inspect", |args: Args| async move {
            let sharpened = args.get::<String>("sharpened")?;
            Ok(Inspection {
                passed: !sharpened.is_empty(),
                summary: sharpened.to_string(),
            })
        })
        .param(Param::result_of("sharpened", sharpen)),
    )?;

    workflow.step(
        Step::new("report", |args: Args| async move {
            let inspection = args.get::<Inspection>("inspection")?;
            let pencil_type = args.get::<String>("pencil_type")?;
            args.context()?.end(json!({
                "workflow": SHARPEN_PENCILS,
                "pencil_type": pencil_type.as_str(),
                "summary": inspection.summary,
                "passed": inspection.passed,
            }));
            Ok(())
        })
        .param(Param::result_of("inspection", inspect))
        .param(Param::named("pencil_type"))
        .param(Param::context("ctx")),
    )?;

    Ok(workflow)
}

pub fn erase_workflow() -> Result<Workflow, DefinitionError> {
    let mut workflow = Workflow::new(
        ERASE,
        SerdeSchema::<ErasePage>::named(ERASE).with_discriminator("workflow", ERASE),
    );

    workflow.step(Step::new("erase", |args: Args| async move {
        let page = args.event::<ErasePage>()?;
        Ok(json!({
            "workflow": ERASE,
            "page": page.page,
            "smudges_removed": page.smudges,
        }))
    }))?;

    Ok(workflow)
}

/// Both workflows, plus a root exception handler that turns run failures into
/// a JSON error body.
pub fn sharpen_pencils_router(config: &RouterConfig) -> Result<Router, DefinitionError> {
    let mut router = Router::with_config(vec![sharpen_pencils_workflow()?, erase_workflow()?], config)?;
    router.register_root_exception_handler(RootExceptionHandler::contextual(error_body))?;
    Ok(router)
}

fn error_body(event: &Event, error: &DispatchError) -> Value {
    let cause = std::error::Error::source(error).map(|source| source.to_string());
    json!({
        "workflow": event.get("workflow").cloned().unwrap_or(Value::Null),
        "error": error.to_string(),
        "cause": cause,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_wiring() {
        let router = sharpen_pencils_router(&RouterConfig::default()).unwrap();
        assert_eq!(router.workflow_names().collect::<Vec<_>>(), vec![SHARPEN_PENCILS, ERASE]);
        assert!(router.has_root_exception_handler());

        let workflow = sharpen_pencils_workflow().unwrap();
        let names: Vec<&str> = workflow.steps().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["gather", "sharpen", "inspect", "report"]);
        assert!(workflow.has_init());
    }

    #[test]
    fn test_error_body_includes_cause() {
        let error = DispatchError::StepFailed {
            workflow: SHARPEN_PENCILS.to_string(),
            step: "gather".to_string(),
            source: anyhow::anyhow!("no HB pencils to sharpen"),
        };
        let body = error_body(&json!({"workflow": SHARPEN_PENCILS}), &error);
        assert_eq!(body["workflow"], json!(SHARPEN_PENCILS));
        assert_eq!(body["cause"], json!("no HB pencils to sharpen"));
    }
}
