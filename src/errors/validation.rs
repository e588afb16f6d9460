// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;
use thiserror::Error;

/// A schema rejected an event.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The discriminator field is missing or holds another value.
    #[error("schema '{schema}' requires '{field}' = {expected}, found {}", describe_found(.found))]
    DiscriminatorMismatch {
        schema: String,
        field: String,
        expected: Value,
        found: Option<Value>,
    },

    /// The event does not have the structure the schema describes.
    #[error("schema '{schema}' rejected the event: {reason}")]
    Rejected { schema: String, reason: String },
}

fn describe_found(found: &Option<Value>) -> String {
    match found {
        Some(value) => value.to_string(),
        None => "nothing".to_string(),
    }
}
