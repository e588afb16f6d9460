// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// A step asked its resolved arguments for something they do not hold.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgumentError {
    #[error("step '{step}' declares no parameter '{label}'")]
    UnknownParameter { step: String, label: String },

    #[error("optional parameter '{label}' of step '{step}' was not resolved")]
    Absent { step: String, label: String },

    #[error("parameter '{label}' of step '{step}' holds `{actual}`, not `{expected}`")]
    TypeMismatch {
        step: String,
        label: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("step '{step}' does not declare the orchestration context as a parameter")]
    NoContext { step: String },
}
