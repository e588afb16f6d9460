// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The validation seam: a schema either accepts a raw event and produces a typed
//! value, or rejects it.

use std::any::{type_name, Any};
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::engine::value::Shared;
use crate::errors::ValidationError;

/// A raw, untyped event as delivered by the transport adapter.
pub type Event = Value;

/// Structural description of the events a workflow accepts.
///
/// The matcher only relies on the accept/reject signal of [`Schema::validate`].
/// A discriminator is optional; when present it is used to detect workflows that
/// can never be told apart.
pub trait Schema: Send + Sync {
    fn name(&self) -> &str;

    /// Validate `event`, returning the typed form on success.
    fn validate(&self, event: &Event) -> Result<Shared, ValidationError>;

    /// `(field, value)` pair this schema requires, if it declares one.
    fn discriminator(&self) -> Option<(&str, &Value)> {
        None
    }
}

/// Schema backed by a `serde` type: an event is valid when it deserializes into `T`.
///
/// # Examples
/// ```
/// use event_router::traits::{Schema, SerdeSchema};
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Deserialize)]
/// struct Sharpen {
///     pencil_type: String,
/// }
///
/// let schema = SerdeSchema::<Sharpen>::named("sharpen")
///     .with_discriminator("workflow", "sharpen_pencils");
///
/// let typed = schema
///     .validate(&json!({"workflow": "sharpen_pencils", "pencil_type": "HB"}))
///     .unwrap();
/// assert_eq!(typed.downcast_ref::<Sharpen>().unwrap().pencil_type, "HB");
///
/// assert!(schema.validate(&json!({"workflow": "erase", "pencil_type": "HB"})).is_err());
/// ```
pub struct SerdeSchema<T> {
    name: String,
    discriminator: Option<(String, Value)>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SerdeSchema<T>
where
    T: DeserializeOwned + Any + Send + Sync,
{
    /// Schema named after `T`.
    pub fn new() -> Self {
        Self::named(type_name::<T>())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            discriminator: None,
            _marker: PhantomData,
        }
    }

    /// Require `field` to equal `value` before attempting deserialization.
    pub fn with_discriminator(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.discriminator = Some((field.into(), value.into()));
        self
    }
}

impl<T> Default for SerdeSchema<T>
where
    T: DeserializeOwned + Any + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Schema for SerdeSchema<T>
where
    T: DeserializeOwned + Any + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, event: &Event) -> Result<Shared, ValidationError> {
        if let Some((field, expected)) = &self.discriminator {
            let found = event.get(field);
            if found != Some(expected) {
                return Err(ValidationError::DiscriminatorMismatch {
                    schema: self.name.clone(),
                    field: field.clone(),
                    expected: expected.clone(),
                    found: found.cloned(),
                });
            }
        }

        <T as Deserialize<'_>>::deserialize(event)
            .map(Shared::new)
            .map_err(|e| ValidationError::Rejected {
                schema: self.name.clone(),
                reason: e.to_string(),
            })
    }

    fn discriminator(&self) -> Option<(&str, &Value)> {
        self.discriminator
            .as_ref()
            .map(|(field, value)| (field.as_str(), value))
    }
}
