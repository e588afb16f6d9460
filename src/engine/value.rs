// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Type-erased values passed between the router, the registry and steps.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A cheaply cloneable, type-erased value.
///
/// Every dependency in a registry, every step return value and every validated
/// event travels through the engine as a `Shared`. Cloning only bumps a reference
/// count, so a step result can sit in the registry and be handed back to the
/// caller at the same time.
///
/// # Examples
/// ```
/// use event_router::engine::Shared;
///
/// let value = Shared::new(String::from("HB"));
/// assert!(value.is::<String>());
/// assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("HB"));
/// assert!(value.downcast::<u32>().is_none());
/// ```
#[derive(Clone)]
pub struct Shared {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Shared {
    /// Wrap a value. Passing a `Shared` returns it unchanged rather than nesting it.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        let mut slot = Some(value);
        let erased: &mut dyn Any = &mut slot;
        if let Some(already_shared) = erased.downcast_mut::<Option<Shared>>() {
            if let Some(shared) = already_shared.take() {
                return shared;
            }
        }

        match slot {
            Some(value) => Self::from_arc(Arc::new(value)),
            None => Self::unit(),
        }
    }

    /// Wrap a value that is already reference counted.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            type_name: type_name::<T>(),
        }
    }

    /// The empty result, used when a workflow produces nothing.
    pub fn unit() -> Self {
        Self::from_arc(Arc::new(()))
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// `TypeId` of the wrapped concrete type.
    pub fn type_id(&self) -> TypeId {
        (*self.inner).type_id()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Get a shared handle to the wrapped value if it is a `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }
}

impl fmt::Debug for Shared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Shared").field(&self.type_name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downcast_matches_only_the_wrapped_type() {
        let value = Shared::new(42_u64);

        assert!(value.is::<u64>());
        assert!(!value.is::<u32>());
        assert_eq!(value.downcast::<u64>().as_deref(), Some(&42));
        assert!(value.downcast::<i64>().is_none());
        assert_eq!(value.type_id(), TypeId::of::<u64>());
        assert_eq!(value.type_name(), "u64");
    }

    #[test]
    fn test_wrapping_shared_does_not_nest() {
        let original = Shared::new(String::from("graphite"));
        let rewrapped = Shared::new(original.clone());

        assert!(rewrapped.is::<String>());
        assert_eq!(rewrapped.type_name(), original.type_name());
    }

    #[test]
    fn test_clones_point_at_the_same_value() {
        let value = Shared::new(vec![1, 2, 3]);
        let clone = value.clone();

        let a = value.downcast::<Vec<i32>>().unwrap();
        let b = clone.downcast::<Vec<i32>>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_unit_and_debug() {
        let unit = Shared::unit();
        assert!(unit.is::<()>());
        assert_eq!(format!("{:?}", unit), "Shared(\"()\")");
    }
}
