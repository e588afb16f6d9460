// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-execution dependency storage.
//!
//! A [`DependencyRegistry`] maps a [`ResolutionKey`] to a [`Shared`] value. It is
//! seeded by the caller's initial dependencies and the init hook, then grows by one
//! entry per completed step (the step's return value keyed by its [`StepId`]).
//!
//! Registries are only ever created inside a workflow run and are owned by that
//! run's orchestration context, so two invocations can never observe each other's
//! entries.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::engine::context::OrchestrationContext;
use crate::engine::value::Shared;
use crate::engine::workflow::StepId;
use crate::observability::messages::registry::{DependencyOverwritten, DependencyRejected};
use crate::observability::messages::StructuredLog;

/// A `TypeId` that remembers the type's name for diagnostics.
///
/// Equality and hashing only consider the `TypeId`.
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Key for whatever concrete type a `Shared` wraps.
    pub fn of_shared(value: &Shared) -> Self {
        Self {
            id: value.type_id(),
            name: value.type_name(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// How a value is found in a [`DependencyRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolutionKey {
    /// Registered by concrete type.
    Type(TypeKey),
    /// Registered under an explicit name.
    Name(String),
    /// Return value of a completed step.
    StepResult(StepId),
}

impl ResolutionKey {
    pub fn of<T: Any>() -> Self {
        ResolutionKey::Type(TypeKey::of::<T>())
    }

    pub fn named(name: impl Into<String>) -> Self {
        ResolutionKey::Name(name.into())
    }
}

impl fmt::Display for ResolutionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionKey::Type(key) => write!(f, "type `{}`", key.name()),
            ResolutionKey::Name(name) => write!(f, "name `{}`", name),
            ResolutionKey::StepResult(step) => write!(f, "result of {}", step),
        }
    }
}

/// An ordered batch of dependencies, used to seed a registry in one call.
///
/// # Examples
/// ```
/// use event_router::engine::{Dependencies, DependencyRegistry, ResolutionKey};
///
/// let deps = Dependencies::new()
///     .with(42_u32)
///     .with_named("pencil_type", String::from("HB"));
///
/// let mut registry = DependencyRegistry::new();
/// registry.add_many(deps);
///
/// assert!(registry.contains(&ResolutionKey::of::<u32>()));
/// assert!(registry.contains(&ResolutionKey::named("pencil_type")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Dependencies {
    entries: Vec<(ResolutionKey, Shared)>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value keyed by its concrete type.
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        let shared = Shared::new(value);
        self.entries
            .push((ResolutionKey::Type(TypeKey::of_shared(&shared)), shared));
        self
    }

    /// Add a value keyed by name.
    pub fn with_named<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        self.entries
            .push((ResolutionKey::Name(name.into()), Shared::new(value)));
        self
    }

    pub fn with_key(mut self, key: ResolutionKey, value: Shared) -> Self {
        self.entries.push((key, value));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Dependencies {
    type Item = (ResolutionKey, Shared);
    type IntoIter = std::vec::IntoIter<(ResolutionKey, Shared)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Mapping from resolution key to value for a single workflow execution.
#[derive(Default)]
pub struct DependencyRegistry {
    entries: HashMap<ResolutionKey, Shared>,
}

impl DependencyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under `key`, replacing any previous value.
    ///
    /// An orchestration context is never stored: the registry is owned by one, and
    /// steps reach it through `Param::context` instead.
    pub fn insert(&mut self, key: ResolutionKey, value: Shared) -> Option<Shared> {
        if value.is::<OrchestrationContext>() {
            DependencyRejected {
                key: &key,
                reason: "the orchestration context cannot be registered as a dependency",
            }
            .log();
            return None;
        }

        let previous = self.entries.insert(key.clone(), value);
        if let Some(previous) = &previous {
            DependencyOverwritten {
                key: &key,
                previous_type: previous.type_name(),
            }
            .log();
        }
        previous
    }

    /// Store a value keyed by its concrete type.
    pub fn add<T: Any + Send + Sync>(&mut self, value: T) {
        let shared = Shared::new(value);
        self.insert(ResolutionKey::Type(TypeKey::of_shared(&shared)), shared);
    }

    /// Store a value under an explicit name.
    pub fn add_named<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        self.insert(ResolutionKey::Name(name.into()), Shared::new(value));
    }

    pub fn add_many(&mut self, dependencies: Dependencies) {
        for (key, value) in dependencies {
            self.insert(key, value);
        }
    }

    pub fn resolve(&self, key: &ResolutionKey) -> Option<Shared> {
        self.entries.get(key).cloned()
    }

    pub fn contains(&self, key: &ResolutionKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for DependencyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyRegistry")
            .field("entry_count", &self.entries.len())
            .field(
                "keys",
                &self.entries.keys().map(|k| k.to_string()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
