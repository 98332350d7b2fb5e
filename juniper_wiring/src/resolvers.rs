//! Registered resolver handlers and the source of their instances.

use std::any::Any;

use derive_more::with_trait::{Display, Error};
use fnv::FnvHashMap;
use indexmap::IndexMap;

use crate::{
    host::{HostClass, MethodDescriptor},
    util::names_match,
    value::Value,
};

/// Resolver handler: a Rust type whose methods resolve GraphQL fields.
#[derive(Clone, Debug)]
pub struct Handler {
    class: HostClass,
    methods: Vec<MethodDescriptor>,
}

impl Handler {
    /// Starts describing `T` as a resolver handler.
    pub fn of<T: Any>() -> Self {
        Self {
            class: HostClass::of::<T>(),
            methods: Vec::new(),
        }
    }

    /// Adds a resolving method to this handler.
    #[must_use]
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// Returns the class of this handler.
    pub fn class(&self) -> HostClass {
        self.class
    }

    /// Returns the resolving methods of this handler.
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    fn merge(&mut self, other: Self) {
        self.methods.extend(other.methods);
    }
}

/// Registry of resolver [`Handler`]s.
///
/// Root handlers resolve the fields of root operation types. Type handlers
/// resolve fields of object types, and are keyed by the capability of the
/// type (or the type itself, if it declares no capability).
#[derive(Clone, Debug, Default)]
pub struct HandlerRegistry {
    root: Vec<Handler>,
    types: IndexMap<HostClass, Vec<Handler>>,
}

impl HandlerRegistry {
    /// Constructs a new empty [`HandlerRegistry`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a root [`Handler`].
    ///
    /// Methods of handlers of the same class are merged together.
    pub fn register_root(&mut self, handler: Handler) -> &mut Self {
        Self::insert(&mut self.root, handler);
        self
    }

    /// Registers a [`Handler`] resolving fields of the types addressed by
    /// `K` (either a capability, or a concrete class).
    pub fn register_type_resolver<K>(&mut self, handler: Handler) -> &mut Self
    where
        K: ?Sized + 'static,
    {
        self.register_type_resolver_for(HostClass::of::<K>(), handler)
    }

    /// Registers a [`Handler`] resolving fields of the types addressed by the
    /// provided `key`.
    pub fn register_type_resolver_for(&mut self, key: HostClass, handler: Handler) -> &mut Self {
        Self::insert(self.types.entry(key).or_default(), handler);
        self
    }

    fn insert(handlers: &mut Vec<Handler>, handler: Handler) {
        match handlers.iter_mut().find(|h| h.class == handler.class) {
            Some(existing) => existing.merge(handler),
            None => handlers.push(handler),
        }
    }

    /// Indicates whether any root [`Handler`] is registered.
    pub fn has_root_resolvers(&self) -> bool {
        !self.root.is_empty()
    }

    /// Returns the classes of all the root [`Handler`]s.
    pub fn root_classes(&self) -> Vec<HostClass> {
        self.root.iter().map(Handler::class).collect()
    }

    /// Returns the classes of all the [`Handler`]s registered for any of the
    /// provided keys.
    pub fn type_classes(&self, keys: &[HostClass]) -> Vec<HostClass> {
        self.type_handlers(keys).map(Handler::class).collect()
    }

    pub(crate) fn root_candidates(&self, field: &str) -> Vec<(&Handler, &MethodDescriptor)> {
        Self::candidates(self.root.iter(), field)
    }

    pub(crate) fn type_candidates(
        &self,
        keys: &[HostClass],
        field: &str,
    ) -> Vec<(&Handler, &MethodDescriptor)> {
        Self::candidates(self.type_handlers(keys), field)
    }

    fn type_handlers(&self, keys: &[HostClass]) -> impl Iterator<Item = &Handler> {
        keys.iter()
            .filter_map(|k| self.types.get(k))
            .flatten()
    }

    fn candidates<'h>(
        handlers: impl Iterator<Item = &'h Handler>,
        field: &str,
    ) -> Vec<(&'h Handler, &'h MethodDescriptor)> {
        handlers
            .flat_map(|h| {
                h.methods
                    .iter()
                    .filter(|m| names_match(m.name(), field))
                    .map(move |m| (h, m))
            })
            .collect()
    }
}

/// Error of obtaining an instance of a [`Handler`].
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
#[display("No instance of `{class}` is available")]
pub struct InstanceUnavailable {
    /// Class of the [`Handler`] whose instance was requested.
    pub class: HostClass,
}

/// Source of [`Handler`] instances.
///
/// Consulted once per bound handler method while the wiring is generated. The
/// obtained instance is then shared by every invocation of the method.
pub trait InstanceProvider {
    /// Returns an instance of the provided [`Handler`].
    ///
    /// # Errors
    ///
    /// If no instance can be provided.
    fn instance(&self, handler: &Handler) -> Result<Value, InstanceUnavailable>;
}

impl<F> InstanceProvider for F
where
    F: Fn(&Handler) -> Result<Value, InstanceUnavailable>,
{
    fn instance(&self, handler: &Handler) -> Result<Value, InstanceUnavailable> {
        self(handler)
    }
}

/// [`InstanceProvider`] holding one ready instance per [`Handler`] class.
#[derive(Clone, Debug, Default)]
pub struct Instances {
    items: FnvHashMap<HostClass, Value>,
}

impl Instances {
    /// Constructs a new empty [`Instances`] provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the provided instance, replacing any previous one of the same class.
    pub fn insert<T: Any + Send + Sync>(&mut self, instance: T) -> &mut Self {
        self.items.insert(HostClass::of::<T>(), Value::new(instance));
        self
    }

    /// Adds the provided instance, replacing any previous one of the same class.
    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, instance: T) -> Self {
        self.insert(instance);
        self
    }
}

impl InstanceProvider for Instances {
    fn instance(&self, handler: &Handler) -> Result<Value, InstanceUnavailable> {
        self.items
            .get(&handler.class())
            .cloned()
            .ok_or(InstanceUnavailable {
                class: handler.class(),
            })
    }
}
