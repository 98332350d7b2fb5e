//! Compiled dispatch table handed to a query engine.

mod field;
mod type_resolver;

use arcstr::ArcStr;
use indexmap::IndexMap;
use static_assertions as sa;

use crate::wiring::MappingItem;

pub use self::{
    field::{ArgumentDefinition, FieldDispatcher, Receiver},
    type_resolver::{TypeResolver, UnregisteredUnionValue},
};

sa::assert_impl_all!(FieldDispatcher: Send, Sync);
sa::assert_impl_all!(TypeResolver: Send, Sync);
sa::assert_impl_all!(RuntimeWiring: Send, Sync);

/// Compiled resolution of a single GraphQL type.
#[derive(Debug, Default)]
pub struct TypeWiring {
    fields: IndexMap<ArcStr, FieldDispatcher>,
    type_resolver: Option<TypeResolver>,
}

impl TypeWiring {
    /// Returns the [`FieldDispatcher`] of the named field.
    pub fn field(&self, name: &str) -> Option<&FieldDispatcher> {
        self.fields.get(name)
    }

    /// Returns all the [`FieldDispatcher`]s of this type, in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&ArcStr, &FieldDispatcher)> {
        self.fields.iter()
    }

    /// Returns the [`TypeResolver`] of this union (or interface) type.
    pub fn type_resolver(&self) -> Option<&TypeResolver> {
        self.type_resolver.as_ref()
    }
}

/// Compiled dispatch table of a whole schema, produced by a
/// [`RuntimeWiringGenerator`].
///
/// Immutable, and safe to share between any number of concurrently executing
/// queries.
///
/// [`RuntimeWiringGenerator`]: crate::RuntimeWiringGenerator
#[derive(Debug)]
pub struct RuntimeWiring {
    types: IndexMap<ArcStr, TypeWiring>,
    bindings: IndexMap<ArcStr, MappingItem>,
}

impl RuntimeWiring {
    /// Returns the [`TypeWiring`] of the named type.
    pub fn type_wiring(&self, name: &str) -> Option<&TypeWiring> {
        self.types.get(name)
    }

    /// Returns all the wired types, in binding order.
    pub fn types(&self) -> impl Iterator<Item = (&ArcStr, &TypeWiring)> {
        self.types.iter()
    }

    /// Returns the [`FieldDispatcher`] of the named field of the named type.
    pub fn dispatcher(&self, type_name: &str, field: &str) -> Option<&FieldDispatcher> {
        self.type_wiring(type_name)?.field(field)
    }

    /// Returns the [`TypeResolver`] of the named union (or interface).
    pub fn type_resolver(&self, type_name: &str) -> Option<&TypeResolver> {
        self.type_wiring(type_name)?.type_resolver()
    }

    /// Returns what every bound GraphQL type is bound to, in binding order.
    ///
    /// Root operation types and scalars are not included.
    pub fn bindings(&self) -> &IndexMap<ArcStr, MappingItem> {
        &self.bindings
    }

    /// Returns what the named GraphQL type is bound to.
    pub fn binding(&self, type_name: &str) -> Option<MappingItem> {
        self.bindings.get(type_name).copied()
    }
}

/// Accumulator of a [`RuntimeWiring`] under construction.
#[derive(Debug, Default)]
pub(crate) struct RuntimeWiringBuilder {
    types: IndexMap<ArcStr, TypeWiring>,
}

impl RuntimeWiringBuilder {
    pub(crate) fn field(&mut self, dispatcher: FieldDispatcher) {
        let type_name = ArcStr::from(dispatcher.type_name());
        let field_name = ArcStr::from(dispatcher.field_name());
        self.types
            .entry(type_name)
            .or_default()
            .fields
            .insert(field_name, dispatcher);
    }

    pub(crate) fn type_resolver(&mut self, resolver: TypeResolver) {
        let type_name = ArcStr::from(resolver.abstract_type());
        self.types.entry(type_name).or_default().type_resolver = Some(resolver);
    }

    pub(crate) fn build(self, bindings: IndexMap<ArcStr, MappingItem>) -> RuntimeWiring {
        RuntimeWiring {
            types: self.types,
            bindings,
        }
    }
}
