//! Explicit pairings of GraphQL type names with Rust classes.

use std::any::Any;

use arcstr::ArcStr;
use derive_more::with_trait::{Display, Error};
use indexmap::IndexMap;

use crate::host::HostClass;

/// Error of registering a pairing in a [`SchemaMappingDictionary`].
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
pub enum DictionaryError {
    /// The GraphQL type is already paired with a class.
    #[display("GraphQL type `{name}` is already mapped to `{registered}`")]
    DuplicateType {
        /// Name of the GraphQL type.
        name: ArcStr,
        /// Class the GraphQL type is already paired with.
        registered: HostClass,
    },
    /// The class is already paired with another GraphQL type.
    #[display("Class `{class}` is already mapped to GraphQL type `{registered}`")]
    DuplicateClass {
        /// Class being paired.
        class: HostClass,
        /// GraphQL type the class is already paired with.
        registered: ArcStr,
    },
    /// The GraphQL union is already paired with a capability.
    #[display("GraphQL union `{name}` is already mapped to `{registered}`")]
    DuplicateUnion {
        /// Name of the GraphQL union.
        name: ArcStr,
        /// Capability the union is already paired with.
        registered: HostClass,
    },
    /// The capability is already paired with another GraphQL union.
    #[display("Capability `{capability}` is already mapped to GraphQL union `{registered}`")]
    DuplicateCapability {
        /// Capability being paired.
        capability: HostClass,
        /// GraphQL union the capability is already paired with.
        registered: ArcStr,
    },
}

/// Dictionary of explicit pairings between GraphQL types and Rust classes.
///
/// Required for every member of a GraphQL union (or implementation of a
/// GraphQL interface), as their classes can't be inferred from any field
/// signature.
#[derive(Clone, Debug, Default)]
pub struct SchemaMappingDictionary {
    types: IndexMap<ArcStr, HostClass>,
    unions: IndexMap<ArcStr, HostClass>,
}

impl SchemaMappingDictionary {
    /// Constructs a new empty [`SchemaMappingDictionary`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs the named GraphQL object type with `T`.
    ///
    /// # Errors
    ///
    /// If either the GraphQL type or `T` is already paired.
    pub fn register_type<T: Any>(
        &mut self,
        name: impl Into<ArcStr>,
    ) -> Result<&mut Self, DictionaryError> {
        self.register_type_class(name, HostClass::of::<T>())
    }

    /// Pairs the named GraphQL object type with the provided class.
    ///
    /// # Errors
    ///
    /// If either the GraphQL type or the class is already paired.
    pub fn register_type_class(
        &mut self,
        name: impl Into<ArcStr>,
        class: HostClass,
    ) -> Result<&mut Self, DictionaryError> {
        let name = name.into();
        if let Some(registered) = self.types.get(&name) {
            return Err(DictionaryError::DuplicateType {
                name,
                registered: *registered,
            });
        }
        if let Some(registered) = self.type_name(class) {
            return Err(DictionaryError::DuplicateClass {
                class,
                registered: registered.clone(),
            });
        }
        self.types.insert(name, class);
        Ok(self)
    }

    /// Pairs the named GraphQL union (or interface) with the `C` capability.
    ///
    /// # Errors
    ///
    /// If either the GraphQL union or `C` is already paired.
    pub fn register_union<C: ?Sized + 'static>(
        &mut self,
        name: impl Into<ArcStr>,
    ) -> Result<&mut Self, DictionaryError> {
        let name = name.into();
        let capability = HostClass::of::<C>();
        if let Some(registered) = self.unions.get(&name) {
            return Err(DictionaryError::DuplicateUnion {
                name,
                registered: *registered,
            });
        }
        if let Some((registered, _)) = self.unions.iter().find(|(_, c)| **c == capability) {
            return Err(DictionaryError::DuplicateCapability {
                capability,
                registered: registered.clone(),
            });
        }
        self.unions.insert(name, capability);
        Ok(self)
    }

    /// Returns the class paired with the named GraphQL type.
    pub fn type_class(&self, name: &str) -> Option<HostClass> {
        self.types.get(name).copied()
    }

    /// Returns the name of the GraphQL type paired with the class.
    pub fn type_name(&self, class: HostClass) -> Option<&ArcStr> {
        self.types
            .iter()
            .find_map(|(name, c)| (*c == class).then_some(name))
    }

    /// Returns the capability paired with the named GraphQL union.
    pub fn union_capability(&self, name: &str) -> Option<HostClass> {
        self.unions.get(name).copied()
    }

    /// Returns all the GraphQL object type pairings, in registration order.
    pub fn types(&self) -> impl Iterator<Item = (&ArcStr, HostClass)> {
        self.types.iter().map(|(n, c)| (n, *c))
    }

    /// Returns all the GraphQL union pairings, in registration order.
    pub fn unions(&self) -> impl Iterator<Item = (&ArcStr, HostClass)> {
        self.unions.iter().map(|(n, c)| (n, *c))
    }
}
