//! Whole schema document, keyed by type name.

use arcstr::ArcStr;
use indexmap::IndexMap;

use crate::{
    ast::OperationType,
    schema::meta::{MetaType, ObjectMeta},
};

/// Root operation types of a schema, as declared by its `schema { ... }`
/// definition.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SchemaDefinition {
    /// Name of the query root type.
    pub query: Option<ArcStr>,
    /// Name of the mutation root type.
    pub mutation: Option<ArcStr>,
    /// Name of the subscription root type.
    pub subscription: Option<ArcStr>,
}

impl SchemaDefinition {
    /// Returns all the declared root operation types, in the canonical
    /// order (query, mutation, subscription).
    pub fn operation_types(&self) -> impl Iterator<Item = (OperationType, &ArcStr)> {
        [
            (OperationType::Query, &self.query),
            (OperationType::Mutation, &self.mutation),
            (OperationType::Subscription, &self.subscription),
        ]
        .into_iter()
        .filter_map(|(op, name)| Some((op, name.as_ref()?)))
    }
}

/// Parsed GraphQL schema: type definitions keyed by name, and the schema
/// definition declaring root operation types.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchemaDocument {
    types: IndexMap<ArcStr, MetaType>,
    schema_definition: Option<SchemaDefinition>,
}

impl SchemaDocument {
    /// Constructs a new empty [`SchemaDocument`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the provided type definition, returning the replaced definition
    /// of the same name, if any.
    pub fn add_type(&mut self, meta: MetaType) -> Option<MetaType> {
        self.types.insert(meta.name().clone(), meta)
    }

    /// Adds the provided type definition, replacing any definition of the same
    /// name.
    #[must_use]
    pub fn with_type(mut self, meta: MetaType) -> Self {
        self.add_type(meta);
        self
    }

    /// Sets the schema definition.
    #[must_use]
    pub fn with_schema_definition(mut self, definition: SchemaDefinition) -> Self {
        self.schema_definition = Some(definition);
        self
    }

    /// Sets the schema definition.
    pub fn set_schema_definition(&mut self, definition: SchemaDefinition) {
        self.schema_definition = Some(definition);
    }

    /// Returns the schema definition, if any was declared.
    pub fn schema_definition(&self) -> Option<&SchemaDefinition> {
        self.schema_definition.as_ref()
    }

    /// Get a type by name.
    pub fn type_by_name(&self, name: &str) -> Option<&MetaType> {
        self.types.get(name)
    }

    /// Get a list of types.
    pub fn types(&self) -> impl Iterator<Item = &MetaType> {
        self.types.values()
    }

    /// Returns all the object types declaring to implement the named
    /// interface, in declaration order.
    pub fn implementers_of<'s>(
        &'s self,
        interface: &'s str,
    ) -> impl Iterator<Item = &'s ObjectMeta> {
        self.types.values().filter_map(move |t| match t {
            MetaType::Object(o) if o.interface_names.iter().any(|i| i == interface) => Some(o),
            _ => None,
        })
    }
}
