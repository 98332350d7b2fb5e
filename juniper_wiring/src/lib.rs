#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

#[doc(hidden)]
#[macro_use]
mod macros;
mod ast;
pub mod coercion;
mod dictionary;
pub mod dispatch;
pub mod host;
pub mod mapping;
mod resolvers;
mod scalars;
pub mod schema;
mod util;
mod value;
pub mod wiring;

#[cfg(test)]
mod wiring_tests;

#[doc(inline)]
pub use futures::future::BoxFuture;

pub use crate::{
    ast::{OperationType, Type},
    coercion::{CoercionError, InputCoercer, JsonCoercer},
    dictionary::{DictionaryError, SchemaMappingDictionary},
    dispatch::{
        ArgumentDefinition, FieldDispatcher, Receiver, RuntimeWiring, TypeResolver, TypeWiring,
        UnregisteredUnionValue,
    },
    host::{
        EnumDescriptor, HostClass, HostType, LookupError, Marker, MethodDescriptor,
        PropertyDescriptor, RegistrationError, TypeDescriptor, TypeDescriptorRegistry,
    },
    mapping::{Candidate, CandidateKind, MappingContext, MappingError, MappingType},
    resolvers::{Handler, HandlerRegistry, InstanceProvider, InstanceUnavailable, Instances},
    scalars::ScalarTable,
    schema::{SchemaLanguageError, model::SchemaDocument},
    value::{Arguments, Environment, FieldError, FieldResult, Resolved, Value},
    wiring::{MappingItem, MappingRegistry, RuntimeWiringGenerator},
};

/// Binds the schema to the described Rust code with the default scalars and
/// input coercion.
///
/// Shortcut for [`RuntimeWiringGenerator::new()`] followed by
/// [`RuntimeWiringGenerator::generate()`].
///
/// # Errors
///
/// With the first [`MappingError`] encountered.
pub fn generate_runtime_wiring(
    schema: &SchemaDocument,
    descriptors: &TypeDescriptorRegistry,
    resolvers: HandlerRegistry,
    dictionary: &SchemaMappingDictionary,
    instances: &dyn InstanceProvider,
) -> Result<RuntimeWiring, MappingError> {
    RuntimeWiringGenerator::new(schema, descriptors, resolvers, dictionary, instances).generate()
}
