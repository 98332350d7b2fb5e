use std::fmt;

use arcstr::ArcStr;
use derive_more::with_trait::{Display, Error};
use itertools::Itertools as _;

use crate::{
    ast::Type,
    host::{HostClass, HostType, LookupError, Marker},
    mapping::MappingContext,
    resolvers::InstanceUnavailable,
    schema::meta::DefinitionKind,
};

/// Category of a Rust class, as far as the binding is concerned.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum MappingType {
    /// Class representing a scalar.
    #[display("a built-in class")]
    BuiltInClass,
    /// Described object or input class.
    #[display("a custom class")]
    CustomClass,
    /// Described enum class.
    #[display("an enum")]
    Enum,
    /// Capability shared by several classes.
    #[display("an interface")]
    Interface,
    /// List of values.
    #[display("a list")]
    Iterable,
}

/// Kind of a Rust member competing for a GraphQL field.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum CandidateKind {
    /// Property of the bound class.
    #[display("property")]
    Property,
    /// Method of the bound class.
    #[display("method")]
    Method,
    /// Method of a resolver handler registered for the bound class.
    #[display("resolver method")]
    Resolver,
}

/// Rust member competing for a GraphQL field.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[display("{class} {kind} {member}")]
pub struct Candidate {
    /// Class declaring the member.
    pub class: HostClass,
    /// Kind of the member.
    pub kind: CandidateKind,
    /// Name or signature of the member.
    pub member: String,
}

/// Error of binding a schema to Rust code.
///
/// Every variant is fatal for the binding pass, and renders as a headline
/// followed by the coordinates of the binding step that failed.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MappingError {
    /// The schema declares no `schema { ... }` definition.
    SchemaDefinitionNotProvided,

    /// No root resolver handler is registered.
    RootResolversNotRegistered,

    /// A referenced GraphQL type is not defined by the schema.
    TypeDefinitionNotFound {
        /// Name of the referenced type.
        type_name: ArcStr,
        /// Binding step referencing the type.
        context: Option<MappingContext>,
    },

    /// No root handler method resolves a root field.
    HandlerNotFound {
        /// Binding step that failed.
        context: MappingContext,
        /// Classes of all the root handlers.
        resolvers: Vec<HostClass>,
    },

    /// No member of the bound class, or of its resolvers, resolves a field.
    FieldNotFound {
        /// Binding step that failed.
        context: MappingContext,
        /// Bound class.
        class: HostClass,
        /// Classes of the resolver handlers consulted.
        resolvers: Vec<HostClass>,
    },

    /// No property of the bound input class accepts an input value.
    InputFieldNotFound {
        /// Binding step that failed.
        context: MappingContext,
        /// Bound input class.
        class: HostClass,
    },

    /// More than one member is able to resolve a field.
    AmbiguousField {
        /// Binding step that failed.
        context: MappingContext,
        /// All the competing members.
        candidates: Vec<Candidate>,
    },

    /// The bound member declares a different number of arguments than the
    /// field.
    IncorrectArgumentCount {
        /// Binding step that failed.
        context: MappingContext,
        /// Kind of the bound member.
        kind: CandidateKind,
        /// Number of arguments the member declares.
        provided: usize,
        /// Number of arguments the field requires.
        required: usize,
        /// Parameter list the member is expected to declare.
        suggested: String,
    },

    /// The leading parameter of a resolver method is not the bound class.
    InvalidSourceArgument {
        /// Binding step that failed.
        context: MappingContext,
        /// Class of the leading parameter.
        provided: HostClass,
        /// Class the leading parameter is required to be.
        required: HostClass,
    },

    /// The Rust type is not compatible with the GraphQL type.
    IncorrectClassMapping {
        /// Binding step that failed.
        context: MappingContext,
        /// GraphQL type being bound.
        graphql_type: Type,
        /// Category of the provided class, if it differs from the required one.
        provided_kind: Option<MappingType>,
        /// Category of the required class, if it differs from the provided one.
        required_kind: Option<MappingType>,
        /// Provided class.
        provided: HostClass,
        /// Classes allowed to represent the GraphQL type, if they are known.
        supported: Vec<HostClass>,
    },

    /// A declared scalar has no entry in the scalar table.
    ScalarNotSupported {
        /// Binding step that failed.
        context: MappingContext,
        /// Name of the scalar.
        scalar: ArcStr,
    },

    /// The Rust enum lacks some values of the GraphQL enum.
    MissingEnumValues {
        /// Binding step that failed.
        context: MappingContext,
        /// Name of the GraphQL enum.
        enum_name: ArcStr,
        /// Rust enum class.
        class: HostClass,
        /// Names of the missing values, sorted.
        missing: Vec<ArcStr>,
    },

    /// A member of a GraphQL union (or an implementation of a GraphQL
    /// interface) is not paired with any class.
    UnionMemberNotMapped {
        /// Binding step that failed.
        context: MappingContext,
        /// Name of the member object type.
        object_type: ArcStr,
        /// Name of the union (or interface).
        union_type: ArcStr,
    },

    /// The class paired with a member of a GraphQL union doesn't implement
    /// the capability the union is bound to.
    IncorrectImplementation {
        /// Binding step that failed.
        context: MappingContext,
        /// Name of the member object type.
        object_type: ArcStr,
        /// Class paired with the member object type.
        implementation: HostClass,
        /// Capability the union is bound to.
        capability: HostClass,
    },

    /// A GraphQL type is bound to two different classes.
    MappingConflict {
        /// Binding step that failed.
        context: Option<MappingContext>,
        /// Kind of the GraphQL type.
        kind: DefinitionKind,
        /// Name of the GraphQL type.
        type_name: ArcStr,
        /// Class the type is being bound to.
        provided: HostClass,
        /// Class the type is already bound to.
        registered: HostClass,
        /// Binding step which bound the type first, if it's known.
        registered_at: Option<MappingContext>,
    },

    /// The class is not described in the required role.
    NotIntrospectable {
        /// Binding step that failed.
        context: MappingContext,
        /// Class being looked up.
        class: HostClass,
        /// Required role.
        marker: Marker,
    },

    /// No described class implements the capability.
    ImplementationNotFound {
        /// Binding step that failed.
        context: MappingContext,
        /// Capability being looked up.
        capability: HostClass,
    },

    /// More than one described class implements the capability.
    MultipleImplementations {
        /// Binding step that failed.
        context: MappingContext,
        /// Capability being looked up.
        capability: HostClass,
        /// All the implementing classes, sorted.
        implementations: Vec<HostClass>,
    },

    /// The GraphQL type can't be used where it's referenced.
    UnsupportedTypeDefinition {
        /// Binding step that failed.
        context: Option<MappingContext>,
        /// Kind of the GraphQL type.
        kind: DefinitionKind,
        /// Name of the GraphQL type.
        type_name: ArcStr,
        /// Description of the usage, like `an output type`.
        usage: &'static str,
    },

    /// The input coercer is not able to produce values of a parameter type.
    UnsupportedInputClass {
        /// Binding step that failed.
        context: MappingContext,
        /// Declared parameter type.
        ty: HostType,
    },

    /// No instance of a resolver handler is available.
    InstanceUnavailable {
        /// Binding step that failed.
        context: MappingContext,
        /// Failure of the instance provider.
        source: InstanceUnavailable,
    },
}

impl MappingError {
    /// Attaches the binding step to a [`LookupError`].
    pub fn from_lookup(err: LookupError, context: &MappingContext) -> Self {
        let context = context.clone();
        match err {
            LookupError::NotIntrospectable { class, marker } => Self::NotIntrospectable {
                context,
                class,
                marker,
            },
            LookupError::ImplementationNotFound { capability } => {
                Self::ImplementationNotFound {
                    context,
                    capability,
                }
            }
            LookupError::MultipleImplementations {
                capability,
                implementations,
            } => Self::MultipleImplementations {
                context,
                capability,
                implementations,
            },
        }
    }

    /// Returns the binding step this error occurred at, if any.
    pub fn context(&self) -> Option<&MappingContext> {
        match self {
            Self::SchemaDefinitionNotProvided | Self::RootResolversNotRegistered => None,
            Self::TypeDefinitionNotFound { context, .. }
            | Self::MappingConflict { context, .. }
            | Self::UnsupportedTypeDefinition { context, .. } => context.as_ref(),
            Self::HandlerNotFound { context, .. }
            | Self::FieldNotFound { context, .. }
            | Self::InputFieldNotFound { context, .. }
            | Self::AmbiguousField { context, .. }
            | Self::IncorrectArgumentCount { context, .. }
            | Self::InvalidSourceArgument { context, .. }
            | Self::IncorrectClassMapping { context, .. }
            | Self::ScalarNotSupported { context, .. }
            | Self::MissingEnumValues { context, .. }
            | Self::UnionMemberNotMapped { context, .. }
            | Self::IncorrectImplementation { context, .. }
            | Self::NotIntrospectable { context, .. }
            | Self::ImplementationNotFound { context, .. }
            | Self::MultipleImplementations { context, .. }
            | Self::UnsupportedInputClass { context, .. }
            | Self::InstanceUnavailable { context, .. } => Some(context),
        }
    }

    fn write_headline(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaDefinitionNotProvided => write!(
                f,
                "Schema definition is not set. \
                 Make sure your GraphQL schema contains such definition:\
                 \n  schema {{\
                 \n    query: Query\
                 \n    mutation: Mutation\
                 \n  }}",
            ),
            Self::RootResolversNotRegistered => write!(
                f,
                "No root resolvers are registered. \
                 Make sure at least one handler is registered via \
                 `HandlerRegistry::register_root()`.",
            ),
            Self::TypeDefinitionNotFound { type_name, .. } => {
                write!(f, "The GraphQL type `{type_name}` is not defined in the schema.")
            }
            Self::HandlerNotFound { context, resolvers } => write!(
                f,
                "The method `{}` not found in any root resolvers: [{}].",
                context.field(),
                resolvers.iter().join(", "),
            ),
            Self::FieldNotFound {
                context,
                class,
                resolvers,
            } => write!(
                f,
                "The property or method `{}` not found in {class}'s type or its resolvers: [{}].",
                context.field(),
                resolvers.iter().join(", "),
            ),
            Self::InputFieldNotFound { context, class } => write!(
                f,
                "The property `{}` not found in {class}'s input type.",
                context.field(),
            ),
            Self::AmbiguousField { .. } => {
                write!(f, "Found multiple candidates for one GraphQL field.")
            }
            Self::IncorrectArgumentCount {
                kind,
                provided,
                required,
                suggested,
                ..
            } => write!(
                f,
                "The {kind} has too {} arguments, provided: {provided}, \
                 required {required} arg(s): ({suggested})",
                if provided < required { "few" } else { "many" },
            ),
            Self::InvalidSourceArgument {
                provided, required, ..
            } => write!(
                f,
                "The source argument must be instance of {required} class, provided: {provided}.",
            ),
            Self::IncorrectClassMapping {
                context,
                provided_kind,
                required_kind,
                ..
            } => match (provided_kind, required_kind) {
                (Some(provided), Some(required)) => write!(
                    f,
                    "The {} is mapped to {provided}, when required {required}.",
                    context.position(),
                ),
                _ => write!(f, "The {} is mapped to the incorrect class.", context.position()),
            },
            Self::ScalarNotSupported { scalar, .. } => write!(
                f,
                "The scalar `{scalar}` is not supported. \
                 Make sure its representation classes are added to the `ScalarTable`.",
            ),
            Self::MissingEnumValues { .. } => write!(f, "Some enum values are missing."),
            Self::UnionMemberNotMapped {
                object_type,
                union_type,
                ..
            } => write!(
                f,
                "Can not detect representation class for type {object_type}, \
                 member of {union_type}. Ensure the representation class is registered via \
                 `SchemaMappingDictionary::register_type()`.",
            ),
            Self::IncorrectImplementation {
                object_type,
                implementation,
                capability,
                ..
            } => write!(
                f,
                "The class {implementation} of type {object_type} \
                 is not an implementation of {capability}.",
            ),
            Self::MappingConflict {
                kind,
                type_name,
                provided,
                registered,
                ..
            } => write!(
                f,
                "Unable to map GraphQL {kind} `{type_name}` to {provided}, \
                 as it is already mapped to {registered}.",
            ),
            Self::NotIntrospectable { class, marker, .. } => write!(
                f,
                "The class {class} is not described as {marker}. \
                 Ensure it's registered via `TypeDescriptorRegistry::register()`.",
            ),
            Self::ImplementationNotFound { capability, .. } => write!(
                f,
                "Can not find implementation class for the interface {capability}.",
            ),
            Self::MultipleImplementations { capability, .. } => write!(
                f,
                "Found multiple implementations for the interface {capability}.",
            ),
            Self::UnsupportedTypeDefinition {
                kind,
                type_name,
                usage,
                ..
            } => write!(f, "The GraphQL {kind} `{type_name}` can not be used as {usage}."),
            Self::UnsupportedInputClass { ty, .. } => {
                write!(f, "The input coercer is not able to produce {ty}.")
            }
            Self::InstanceUnavailable { source, .. } => write!(f, "{source}."),
        }
    }

    fn write_details(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmbiguousField { candidates, .. } => {
                write!(f, "\n  Candidates:")?;
                for (i, c) in candidates.iter().enumerate() {
                    write!(f, "\n  {}) {c}", i + 1)?;
                }
            }
            Self::IncorrectClassMapping {
                graphql_type,
                provided,
                supported,
                ..
            } => {
                write!(f, "\n  Required GraphQL type: {graphql_type}")?;
                write!(f, "\n  Provided class: {provided}")?;
                if !supported.is_empty() {
                    write!(f, "\n  Supported classes: {}", supported.iter().join(", "))?;
                }
            }
            Self::MissingEnumValues {
                enum_name,
                class,
                missing,
                ..
            } => {
                write!(f, "\n  GraphQL enum: {enum_name}")?;
                write!(f, "\n  Enum class: {class}")?;
                write!(f, "\n  Missing values: {}", missing.iter().join(", "))?;
            }
            Self::MultipleImplementations {
                implementations, ..
            } => {
                write!(
                    f,
                    "\n  Implementation classes: {}",
                    implementations.iter().join(", "),
                )?;
            }
            Self::MappingConflict {
                registered_at: Some(at),
                ..
            } => {
                write!(f, "\n  Previously mapped at:")?;
                for line in at.to_string().lines().filter(|l| !l.is_empty()) {
                    write!(f, "\n  {line}")?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_headline(f)?;
        if let Some(context) = self.context() {
            write!(f, "{context}")?;
        }
        self.write_details(f)
    }
}
