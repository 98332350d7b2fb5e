use std::fmt;

use arcstr::ArcStr;

use crate::host::HostClass;

/// Position in the schema (and in Rust code) a binding step is working on.
///
/// Rendered as a sequence of indented lines, attached to every
/// [`MappingError`] message.
///
/// [`MappingError`]: crate::MappingError
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MappingContext {
    /// Binding of a field of an output type, or of one of its arguments.
    Field {
        /// Name of the GraphQL type declaring the field.
        type_name: ArcStr,
        /// Name of the GraphQL field.
        field: ArcStr,
        /// Name of the GraphQL argument, if an argument is being bound.
        argument: Option<ArcStr>,
        /// Class declaring the Rust member bound to the field.
        mapped_class: Option<HostClass>,
        /// Rust member bound to the field.
        mapped_member: Option<String>,
    },
    /// Binding of a value of an input type.
    Input {
        /// Name of the GraphQL input type.
        type_name: ArcStr,
        /// Name of the GraphQL input value.
        input_value: ArcStr,
        /// Class bound to the GraphQL input type.
        mapped_class: HostClass,
        /// Name of the Rust property bound to the input value.
        mapped_property: Option<ArcStr>,
    },
}

impl MappingContext {
    /// Constructs a context of the named field.
    pub fn for_field(type_name: &ArcStr, field: &ArcStr) -> Self {
        Self::Field {
            type_name: type_name.clone(),
            field: field.clone(),
            argument: None,
            mapped_class: None,
            mapped_member: None,
        }
    }

    /// Constructs a context of the named input value.
    pub fn for_input(
        type_name: &ArcStr,
        input_value: &ArcStr,
        mapped_class: HostClass,
        mapped_property: Option<&ArcStr>,
    ) -> Self {
        Self::Input {
            type_name: type_name.clone(),
            input_value: input_value.clone(),
            mapped_class,
            mapped_property: mapped_property.cloned(),
        }
    }

    /// Returns a copy of this context, remembering the Rust member bound to
    /// the field.
    #[must_use]
    pub fn with_member(&self, class: HostClass, member: impl Into<String>) -> Self {
        match self.clone() {
            Self::Field {
                type_name, field, ..
            } => Self::Field {
                type_name,
                field,
                argument: None,
                mapped_class: Some(class),
                mapped_member: Some(member.into()),
            },
            input @ Self::Input { .. } => input,
        }
    }

    /// Returns a copy of this context, narrowed to the named argument.
    #[must_use]
    pub fn for_argument(&self, name: &ArcStr) -> Self {
        match self.clone() {
            Self::Field {
                type_name,
                field,
                mapped_class,
                mapped_member,
                ..
            } => Self::Field {
                type_name,
                field,
                argument: Some(name.clone()),
                mapped_class,
                mapped_member,
            },
            input @ Self::Input { .. } => input,
        }
    }

    /// Returns the name of the GraphQL type this context belongs to.
    pub fn type_name(&self) -> &ArcStr {
        match self {
            Self::Field { type_name, .. } | Self::Input { type_name, .. } => type_name,
        }
    }

    /// Returns the name of the GraphQL field (or input value) this context
    /// belongs to.
    pub fn field(&self) -> &ArcStr {
        match self {
            Self::Field { field, .. } => field,
            Self::Input { input_value, .. } => input_value,
        }
    }

    /// Returns the name of the GraphQL argument this context belongs to, if any.
    pub fn argument(&self) -> Option<&ArcStr> {
        match self {
            Self::Field { argument, .. } => argument.as_ref(),
            Self::Input { .. } => None,
        }
    }

    /// Returns the noun naming the position of this context in messages.
    pub(crate) fn position(&self) -> &'static str {
        match self {
            Self::Field { argument: None, .. } => "field",
            Self::Field {
                argument: Some(_), ..
            } => "argument",
            Self::Input { .. } => "input value",
        }
    }
}

impl fmt::Display for MappingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field {
                type_name,
                field,
                argument,
                mapped_class,
                mapped_member,
            } => {
                write!(f, "\n  GraphQL type: {type_name}")?;
                write!(f, "\n  GraphQL field: {field}")?;
                if let Some(argument) = argument {
                    write!(f, "\n  GraphQL argument: {argument}")?;
                }
                if let Some(class) = mapped_class {
                    write!(f, "\n  Mapped class: {class}")?;
                }
                if let Some(member) = mapped_member {
                    write!(f, "\n  Mapped member: {member}")?;
                }
            }
            Self::Input {
                type_name,
                input_value,
                mapped_class,
                mapped_property,
            } => {
                write!(f, "\n  GraphQL input type: {type_name}")?;
                write!(f, "\n  GraphQL input value: {input_value}")?;
                write!(f, "\n  Mapped class: {mapped_class}")?;
                if let Some(property) = mapped_property {
                    write!(f, "\n  Mapped property: {property}")?;
                }
            }
        }
        Ok(())
    }
}
