use std::{fmt, sync::Arc};

use arcstr::ArcStr;
use serde_json::json;

use crate::{
    coercion::InputCoercer,
    host::{Accessor, HostType, Invoker},
    value::{Arguments, Environment, FieldError, FieldResult, Resolved, Value},
};

/// Single positional argument a bound method is invoked with.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgumentDefinition {
    /// The value owning the field.
    Source,
    /// The [`Environment`] of the execution.
    Environment,
    /// A GraphQL argument, converted into the declared parameter type.
    Input {
        /// Name of the GraphQL argument.
        name: ArcStr,
        /// Declared parameter type.
        ty: HostType,
        /// Default value of the GraphQL argument, if any.
        default: Option<serde_json::Value>,
    },
}

/// Value a bound method is invoked on.
#[derive(Clone, Debug)]
pub enum Receiver {
    /// The value owning the field.
    Source,
    /// The instance of a resolver handler.
    Instance(Value),
}

#[derive(Clone)]
enum Target {
    Property(Accessor),
    Method {
        invoker: Invoker,
        receiver: Receiver,
        arguments: Vec<ArgumentDefinition>,
        coercer: Arc<dyn InputCoercer>,
    },
}

/// Compiled resolution of a single GraphQL field.
///
/// Assembles the positional arguments out of the raw field arguments, and
/// invokes the bound method (or reads the bound property).
#[derive(Clone)]
pub struct FieldDispatcher {
    type_name: ArcStr,
    field_name: ArcStr,
    target: Target,
    is_async: bool,
}

impl FieldDispatcher {
    pub(crate) fn property(
        type_name: &ArcStr,
        field_name: &ArcStr,
        accessor: Accessor,
        ty: &HostType,
    ) -> Self {
        Self {
            type_name: type_name.clone(),
            field_name: field_name.clone(),
            target: Target::Property(accessor),
            is_async: ty.is_async(),
        }
    }

    pub(crate) fn method(
        type_name: &ArcStr,
        field_name: &ArcStr,
        invoker: Invoker,
        receiver: Receiver,
        arguments: Vec<ArgumentDefinition>,
        coercer: Arc<dyn InputCoercer>,
        return_type: &HostType,
    ) -> Self {
        Self {
            type_name: type_name.clone(),
            field_name: field_name.clone(),
            target: Target::Method {
                invoker,
                receiver,
                arguments,
                coercer,
            },
            is_async: return_type.is_async(),
        }
    }

    /// Returns the name of the GraphQL type declaring the resolved field.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the name of the resolved GraphQL field.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Indicates whether the bound member produces its value later, so the
    /// result of [`FieldDispatcher::resolve()`] has to be awaited.
    pub fn is_async(&self) -> bool {
        self.is_async
    }

    /// Returns the positional arguments the bound method is invoked with.
    ///
    /// Empty for bound properties.
    pub fn arguments(&self) -> &[ArgumentDefinition] {
        match &self.target {
            Target::Property(_) => &[],
            Target::Method { arguments, .. } => arguments,
        }
    }

    /// Resolves the field of the `source` value.
    ///
    /// # Errors
    ///
    /// If any argument can't be converted into its declared type, or the
    /// bound member fails itself.
    pub fn resolve(
        &self,
        arguments: &Arguments,
        source: &Value,
        environment: &Environment,
    ) -> FieldResult<Resolved> {
        match &self.target {
            Target::Property(accessor) => accessor(source).map(Resolved::Ready),
            Target::Method {
                invoker,
                receiver,
                arguments: definitions,
                coercer,
            } => {
                let values = definitions
                    .iter()
                    .map(|def| match def {
                        ArgumentDefinition::Source => Ok(source.clone()),
                        ArgumentDefinition::Environment => Ok(Value::new(environment.clone())),
                        ArgumentDefinition::Input { name, ty, default } => {
                            self.input(coercer.as_ref(), arguments, name, ty, default.as_ref())
                        }
                    })
                    .collect::<FieldResult<Vec<_>>>()?;

                let receiver = match receiver {
                    Receiver::Source => source,
                    Receiver::Instance(instance) => instance,
                };
                invoker(receiver, values)
            }
        }
    }

    fn input(
        &self,
        coercer: &dyn InputCoercer,
        arguments: &Arguments,
        name: &ArcStr,
        ty: &HostType,
        default: Option<&serde_json::Value>,
    ) -> FieldResult<Value> {
        let raw = match (arguments.get(name), default) {
            (Some(v), _) => v.clone(),
            (None, Some(d)) => Value::new(d.clone()),
            (None, None) => Value::null(),
        };
        if raw.class().is_some() && raw.class() == ty.required().class() {
            return Ok(raw);
        }
        coercer.convert(&raw, ty).map_err(|e| {
            __wiring_trace_warn!(
                "failed to convert argument `{name}` of `{}.{}`: {e}",
                self.type_name,
                self.field_name,
            );

            FieldError::new(
                format!(
                    "Invalid argument `{name}` of field `{}.{}`: {e}",
                    self.type_name, self.field_name,
                ),
                json!({
                    "type": self.type_name.as_str(),
                    "field": self.field_name.as_str(),
                    "argument": name.as_str(),
                }),
            )
        })
    }
}

impl fmt::Debug for FieldDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("FieldDispatcher");
        s.field("type_name", &self.type_name)
            .field("field_name", &self.field_name)
            .field("is_async", &self.is_async);
        match &self.target {
            Target::Property(_) => s.field("target", &"property"),
            Target::Method {
                receiver,
                arguments,
                ..
            } => s
                .field("receiver", receiver)
                .field("arguments", arguments),
        };
        s.finish_non_exhaustive()
    }
}
