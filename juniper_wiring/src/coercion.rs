//! Conversion of raw argument values into the classes declared by resolver
//! parameters.

use std::{any::Any, fmt};

use derive_more::with_trait::{Display, Error};
use fnv::FnvHashMap;
use serde::de::DeserializeOwned;

use crate::{
    host::{HostClass, HostType},
    value::Value,
};

/// Error of converting a raw argument value.
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
#[display("Unable to convert into `{target}`: {message}")]
pub struct CoercionError {
    /// Type the value was converted into.
    pub target: HostType,
    /// Description of the failure.
    pub message: String,
}

impl CoercionError {
    /// Constructs a new [`CoercionError`].
    pub fn new(target: &HostType, message: impl fmt::Display) -> Self {
        Self {
            target: target.clone(),
            message: message.to_string(),
        }
    }
}

/// Converter of raw argument values into the declared parameter types.
///
/// Consulted while the wiring is generated (whether a parameter type is
/// supported at all), and on every field invocation (to convert the actual
/// argument values).
pub trait InputCoercer: Send + Sync {
    /// Checks whether values of the provided type can be produced.
    fn supports(&self, target: &HostType) -> bool;

    /// Converts the raw value into the provided type.
    ///
    /// # Errors
    ///
    /// If the raw value doesn't represent a value of the provided type.
    fn convert(&self, raw: &Value, target: &HostType) -> Result<Value, CoercionError>;
}

type Converter = fn(serde_json::Value) -> Result<Value, serde_json::Error>;

fn deserialize<T: DeserializeOwned + Any + Send + Sync>(
    raw: serde_json::Value,
) -> Result<Value, serde_json::Error> {
    serde_json::from_value::<T>(raw).map(Value::new)
}

/// [`InputCoercer`] converting raw [`serde_json::Value`]s by deserializing
/// them with [`serde`].
///
/// Lists and optionals are converted structurally: a list becomes a
/// [`Value::list()`] of converted items, and `null` becomes [`Value::null()`].
/// Values already of the target class are passed through as is.
#[derive(Clone)]
pub struct JsonCoercer {
    converters: FnvHashMap<HostClass, Converter>,
}

impl Default for JsonCoercer {
    fn default() -> Self {
        let coercer = Self::empty()
            .register::<String>()
            .register::<bool>()
            .register::<char>()
            .register::<i16>()
            .register::<i32>()
            .register::<i64>()
            .register::<f32>()
            .register::<f64>()
            .register::<serde_json::Value>();

        #[cfg(feature = "bigdecimal")]
        let coercer = coercer
            .register::<bigdecimal::BigDecimal>()
            .register::<num_bigint::BigInt>();

        coercer
    }
}

impl JsonCoercer {
    /// Constructs a new [`JsonCoercer`] supporting the built-in scalar
    /// classes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new [`JsonCoercer`] supporting nothing.
    pub fn empty() -> Self {
        Self {
            converters: FnvHashMap::default(),
        }
    }

    /// Adds support for `T`.
    #[must_use]
    pub fn register<T: DeserializeOwned + Any + Send + Sync>(mut self) -> Self {
        self.converters
            .insert(HostClass::of::<T>(), deserialize::<T>);
        self
    }

    fn convert_json(
        &self,
        raw: serde_json::Value,
        target: &HostType,
    ) -> Result<Value, CoercionError> {
        match (target, raw) {
            (HostType::Optional(_), serde_json::Value::Null) => Ok(Value::null()),
            (HostType::Optional(t), raw) => self.convert_json(raw, t),
            (HostType::List(t), serde_json::Value::Array(items)) => items
                .into_iter()
                .map(|i| self.convert_json(i, t))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::list),
            (HostType::List(_), raw) => Err(CoercionError::new(
                target,
                format!("expected a list, found `{raw}`"),
            )),
            (HostType::Class(c), raw) => {
                let convert = self
                    .converters
                    .get(c)
                    .ok_or_else(|| CoercionError::new(target, "unsupported class"))?;
                convert(raw).map_err(|e| CoercionError::new(target, e))
            }
            (HostType::Async(_), _) => Err(CoercionError::new(target, "unsupported class")),
        }
    }
}

impl fmt::Debug for JsonCoercer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonCoercer")
            .field("classes", &self.converters.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl InputCoercer for JsonCoercer {
    fn supports(&self, target: &HostType) -> bool {
        match target {
            HostType::Class(c) => self.converters.contains_key(c),
            HostType::List(t) | HostType::Optional(t) => self.supports(t),
            HostType::Async(_) => false,
        }
    }

    fn convert(&self, raw: &Value, target: &HostType) -> Result<Value, CoercionError> {
        if raw.class().is_some() && raw.class() == target.required().class() {
            return Ok(raw.clone());
        }
        if raw.is_null() {
            return self.convert_json(serde_json::Value::Null, target);
        }
        if let (Some(items), HostType::List(t)) = (raw.as_list(), target.required()) {
            return items
                .iter()
                .map(|i| self.convert(i, t))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::list);
        }
        let json = raw.downcast_ref::<serde_json::Value>().ok_or_else(|| {
            CoercionError::new(
                target,
                format!(
                    "unsupported raw value of `{}`",
                    raw.class().map_or("null", |c| c.name()),
                ),
            )
        })?;
        self.convert_json(json.clone(), target)
    }
}
