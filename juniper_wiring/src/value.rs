//! Runtime values flowing through the produced dispatchers.

use std::{any::Any, fmt, sync::Arc};

use futures::future::{BoxFuture, FutureExt as _};
use indexmap::IndexMap;

use crate::host::HostClass;

/// Type-erased Rust value, or `null`.
///
/// Cloning a [`Value`] is cheap, as the underlying value is shared.
#[derive(Clone, Default)]
pub struct Value {
    inner: Option<(HostClass, Arc<dyn Any + Send + Sync>)>,
}

impl Value {
    /// Wraps the provided value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps the provided shared value.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: Some((HostClass::of::<T>(), value)),
        }
    }

    /// Constructs a `null` value.
    pub const fn null() -> Self {
        Self { inner: None }
    }

    /// Constructs a list out of the provided items.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Self::new(items.into_iter().collect::<Vec<_>>())
    }

    /// Does this value represent `null`?
    pub fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    /// Returns the class of the wrapped value, if any.
    pub fn class(&self) -> Option<HostClass> {
        self.inner.as_ref().map(|(class, _)| *class)
    }

    /// Checks whether the wrapped value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.class().is_some_and(|c| c.is::<T>())
    }

    /// Returns a reference to the wrapped value, if it's a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.as_ref()?.1.downcast_ref()
    }

    /// Returns the wrapped value as a shared `T`, if it's a `T`.
    pub fn downcast_arc<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner.as_ref()?.1).downcast().ok()
    }

    /// Returns the items of a list value.
    pub fn as_list(&self) -> Option<&[Value]> {
        self.downcast_ref::<Vec<Value>>().map(Vec::as_slice)
    }

    /// Returns the string contents of a [`String`] value.
    pub fn as_str(&self) -> Option<&str> {
        self.downcast_ref::<String>().map(String::as_str)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.as_list(), self.class()) {
            (Some(items), _) => f.debug_list().entries(items).finish(),
            (None, Some(class)) => write!(f, "Value({class})"),
            (None, None) => f.write_str("null"),
        }
    }
}

impl<T> From<Option<T>> for Value
where
    Value: From<T>,
{
    fn from(v: Option<T>) -> Self {
        v.map_or_else(Self::null, Self::from)
    }
}

impl<'a> From<&'a str> for Value {
    fn from(s: &'a str) -> Self {
        Self::new(s.to_owned())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::new(items)
    }
}

macro_rules! impl_value_from {
    ($($t:ty),* $(,)?) => {$(
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Self::new(v)
            }
        }
    )*};
}

impl_value_from!(String, bool, char, i16, i32, i64, f32, f64, serde_json::Value);

/// Outcome of a field dispatch: either a value available right away, or a
/// computation producing it later.
pub enum Resolved {
    /// A value available right away.
    Ready(Value),
    /// A computation producing the value later.
    Deferred(BoxFuture<'static, FieldResult<Value>>),
}

impl Resolved {
    /// Constructs a [`Resolved::Deferred`] out of the provided [`Future`].
    pub fn deferred<F>(fut: F) -> Self
    where
        F: Future<Output = FieldResult<Value>> + Send + 'static,
    {
        Self::Deferred(fut.boxed())
    }

    /// Returns the value if it's available right away.
    pub fn into_ready(self) -> Option<Value> {
        match self {
            Self::Ready(v) => Some(v),
            Self::Deferred(_) => None,
        }
    }

    /// Awaits the value, whenever it's available.
    pub async fn into_value(self) -> FieldResult<Value> {
        match self {
            Self::Ready(v) => Ok(v),
            Self::Deferred(fut) => fut.await,
        }
    }
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(v) => f.debug_tuple("Ready").field(v).finish(),
            Self::Deferred(_) => f.write_str("Deferred"),
        }
    }
}

impl From<Value> for Resolved {
    fn from(v: Value) -> Self {
        Self::Ready(v)
    }
}

/// Error type for errors that occur during field resolution
///
/// Field errors are represented by a human-readable error message and an
/// optional JSON structure containing additional information.
///
/// They can be converted to from any type that implements `std::fmt::Display`,
/// which makes error chaining with the `?` operator a breeze:
///
/// ```rust
/// # use juniper_wiring::FieldError;
/// fn get_string(data: Vec<u8>) -> Result<String, FieldError> {
///     let s = String::from_utf8(data)?;
///     Ok(s)
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    message: String,
    data: serde_json::Value,
}

impl<T: fmt::Display> From<T> for FieldError {
    fn from(e: T) -> Self {
        Self {
            message: e.to_string(),
            data: serde_json::Value::Null,
        }
    }
}

impl FieldError {
    /// Construct a new [`FieldError`] with additional data.
    ///
    /// If the `data` argument is [`serde_json::Value::Null`], no extra data
    /// is considered to be attached.
    pub fn new<T: fmt::Display>(e: T, data: serde_json::Value) -> Self {
        Self {
            message: e.to_string(),
            data,
        }
    }

    /// Returns the `"message"` field of this [`FieldError`].
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the `"data"` field of this [`FieldError`].
    pub fn data(&self) -> &serde_json::Value {
        &self.data
    }
}

/// The result of resolving the value of a field of type `T`
pub type FieldResult<T> = Result<T, FieldError>;

/// Per-request execution environment, handed to the resolvers declaring it as
/// their last parameter.
#[derive(Clone, Debug, Default)]
pub struct Environment {
    context: Value,
}

impl Environment {
    /// Constructs a new [`Environment`] carrying the provided context.
    pub fn new<C: Any + Send + Sync>(context: C) -> Self {
        Self {
            context: Value::new(context),
        }
    }

    /// Returns the context of this [`Environment`], if it's a `C`.
    pub fn context<C: Any>(&self) -> Option<&C> {
        self.context.downcast_ref()
    }
}

/// Raw field arguments of a single field invocation, keyed by GraphQL
/// argument name.
#[derive(Clone, Debug, Default)]
pub struct Arguments {
    items: IndexMap<String, Value>,
}

impl Arguments {
    /// Constructs empty [`Arguments`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an argument.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.items.insert(name.into(), value.into());
        self
    }

    /// Constructs [`Arguments`] out of a JSON object.
    ///
    /// Each member is kept as a raw [`serde_json::Value`], for an
    /// [`InputCoercer`] to convert later.
    ///
    /// [`InputCoercer`]: crate::InputCoercer
    pub fn from_json(object: serde_json::Map<String, serde_json::Value>) -> Self {
        object.into_iter().map(|(k, v)| (k, Value::new(v))).collect()
    }

    /// Returns the raw value of the named argument.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.items.get(name)
    }

    /// Returns the number of provided arguments.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Indicates whether no arguments were provided.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<(String, Value)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
