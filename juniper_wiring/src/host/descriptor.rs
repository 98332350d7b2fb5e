//! Reflective descriptions of Rust types, as consumed by the binding engine.

use std::{any::Any, fmt, sync::Arc};

use arcstr::ArcStr;
use derive_more::with_trait::Display;
use itertools::Itertools as _;

use crate::{
    host::{HostClass, HostType},
    util::names_match,
    value::{FieldResult, Resolved, Value},
};

/// Reads a property out of a receiver value.
pub type Accessor = Arc<dyn Fn(&Value) -> FieldResult<Value> + Send + Sync>;

/// Invokes a method on a receiver value with already converted arguments.
pub type Invoker = Arc<dyn Fn(&Value, Vec<Value>) -> FieldResult<Resolved> + Send + Sync>;

/// Role a type is described for.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Marker {
    /// The type is used for output (objects).
    #[display("an output type")]
    Type,
    /// The type is used for input (input objects).
    #[display("an input type")]
    Input,
}

/// Named value of a described type.
#[derive(Clone)]
pub struct PropertyDescriptor {
    name: ArcStr,
    ty: HostType,
    accessor: Option<Accessor>,
}

impl PropertyDescriptor {
    /// Returns the name of this property.
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// Returns the declared type of this property.
    pub fn ty(&self) -> &HostType {
        &self.ty
    }

    /// Returns the reader of this property, if it's readable.
    ///
    /// Properties of input types are never read individually, so they carry no
    /// accessor.
    pub fn accessor(&self) -> Option<&Accessor> {
        self.accessor.as_ref()
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("readable", &self.accessor.is_some())
            .finish()
    }
}

/// Declared parameter of a [`MethodDescriptor`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Parameter {
    name: ArcStr,
    ty: HostType,
}

impl Parameter {
    /// Constructs a new [`Parameter`].
    pub fn new(name: impl Into<ArcStr>, ty: HostType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Returns the name of this parameter.
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// Returns the declared type of this parameter.
    pub fn ty(&self) -> &HostType {
        &self.ty
    }
}

/// Callable member of a described type or of a resolver handler.
///
/// The invoker receives the receiver value (the described instance, or the
/// handler instance) and the positional arguments, matching
/// [`MethodDescriptor::parameters()`].
#[derive(Clone)]
pub struct MethodDescriptor {
    name: ArcStr,
    parameters: Vec<Parameter>,
    return_type: HostType,
    invoker: Invoker,
}

impl MethodDescriptor {
    /// Constructs a new [`MethodDescriptor`] invoking the provided function
    /// with an untyped receiver.
    pub fn new<F>(name: impl Into<ArcStr>, return_type: HostType, invoke: F) -> Self
    where
        F: Fn(&Value, Vec<Value>) -> FieldResult<Resolved> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type,
            invoker: Arc::new(invoke),
        }
    }

    /// Constructs a new [`MethodDescriptor`] invoking the provided function
    /// on a receiver downcasted to `T`.
    pub fn on<T, F>(name: impl Into<ArcStr>, return_type: HostType, invoke: F) -> Self
    where
        T: Any,
        F: Fn(&T, Vec<Value>) -> FieldResult<Resolved> + Send + Sync + 'static,
    {
        Self::new(name, return_type, move |receiver, args| {
            invoke(downcast_receiver(receiver)?, args)
        })
    }

    /// Adds a parameter to this method.
    #[must_use]
    pub fn param(mut self, name: impl Into<ArcStr>, ty: HostType) -> Self {
        self.parameters.push(Parameter::new(name, ty));
        self
    }

    /// Returns the name of this method.
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// Returns the declared parameters of this method.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Returns the declared return type of this method.
    pub fn return_type(&self) -> &HostType {
        &self.return_type
    }

    /// Returns the invoker of this method.
    pub fn invoker(&self) -> &Invoker {
        &self.invoker
    }

    /// Returns a human-readable signature of this method, like
    /// `hello(name: String)`.
    pub fn signature(&self) -> String {
        format!(
            "{}({})",
            self.name,
            self.parameters
                .iter()
                .format_with(", ", |p, f| f(&format_args!("{}: {}", p.name, p.ty.short()))),
        )
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("return_type", &self.return_type)
            .finish_non_exhaustive()
    }
}

/// Introspectable description of a Rust type: its properties, methods and
/// the capability it exposes itself through.
#[derive(Clone, Debug)]
pub struct TypeDescriptor {
    class: HostClass,
    marker: Marker,
    capability: Option<HostClass>,
    properties: Vec<PropertyDescriptor>,
    methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    /// Starts describing `T` as an output type.
    pub fn object<T: Any>() -> Self {
        Self::new(HostClass::of::<T>(), Marker::Type)
    }

    /// Starts describing `T` as an input type.
    pub fn input<T: Any>() -> Self {
        Self::new(HostClass::of::<T>(), Marker::Input)
    }

    fn new(class: HostClass, marker: Marker) -> Self {
        Self {
            class,
            marker,
            capability: None,
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Declares the described type as an implementation of the `C`
    /// capability (usually a `dyn Trait`).
    #[must_use]
    pub fn implements<C: ?Sized + 'static>(mut self) -> Self {
        self.capability = Some(HostClass::of::<C>());
        self
    }

    /// Adds a readable property to the described type.
    #[must_use]
    pub fn property<T, V, F>(mut self, name: impl Into<ArcStr>, ty: HostType, get: F) -> Self
    where
        T: Any,
        V: Into<Value>,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        let accessor: Accessor =
            Arc::new(move |receiver| downcast_receiver(receiver).map(|r| get(r).into()));
        self.properties.push(PropertyDescriptor {
            name: name.into(),
            ty,
            accessor: Some(accessor),
        });
        self
    }

    /// Adds a write-only property (a field of an input type) to the described
    /// type.
    #[must_use]
    pub fn input_field(mut self, name: impl Into<ArcStr>, ty: HostType) -> Self {
        self.properties.push(PropertyDescriptor {
            name: name.into(),
            ty,
            accessor: None,
        });
        self
    }

    /// Adds a method to the described type.
    #[must_use]
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// Returns the described class.
    pub fn class(&self) -> HostClass {
        self.class
    }

    /// Returns the role the class is described for.
    pub fn marker(&self) -> Marker {
        self.marker
    }

    /// Returns the capability implemented by the described class, if any.
    pub fn capability(&self) -> Option<HostClass> {
        self.capability
    }

    /// Returns all the properties of the described class.
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Returns all the methods of the described class.
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Returns the properties denoting the given GraphQL name.
    pub fn properties_named<'s>(
        &'s self,
        graphql: &'s str,
    ) -> impl Iterator<Item = &'s PropertyDescriptor> {
        self.properties
            .iter()
            .filter(move |p| names_match(&p.name, graphql))
    }

    /// Returns the methods denoting the given GraphQL name.
    pub fn methods_named<'s>(
        &'s self,
        graphql: &'s str,
    ) -> impl Iterator<Item = &'s MethodDescriptor> {
        self.methods
            .iter()
            .filter(move |m| names_match(&m.name, graphql))
    }
}

/// Description of a Rust enum exposed as a GraphQL enum.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumDescriptor {
    class: HostClass,
    values: Vec<ArcStr>,
}

impl EnumDescriptor {
    /// Describes `T` as an enum having the provided GraphQL values.
    pub fn of<T, I>(values: I) -> Self
    where
        T: Any,
        I: IntoIterator,
        I::Item: Into<ArcStr>,
    {
        Self {
            class: HostClass::of::<T>(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the described class.
    pub fn class(&self) -> HostClass {
        self.class
    }

    /// Returns the values of the described enum.
    pub fn values(&self) -> &[ArcStr] {
        &self.values
    }

    /// Checks whether the described enum has a value with the given name.
    pub fn has_value(&self, name: &str) -> bool {
        self.values.iter().any(|v| v == name)
    }
}

pub(crate) fn downcast_receiver<T: Any>(receiver: &Value) -> FieldResult<&T> {
    receiver.downcast_ref().ok_or_else(|| {
        format!(
            "Receiver of `{}` expected, found `{}`",
            HostClass::of::<T>(),
            receiver.class().map_or("null", |c| c.name()),
        )
        .into()
    })
}
