//! Identity and shape of Rust types taking part in a schema binding.

use std::{
    any::{self, TypeId},
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

/// Identity of a Rust type as seen by the binding engine.
///
/// Carries the [`TypeId`] along with the type name, so diagnostics are able to
/// name the type. Trait objects (`dyn Trait`) are valid classes too, and are
/// used to represent capabilities shared by several concrete types.
#[derive(Clone, Copy)]
pub struct HostClass {
    id: TypeId,
    name: &'static str,
}

impl HostClass {
    /// Returns the [`HostClass`] of `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`] of this class.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the fully qualified name of this class.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the last path segment of this class name, without generics.
    ///
    /// `alloc::string::String` becomes `String`, and `dyn app::Failure`
    /// becomes `Failure`.
    pub fn short_name(&self) -> &'static str {
        let name = self.name.trim_start_matches("dyn ");
        let base = name.split('<').next().unwrap_or(name);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Checks whether this class is `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for HostClass {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for HostClass {}

impl Hash for HostClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for HostClass {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HostClass {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.name, self.id).cmp(&(other.name, other.id))
    }
}

impl fmt::Debug for HostClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for HostClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Declared shape of a Rust value: a class, possibly wrapped into lists,
/// optionals or a deferred computation.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum HostType {
    /// A plain class.
    Class(HostClass),
    /// A list of values of the inner type.
    List(Box<HostType>),
    /// A value of the inner type which may be absent.
    Optional(Box<HostType>),
    /// A value of the inner type which becomes available later.
    Async(Box<HostType>),
}

impl HostType {
    /// Returns the plain [`HostType`] of `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Class(HostClass::of::<T>())
    }

    /// Returns a [`HostType`] describing a list of `T` values.
    pub fn list_of<T: ?Sized + 'static>() -> Self {
        Self::list(Self::of::<T>())
    }

    /// Returns a [`HostType`] describing a list of `of` values.
    pub fn list(of: Self) -> Self {
        Self::List(Box::new(of))
    }

    /// Wraps this type into an optional one.
    #[must_use]
    pub fn optional(self) -> Self {
        Self::Optional(Box::new(self))
    }

    /// Wraps this type into a deferred one.
    #[must_use]
    pub fn deferred(self) -> Self {
        Self::Async(Box::new(self))
    }

    /// Returns the class of this type, if it's a plain one.
    pub fn class(&self) -> Option<HostClass> {
        match self {
            Self::Class(c) => Some(*c),
            _ => None,
        }
    }

    /// Returns the class found after unwrapping every wrapper of this type.
    pub fn innermost_class(&self) -> HostClass {
        match self {
            Self::Class(c) => *c,
            Self::List(t) | Self::Optional(t) | Self::Async(t) => t.innermost_class(),
        }
    }

    /// Strips all the optional wrappers from the top of this type.
    pub fn required(&self) -> &Self {
        match self {
            Self::Optional(t) => t.required(),
            t => t,
        }
    }

    /// Strips the deferred wrapper from the top of this type, if any.
    pub fn resolved(&self) -> &Self {
        match self {
            Self::Async(t) => t.as_ref(),
            t => t,
        }
    }

    /// Indicates whether this type is a deferred one.
    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }

    /// Returns a [`Display`]able form of this type using short class names.
    ///
    /// [`Display`]: fmt::Display
    pub fn short(&self) -> impl fmt::Display {
        ShortHostType(self)
    }

    fn write(
        &self,
        f: &mut fmt::Formatter<'_>,
        name: fn(&HostClass) -> &'static str,
    ) -> fmt::Result {
        match self {
            Self::Class(c) => f.write_str(name(c)),
            Self::List(t) => {
                f.write_str("Vec<")?;
                t.write(f, name)?;
                f.write_str(">")
            }
            Self::Optional(t) => {
                f.write_str("Option<")?;
                t.write(f, name)?;
                f.write_str(">")
            }
            Self::Async(t) => {
                f.write_str("impl Future<Output = ")?;
                t.write(f, name)?;
                f.write_str(">")
            }
        }
    }
}

impl From<HostClass> for HostType {
    fn from(class: HostClass) -> Self {
        Self::Class(class)
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, HostClass::name)
    }
}

struct ShortHostType<'a>(&'a HostType);

impl fmt::Display for ShortHostType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.write(f, HostClass::short_name)
    }
}
