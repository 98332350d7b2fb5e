use std::fmt;

use arcstr::ArcStr;
use derive_more::with_trait::Error;
use fnv::FnvHashMap;

use crate::{host::HostClass, value::Value};

/// Value of a union (or interface) field whose class is not a member of it.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub struct UnregisteredUnionValue {
    /// Name of the GraphQL union (or interface).
    pub abstract_type: ArcStr,
    /// Class of the value, or [`None`] for `null`.
    pub class: Option<HostClass>,
}

impl fmt::Display for UnregisteredUnionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unregistered GraphQL type for {} in `{}`",
            self.class.map_or("null", |c| c.name()),
            self.abstract_type,
        )
    }
}

/// Resolver of the concrete GraphQL object type of a union (or interface)
/// value, by the class of the value.
#[derive(Clone, Debug)]
pub struct TypeResolver {
    abstract_type: ArcStr,
    members: FnvHashMap<HostClass, ArcStr>,
}

impl TypeResolver {
    pub(crate) fn new(abstract_type: &ArcStr) -> Self {
        Self {
            abstract_type: abstract_type.clone(),
            members: FnvHashMap::default(),
        }
    }

    pub(crate) fn insert(&mut self, class: HostClass, object_type: &ArcStr) {
        self.members.insert(class, object_type.clone());
    }

    /// Returns the name of the union (or interface) this resolver is built
    /// for.
    pub fn abstract_type(&self) -> &str {
        &self.abstract_type
    }

    /// Returns the name of the GraphQL object type the value belongs to.
    ///
    /// # Errors
    ///
    /// If the class of the value is not paired with any member.
    pub fn resolve(&self, value: &Value) -> Result<&str, UnregisteredUnionValue> {
        value
            .class()
            .and_then(|c| self.members.get(&c))
            .map(ArcStr::as_str)
            .ok_or_else(|| UnregisteredUnionValue {
                abstract_type: self.abstract_type.clone(),
                class: value.class(),
            })
    }

    /// Returns the name of the GraphQL object type paired with the class.
    pub fn member_of(&self, class: HostClass) -> Option<&str> {
        self.members.get(&class).map(ArcStr::as_str)
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Indicates whether there are no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
