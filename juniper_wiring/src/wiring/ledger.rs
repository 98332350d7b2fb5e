//! Ledger of the GraphQL types bound during a binding pass.

use arcstr::ArcStr;
use indexmap::{IndexMap, map::Entry};

use crate::{
    host::HostClass,
    mapping::{MappingContext, MappingError},
    schema::meta::DefinitionKind,
};

/// What a GraphQL type is bound to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MappingItem {
    /// Object type bound to a described output class.
    Object(HostClass),
    /// Input object type bound to a described input class.
    InputObject(HostClass),
    /// Enum type bound to a described enum class.
    Enum(HostClass),
    /// Union (or interface) type bound to a capability.
    Capability(HostClass),
}

impl MappingItem {
    /// Returns the class the type is bound to.
    pub fn class(&self) -> HostClass {
        match self {
            Self::Object(c) | Self::InputObject(c) | Self::Enum(c) | Self::Capability(c) => *c,
        }
    }
}

/// Outcome of recording a binding in a [`MappingRegistry`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Recorded {
    /// The type is bound for the first time.
    New,
    /// The type is already bound to the same item.
    Existing,
}

#[derive(Debug)]
struct LedgerEntry {
    item: MappingItem,
    kind: DefinitionKind,
    context: Option<MappingContext>,
}

/// Ledger of the GraphQL types bound during a binding pass.
///
/// Binding a type to the item it's already bound to is a no-op, which is what
/// terminates the descent on self-referential types.
#[derive(Debug, Default)]
pub struct MappingRegistry {
    entries: IndexMap<ArcStr, LedgerEntry>,
}

impl MappingRegistry {
    /// Records the binding of the named type to the provided item.
    ///
    /// # Errors
    ///
    /// [`MappingError::MappingConflict`] if the type is already bound to a
    /// different item.
    pub(crate) fn record(
        &mut self,
        type_name: &ArcStr,
        kind: DefinitionKind,
        item: MappingItem,
        context: Option<&MappingContext>,
    ) -> Result<Recorded, MappingError> {
        match self.entries.entry(type_name.clone()) {
            Entry::Occupied(e) if e.get().item == item => Ok(Recorded::Existing),
            Entry::Occupied(e) => Err(MappingError::MappingConflict {
                context: context.cloned(),
                kind: e.get().kind,
                type_name: type_name.clone(),
                provided: item.class(),
                registered: e.get().item.class(),
                registered_at: e.get().context.clone(),
            }),
            Entry::Vacant(e) => {
                e.insert(LedgerEntry {
                    item,
                    kind,
                    context: context.cloned(),
                });
                Ok(Recorded::New)
            }
        }
    }

    /// Returns what the named type is bound to.
    pub fn get(&self, type_name: &str) -> Option<MappingItem> {
        self.entries.get(type_name).map(|e| e.item)
    }

    /// Returns the number of bound types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Indicates whether no type is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns what every bound type is bound to, in binding order.
    pub fn snapshot(&self) -> IndexMap<ArcStr, MappingItem> {
        self.entries
            .iter()
            .map(|(name, e)| (name.clone(), e.item))
            .collect()
    }
}
