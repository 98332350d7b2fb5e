//! Lookup of [`TypeDescriptor`]s and [`EnumDescriptor`]s by class.

use std::sync::OnceLock;

use derive_more::with_trait::{Display, Error};
use fnv::{FnvHashMap, FnvHashSet};

use crate::host::{EnumDescriptor, HostClass, Marker, TypeDescriptor};

/// Error of registering a descriptor in a [`TypeDescriptorRegistry`].
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
pub enum RegistrationError {
    /// The class is already described.
    #[display("Class `{_0}` is already described")]
    AlreadyDescribed(#[error(not(source))] HostClass),
}

/// Error of looking up a descriptor in a [`TypeDescriptorRegistry`].
///
/// Carries no information about the schema position being bound, which is
/// attached later by the binding engine.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LookupError {
    /// No descriptor exists for the class in the requested role.
    NotIntrospectable {
        /// Class being looked up.
        class: HostClass,
        /// Requested role.
        marker: Marker,
    },
    /// No described class implements the capability.
    ImplementationNotFound {
        /// Capability being looked up.
        capability: HostClass,
    },
    /// More than one described class implements the capability.
    MultipleImplementations {
        /// Capability being looked up.
        capability: HostClass,
        /// All the implementing classes, sorted.
        implementations: Vec<HostClass>,
    },
}

/// Registry of [`TypeDescriptor`]s and [`EnumDescriptor`]s.
///
/// Answers which described classes implement which capability, building and
/// caching this index on the first request.
#[derive(Debug, Default)]
pub struct TypeDescriptorRegistry {
    types: FnvHashMap<HostClass, TypeDescriptor>,
    enums: FnvHashMap<HostClass, EnumDescriptor>,
    capabilities: FnvHashSet<HostClass>,
    implementations: OnceLock<FnvHashMap<HostClass, Vec<HostClass>>>,
}

impl TypeDescriptorRegistry {
    /// Constructs a new empty [`TypeDescriptorRegistry`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the provided [`TypeDescriptor`].
    ///
    /// # Errors
    ///
    /// If the described class is already registered.
    pub fn register(
        &mut self,
        descriptor: TypeDescriptor,
    ) -> Result<&mut Self, RegistrationError> {
        let class = descriptor.class();
        if self.is_described(class) {
            return Err(RegistrationError::AlreadyDescribed(class));
        }
        if let Some(capability) = descriptor.capability() {
            self.capabilities.insert(capability);
        }
        self.types.insert(class, descriptor);
        self.implementations = OnceLock::new();
        Ok(self)
    }

    /// Registers the provided [`EnumDescriptor`].
    ///
    /// # Errors
    ///
    /// If the described class is already registered.
    pub fn register_enum(
        &mut self,
        descriptor: EnumDescriptor,
    ) -> Result<&mut Self, RegistrationError> {
        let class = descriptor.class();
        if self.is_described(class) {
            return Err(RegistrationError::AlreadyDescribed(class));
        }
        self.enums.insert(class, descriptor);
        Ok(self)
    }

    /// Declares `C` as a capability, even if no described class implements it
    /// yet.
    pub fn register_capability<C: ?Sized + 'static>(&mut self) -> &mut Self {
        self.capabilities.insert(HostClass::of::<C>());
        self
    }

    /// Returns the descriptor of the class in the requested role.
    ///
    /// # Errors
    ///
    /// [`LookupError::NotIntrospectable`] if no such descriptor exists.
    pub fn describe(
        &self,
        class: HostClass,
        marker: Marker,
    ) -> Result<&TypeDescriptor, LookupError> {
        self.types
            .get(&class)
            .filter(|d| d.marker() == marker)
            .ok_or(LookupError::NotIntrospectable { class, marker })
    }

    /// Returns the descriptor of the only output class implementing the
    /// provided capability.
    ///
    /// # Errors
    ///
    /// If none or more than one described class implement the capability.
    pub fn implementation_of(
        &self,
        capability: HostClass,
    ) -> Result<&TypeDescriptor, LookupError> {
        match self.implementations_of(capability) {
            [] => Err(LookupError::ImplementationNotFound { capability }),
            [class] => self.describe(*class, Marker::Type),
            many => Err(LookupError::MultipleImplementations {
                capability,
                implementations: many.to_vec(),
            }),
        }
    }

    /// Returns the sorted classes implementing the provided capability.
    pub fn implementations_of(&self, capability: HostClass) -> &[HostClass] {
        self.implementations
            .get_or_init(|| {
                __wiring_trace!("indexing {} described classes", self.types.len());

                let mut index = FnvHashMap::<_, Vec<_>>::default();
                for d in self.types.values() {
                    if let Some(c) = d.capability() {
                        index.entry(c).or_default().push(d.class());
                    }
                }
                for classes in index.values_mut() {
                    classes.sort();
                }
                index
            })
            .get(&capability)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the capability the class is addressed by: its declared
    /// capability, or the class itself if it declares none.
    pub fn capability_of(&self, class: HostClass) -> HostClass {
        self.types
            .get(&class)
            .and_then(TypeDescriptor::capability)
            .unwrap_or(class)
    }

    /// Returns the [`EnumDescriptor`] of the class, if it's a described enum.
    pub fn enumeration(&self, class: HostClass) -> Option<&EnumDescriptor> {
        self.enums.get(&class)
    }

    /// Checks whether the class is a known capability.
    pub fn is_capability(&self, class: HostClass) -> bool {
        self.capabilities.contains(&class)
    }

    /// Checks whether the class is described in any role.
    pub fn is_described(&self, class: HostClass) -> bool {
        self.types.contains_key(&class) || self.enums.contains_key(&class)
    }
}
