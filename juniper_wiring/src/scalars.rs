//! Built-in scalars and the Rust classes allowed to represent them.

use arcstr::ArcStr;
use fnv::FnvHashSet;
use indexmap::IndexMap;

use crate::host::HostClass;

/// Table of the GraphQL scalars bound without any schema declaration, and the
/// Rust classes allowed to represent each of them.
///
/// Default table contains:
///
/// | GraphQL scalar | Rust classes      |
/// |----------------|-------------------|
/// | `String`       | [`String`]        |
/// | `ID`           | [`String`]        |
/// | `Int`          | [`i32`]           |
/// | `Float`        | [`f32`], [`f64`]  |
/// | `Boolean`      | [`bool`]          |
/// | `Long`         | [`i64`]           |
/// | `Short`        | [`i16`]           |
/// | `Char`         | [`char`]          |
///
/// With the `bigdecimal` feature, also `BigDecimal` and `BigInteger`
/// represented by [`bigdecimal::BigDecimal`] and [`num_bigint::BigInt`].
#[derive(Clone, Debug)]
pub struct ScalarTable {
    scalars: IndexMap<ArcStr, Vec<HostClass>>,
    classes: FnvHashSet<HostClass>,
}

impl Default for ScalarTable {
    fn default() -> Self {
        let table = Self::empty()
            .with_scalar("String", [HostClass::of::<String>()])
            .with_scalar("ID", [HostClass::of::<String>()])
            .with_scalar("Int", [HostClass::of::<i32>()])
            .with_scalar("Float", [HostClass::of::<f32>(), HostClass::of::<f64>()])
            .with_scalar("Boolean", [HostClass::of::<bool>()])
            .with_scalar("Long", [HostClass::of::<i64>()])
            .with_scalar("Short", [HostClass::of::<i16>()])
            .with_scalar("Char", [HostClass::of::<char>()]);

        #[cfg(feature = "bigdecimal")]
        let table = table
            .with_scalar("BigDecimal", [HostClass::of::<bigdecimal::BigDecimal>()])
            .with_scalar("BigInteger", [HostClass::of::<num_bigint::BigInt>()]);

        table
    }
}

impl ScalarTable {
    /// Constructs a new [`ScalarTable`] without any scalars.
    pub fn empty() -> Self {
        Self {
            scalars: IndexMap::new(),
            classes: FnvHashSet::default(),
        }
    }

    /// Allows the provided classes to represent the named scalar, adding the
    /// scalar if it isn't present yet.
    #[must_use]
    pub fn with_scalar(
        mut self,
        name: impl Into<ArcStr>,
        classes: impl IntoIterator<Item = HostClass>,
    ) -> Self {
        let supported = self.scalars.entry(name.into()).or_default();
        for class in classes {
            if !supported.contains(&class) {
                supported.push(class);
            }
            self.classes.insert(class);
        }
        supported.sort();
        self
    }

    /// Returns the classes allowed to represent the named scalar, sorted.
    ///
    /// [`None`] if the scalar is not in this table.
    pub fn supported_classes(&self, name: &str) -> Option<&[HostClass]> {
        self.scalars.get(name).map(Vec::as_slice)
    }

    /// Checks whether the named scalar is in this table.
    pub fn contains(&self, name: &str) -> bool {
        self.scalars.contains_key(name)
    }

    /// Checks whether the class represents any scalar of this table.
    pub fn is_builtin_class(&self, class: HostClass) -> bool {
        self.classes.contains(&class)
    }

    /// Returns all the classes representing any scalar of this table.
    pub fn classes(&self) -> impl Iterator<Item = HostClass> {
        self.classes.iter().copied()
    }
}
