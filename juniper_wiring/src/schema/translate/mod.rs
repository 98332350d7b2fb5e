//! Translation of schema documents from the `graphql-parser` representation.

use arcstr::ArcStr;
use derive_more::with_trait::{Display, Error};

mod graphql_parser;

/// Error of translating a parsed schema document.
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
pub enum TranslateError {
    /// Type is defined more than once.
    #[display("Type `{_0}` is defined more than once")]
    DuplicateType(#[error(not(source))] ArcStr),
    /// Schema definition is declared more than once.
    #[display("Schema definition is declared more than once")]
    DuplicateSchemaDefinition,
    /// Extended type is not defined as an object type.
    #[display("Extended type `{_0}` is not defined as an object type")]
    UnknownExtendedType(#[error(not(source))] ArcStr),
}
