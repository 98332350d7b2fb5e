//! Schema type graph a [`RuntimeWiring`] is generated for.
//!
//! [`RuntimeWiring`]: crate::RuntimeWiring

pub mod meta;
pub mod model;
pub mod translate;

use derive_more::with_trait::{Display, Error, From};

use self::{model::SchemaDocument, translate::TranslateError};

/// Error of reading a schema out of its SDL representation.
#[derive(Debug, Display, Error, From)]
pub enum SchemaLanguageError {
    /// Schema source is not a valid SDL document.
    Parse(graphql_parser::schema::ParseError),
    /// Schema document is not a valid schema.
    Translate(TranslateError),
}

impl SchemaDocument {
    /// Reads a [`SchemaDocument`] out of its SDL representation.
    ///
    /// # Errors
    ///
    /// If the source is not a valid SDL document, or defines types
    /// inconsistently.
    pub fn from_sdl(source: &str) -> Result<Self, SchemaLanguageError> {
        let document = graphql_parser::parse_schema::<String>(source)?;
        Ok(Self::try_from(&document)?)
    }
}
