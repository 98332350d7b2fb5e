//! Provenance of binding steps and the errors they fail with.

mod context;
mod error;

pub use self::{
    context::MappingContext,
    error::{Candidate, CandidateKind, MappingError, MappingType},
};
