//! Application layer: use cases over the genealogy store
//!
//! Works with identifiers instead of arena handles and returns plain
//! `(name, id)` summaries ready for rendering.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use services::{GenealogyService, NewPerson, ParentLink, PersonSummary, Registration};
