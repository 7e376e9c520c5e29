//! Application services

pub mod genealogy;

pub use genealogy::{GenealogyService, NewPerson, ParentLink, PersonSummary, Registration};
