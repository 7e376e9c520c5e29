//! Domain layer: entities and the genealogy store
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod family_tree;

pub use arena::{GenealogyStore, PersonNode};
pub use entities::{Person, TraversalOrder};
pub use error::{DomainError, DomainResult};
pub use family_tree::FamilyTree;
pub use generational_arena::Index;
