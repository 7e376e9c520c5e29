//! lineage: a genealogy store.
//!
//! Persons live in one binary search tree ordered by identifier; a second,
//! independent parent/children relation records the family. The crate is
//! layered:
//!
//! - [`domain`]: the arena-backed store, traversals and family relations
//! - [`application`]: identifier-level use cases
//! - [`config`]: layered settings
//! - [`cli`]: argument parsing and the interactive menu

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
