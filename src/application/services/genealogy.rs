//! Genealogy service
//!
//! Identifier-level use cases over [`GenealogyStore`]: registering persons,
//! assigning parents, lookups and the traversal queries. Lookups that find
//! nothing return `None`; only malformed input and unknown ids in relation
//! queries are errors.

use std::fmt;

use termtree::Tree;
use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    DomainError, FamilyTree, GenealogyStore, Index, Person, TraversalOrder,
};

/// Field values for a person that is about to be registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub id: i64,
    pub name: String,
    pub birth_date: String,
    pub gender: String,
}

/// The `(name, id)` pair every query returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonSummary {
    pub name: String,
    pub id: i64,
}

impl PersonSummary {
    /// `Name (id)` or just `Name`.
    pub fn label(&self, show_ids: bool) -> String {
        if show_ids {
            self.to_string()
        } else {
            self.name.clone()
        }
    }
}

impl From<&Person> for PersonSummary {
    fn from(person: &Person) -> Self {
        Self {
            name: person.name().to_string(),
            id: person.id(),
        }
    }
}

impl fmt::Display for PersonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// What happened to the optional parent during registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentLink {
    /// No parent requested
    None,
    /// Linked to the person with this id
    Linked(i64),
    /// Requested parent id is not in the store; the person was still added
    Missing(i64),
}

/// Outcome of [`GenealogyService::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub index: Index,
    pub parent: ParentLink,
}

/// Service owning the store for the lifetime of a session.
#[derive(Debug, Default)]
pub struct GenealogyService {
    store: GenealogyStore,
}

impl GenealogyService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &GenealogyStore {
        &self.store
    }

    /// Parse a user supplied identifier.
    pub fn parse_id(input: &str) -> ApplicationResult<i64> {
        let trimmed = input.trim();
        let id: i64 = trimmed.parse().map_err(|_| ApplicationError::InvalidInput {
            input: trimmed.to_string(),
            reason: "not an integer".to_string(),
        })?;
        if id < 0 {
            return Err(DomainError::InvalidIdentifier(id).into());
        }
        Ok(id)
    }

    /// Check that `id` may be used for a new person.
    pub fn check_id(&self, id: i64) -> ApplicationResult<()> {
        if id < 0 {
            return Err(DomainError::InvalidIdentifier(id).into());
        }
        if self.store.find_by_id(id).is_some() {
            return Err(DomainError::DuplicateIdentifier(id).into());
        }
        Ok(())
    }

    /// Insert a person and, if requested, link it below an existing parent.
    ///
    /// An unknown parent id does not undo the insertion; it is reported as
    /// [`ParentLink::Missing`]. Naming the new person as its own parent is a
    /// cycle and fails before anything is stored.
    #[instrument(level = "debug", skip(self))]
    pub fn register(
        &mut self,
        new: NewPerson,
        parent_id: Option<i64>,
    ) -> ApplicationResult<Registration> {
        let person = Person::new(new.id, new.name, new.birth_date, new.gender)?;
        if parent_id == Some(new.id) {
            return Err(DomainError::CycleDetected {
                parent: new.id,
                child: new.id,
            }
            .into());
        }
        let index = self.store.insert(person)?;

        let parent = match parent_id {
            None => ParentLink::None,
            Some(pid) => match self.store.find_by_id(pid) {
                Some(parent_idx) => {
                    self.store.add_child(parent_idx, index)?;
                    ParentLink::Linked(pid)
                }
                None => {
                    warn!("parent {} not found, {} stays unlinked", pid, new.id);
                    ParentLink::Missing(pid)
                }
            },
        };
        debug!("registered {} ({:?})", new.id, parent);
        Ok(Registration { index, parent })
    }

    /// Link two existing persons by id.
    #[instrument(level = "debug", skip(self))]
    pub fn assign_parent(&mut self, parent_id: i64, child_id: i64) -> ApplicationResult<()> {
        let parent = self.index_of(parent_id)?;
        let child = self.index_of(child_id)?;
        self.store.add_child(parent, child)?;
        Ok(())
    }

    pub fn find_by_id(&self, id: i64) -> Option<&Person> {
        self.store
            .find_by_id(id)
            .and_then(|idx| self.store.get(idx))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Person> {
        self.store
            .find_by_name(name.trim())
            .and_then(|idx| self.store.get(idx))
    }

    pub fn traverse(&self, order: TraversalOrder) -> Vec<PersonSummary> {
        self.store
            .traverse(order)
            .map(|(_, person)| PersonSummary::from(person))
            .collect()
    }

    pub fn ancestors_of(&self, id: i64) -> ApplicationResult<Vec<PersonSummary>> {
        let idx = self.index_of(id)?;
        Ok(self
            .store
            .ancestors(idx)
            .map(|(_, person)| PersonSummary::from(person))
            .collect())
    }

    pub fn descendants_of(&self, id: i64) -> ApplicationResult<Vec<PersonSummary>> {
        let idx = self.index_of(id)?;
        Ok(self
            .store
            .descendants(idx)
            .map(|(_, person)| PersonSummary::from(person))
            .collect())
    }

    pub fn family_tree_of(&self, id: i64, show_ids: bool) -> ApplicationResult<Tree<String>> {
        let idx = self.index_of(id)?;
        self.store
            .family_tree_with(idx, |p| PersonSummary::from(p).label(show_ids))
            .ok_or(ApplicationError::PersonNotFound(id))
    }

    /// One tree per person without a parent, ascending by id.
    pub fn family_forest(&self, show_ids: bool) -> Vec<Tree<String>> {
        self.store
            .genealogical_roots()
            .filter_map(|(idx, _)| {
                self.store
                    .family_tree_with(idx, |p| PersonSummary::from(p).label(show_ids))
            })
            .collect()
    }

    fn index_of(&self, id: i64) -> ApplicationResult<Index> {
        self.store
            .find_by_id(id)
            .ok_or(ApplicationError::PersonNotFound(id))
    }
}
