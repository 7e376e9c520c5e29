//! Domain entities: pure data structures without I/O

use std::fmt;

use crate::domain::error::{DomainError, DomainResult};

/// A person record. Immutable once created; the store keys it by `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    id: i64,
    name: String,
    birth_date: String,
    gender: String,
}

impl Person {
    /// Create a person, rejecting negative identifiers and blank fields.
    ///
    /// Text fields are stored trimmed. The birth date is free text; only
    /// its presence is checked.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        birth_date: impl Into<String>,
        gender: impl Into<String>,
    ) -> DomainResult<Self> {
        if id < 0 {
            return Err(DomainError::InvalidIdentifier(id));
        }
        Ok(Self {
            id,
            name: required("name", name.into())?,
            birth_date: required("birth date", birth_date.into())?,
            gender: required("gender", gender.into())?,
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn birth_date(&self) -> &str {
        &self.birth_date
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

fn required(field: &'static str, value: String) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::MissingRequiredField(field));
    }
    Ok(trimmed.to_string())
}

/// The three classic orderings over the identifier tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    /// Node, left subtree, right subtree
    Preorder,
    /// Left subtree, node, right subtree (ascending ids)
    Inorder,
    /// Left subtree, right subtree, node
    Postorder,
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TraversalOrder::Preorder => "preorder",
            TraversalOrder::Inorder => "inorder",
            TraversalOrder::Postorder => "postorder",
        };
        write!(f, "{name}")
    }
}
