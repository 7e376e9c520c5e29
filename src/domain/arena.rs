use std::cmp::Ordering;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::entities::{Person, TraversalOrder};
use crate::domain::error::{DomainError, DomainResult};

/// Slot in the arena: a person plus both relations it takes part in.
///
/// The identifier tree (`left`, `right`, `bst_parent`) is fixed at insertion.
/// The genealogical relation (`genealogical_parent`, `children`) is built
/// later by [`GenealogyStore::add_child`] and never follows the tree shape.
#[derive(Debug)]
pub struct PersonNode {
    pub person: Person,
    /// Left subtree: identifiers strictly smaller
    pub left: Option<Index>,
    /// Right subtree: identifiers not smaller
    pub right: Option<Index>,
    /// Parent in the identifier tree, None for the root
    pub bst_parent: Option<Index>,
    /// Assigned parent in the family, None until linked
    pub genealogical_parent: Option<Index>,
    /// Direct descendants in link order
    pub children: Vec<Index>,
}

impl PersonNode {
    fn new(person: Person, bst_parent: Option<Index>) -> Self {
        Self {
            person,
            left: None,
            right: None,
            bst_parent,
            genealogical_parent: None,
            children: Vec::new(),
        }
    }
}

/// Arena-backed store holding every person in one binary search tree
/// ordered by identifier.
///
/// Nodes are never removed, so an `Index` handed out by [`insert`](Self::insert)
/// stays valid for the lifetime of the store. All cross references between
/// nodes are plain indices.
#[derive(Debug)]
pub struct GenealogyStore {
    arena: Arena<PersonNode>,
    root: Option<Index>,
}

impl Default for GenealogyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GenealogyStore {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    pub fn node(&self, idx: Index) -> Option<&PersonNode> {
        self.arena.get(idx)
    }

    pub fn get(&self, idx: Index) -> Option<&Person> {
        self.arena.get(idx).map(|node| &node.person)
    }

    pub fn left(&self, idx: Index) -> Option<Index> {
        self.node(idx).and_then(|node| node.left)
    }

    pub fn right(&self, idx: Index) -> Option<Index> {
        self.node(idx).and_then(|node| node.right)
    }

    pub fn bst_parent(&self, idx: Index) -> Option<Index> {
        self.node(idx).and_then(|node| node.bst_parent)
    }

    pub fn genealogical_parent(&self, idx: Index) -> Option<Index> {
        self.node(idx).and_then(|node| node.genealogical_parent)
    }

    pub fn children(&self, idx: Index) -> &[Index] {
        self.node(idx)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Inserts a person into the identifier tree and returns its handle.
    ///
    /// Smaller identifiers descend left, all others right. Meeting an equal
    /// identifier on the way down fails with `DuplicateIdentifier` and leaves
    /// the store untouched. The root only changes when the store was empty.
    #[instrument(level = "debug", skip(self, person), fields(id = person.id()))]
    pub fn insert(&mut self, person: Person) -> DomainResult<Index> {
        let id = person.id();
        let Some(mut current) = self.root else {
            let idx = self.arena.insert(PersonNode::new(person, None));
            self.root = Some(idx);
            debug!("inserted {} as root", id);
            return Ok(idx);
        };

        loop {
            let node = self.arena.get(current).ok_or(DomainError::UnknownNode)?;
            let node_id = node.person.id();
            if id == node_id {
                return Err(DomainError::DuplicateIdentifier(id));
            }
            let go_left = id < node_id;
            let next = if go_left { node.left } else { node.right };

            match next {
                Some(next) => current = next,
                None => {
                    let idx = self.arena.insert(PersonNode::new(person, Some(current)));
                    let parent = self
                        .arena
                        .get_mut(current)
                        .ok_or(DomainError::UnknownNode)?;
                    if go_left {
                        parent.left = Some(idx);
                    } else {
                        parent.right = Some(idx);
                    }
                    debug!(
                        "inserted {} {} of {}",
                        id,
                        if go_left { "left" } else { "right" },
                        node_id
                    );
                    return Ok(idx);
                }
            }
        }
    }

    /// Records `child` as a direct descendant of `parent`.
    ///
    /// Linking a node to itself or to one of its own descendants fails with
    /// `CycleDetected`. Linking an existing pair again is a no-op. A child
    /// that already has another parent is moved: it leaves the old parent's
    /// list before joining the end of the new one.
    #[instrument(level = "debug", skip(self))]
    pub fn add_child(&mut self, parent: Index, child: Index) -> DomainResult<()> {
        let parent_id = self.get(parent).ok_or(DomainError::UnknownNode)?.id();
        let child_id = self.get(child).ok_or(DomainError::UnknownNode)?.id();

        if parent == child || self.is_ancestor(child, parent) {
            return Err(DomainError::CycleDetected {
                parent: parent_id,
                child: child_id,
            });
        }

        let previous = self.genealogical_parent(child);
        if previous == Some(parent) {
            debug!("{} is already a child of {}", child_id, parent_id);
            return Ok(());
        }
        if let Some(old) = previous {
            if let Some(old_node) = self.arena.get_mut(old) {
                old_node.children.retain(|&c| c != child);
                debug!(
                    "moved {} away from {}",
                    child_id,
                    old_node.person.id()
                );
            }
        }

        self.arena
            .get_mut(child)
            .ok_or(DomainError::UnknownNode)?
            .genealogical_parent = Some(parent);
        self.arena
            .get_mut(parent)
            .ok_or(DomainError::UnknownNode)?
            .children
            .push(child);
        debug!("linked {} <- {}", parent_id, child_id);
        Ok(())
    }

    /// True if `candidate` appears on the genealogical chain above `of`.
    pub fn is_ancestor(&self, candidate: Index, of: Index) -> bool {
        self.ancestors(of).any(|(idx, _)| idx == candidate)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn find_by_id(&self, id: i64) -> Option<Index> {
        let mut current = self.root;
        while let Some(idx) = current {
            let node = self.arena.get(idx)?;
            current = match id.cmp(&node.person.id()) {
                Ordering::Equal => return Some(idx),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    /// First exact name match in preorder. Names are not a search key, so
    /// this always walks the whole tree in the worst case.
    #[instrument(level = "trace", skip(self))]
    pub fn find_by_name(&self, name: &str) -> Option<Index> {
        self.preorder()
            .find(|(_, person)| person.name() == name)
            .map(|(idx, _)| idx)
    }

    pub fn preorder(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self)
    }

    pub fn inorder(&self) -> InOrderIterator<'_> {
        InOrderIterator::new(self)
    }

    pub fn postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Boxed traversal for callers that pick the order at runtime.
    pub fn traverse(
        &self,
        order: TraversalOrder,
    ) -> Box<dyn Iterator<Item = (Index, &Person)> + '_> {
        match order {
            TraversalOrder::Preorder => Box::new(self.preorder()),
            TraversalOrder::Inorder => Box::new(self.inorder()),
            TraversalOrder::Postorder => Box::new(self.postorder()),
        }
    }

    /// Genealogical ancestors of `idx`, from the immediate parent upward.
    /// Unknown indices yield nothing.
    pub fn ancestors(&self, idx: Index) -> AncestorIterator<'_> {
        AncestorIterator {
            store: self,
            next: self.genealogical_parent(idx),
        }
    }

    /// Genealogical descendants of `idx` in depth-first preorder, siblings in
    /// link order. `idx` itself is not part of the sequence.
    pub fn descendants(&self, idx: Index) -> DescendantIterator<'_> {
        DescendantIterator {
            store: self,
            stack: self.children(idx).iter().rev().copied().collect(),
        }
    }

    /// Persons without an assigned parent, in ascending identifier order.
    pub fn genealogical_roots(&self) -> impl Iterator<Item = (Index, &Person)> + '_ {
        self.inorder()
            .filter(move |(idx, _)| self.genealogical_parent(*idx).is_none())
    }

    /// Height of the identifier tree, 0 when empty.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(Index, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();

        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.node(idx) {
                for child in [node.left, node.right].into_iter().flatten() {
                    stack.push((child, depth + 1));
                }
            }
        }
        max_depth
    }
}

pub struct PreOrderIterator<'a> {
    store: &'a GenealogyStore,
    stack: Vec<Index>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(store: &'a GenealogyStore) -> Self {
        Self {
            store,
            stack: store.root().into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (Index, &'a Person);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let node = self.store.node(current)?;
        // Right first so the left subtree is popped next
        self.stack.extend(node.right);
        self.stack.extend(node.left);
        Some((current, &node.person))
    }
}

pub struct InOrderIterator<'a> {
    store: &'a GenealogyStore,
    stack: Vec<Index>,
    current: Option<Index>,
}

impl<'a> InOrderIterator<'a> {
    fn new(store: &'a GenealogyStore) -> Self {
        Self {
            store,
            stack: Vec::new(),
            current: store.root(),
        }
    }
}

impl<'a> Iterator for InOrderIterator<'a> {
    type Item = (Index, &'a Person);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(idx) = self.current {
            self.stack.push(idx);
            self.current = self.store.left(idx);
        }
        let idx = self.stack.pop()?;
        let node = self.store.node(idx)?;
        self.current = node.right;
        Some((idx, &node.person))
    }
}

pub struct PostOrderIterator<'a> {
    store: &'a GenealogyStore,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(store: &'a GenealogyStore) -> Self {
        Self {
            store,
            stack: store.root().map(|r| (r, false)).into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a Person);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, visited)) = self.stack.pop() {
            if let Some(node) = self.store.node(idx) {
                if visited {
                    return Some((idx, &node.person));
                }
                self.stack.push((idx, true));
                if let Some(right) = node.right {
                    self.stack.push((right, false));
                }
                if let Some(left) = node.left {
                    self.stack.push((left, false));
                }
            }
        }
        None
    }
}

pub struct AncestorIterator<'a> {
    store: &'a GenealogyStore,
    next: Option<Index>,
}

impl<'a> Iterator for AncestorIterator<'a> {
    type Item = (Index, &'a Person);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        let node = self.store.node(idx)?;
        self.next = node.genealogical_parent;
        Some((idx, &node.person))
    }
}

pub struct DescendantIterator<'a> {
    store: &'a GenealogyStore,
    stack: Vec<Index>,
}

impl<'a> Iterator for DescendantIterator<'a> {
    type Item = (Index, &'a Person);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        let node = self.store.node(idx)?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.children.iter().rev().copied());
        Some((idx, &node.person))
    }
}
