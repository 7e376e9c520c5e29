//! Rendering of the genealogical relation as a `termtree::Tree`.
//!
//! The tree is assembled bottom-up from the descendant preorder, so deep
//! families do not recurse.

use std::collections::HashMap;

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::GenealogyStore;
use crate::domain::entities::Person;

pub trait FamilyTree {
    /// Family tree below `root` labelled with `label`; None for unknown nodes.
    fn family_tree_with<F>(&self, root: Index, label: F) -> Option<Tree<String>>
    where
        F: Fn(&Person) -> String;

    /// Family tree below `root` labelled `Name (id)`.
    fn family_tree(&self, root: Index) -> Option<Tree<String>> {
        self.family_tree_with(root, |person| person.to_string())
    }
}

impl FamilyTree for GenealogyStore {
    #[instrument(level = "debug", skip(self, label))]
    fn family_tree_with<F>(&self, root: Index, label: F) -> Option<Tree<String>>
    where
        F: Fn(&Person) -> String,
    {
        let order: Vec<Index> = std::iter::once(root)
            .chain(self.descendants(root).map(|(idx, _)| idx))
            .collect();

        // Children always follow their parent in preorder, so walking the
        // order backwards finishes every subtree before its parent needs it.
        let mut built: HashMap<Index, Tree<String>> = HashMap::new();
        for &idx in order.iter().rev() {
            let person = self.get(idx)?;
            let leaves: Vec<Tree<String>> = self
                .children(idx)
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            built.insert(idx, Tree::new(label(person)).with_leaves(leaves));
        }
        built.remove(&root)
    }
}
