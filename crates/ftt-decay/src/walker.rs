//! Decay-chain walker.
//!
//! Starting from a root particle, the walker descends through decay vertices
//! as long as the particle type stays the same (radiative self-decays,
//! propagator copies) and records the first descendant of a different type on
//! every branch. Terminal descendants are keyed by [`ChildKey`], so a particle
//! reached through several branches is recorded once.

use std::collections::btree_map::{self, BTreeMap};

use ftt_core::{ChildKey, DecayNode};

/// Deduplicated terminal descendants of one root particle, in key order.
#[derive(Debug, Clone)]
pub struct ChildMap<N> {
    entries: BTreeMap<ChildKey, N>,
}

impl<N> Default for ChildMap<N> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<N> ChildMap<N> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of unique terminal descendants.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no terminal descendant was found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns whether a descendant with this key was recorded.
    pub fn contains_key(&self, key: &ChildKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the descendant recorded under `key`.
    pub fn get(&self, key: &ChildKey) -> Option<&N> {
        self.entries.get(key)
    }

    /// Iterates over the keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &ChildKey> {
        self.entries.keys()
    }

    /// Iterates over `(key, descendant)` pairs in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, ChildKey, N> {
        self.entries.iter()
    }

    /// Consumes the map and returns the descendants in key order.
    pub fn into_particles(self) -> Vec<N> {
        self.entries.into_values().collect()
    }

    /// Records `node` unless the key is already taken; the first insertion wins.
    fn record(&mut self, key: ChildKey, node: N) {
        self.entries.entry(key).or_insert(node);
    }
}

impl<N: DecayNode> ChildMap<N> {
    /// Walks the decay tree below `root` and accumulates its terminal
    /// descendants into this map.
    ///
    /// The root itself is never recorded. Unavailable outgoing references are
    /// skipped. Traversal is depth-first in vertex listing order on an
    /// explicit stack.
    pub fn fill_from(&mut self, root: &N) {
        let mut stack: Vec<(u32, N)> = Vec::new();
        push_children(&mut stack, root);
        while let Some((parent_type, child)) = stack.pop() {
            if child.pdg_id().abs() != parent_type {
                self.record(ChildKey::of(&child), child);
            } else {
                push_children(&mut stack, &child);
            }
        }
    }
}

impl<'a, N> IntoIterator for &'a ChildMap<N> {
    type Item = (&'a ChildKey, &'a N);
    type IntoIter = btree_map::Iter<'a, ChildKey, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Returns the deduplicated terminal descendants of `root` in a fresh map.
pub fn walk<N: DecayNode>(root: &N) -> ChildMap<N> {
    let mut map = ChildMap::new();
    map.fill_from(root);
    map
}

/// Returns the unique terminal descendants of `root` ordered by [`ChildKey`].
pub fn unique_children<N: DecayNode>(root: &N) -> Vec<N> {
    walk(root).into_particles()
}

/// Pushes the available children of `parent` so that they pop in listing order.
fn push_children<N: DecayNode>(stack: &mut Vec<(u32, N)>, parent: &N) {
    let parent_type = parent.pdg_id().abs();
    let mark = stack.len();
    stack.extend(
        parent
            .outgoing_children()
            .flatten()
            .map(|child| (parent_type, child)),
    );
    stack[mark..].reverse();
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftt_core::{Barcode, PdgId};

    /// Tree node backed by a static table: `(pdg, barcode, children)`.
    #[derive(Debug, Clone, Copy)]
    struct Node {
        table: &'static [(i32, i32, &'static [Option<usize>])],
        index: usize,
    }

    impl DecayNode for Node {
        fn pdg_id(&self) -> PdgId {
            PdgId::from_raw(self.table[self.index].0)
        }

        fn barcode(&self) -> Barcode {
            Barcode::from_raw(self.table[self.index].1)
        }

        fn has_decay_vertex(&self) -> bool {
            !self.table[self.index].2.is_empty()
        }

        fn outgoing_children(&self) -> Box<dyn ExactSizeIterator<Item = Option<Self>> + '_> {
            let table = self.table;
            Box::new(
                self.table[self.index]
                    .2
                    .iter()
                    .map(move |link| link.map(|index| Node { table, index })),
            )
        }
    }

    fn barcodes(map: &ChildMap<Node>) -> Vec<i32> {
        map.keys().map(|key| key.barcode.as_raw()).collect()
    }

    #[test]
    fn antiparticle_copy_counts_as_same_type() {
        static TREE: [(i32, i32, &[Option<usize>]); 3] = [
            (1_000_022, 1, &[Some(1)]),
            (-1_000_022, 2, &[Some(2)]),
            (13, 3, &[]),
        ];
        let map = walk(&Node {
            table: &TREE,
            index: 0,
        });
        assert_eq!(barcodes(&map), vec![3]);
    }

    #[test]
    fn unavailable_references_are_skipped() {
        static TREE: [(i32, i32, &[Option<usize>]); 2] =
            [(1_000_022, 1, &[None, Some(1), None]), (11, 2, &[])];
        let map = walk(&Node {
            table: &TREE,
            index: 0,
        });
        assert_eq!(barcodes(&map), vec![2]);
    }

    #[test]
    fn terminal_descendants_are_not_expanded() {
        static TREE: [(i32, i32, &[Option<usize>]); 4] = [
            (1_000_022, 1, &[Some(1)]),
            (15, 2, &[Some(2), Some(3)]),
            (16, 3, &[]),
            (211, 4, &[]),
        ];
        let map = walk(&Node {
            table: &TREE,
            index: 0,
        });
        assert_eq!(barcodes(&map), vec![2]);
    }

    #[test]
    fn first_insertion_wins_on_key_collision() {
        // Two distinct nodes sharing (type, barcode): the first in walk order is kept.
        static TREE: [(i32, i32, &[Option<usize>]); 4] = [
            (1_000_022, 1, &[Some(1), Some(2)]),
            (1_000_022, 2, &[Some(3)]),
            (-5, 9, &[]),
            (5, 9, &[]),
        ];
        let map = walk(&Node {
            table: &TREE,
            index: 0,
        });
        assert_eq!(map.len(), 1);
        let kept = map.iter().next().map(|(_, node)| node.index);
        assert_eq!(kept, Some(3));
    }
}
