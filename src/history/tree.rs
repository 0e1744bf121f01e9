//! Ownership tree - a civilization's territory in order of acquisition
//!
//! Conquest always proceeds from an owned tile to an adjacent one, so a
//! civilization's land forms a tree rooted at its seed tile. Nodes live in an
//! arena and refer to each other by slot index; an index map gives O(1)
//! membership.

use std::collections::VecDeque;
use std::hash::Hash;

use ahash::AHashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("duplicates are not allowed")]
    Duplicate,

    #[error("the given parent is not in the tree")]
    MissingParent,

    #[error("the tree already has a seed")]
    SeedOccupied,

    #[error("the given item is not in the tree")]
    Missing,
}

#[derive(Clone, Debug)]
struct Node<T> {
    item: T,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Tree-shaped set with parent-linked insertion and subtree deletion
#[derive(Clone, Debug)]
pub struct OwnershipTree<T> {
    nodes: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    index: AHashMap<T, usize>,
    seed: Option<usize>,
}

impl<T> Default for OwnershipTree<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            index: AHashMap::new(),
            seed: None,
        }
    }
}

impl<T: Copy + Eq + Hash> OwnershipTree<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[inline]
    pub fn has(&self, item: T) -> bool {
        self.index.contains_key(&item)
    }

    /// The parentless item, if the tree is not empty
    pub fn seed(&self) -> Option<T> {
        self.seed.map(|slot| self.node(slot).item)
    }

    pub fn parent(&self, item: T) -> Result<Option<T>, TreeError> {
        let slot = self.slot(item)?;
        Ok(self.node(slot).parent.map(|p| self.node(p).item))
    }

    /// Insert `item` under `parent`, or as the seed when `parent` is `None`.
    pub fn add(&mut self, item: T, parent: Option<T>) -> Result<(), TreeError> {
        if self.has(item) {
            return Err(TreeError::Duplicate);
        }
        let parent_slot = match parent {
            None if self.seed.is_some() => return Err(TreeError::SeedOccupied),
            None => None,
            Some(parent) => Some(self.slot(parent).map_err(|_| TreeError::MissingParent)?),
        };

        let node = Node {
            item,
            parent: parent_slot,
            children: Vec::new(),
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                slot
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        };

        match parent_slot {
            Some(p) => self.node_mut(p).children.push(slot),
            None => self.seed = Some(slot),
        }
        self.index.insert(item, slot);
        Ok(())
    }

    /// Direct children of `item`, in insertion order
    pub fn get_children(&self, item: T) -> Result<Vec<T>, TreeError> {
        let slot = self.slot(item)?;
        Ok(self
            .node(slot)
            .children
            .iter()
            .map(|&child| self.node(child).item)
            .collect())
    }

    /// Remove `item` and every descendant. Returns the removed items,
    /// `item` first. Deleting the seed empties the tree.
    pub fn delete(&mut self, item: T) -> Result<Vec<T>, TreeError> {
        let head = self.slot(item)?;

        if Some(head) == self.seed {
            let removed: Vec<T> = self.iter().collect();
            self.nodes.clear();
            self.free.clear();
            self.index.clear();
            self.seed = None;
            return Ok(removed);
        }

        if let Some(parent) = self.node(head).parent {
            let siblings = &mut self.node_mut(parent).children;
            if let Some(position) = siblings.iter().position(|&s| s == head) {
                siblings.remove(position);
            }
        }

        let mut removed = Vec::new();
        let mut stack = vec![head];
        while let Some(slot) = stack.pop() {
            if let Some(node) = self.nodes[slot].take() {
                self.index.remove(&node.item);
                removed.push(node.item);
                stack.extend(node.children);
                self.free.push(slot);
            }
        }
        Ok(removed)
    }

    /// Lazy breadth-first walk over `item` and all of its descendants
    pub fn get_all_children(&self, item: T) -> Result<Descendants<'_, T>, TreeError> {
        let slot = self.slot(item)?;
        Ok(Descendants {
            tree: self,
            queue: VecDeque::from([slot]),
        })
    }

    /// Breadth-first walk over the whole tree, starting at the seed
    pub fn iter(&self) -> Descendants<'_, T> {
        Descendants {
            tree: self,
            queue: self.seed.into_iter().collect(),
        }
    }

    fn slot(&self, item: T) -> Result<usize, TreeError> {
        self.index.get(&item).copied().ok_or(TreeError::Missing)
    }

    fn node(&self, slot: usize) -> &Node<T> {
        self.nodes[slot]
            .as_ref()
            .unwrap_or_else(|| unreachable!("index points at a vacant slot"))
    }

    fn node_mut(&mut self, slot: usize) -> &mut Node<T> {
        self.nodes[slot]
            .as_mut()
            .unwrap_or_else(|| unreachable!("index points at a vacant slot"))
    }
}

/// Breadth-first iterator produced by [`OwnershipTree::get_all_children`]
pub struct Descendants<'a, T> {
    tree: &'a OwnershipTree<T>,
    queue: VecDeque<usize>,
}

impl<'a, T: Copy + Eq + Hash> Iterator for Descendants<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let slot = self.queue.pop_front()?;
        let node = self.tree.node(slot);
        self.queue.extend(node.children.iter().copied());
        Some(node.item)
    }
}

impl<'a, T: Copy + Eq + Hash> IntoIterator for &'a OwnershipTree<T> {
    type Item = T;
    type IntoIter = Descendants<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    //      0
    //     / \
    //    1   2
    //   / \   \
    //  3   4   5
    fn sample() -> OwnershipTree<u32> {
        let mut tree = OwnershipTree::new();
        tree.add(0, None).unwrap();
        tree.add(1, Some(0)).unwrap();
        tree.add(2, Some(0)).unwrap();
        tree.add(3, Some(1)).unwrap();
        tree.add(4, Some(1)).unwrap();
        tree.add(5, Some(2)).unwrap();
        tree
    }

    #[test]
    fn test_add_and_query() {
        let tree = sample();
        assert_eq!(tree.size(), 6);
        assert!(tree.has(4));
        assert!(!tree.has(9));
        assert_eq!(tree.seed(), Some(0));
        assert_eq!(tree.get_children(1).unwrap(), vec![3, 4]);
        assert_eq!(tree.parent(5).unwrap(), Some(2));
        assert_eq!(tree.parent(0).unwrap(), None);
    }

    #[test]
    fn test_add_rejects_contract_violations() {
        let mut tree = sample();
        assert_eq!(tree.add(3, Some(0)), Err(TreeError::Duplicate));
        assert_eq!(tree.add(7, Some(42)), Err(TreeError::MissingParent));
        assert_eq!(tree.add(7, None), Err(TreeError::SeedOccupied));
        assert_eq!(tree.size(), 6);
    }

    #[test]
    fn test_get_children_of_missing_item_fails() {
        assert_eq!(sample().get_children(9), Err(TreeError::Missing));
    }

    #[test]
    fn test_breadth_first_order() {
        let tree = sample();
        assert_eq!(tree.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(tree.get_all_children(1).unwrap().collect::<Vec<_>>(), vec![1, 3, 4]);
    }

    #[test]
    fn test_delete_subtree() {
        let mut tree = sample();
        let mut removed = tree.delete(1).unwrap();
        removed.sort();
        assert_eq!(removed, vec![1, 3, 4]);
        assert_eq!(tree.size(), 3);
        assert_eq!(tree.get_children(0).unwrap(), vec![2]);
        assert!(!tree.has(3));
        assert_eq!(tree.delete(3), Err(TreeError::Missing));
    }

    #[test]
    fn test_delete_seed_clears_everything() {
        let mut tree = sample();
        assert_eq!(tree.delete(0).unwrap().len(), 6);
        assert!(tree.is_empty());
        assert_eq!(tree.iter().count(), 0);
        tree.add(8, None).unwrap();
        assert_eq!(tree.seed(), Some(8));
    }

    #[test]
    fn test_slots_are_reused_after_delete() {
        let mut tree = sample();
        tree.delete(2).unwrap();
        tree.add(6, Some(4)).unwrap();
        tree.add(7, Some(6)).unwrap();
        assert_eq!(tree.iter().collect::<Vec<_>>(), vec![0, 1, 3, 4, 6, 7]);
    }
}
