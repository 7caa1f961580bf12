//! In-order traversal over a [`crate::Map`] without borrowing it for the whole walk.
//!
//! The original source's cursor holds a raw `rb_node_t*` and documents that removing the
//! bound key invalidates it silently (undefined behavior on next use). The pool's
//! generation counter lets this cursor detect that case and fail loudly with
//! [`MapError::IteratorInvalid`] instead.

use crate::comparator::Comparator;
use crate::error::MapError;
use crate::pool::{NodeId, Pool};
use crate::tree;

/// Which way a [`Cursor`] walks the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

enum State {
    Positioned { node: NodeId, generation: u32 },
    AtEnd,
}

/// A position inside a [`crate::Map`]'s in-order sequence.
///
/// Borrows the map immutably, so a cursor and read-only lookups can coexist, but no
/// mutation of the map can happen while one is alive — the usual shared-borrow rule rather
/// than a bespoke iterator-invalidation contract. The invalidation path this module exists
/// for only fires across two *separate* borrows: position a cursor, drop it, mutate the
/// map, and an explicitly retained `(NodeId, generation)` pair would no longer line up.
pub struct Cursor<'a, K, V, C> {
    pool: &'a Pool<K, V>,
    root: NodeId,
    cmp: &'a C,
    direction: Direction,
    state: State,
}

impl<'a, K, V, C: Comparator<K>> Cursor<'a, K, V, C> {
    pub(crate) fn new(pool: &'a Pool<K, V>, root: NodeId, cmp: &'a C, direction: Direction) -> Self {
        let node = if root.is_nil() {
            NodeId::NIL
        } else {
            match direction {
                Direction::Forward => tree::minimum(pool, root),
                Direction::Backward => tree::maximum(pool, root),
            }
        };
        let state = Self::state_for(pool, node);
        Cursor {
            pool,
            root,
            cmp,
            direction,
            state,
        }
    }

    fn state_for(pool: &Pool<K, V>, node: NodeId) -> State {
        if node.is_nil() {
            return State::AtEnd;
        }
        match pool.generation_of(node) {
            Some(generation) => State::Positioned { node, generation },
            None => State::AtEnd,
        }
    }

    /// Reposition at the first key in the cursor's direction of travel.
    pub fn seek_first(&mut self) {
        let node = if self.root.is_nil() {
            NodeId::NIL
        } else {
            tree::minimum(self.pool, self.root)
        };
        self.state = Self::state_for(self.pool, node);
    }

    /// Reposition at the last key in the cursor's direction of travel.
    pub fn seek_last(&mut self) {
        let node = if self.root.is_nil() {
            NodeId::NIL
        } else {
            tree::maximum(self.pool, self.root)
        };
        self.state = Self::state_for(self.pool, node);
    }

    /// Reposition at `key`, if bound. Returns [`MapError::KeyNotFound`] otherwise, leaving
    /// the cursor at the end.
    pub fn seek(&mut self, key: &K) -> Result<(), MapError> {
        let node = tree::search(self.pool, self.root, key, self.cmp);
        self.state = Self::state_for(self.pool, node);
        if node.is_nil() {
            return Err(MapError::KeyNotFound);
        }
        Ok(())
    }

    fn current(&self) -> Result<NodeId, MapError> {
        match self.state {
            State::AtEnd => Err(MapError::IteratorAtEnd),
            State::Positioned { node, generation } => match self.pool.generation_of(node) {
                Some(g) if g == generation => Ok(node),
                _ => Err(MapError::IteratorInvalid),
            },
        }
    }

    /// `true` if the cursor is positioned on a live binding.
    pub fn has_next(&self) -> bool {
        self.current().is_ok()
    }

    /// The key at the cursor's current position.
    pub fn key(&self) -> Result<&K, MapError> {
        let node = self.current()?;
        Ok(&self.pool[node].key)
    }

    /// The value at the cursor's current position.
    pub fn value(&self) -> Result<&V, MapError> {
        let node = self.current()?;
        Ok(&self.pool[node].value)
    }

    /// Move one step in the cursor's direction. Fails without moving if the cursor is
    /// already invalid or past the end.
    pub fn advance(&mut self) -> Result<(), MapError> {
        let node = self.current()?;
        let next = match self.direction {
            Direction::Forward => tree::successor(self.pool, node),
            Direction::Backward => tree::predecessor(self.pool, node),
        };
        self.state = Self::state_for(self.pool, next);
        Ok(())
    }
}

impl<'a, K, V, C: Comparator<K>> Iterator for Cursor<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current().ok()?;
        let item = (&self.pool[node].key, &self.pool[node].value);
        let _ = self.advance();
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::NaturalOrder;

    fn sample_pool() -> (Pool<i32, i32>, NodeId) {
        let mut pool = Pool::new();
        let mut root = NodeId::NIL;
        for k in [5, 2, 8, 1, 9, 3, 7] {
            tree::insert(&mut pool, &mut root, k, k * 10, &NaturalOrder).unwrap();
        }
        (pool, root)
    }

    #[test]
    fn forward_cursor_yields_sorted_keys() {
        let (pool, root) = sample_pool();
        let cursor = Cursor::new(&pool, root, &NaturalOrder, Direction::Forward);
        let keys: Vec<i32> = cursor.map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![1, 2, 3, 5, 7, 8, 9]);
    }

    #[test]
    fn backward_cursor_yields_reverse_sorted_keys() {
        let (pool, root) = sample_pool();
        let cursor = Cursor::new(&pool, root, &NaturalOrder, Direction::Backward);
        let keys: Vec<i32> = cursor.map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![9, 8, 7, 5, 3, 2, 1]);
    }

    #[test]
    fn seek_positions_on_matching_key() {
        let (pool, root) = sample_pool();
        let mut cursor = Cursor::new(&pool, root, &NaturalOrder, Direction::Forward);
        cursor.seek(&7).unwrap();
        assert_eq!(*cursor.key().unwrap(), 7);
        assert_eq!(*cursor.value().unwrap(), 70);
    }

    #[test]
    fn seek_missing_key_reports_not_found() {
        let (pool, root) = sample_pool();
        let mut cursor = Cursor::new(&pool, root, &NaturalOrder, Direction::Forward);
        assert_eq!(cursor.seek(&42), Err(MapError::KeyNotFound));
        assert_eq!(cursor.key(), Err(MapError::IteratorAtEnd));
    }

    #[test]
    fn empty_tree_cursor_is_immediately_at_end() {
        let pool: Pool<i32, i32> = Pool::new();
        let cursor = Cursor::new(&pool, NodeId::NIL, &NaturalOrder, Direction::Forward);
        assert!(!cursor.has_next());
    }

    #[test]
    fn stale_node_generation_is_detected_after_slot_reuse() {
        let mut pool = Pool::new();
        let mut root = NodeId::NIL;
        tree::insert(&mut pool, &mut root, 1, 100, &NaturalOrder).unwrap();
        let stale_node = tree::search(&pool, root, &1, &NaturalOrder);
        let stale_generation = pool.generation_of(stale_node).unwrap();

        tree::remove(&mut pool, &mut root, &1, &NaturalOrder).unwrap();
        tree::insert(&mut pool, &mut root, 2, 200, &NaturalOrder).unwrap();

        let cursor = Cursor {
            pool: &pool,
            root,
            cmp: &NaturalOrder,
            direction: Direction::Forward,
            state: State::Positioned {
                node: stale_node,
                generation: stale_generation,
            },
        };
        assert_eq!(cursor.key(), Err(MapError::IteratorInvalid));
        assert_eq!(cursor.value(), Err(MapError::IteratorInvalid));
        assert!(!cursor.has_next());
    }
}
