//! The arena backing one [`crate::Map`]'s tree.
//!
//! The original source links `rb_node_t` records with raw pointers and a shared `NIL`
//! sentinel. The idiomatic translation for a memory-safe language is an arena of nodes
//! indexed by small integer handles (`NodeId`), with a distinguished `NodeId::NIL` standing
//! in for the sentinel and a generation counter on each slot so that a handle captured
//! before a slot was freed and reused can be told apart from a handle into the new
//! occupant — see `Cursor` for where that distinction actually matters.

use crate::error::MapError;

/// Red-black color of a slot. `NodeId::NIL` is considered black by convention wherever the
/// algorithms ask for a child's color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// An arena index into a [`Pool`]. `NIL` is the distinguished "no child" handle, replacing
/// the original's shared sentinel node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(u32);

impl NodeId {
    pub(crate) const NIL: NodeId = NodeId(u32::MAX);

    pub(crate) fn is_nil(self) -> bool {
        self == NodeId::NIL
    }

    fn index(self) -> usize {
        debug_assert!(!self.is_nil());
        self.0 as usize
    }
}

/// One binding plus the tree-placement metadata the red-black algorithms need.
pub(crate) struct Slot<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) parent: NodeId,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) generation: u32,
}

/// The arena of [`Slot`]s for one Map. Freed slots are pushed onto a free-list and reused
/// by the next allocation, bumping that slot's generation so stale external handles
/// (cursors) can detect the reuse.
pub(crate) struct Pool<K, V> {
    slots: Vec<Option<Slot<K, V>>>,
    free: Vec<NodeId>,
    next_generation: u32,
    #[cfg(test)]
    fail_next_alloc: bool,
}

impl<K, V> Pool<K, V> {
    pub(crate) fn new() -> Self {
        Pool {
            slots: Vec::new(),
            free: Vec::new(),
            next_generation: 1,
            #[cfg(test)]
            fail_next_alloc: false,
        }
    }

    /// Arms a one-shot simulated allocation failure for the next [`Pool::try_alloc`] call,
    /// for exercising the rollback path the real `try_reserve` failure is too rare to hit
    /// in a test run.
    #[cfg(test)]
    pub(crate) fn force_next_alloc_failure(&mut self) {
        self.fail_next_alloc = true;
    }

    /// Allocate a new slot holding `key`/`value`, returning its handle.
    ///
    /// Fails with [`MapError::OutOfMemory`] if growing the backing storage fails, leaving
    /// the pool exactly as it was (the original's allocation-failure rollback contract).
    pub(crate) fn try_alloc(&mut self, key: K, value: V) -> Result<NodeId, MapError> {
        #[cfg(test)]
        if self.fail_next_alloc {
            self.fail_next_alloc = false;
            return Err(MapError::OutOfMemory);
        }

        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1).max(1);
        let slot = Slot {
            key,
            value,
            color: Color::Red,
            parent: NodeId::NIL,
            left: NodeId::NIL,
            right: NodeId::NIL,
            generation,
        };

        if let Some(id) = self.free.pop() {
            self.slots[id.index()] = Some(slot);
            return Ok(id);
        }

        self.slots
            .try_reserve(1)
            .map_err(|_| MapError::OutOfMemory)?;
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Some(slot));
        Ok(id)
    }

    /// Free `id`, returning the key/value it held. Panics if `id` is `NIL` or already free —
    /// both indicate a bug in the tree algorithms, not a caller error.
    pub(crate) fn free(&mut self, id: NodeId) -> (K, V) {
        let slot = self.slots[id.index()]
            .take()
            .expect("freeing an already-free node");
        self.free.push(id);
        (slot.key, slot.value)
    }

    pub(crate) fn generation_of(&self, id: NodeId) -> Option<u32> {
        if id.is_nil() {
            return None;
        }
        self.slots
            .get(id.index())
            .and_then(|s| s.as_ref())
            .map(|s| s.generation)
    }

    pub(crate) fn color(&self, id: NodeId) -> Color {
        if id.is_nil() {
            return Color::Black;
        }
        self[id].color
    }

    pub(crate) fn set_color(&mut self, id: NodeId, color: Color) {
        if !id.is_nil() {
            self[id].color = color;
        }
    }

    /// Discard every slot at once. Reused by `clear` and `Drop`; `O(1)` in allocations
    /// since it just drops the backing `Vec`s, matching the forest's "clear in constant
    /// time" design goal (even though this crate holds one tree per Map, not a forest).
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

impl<K, V> core::ops::Index<NodeId> for Pool<K, V> {
    type Output = Slot<K, V>;

    fn index(&self, id: NodeId) -> &Slot<K, V> {
        self.slots[id.index()]
            .as_ref()
            .expect("access through a stale or freed node handle")
    }
}

impl<K, V> core::ops::IndexMut<NodeId> for Pool<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Slot<K, V> {
        self.slots[id.index()]
            .as_mut()
            .expect("access through a stale or freed node handle")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_and_free_reuses_slot_with_new_generation() {
        let mut pool: Pool<i32, i32> = Pool::new();
        let a = pool.try_alloc(1, 10).unwrap();
        let gen_a = pool.generation_of(a).unwrap();
        pool.free(a);
        let b = pool.try_alloc(2, 20).unwrap();
        assert_eq!(a, b, "free-list should reuse the slot index");
        let gen_b = pool.generation_of(b).unwrap();
        assert_ne!(gen_a, gen_b, "reused slot must bump its generation");
    }

    #[test]
    #[should_panic(expected = "stale or freed")]
    fn indexing_a_freed_slot_panics() {
        let mut pool: Pool<i32, i32> = Pool::new();
        let a = pool.try_alloc(1, 10).unwrap();
        pool.free(a);
        let _ = &pool[a];
    }
}
