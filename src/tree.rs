//! Red-black tree algorithms over a [`Pool`] arena.
//!
//! These are free functions rather than methods on a tree type: the tree has no identity
//! of its own beyond a `root: NodeId` held by [`crate::Map`], matching how the original's
//! `rb_*` static helpers operate directly on `map->root` rather than on a separate tree
//! object. `NodeId::NIL` stands in for the original's shared `NIL` sentinel; since it
//! carries no fields, operations that need "the parent `x` would have, even though `x` is
//! `NIL`" (the delete fixup) thread that parent through as an explicit argument instead of
//! reading it off the non-existent sentinel.

use crate::comparator::Comparator;
use crate::error::MapError;
use crate::pool::{Color, NodeId, Pool};
use core::cmp::Ordering;

/// Outcome of inserting into the tree: either a fresh binding, or the value that was
/// displaced from an existing one.
pub(crate) enum InsertOutcome<V> {
    Inserted,
    Replaced(V),
}

/// BST descent for `key`. Returns `NodeId::NIL` if no binding compares equal.
pub(crate) fn search<K, V, C: Comparator<K>>(
    pool: &Pool<K, V>,
    root: NodeId,
    key: &K,
    cmp: &C,
) -> NodeId {
    let mut node = root;
    while !node.is_nil() {
        match cmp.compare(key, &pool[node].key) {
            Ordering::Equal => return node,
            Ordering::Less => node = pool[node].left,
            Ordering::Greater => node = pool[node].right,
        }
    }
    NodeId::NIL
}

/// Leftmost descendant of `node`. `node` must not be `NIL`.
pub(crate) fn minimum<K, V>(pool: &Pool<K, V>, mut node: NodeId) -> NodeId {
    debug_assert!(!node.is_nil());
    while !pool[node].left.is_nil() {
        node = pool[node].left;
    }
    node
}

/// Rightmost descendant of `node`. `node` must not be `NIL`.
pub(crate) fn maximum<K, V>(pool: &Pool<K, V>, mut node: NodeId) -> NodeId {
    debug_assert!(!node.is_nil());
    while !pool[node].right.is_nil() {
        node = pool[node].right;
    }
    node
}

/// In-order successor of `node`, or `NIL` if `node` holds the largest key.
pub(crate) fn successor<K, V>(pool: &Pool<K, V>, node: NodeId) -> NodeId {
    if !pool[node].right.is_nil() {
        return minimum(pool, pool[node].right);
    }
    let mut x = node;
    let mut y = pool[x].parent;
    while !y.is_nil() && x == pool[y].right {
        x = y;
        y = pool[y].parent;
    }
    y
}

/// In-order predecessor of `node`, or `NIL` if `node` holds the smallest key.
pub(crate) fn predecessor<K, V>(pool: &Pool<K, V>, node: NodeId) -> NodeId {
    if !pool[node].left.is_nil() {
        return maximum(pool, pool[node].left);
    }
    let mut x = node;
    let mut y = pool[x].parent;
    while !y.is_nil() && x == pool[y].left {
        x = y;
        y = pool[y].parent;
    }
    y
}

fn left_rotate<K, V>(pool: &mut Pool<K, V>, root: &mut NodeId, x: NodeId) {
    let y = pool[x].right;
    debug_assert!(!y.is_nil(), "left_rotate requires a right child");

    pool[x].right = pool[y].left;
    if !pool[y].left.is_nil() {
        let yl = pool[y].left;
        pool[yl].parent = x;
    }

    pool[y].parent = pool[x].parent;
    let xp = pool[x].parent;
    if xp.is_nil() {
        *root = y;
    } else if x == pool[xp].left {
        pool[xp].left = y;
    } else {
        pool[xp].right = y;
    }

    pool[y].left = x;
    pool[x].parent = y;
}

fn right_rotate<K, V>(pool: &mut Pool<K, V>, root: &mut NodeId, y: NodeId) {
    let x = pool[y].left;
    debug_assert!(!x.is_nil(), "right_rotate requires a left child");

    pool[y].left = pool[x].right;
    if !pool[x].right.is_nil() {
        let xr = pool[x].right;
        pool[xr].parent = y;
    }

    pool[x].parent = pool[y].parent;
    let yp = pool[y].parent;
    if yp.is_nil() {
        *root = x;
    } else if y == pool[yp].left {
        pool[yp].left = x;
    } else {
        pool[yp].right = x;
    }

    pool[x].right = y;
    pool[y].parent = x;
}

/// Replace the subtree rooted at `u` with the subtree rooted at `v` in `u`'s parent.
fn transplant<K, V>(pool: &mut Pool<K, V>, root: &mut NodeId, u: NodeId, v: NodeId) {
    let up = pool[u].parent;
    if up.is_nil() {
        *root = v;
    } else if u == pool[up].left {
        pool[up].left = v;
    } else {
        pool[up].right = v;
    }
    if !v.is_nil() {
        pool[v].parent = up;
    }
}

fn insert_fixup<K, V>(pool: &mut Pool<K, V>, root: &mut NodeId, mut z: NodeId) {
    while pool.color(pool[z].parent) == Color::Red {
        let zp = pool[z].parent;
        let zpp = pool[zp].parent;
        if zp == pool[zpp].left {
            let y = pool[zpp].right;
            if pool.color(y) == Color::Red {
                pool.set_color(zp, Color::Black);
                pool.set_color(y, Color::Black);
                pool.set_color(zpp, Color::Red);
                z = zpp;
            } else {
                if z == pool[zp].right {
                    z = zp;
                    left_rotate(pool, root, z);
                }
                let zp2 = pool[z].parent;
                let zpp2 = pool[zp2].parent;
                pool.set_color(zp2, Color::Black);
                pool.set_color(zpp2, Color::Red);
                right_rotate(pool, root, zpp2);
            }
        } else {
            let y = pool[zpp].left;
            if pool.color(y) == Color::Red {
                pool.set_color(zp, Color::Black);
                pool.set_color(y, Color::Black);
                pool.set_color(zpp, Color::Red);
                z = zpp;
            } else {
                if z == pool[zp].left {
                    z = zp;
                    right_rotate(pool, root, z);
                }
                let zp2 = pool[z].parent;
                let zpp2 = pool[zp2].parent;
                pool.set_color(zp2, Color::Black);
                pool.set_color(zpp2, Color::Red);
                left_rotate(pool, root, zpp2);
            }
        }
    }
    pool.set_color(*root, Color::Black);
}

/// Insert `key`/`value`, rebalancing on the way out. Returns the displaced value if `key`
/// was already present (the binding's value is replaced in place; its key storage is
/// untouched, matching the original's update-in-place behavior for duplicate inserts).
pub(crate) fn insert<K, V, C: Comparator<K>>(
    pool: &mut Pool<K, V>,
    root: &mut NodeId,
    key: K,
    value: V,
    cmp: &C,
) -> Result<InsertOutcome<V>, MapError> {
    let mut y = NodeId::NIL;
    let mut x = *root;
    while !x.is_nil() {
        y = x;
        match cmp.compare(&key, &pool[x].key) {
            Ordering::Equal => {
                let old = core::mem::replace(&mut pool[x].value, value);
                return Ok(InsertOutcome::Replaced(old));
            }
            Ordering::Less => x = pool[x].left,
            Ordering::Greater => x = pool[x].right,
        }
    }

    let z = pool.try_alloc(key, value)?;
    pool[z].parent = y;
    if y.is_nil() {
        *root = z;
    } else if cmp.compare(&pool[z].key, &pool[y].key) == Ordering::Less {
        pool[y].left = z;
    } else {
        pool[y].right = z;
    }

    insert_fixup(pool, root, z);
    Ok(InsertOutcome::Inserted)
}

fn delete_fixup<K, V>(pool: &mut Pool<K, V>, root: &mut NodeId, mut x: NodeId, mut x_parent: NodeId) {
    while x != *root && pool.color(x) == Color::Black {
        if x == pool[x_parent].left {
            let mut w = pool[x_parent].right;
            if pool.color(w) == Color::Red {
                pool.set_color(w, Color::Black);
                pool.set_color(x_parent, Color::Red);
                left_rotate(pool, root, x_parent);
                w = pool[x_parent].right;
            }
            if pool.color(pool[w].left) == Color::Black && pool.color(pool[w].right) == Color::Black {
                pool.set_color(w, Color::Red);
                x = x_parent;
                x_parent = pool[x].parent;
            } else {
                if pool.color(pool[w].right) == Color::Black {
                    let wl = pool[w].left;
                    pool.set_color(wl, Color::Black);
                    pool.set_color(w, Color::Red);
                    right_rotate(pool, root, w);
                    w = pool[x_parent].right;
                }
                pool.set_color(w, pool.color(x_parent));
                pool.set_color(x_parent, Color::Black);
                let wr = pool[w].right;
                pool.set_color(wr, Color::Black);
                left_rotate(pool, root, x_parent);
                x = *root;
            }
        } else {
            let mut w = pool[x_parent].left;
            if pool.color(w) == Color::Red {
                pool.set_color(w, Color::Black);
                pool.set_color(x_parent, Color::Red);
                right_rotate(pool, root, x_parent);
                w = pool[x_parent].left;
            }
            if pool.color(pool[w].right) == Color::Black && pool.color(pool[w].left) == Color::Black {
                pool.set_color(w, Color::Red);
                x = x_parent;
                x_parent = pool[x].parent;
            } else {
                if pool.color(pool[w].left) == Color::Black {
                    let wr = pool[w].right;
                    pool.set_color(wr, Color::Black);
                    pool.set_color(w, Color::Red);
                    left_rotate(pool, root, w);
                    w = pool[x_parent].left;
                }
                pool.set_color(w, pool.color(x_parent));
                pool.set_color(x_parent, Color::Black);
                let wl = pool[w].left;
                pool.set_color(wl, Color::Black);
                right_rotate(pool, root, x_parent);
                x = *root;
            }
        }
    }
    pool.set_color(x, Color::Black);
}

/// Remove the binding for `key`, if any, rebalancing on the way out.
pub(crate) fn remove<K, V, C: Comparator<K>>(
    pool: &mut Pool<K, V>,
    root: &mut NodeId,
    key: &K,
    cmp: &C,
) -> Option<(K, V)> {
    let z = search(pool, *root, key, cmp);
    if z.is_nil() {
        return None;
    }

    let mut y = z;
    let mut y_original_color = pool.color(y);
    let x: NodeId;
    let x_parent: NodeId;

    if pool[z].left.is_nil() {
        x = pool[z].right;
        x_parent = pool[z].parent;
        transplant(pool, root, z, x);
    } else if pool[z].right.is_nil() {
        x = pool[z].left;
        x_parent = pool[z].parent;
        transplant(pool, root, z, x);
    } else {
        y = minimum(pool, pool[z].right);
        y_original_color = pool.color(y);
        x = pool[y].right;
        if pool[y].parent == z {
            x_parent = y;
        } else {
            x_parent = pool[y].parent;
            let y_right = pool[y].right;
            transplant(pool, root, y, y_right);
            pool[y].right = pool[z].right;
            let new_right = pool[y].right;
            pool[new_right].parent = y;
        }
        transplant(pool, root, z, y);
        pool[y].left = pool[z].left;
        let new_left = pool[y].left;
        pool[new_left].parent = y;
        pool.set_color(y, pool.color(z));
    }

    if y_original_color == Color::Black {
        delete_fixup(pool, root, x, x_parent);
    }

    Some(pool.free(z))
}

/// Recursively clone the subtree rooted at `node` (which lives in `src`) into `dst`,
/// preserving color verbatim — a structural clone, not a rebuild through `insert`. Fails
/// with `MapError::OutOfMemory` if `dst` cannot grow to hold the clone, matching the
/// original's `ordered_map_copy`, which propagates a `malloc` failure as a `NULL` return.
pub(crate) fn clone_subtree<K: Clone, V: Clone>(
    src: &Pool<K, V>,
    node: NodeId,
    dst: &mut Pool<K, V>,
    parent: NodeId,
) -> Result<NodeId, MapError> {
    if node.is_nil() {
        return Ok(NodeId::NIL);
    }
    let key = src[node].key.clone();
    let value = src[node].value.clone();
    let new_id = dst.try_alloc(key, value)?;
    dst[new_id].color = src[node].color;
    dst[new_id].parent = parent;

    let left = clone_subtree(src, src[node].left, dst, new_id)?;
    let right = clone_subtree(src, src[node].right, dst, new_id)?;
    dst[new_id].left = left;
    dst[new_id].right = right;
    Ok(new_id)
}

/// Height of the subtree rooted at `node` (0 for `NIL`), computed on demand — the tree
/// never caches this, per the diagnostics design (see `SPEC_FULL.md` §4.5).
pub(crate) fn height<K, V>(pool: &Pool<K, V>, node: NodeId) -> usize {
    if node.is_nil() {
        return 0;
    }
    1 + height(pool, pool[node].left).max(height(pool, pool[node].right))
}

/// Walks the tree once, checking every invariant in `SPEC_FULL.md` §4.2: strictly
/// ascending keys in-order, a count matching `expected_len`, root blackness, no red node
/// with a red child, and equal black-height on every root-to-leaf path. Replaces the
/// original's `ordered_map_validate`, which was a placeholder that always returned `true`.
pub(crate) fn validate<K, V, C: Comparator<K>>(
    pool: &Pool<K, V>,
    root: NodeId,
    expected_len: usize,
    cmp: &C,
) -> bool {
    if !root.is_nil() && pool.color(root) != Color::Black {
        return false;
    }

    let mut count = 0usize;
    let mut prev: Option<NodeId> = None;
    let mut ok = true;

    fn walk<K, V, C: Comparator<K>>(
        pool: &Pool<K, V>,
        node: NodeId,
        prev: &mut Option<NodeId>,
        count: &mut usize,
        ok: &mut bool,
        cmp: &C,
    ) {
        if node.is_nil() || !*ok {
            return;
        }
        walk(pool, pool[node].left, prev, count, ok, cmp);
        if let Some(p) = *prev {
            if cmp.compare(&pool[p].key, &pool[node].key) != Ordering::Less {
                *ok = false;
                return;
            }
        }
        *prev = Some(node);
        *count += 1;
        walk(pool, pool[node].right, prev, count, ok, cmp);
    }
    walk(pool, root, &mut prev, &mut count, &mut ok, cmp);
    if !ok || count != expected_len {
        return false;
    }

    fn no_red_red<K, V>(pool: &Pool<K, V>, node: NodeId) -> bool {
        if node.is_nil() {
            return true;
        }
        if pool.color(node) == Color::Red
            && (pool.color(pool[node].left) == Color::Red || pool.color(pool[node].right) == Color::Red)
        {
            return false;
        }
        no_red_red(pool, pool[node].left) && no_red_red(pool, pool[node].right)
    }
    if !no_red_red(pool, root) {
        return false;
    }

    // Black-height: returns None on mismatch, Some(height) otherwise.
    fn black_height<K, V>(pool: &Pool<K, V>, node: NodeId) -> Option<usize> {
        if node.is_nil() {
            return Some(1);
        }
        let left = black_height(pool, pool[node].left)?;
        let right = black_height(pool, pool[node].right)?;
        if left != right {
            return None;
        }
        Some(left + if pool.color(node) == Color::Black { 1 } else { 0 })
    }
    black_height(pool, root).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::NaturalOrder;

    fn build(pool: &mut Pool<i32, i32>, root: &mut NodeId, keys: &[i32]) {
        for &k in keys {
            insert(pool, root, k, k * 10, &NaturalOrder).ok();
        }
    }

    #[test]
    fn insert_search_and_validate() {
        let mut pool = Pool::new();
        let mut root = NodeId::NIL;
        build(&mut pool, &mut root, &[5, 2, 8, 1, 9, 3, 7, 4, 6]);
        assert!(validate(&pool, root, 9, &NaturalOrder));
        let found = search(&pool, root, &7, &NaturalOrder);
        assert!(!found.is_nil());
        assert_eq!(pool[found].value, 70);
    }

    #[test]
    fn remove_maintains_invariants() {
        let mut pool = Pool::new();
        let mut root = NodeId::NIL;
        build(&mut pool, &mut root, &(0..200).collect::<Vec<_>>());
        for k in (0..200).step_by(3) {
            remove(&mut pool, &mut root, &k, &NaturalOrder);
            assert!(validate(&pool, root, pool_live_count(&pool, root), &NaturalOrder));
        }
    }

    fn pool_live_count(pool: &Pool<i32, i32>, root: NodeId) -> usize {
        fn go(pool: &Pool<i32, i32>, node: NodeId, n: &mut usize) {
            if node.is_nil() {
                return;
            }
            *n += 1;
            go(pool, pool[node].left, n);
            go(pool, pool[node].right, n);
        }
        let mut n = 0;
        go(pool, root, &mut n);
        n
    }

    #[test]
    fn successor_predecessor_round_trip() {
        let mut pool = Pool::new();
        let mut root = NodeId::NIL;
        build(&mut pool, &mut root, &[5, 2, 8, 1, 9, 3, 7, 4, 6]);
        let mut node = minimum(&pool, root);
        let mut seen = Vec::new();
        loop {
            seen.push(pool[node].key);
            let next = successor(&pool, node);
            if next.is_nil() {
                break;
            }
            node = next;
        }
        assert_eq!(seen, (1..=9).collect::<Vec<_>>());

        let mut back = Vec::new();
        let mut node = maximum(&pool, root);
        loop {
            back.push(pool[node].key);
            let prev = predecessor(&pool, node);
            if prev.is_nil() {
                break;
            }
            node = prev;
        }
        assert_eq!(back, (1..=9).rev().collect::<Vec<_>>());
    }

    #[test]
    fn clone_subtree_is_independent() {
        let mut pool = Pool::new();
        let mut root = NodeId::NIL;
        build(&mut pool, &mut root, &[5, 2, 8, 1, 9]);

        let mut dst = Pool::new();
        let cloned_root = clone_subtree(&pool, root, &mut dst, NodeId::NIL).unwrap();
        assert!(validate(&dst, cloned_root, 5, &NaturalOrder));

        insert(&mut pool, &mut root, 100, 1000, &NaturalOrder).ok();
        assert!(search(&dst, cloned_root, &100, &NaturalOrder).is_nil());
    }
}
