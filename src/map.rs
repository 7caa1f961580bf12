//! The public ordered map type.

use crate::comparator::{Comparator, NaturalOrder, Policy};
use crate::cursor::{Cursor, Direction};
use crate::diagnostics::{Stats, Timer};
use crate::error::MapError;
use crate::pool::{NodeId, Pool};
use crate::tree::{self, InsertOutcome};
use core::cell::Cell;

/// A sorted key-value map backed by a red-black tree.
///
/// `C` is the [`Comparator`] used to order `K`; it defaults to [`NaturalOrder`], which
/// delegates to `K`'s own [`Ord`] impl. Supply a different `C` (via [`Map::with_comparator`]
/// or [`Map::try_create`]) for orderings that don't come from `Ord` — case folding, reverse
/// order, an order parameterized by external configuration.
pub struct Map<K, V, C = NaturalOrder> {
    pool: Pool<K, V>,
    root: NodeId,
    len: usize,
    cmp: C,
    // A lookup is logically read-only; `Cell` lets `get` still account itself into the
    // stats that every other operation updates through `&mut self`.
    stats: Cell<Stats>,
    stats_enabled: bool,
}

impl<K, V> Map<K, V, NaturalOrder> {
    /// A new, empty map ordered by `K`'s [`Ord`] implementation.
    pub fn new() -> Self {
        Map::with_comparator(NaturalOrder)
    }
}

impl<K, V> Default for Map<K, V, NaturalOrder> {
    fn default() -> Self {
        Map::new()
    }
}

impl<K, V, C: Comparator<K>> Map<K, V, C> {
    /// A new, empty map ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        Map {
            pool: Pool::new(),
            root: NodeId::NIL,
            len: 0,
            cmp,
            stats: Cell::new(Stats::default()),
            stats_enabled: false,
        }
    }

    /// A new, empty map built from a [`Policy`]. Fails with [`MapError::InvalidConfig`] if
    /// the policy was constructed without a comparator — the only construction path this
    /// crate exposes that can fail, preserved for callers assembling a comparator from
    /// runtime configuration rather than choosing one at compile time.
    pub fn try_create(policy: Policy<K, C>) -> Result<Self, MapError> {
        let cmp = policy.comparator.ok_or(MapError::InvalidConfig)?;
        Ok(Map::with_comparator(cmp))
    }

    /// Number of bindings currently stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if the map holds no bindings.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `true` if `key` is bound.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// The value bound to `key`, if any.
    pub fn get(&self, key: &K) -> Option<&V> {
        let timer = Timer::start(self.stats_enabled);
        let node = tree::search(&self.pool, self.root, key, &self.cmp);
        if self.stats_enabled {
            log::trace!("search: key found={}", !node.is_nil());
            let mut stats = self.stats.get();
            stats.record_search(timer.elapsed_nanos());
            self.stats.set(stats);
        }
        if node.is_nil() {
            None
        } else {
            Some(&self.pool[node].value)
        }
    }

    /// The value bound to `key`, or `default` if `key` is unbound. Never mutates the map —
    /// unlike `insert`, this is purely a read.
    pub fn get_or_default<'a>(&'a self, key: &K, default: &'a V) -> &'a V {
        self.get(key).unwrap_or(default)
    }

    /// The smallest key in the map, if non-empty.
    pub fn min_key(&self) -> Option<&K> {
        self.min_node().map(|n| &self.pool[n].key)
    }

    /// The value bound to the smallest key in the map, if non-empty.
    pub fn min_value(&self) -> Option<&V> {
        self.min_node().map(|n| &self.pool[n].value)
    }

    /// The largest key in the map, if non-empty.
    pub fn max_key(&self) -> Option<&K> {
        self.max_node().map(|n| &self.pool[n].key)
    }

    /// The value bound to the largest key in the map, if non-empty.
    pub fn max_value(&self) -> Option<&V> {
        self.max_node().map(|n| &self.pool[n].value)
    }

    fn min_node(&self) -> Option<NodeId> {
        if self.root.is_nil() {
            None
        } else {
            Some(tree::minimum(&self.pool, self.root))
        }
    }

    fn max_node(&self) -> Option<NodeId> {
        if self.root.is_nil() {
            None
        } else {
            Some(tree::maximum(&self.pool, self.root))
        }
    }

    /// Bind `key` to `value`. If `key` was already bound, its old value is returned and
    /// replaced; the tree shape is unchanged in that case.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, MapError> {
        let timer = Timer::start(self.stats_enabled);
        let outcome = tree::insert(&mut self.pool, &mut self.root, key, value, &self.cmp)?;
        let result = match outcome {
            InsertOutcome::Inserted => {
                self.len += 1;
                None
            }
            InsertOutcome::Replaced(old) => Some(old),
        };
        if self.stats_enabled {
            let mut stats = self.stats.get();
            stats.record_insert(timer.elapsed_nanos());
            stats.record_height(tree::height(&self.pool, self.root));
            self.stats.set(stats);
        }
        log::debug!("insert: len={}", self.len);
        Ok(result)
    }

    /// Bind `key` to `value` only if `key` is not already bound. Returns whether a new
    /// binding was created.
    pub fn put_if_absent(&mut self, key: K, value: V) -> Result<bool, MapError> {
        if self.contains_key(&key) {
            return Ok(false);
        }
        self.insert(key, value)?;
        Ok(true)
    }

    /// Overwrite the value bound to `key`, returning the value it replaced.
    ///
    /// Unlike [`Map::insert`], this fails with [`MapError::KeyNotFound`] instead of creating
    /// a new binding.
    pub fn replace(&mut self, key: &K, value: V) -> Result<V, MapError> {
        let node = tree::search(&self.pool, self.root, key, &self.cmp);
        if node.is_nil() {
            return Err(MapError::KeyNotFound);
        }
        Ok(core::mem::replace(&mut self.pool[node].value, value))
    }

    /// Overwrite the value bound to `key` if it is bound; otherwise do nothing. Returns the
    /// replaced value, or `None` if `key` was unbound.
    pub fn replace_if_present(&mut self, key: &K, value: V) -> Result<Option<V>, MapError> {
        let node = tree::search(&self.pool, self.root, key, &self.cmp);
        if node.is_nil() {
            return Ok(None);
        }
        Ok(Some(core::mem::replace(&mut self.pool[node].value, value)))
    }

    /// Remove and return the binding for `key`.
    pub fn remove(&mut self, key: &K) -> Result<(K, V), MapError> {
        let timer = Timer::start(self.stats_enabled);
        let removed = tree::remove(&mut self.pool, &mut self.root, key, &self.cmp);
        match removed {
            Some(pair) => {
                self.len -= 1;
                if self.stats_enabled {
                    let mut stats = self.stats.get();
                    stats.record_remove(timer.elapsed_nanos());
                    stats.record_height(tree::height(&self.pool, self.root));
                    self.stats.set(stats);
                }
                log::debug!("remove: len={}", self.len);
                Ok(pair)
            }
            None => Err(MapError::KeyNotFound),
        }
    }

    /// Discard every binding. Frees the arena in constant time rather than walking the
    /// tree and dropping nodes one by one.
    pub fn clear(&mut self) {
        self.pool.clear();
        self.root = NodeId::NIL;
        self.len = 0;
    }

    /// A cursor walking the map's bindings in order, starting at the first (or last, for
    /// [`Direction::Backward`]) key.
    pub fn cursor(&self, direction: Direction) -> Cursor<'_, K, V, C> {
        Cursor::new(&self.pool, self.root, &self.cmp, direction)
    }

    /// A snapshot of the instrumentation counters accumulated since construction or the
    /// last [`Map::reset_stats`]. `current_height` is walked fresh here rather than cached,
    /// so it's accurate even if `stats_enabled` was off for every mutation so far.
    pub fn stats(&self) -> Stats {
        let mut stats = self.stats.get();
        stats.current_height = tree::height(&self.pool, self.root);
        stats
    }

    /// Zero every counter, without affecting `stats_enabled` itself.
    pub fn reset_stats(&mut self) {
        self.stats.set(Stats::default());
    }

    /// Turn instrumentation on or off. Disabled by default: every `insert`/`remove` pays an
    /// extra `Instant::now()` and a height recomputation while enabled.
    pub fn set_stats_enabled(&mut self, enabled: bool) {
        self.stats_enabled = enabled;
    }

    /// Walk the whole tree checking every red-black invariant and the in-order key
    /// ordering. `O(n)`; intended for tests and debugging, not the hot path.
    pub fn validate(&self) -> bool {
        tree::validate(&self.pool, self.root, self.len, &self.cmp)
    }

    /// Write every binding, in order, one line per binding, through `out`. `key_fmt` and
    /// `value_fmt` control the rendering of each side; the original hardcodes a `printf` to
    /// stdout, so this takes a sink and formatters instead of assuming a format or a target.
    pub fn print<W: core::fmt::Write>(
        &self,
        out: &mut W,
        key_fmt: impl Fn(&K) -> String,
        value_fmt: impl Fn(&V) -> String,
    ) -> core::fmt::Result {
        for (k, v) in self.cursor(Direction::Forward) {
            writeln!(out, "{} => {}", key_fmt(k), value_fmt(v))?;
        }
        Ok(())
    }
}

impl<K: Clone, V: Clone, C: Comparator<K> + Clone> Map<K, V, C> {
    /// A deep copy: every key and value is cloned, and the clone's tree is fully
    /// independent of this map's — mutating one never affects the other. Fails with
    /// [`MapError::OutOfMemory`] if the new arena cannot grow to hold the clone, mirroring
    /// the original's `ordered_map_copy`, which returns `NULL` on the equivalent `malloc`
    /// failure.
    pub fn copy(&self) -> Result<Self, MapError> {
        let mut pool = Pool::new();
        let root = tree::clone_subtree(&self.pool, self.root, &mut pool, NodeId::NIL)?;
        Ok(Map {
            pool,
            root,
            len: self.len,
            cmp: self.cmp.clone(),
            stats: Cell::new(Stats::default()),
            stats_enabled: self.stats_enabled,
        })
    }
}
