//! Key ordering as a capability rather than a callback.
//!
//! The original C implementation hides the key type behind `void*` and passes a
//! `key_compare_func_t` function pointer into every operation. Generic Rust makes that
//! indirection unnecessary: callers express a total order over `K` by implementing
//! [`Comparator`], and the common case (`K: Ord`) gets a zero-sized default.

use core::cmp::Ordering;
use core::marker::PhantomData;

/// A total order over `K`, supplied once at [`crate::Map`] construction and stored with it.
///
/// This relation must be a strict total order: antisymmetric, transitive, and total modulo
/// equality. The comparator defines what "equal key" means for the map — two keys are equal
/// iff `compare` returns [`Ordering::Equal`]. Any deviation from a strict total order is
/// undefined behavior for the owning map (keys may be misplaced, lost, or duplicated).
pub trait Comparator<K> {
    /// Compare keys `a` and `b`.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The default comparator: delegates to `K`'s own [`Ord`] implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: Ord> Comparator<K> for NaturalOrder {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Wraps an arbitrary closure as a [`Comparator`], for orderings that don't come from `Ord`
/// (case-insensitive strings, reversed orders, orderings parameterized by external state).
#[derive(Clone, Copy)]
pub struct FnComparator<F>(pub F);

impl<K, F> Comparator<K> for FnComparator<F>
where
    F: Fn(&K, &K) -> Ordering,
{
    fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.0)(a, b)
    }
}

/// A construction-time policy wrapping an optional comparator.
///
/// This exists to preserve the original's `invalid-config` failure mode for callers who
/// assemble a comparator dynamically (for example, reading a collation mode from
/// configuration and only sometimes producing one). Callers who know their comparator
/// statically should prefer [`crate::Map::new`] or [`crate::Map::with_comparator`], which
/// cannot fail this way: the type system already guarantees a comparator is present.
pub struct Policy<K, C> {
    pub(crate) comparator: Option<C>,
    _marker: PhantomData<fn(&K)>,
}

impl<K, C: Comparator<K>> Policy<K, C> {
    /// A policy carrying a valid comparator.
    pub fn new(comparator: C) -> Self {
        Self {
            comparator: Some(comparator),
            _marker: PhantomData,
        }
    }

    /// A policy with no comparator. `Map::try_create` on this policy fails with
    /// [`crate::MapError::InvalidConfig`].
    pub fn empty() -> Self {
        Self {
            comparator: None,
            _marker: PhantomData,
        }
    }
}
