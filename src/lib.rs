//! A sorted associative container backed by a red-black tree.
//!
//! [`Map`] keeps its bindings in key order at all times, giving `O(log n)` lookups,
//! insertions, and removals along with ordered traversal through [`Cursor`]. Ordering
//! comes from a [`Comparator`]: the default, [`NaturalOrder`], defers to `K: Ord`, and a
//! custom comparator can be supplied for orderings `Ord` doesn't express.
//!
//! ```
//! use ordered_map::Map;
//!
//! let mut capitals = Map::new();
//! capitals.insert("Norway", "Oslo").unwrap();
//! capitals.insert("Japan", "Tokyo").unwrap();
//!
//! assert_eq!(capitals.get(&"Japan"), Some(&"Tokyo"));
//! assert_eq!(capitals.min_key(), Some(&"Japan"));
//! ```

mod comparator;
mod cursor;
mod diagnostics;
mod error;
mod map;
mod pool;
mod tree;

pub use comparator::{Comparator, FnComparator, NaturalOrder, Policy};
pub use cursor::{Cursor, Direction};
pub use diagnostics::Stats;
pub use error::MapError;
pub use map::Map;
