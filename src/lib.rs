//! A quick and dirty ordered map: a binary search tree whose nodes are
//! flattened onto a Vec and linked by index.
//!
//! ```
//! use mysterious_map::TreeMap;
//!
//! let mut prices: TreeMap<&str, u32> = TreeMap::new();
//! prices.insert("pear", 30);
//! prices.insert("apple", 50);
//!
//! // duplicates are ignored, not overwritten
//! let (_, inserted) = prices.insert("apple", 100);
//! assert!(!inserted);
//! assert_eq!(Ok(&50), prices.at(&"apple"));
//!
//! // missing keys are an error, never a default
//! assert!(prices.at(&"plum").is_err());
//!
//! // walk in key order with a cursor
//! let first = prices.begin();
//! assert_eq!(Some((&"apple", &50)), prices.entry(first));
//! prices.erase(first);
//! assert_eq!("{pear: 30}", prices.to_string());
//! ```

mod cursor;
mod error;
mod navigate;
mod node_store;
#[cfg(feature = "shared_map")]
mod shared_map;
mod tree_map;

pub use compare::{natural, Compare, Natural};
pub use cursor::{Cursor, IntoIter, Iter, Keys, Values};
pub use error::MapError;
#[cfg(feature = "shared_map")]
pub use shared_map::SharedMap;
pub use tree_map::TreeMap;
