//! Collection helpers.
//!
//! - `list`: slice accessors with negative-index wraparound
//! - `composite`: one iterator over a list of optional iterators
//! - `tuple`: `Pair` and `Triple`

pub mod composite;
pub mod list;
pub mod tuple;

pub use composite::CompositeIter;
pub use list::{first, get_or, get_wrapped, get_wrapped_mut, last, set_wrapped, ListExt};
pub use tuple::{Pair, Triple};
