//! Durable identifiers for list items.

use std::fmt::Debug;
use std::fmt::Display;
use std::hash::Hash;

/// An item with exactly one durable identifier.
///
/// The identifier keys selection and row identity; it never depends on the
/// row's position in a page.
pub trait Keyed {
    /// The identifier type (`accountId`, `deviceId`, ...).
    type Id: Clone + Eq + Hash + Display + Debug + Send + Sync + 'static;

    /// Returns this item's identifier.
    fn id(&self) -> Self::Id;
}
