//! Item type: a lendable catalog entry.

use serde::Serialize;

/// A lendable item.
///
/// `available` is a cached projection of the borrower holding sets: it is
/// `false` exactly when one borrower holds the item. Only the catalog's
/// borrow/return transitions write it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub title: String,
    pub author: String,
    /// External code, e.g. an ISBN.
    pub code: String,
    available: bool,
}

impl Item {
    /// Create a new item. New items are always available.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            code: code.into(),
            available: true,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Restore the persisted availability flag while decoding.
    pub(crate) fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub(crate) fn mark_held(&mut self) {
        self.available = false;
    }

    pub(crate) fn mark_available(&mut self) {
        self.available = true;
    }

    /// Case-insensitive match on exact identity or title substring.
    ///
    /// `needle` must already be lower-cased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.id.to_lowercase() == needle || self.title.to_lowercase().contains(needle)
    }
}
