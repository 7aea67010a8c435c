//! Borrower type: a registered person who can hold items.

use serde::Serialize;

/// A borrower and the ordered set of item IDs they currently hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Borrower {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    holdings: Vec<String>,
}

impl Borrower {
    /// Create a borrower with an empty holding set.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            holdings: Vec::new(),
        }
    }

    /// Held item IDs in borrow order.
    pub fn holdings(&self) -> &[String] {
        &self.holdings
    }

    pub fn holding_count(&self) -> usize {
        self.holdings.len()
    }

    pub fn holds(&self, item_id: &str) -> bool {
        self.holdings.iter().any(|held| held == item_id)
    }

    /// Add an item ID to the holding set. Re-adding a held ID is a no-op.
    ///
    /// Returns whether the set changed.
    pub(crate) fn hold(&mut self, item_id: &str) -> bool {
        if self.holds(item_id) {
            return false;
        }
        self.holdings.push(item_id.to_string());
        true
    }

    /// Remove an item ID from the holding set, keeping the order of the rest.
    pub(crate) fn release(&mut self, item_id: &str) -> bool {
        let before = self.holdings.len();
        self.holdings.retain(|held| held != item_id);
        self.holdings.len() != before
    }
}
