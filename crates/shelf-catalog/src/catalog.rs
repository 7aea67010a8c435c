//! Canonical in-memory catalog of items and borrowers.
//!
//! This is the only place lending rules live:
//! - identities are unique per kind
//! - an item is held by at most one borrower
//! - a borrower holds at most [`BORROW_LIMIT`] items
//!
//! Every operation validates fully before mutating, so a failed call leaves
//! the catalog untouched.

use crate::borrower::Borrower;
use crate::codec::RecordKind;
use crate::item::Item;
use crate::store::{FlatFileStore, SaveOutcome, SkippedLine, StoreError};
use indexmap::IndexMap;
use indexmap::map::Entry;
use std::path::PathBuf;

/// Maximum number of items one borrower may hold at once.
pub const BORROW_LIMIT: usize = 3;

/// Rejected catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("{kind} already exists: {id}")]
    DuplicateIdentity { kind: RecordKind, id: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    #[error("borrower {borrower_id} already holds the maximum of {limit} items")]
    LimitExceeded { borrower_id: String, limit: usize },

    #[error("item not available: {item_id}")]
    NotAvailable { item_id: String },

    #[error("borrower {borrower_id} does not hold item {item_id}")]
    NotHeldByBorrower {
        borrower_id: String,
        item_id: String,
    },
}

impl CatalogError {
    /// Stable class string for machine-readable output.
    pub fn class(&self) -> &'static str {
        match self {
            CatalogError::DuplicateIdentity { .. } => "duplicate_identity",
            CatalogError::NotFound { .. } => "not_found",
            CatalogError::LimitExceeded { .. } => "limit_exceeded",
            CatalogError::NotAvailable { .. } => "not_available",
            CatalogError::NotHeldByBorrower { .. } => "not_held_by_borrower",
        }
    }

    fn item_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: RecordKind::Item,
            id: id.to_string(),
        }
    }

    fn borrower_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: RecordKind::Borrower,
            id: id.to_string(),
        }
    }
}

/// A record dropped because an earlier record already used its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedDuplicate {
    pub kind: RecordKind,
    pub id: String,
}

/// Per-kind summary of one load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub path: PathBuf,
    pub existed: bool,
    pub loaded: usize,
    pub skipped: Vec<SkippedLine>,
}

/// What `Catalog::load_all` read, for the caller to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub items: LoadSummary,
    pub borrowers: LoadSummary,
    pub dropped_duplicates: Vec<DroppedDuplicate>,
}

/// What `Catalog::save_all` wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub items: SaveOutcome,
    pub borrowers: SaveOutcome,
}

/// Items and borrowers keyed by identity, iterated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: IndexMap<String, Item>,
    borrowers: IndexMap<String, Borrower>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from decoded records.
    ///
    /// When an identity repeats, the first record wins and later ones are
    /// returned as dropped.
    pub fn from_records(
        items: Vec<Item>,
        borrowers: Vec<Borrower>,
    ) -> (Self, Vec<DroppedDuplicate>) {
        let mut catalog = Self::new();
        let mut dropped = Vec::new();

        for item in items {
            match catalog.items.entry(item.id.clone()) {
                Entry::Occupied(entry) => dropped.push(DroppedDuplicate {
                    kind: RecordKind::Item,
                    id: entry.key().clone(),
                }),
                Entry::Vacant(entry) => {
                    entry.insert(item);
                }
            }
        }
        for borrower in borrowers {
            match catalog.borrowers.entry(borrower.id.clone()) {
                Entry::Occupied(entry) => dropped.push(DroppedDuplicate {
                    kind: RecordKind::Borrower,
                    id: entry.key().clone(),
                }),
                Entry::Vacant(entry) => {
                    entry.insert(borrower);
                }
            }
        }

        for duplicate in &dropped {
            tracing::warn!(
                kind = %duplicate.kind,
                id = %duplicate.id,
                "dropping duplicate identity"
            );
        }
        (catalog, dropped)
    }

    /// Load both collections from the store.
    pub fn load_all(store: &FlatFileStore) -> Result<(Self, LoadReport), StoreError> {
        let items = store.load::<Item>()?;
        let borrowers = store.load::<Borrower>()?;

        let items_summary = LoadSummary {
            path: items.path,
            existed: items.existed,
            loaded: items.records.len(),
            skipped: items.skipped,
        };
        let borrowers_summary = LoadSummary {
            path: borrowers.path,
            existed: borrowers.existed,
            loaded: borrowers.records.len(),
            skipped: borrowers.skipped,
        };

        let (catalog, dropped_duplicates) = Self::from_records(items.records, borrowers.records);
        Ok((
            catalog,
            LoadReport {
                items: items_summary,
                borrowers: borrowers_summary,
                dropped_duplicates,
            },
        ))
    }

    /// Rewrite both files from the in-memory state.
    ///
    /// A failure leaves the catalog as it is; the caller decides whether to
    /// retry.
    pub fn save_all(&self, store: &FlatFileStore) -> Result<SaveReport, StoreError> {
        let items: Vec<Item> = self.items.values().cloned().collect();
        let borrowers: Vec<Borrower> = self.borrowers.values().cloned().collect();
        Ok(SaveReport {
            items: store.save(&items)?,
            borrowers: store.save(&borrowers)?,
        })
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn borrower_count(&self) -> usize {
        self.borrowers.len()
    }

    /// Iterate items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Iterate borrowers in insertion order.
    pub fn borrowers(&self) -> impl Iterator<Item = &Borrower> {
        self.borrowers.values()
    }

    pub fn find_item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn find_borrower(&self, id: &str) -> Option<&Borrower> {
        self.borrowers.get(id)
    }

    /// Availability of one item, or `None` if the item is unknown.
    pub fn is_available(&self, item_id: &str) -> Option<bool> {
        self.find_item(item_id).map(Item::is_available)
    }

    /// The first borrower (in insertion order) holding `item_id`.
    pub fn holder_of(&self, item_id: &str) -> Option<&Borrower> {
        self.borrowers().find(|borrower| borrower.holds(item_id))
    }

    /// Register a new item in the available state.
    pub fn add_item(
        &mut self,
        id: &str,
        title: &str,
        author: &str,
        code: &str,
    ) -> Result<&Item, CatalogError> {
        match self.items.entry(id.to_string()) {
            Entry::Occupied(_) => Err(CatalogError::DuplicateIdentity {
                kind: RecordKind::Item,
                id: id.to_string(),
            }),
            Entry::Vacant(entry) => {
                tracing::debug!(item_id = id, "item added");
                Ok(&*entry.insert(Item::new(id, title, author, code)))
            }
        }
    }

    /// Register a new borrower with an empty holding set.
    pub fn add_borrower(
        &mut self,
        id: &str,
        name: &str,
        email: &str,
        phone: &str,
    ) -> Result<&Borrower, CatalogError> {
        match self.borrowers.entry(id.to_string()) {
            Entry::Occupied(_) => Err(CatalogError::DuplicateIdentity {
                kind: RecordKind::Borrower,
                id: id.to_string(),
            }),
            Entry::Vacant(entry) => {
                tracing::debug!(borrower_id = id, "borrower added");
                Ok(&*entry.insert(Borrower::new(id, name, email, phone)))
            }
        }
    }

    /// Lend `item_id` to `borrower_id`.
    ///
    /// Checks run in order: borrower exists, item exists, borrower is under
    /// the limit, item is available.
    pub fn borrow(&mut self, borrower_id: &str, item_id: &str) -> Result<(), CatalogError> {
        let borrower = self
            .find_borrower(borrower_id)
            .ok_or_else(|| CatalogError::borrower_not_found(borrower_id))?;
        let item = self
            .find_item(item_id)
            .ok_or_else(|| CatalogError::item_not_found(item_id))?;

        if borrower.holding_count() >= BORROW_LIMIT {
            return Err(CatalogError::LimitExceeded {
                borrower_id: borrower_id.to_string(),
                limit: BORROW_LIMIT,
            });
        }
        if !item.is_available() {
            return Err(CatalogError::NotAvailable {
                item_id: item_id.to_string(),
            });
        }

        if let Some(item) = self.items.get_mut(item_id) {
            item.mark_held();
        }
        if let Some(borrower) = self.borrowers.get_mut(borrower_id) {
            borrower.hold(item_id);
        }
        tracing::debug!(borrower_id, item_id, "item borrowed");
        Ok(())
    }

    /// Take `item_id` back from `borrower_id`.
    pub fn return_item(&mut self, borrower_id: &str, item_id: &str) -> Result<(), CatalogError> {
        let borrower = self
            .find_borrower(borrower_id)
            .ok_or_else(|| CatalogError::borrower_not_found(borrower_id))?;
        if self.find_item(item_id).is_none() {
            return Err(CatalogError::item_not_found(item_id));
        }
        if !borrower.holds(item_id) {
            return Err(CatalogError::NotHeldByBorrower {
                borrower_id: borrower_id.to_string(),
                item_id: item_id.to_string(),
            });
        }

        if let Some(item) = self.items.get_mut(item_id) {
            item.mark_available();
        }
        if let Some(borrower) = self.borrowers.get_mut(borrower_id) {
            borrower.release(item_id);
        }
        tracing::debug!(borrower_id, item_id, "item returned");
        Ok(())
    }

    /// Items whose identity equals `term` or whose title contains it,
    /// ignoring case, in catalog order.
    pub fn search(&self, term: &str) -> Vec<&Item> {
        let needle = term.trim().to_lowercase();
        self.items()
            .filter(|item| item.matches_lowercase(&needle))
            .collect()
    }

    /// The borrower's held items in borrow order.
    ///
    /// Held IDs with no matching item are skipped.
    pub fn borrowed_items_of(&self, borrower_id: &str) -> Result<Vec<&Item>, CatalogError> {
        let borrower = self
            .find_borrower(borrower_id)
            .ok_or_else(|| CatalogError::borrower_not_found(borrower_id))?;
        Ok(borrower
            .holdings()
            .iter()
            .filter_map(|item_id| self.find_item(item_id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::LineRecord;

    fn dune_and_ann() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .add_item("B1", "Dune", "Herbert", "ISBN1")
            .expect("item should add");
        catalog
            .add_borrower("M1", "Ann", "a@x.com", "555")
            .expect("borrower should add");
        catalog
    }

    fn with_items(catalog: &mut Catalog, ids: &[&str]) {
        for id in ids {
            catalog
                .add_item(id, &format!("Title {id}"), "Author", "CODE")
                .expect("item should add");
        }
    }

    fn holdings(catalog: &Catalog, borrower_id: &str) -> Vec<String> {
        catalog
            .find_borrower(borrower_id)
            .expect("borrower must exist")
            .holdings()
            .to_vec()
    }

    /// Availability flag matches the holding sets for every item.
    fn assert_consistent(catalog: &Catalog) {
        for item in catalog.items() {
            let held = catalog.borrowers().any(|b| b.holds(&item.id));
            assert_eq!(item.is_available(), !held, "item {} out of sync", item.id);
        }
        for borrower in catalog.borrowers() {
            assert!(borrower.holding_count() <= BORROW_LIMIT);
        }
    }

    #[test]
    fn borrow_then_borrow_again_is_not_available() {
        let mut catalog = dune_and_ann();

        catalog.borrow("M1", "B1").expect("first borrow succeeds");
        assert_eq!(catalog.is_available("B1"), Some(false));
        assert_eq!(holdings(&catalog, "M1"), vec!["B1".to_string()]);

        let err = catalog
            .borrow("M1", "B1")
            .expect_err("second borrow must fail");
        assert_eq!(
            err,
            CatalogError::NotAvailable {
                item_id: "B1".to_string()
            }
        );
        assert_eq!(holdings(&catalog, "M1"), vec!["B1".to_string()]);
        assert_consistent(&catalog);
    }

    #[test]
    fn fourth_borrow_exceeds_limit() {
        let mut catalog = dune_and_ann();
        with_items(&mut catalog, &["B2", "B3", "B4"]);
        for id in ["B1", "B2", "B3"] {
            catalog.borrow("M1", id).expect("borrow under limit succeeds");
        }

        let err = catalog
            .borrow("M1", "B4")
            .expect_err("fourth borrow must fail");
        assert!(matches!(
            err,
            CatalogError::LimitExceeded { ref borrower_id, limit: 3 } if borrower_id == "M1"
        ));
        assert_eq!(holdings(&catalog, "M1").len(), 3);
        assert_eq!(catalog.is_available("B4"), Some(true));
        assert_consistent(&catalog);
    }

    #[test]
    fn limit_is_checked_before_availability() {
        let mut catalog = dune_and_ann();
        with_items(&mut catalog, &["B2", "B3"]);
        for id in ["B1", "B2", "B3"] {
            catalog.borrow("M1", id).expect("borrow under limit succeeds");
        }

        let err = catalog
            .borrow("M1", "B1")
            .expect_err("full borrower must fail");
        assert_eq!(err.class(), "limit_exceeded");
    }

    #[test]
    fn borrow_unknown_identities_is_not_found() {
        let mut catalog = dune_and_ann();

        let err = catalog.borrow("M9", "B1").expect_err("unknown borrower");
        assert_eq!(
            err,
            CatalogError::NotFound {
                kind: RecordKind::Borrower,
                id: "M9".to_string()
            }
        );

        let err = catalog.borrow("M1", "B9").expect_err("unknown item");
        assert_eq!(
            err,
            CatalogError::NotFound {
                kind: RecordKind::Item,
                id: "B9".to_string()
            }
        );
        assert!(holdings(&catalog, "M1").is_empty());
        assert_consistent(&catalog);
    }

    #[test]
    fn item_held_by_someone_else_is_not_available() {
        let mut catalog = dune_and_ann();
        catalog
            .add_borrower("M2", "Bob", "b@x.com", "666")
            .expect("borrower should add");
        catalog.borrow("M1", "B1").expect("borrow succeeds");

        let err = catalog.borrow("M2", "B1").expect_err("held item");
        assert_eq!(err.class(), "not_available");
        assert_eq!(
            catalog.holder_of("B1").map(|b| b.id.as_str()),
            Some("M1")
        );
        assert_consistent(&catalog);
    }

    #[test]
    fn return_restores_availability() {
        let mut catalog = dune_and_ann();
        with_items(&mut catalog, &["B2"]);
        catalog.borrow("M1", "B1").expect("borrow succeeds");
        catalog.borrow("M1", "B2").expect("borrow succeeds");

        catalog.return_item("M1", "B1").expect("return succeeds");
        assert_eq!(catalog.is_available("B1"), Some(true));
        assert_eq!(holdings(&catalog, "M1"), vec!["B2".to_string()]);
        assert!(catalog.holder_of("B1").is_none());
        assert_consistent(&catalog);
    }

    #[test]
    fn return_of_unheld_item_is_rejected() {
        let mut catalog = dune_and_ann();
        with_items(&mut catalog, &["B2"]);
        catalog.borrow("M1", "B1").expect("borrow succeeds");

        let err = catalog
            .return_item("M1", "B2")
            .expect_err("B2 is not held by M1");
        assert_eq!(
            err,
            CatalogError::NotHeldByBorrower {
                borrower_id: "M1".to_string(),
                item_id: "B2".to_string()
            }
        );
        assert_eq!(holdings(&catalog, "M1"), vec!["B1".to_string()]);
        assert_eq!(catalog.is_available("B2"), Some(true));

        let err = catalog.return_item("M1", "B9").expect_err("unknown item");
        assert_eq!(err.class(), "not_found");
    }

    #[test]
    fn duplicate_identity_leaves_catalog_unchanged() {
        let mut catalog = dune_and_ann();

        let err = catalog
            .add_item("B1", "Other", "Someone", "ISBN9")
            .expect_err("duplicate item must fail");
        assert_eq!(
            err,
            CatalogError::DuplicateIdentity {
                kind: RecordKind::Item,
                id: "B1".to_string()
            }
        );
        assert_eq!(catalog.item_count(), 1);
        assert_eq!(
            catalog.find_item("B1").map(|i| i.title.as_str()),
            Some("Dune")
        );

        let err = catalog
            .add_borrower("M1", "Other", "", "")
            .expect_err("duplicate borrower must fail");
        assert_eq!(err.class(), "duplicate_identity");
        assert_eq!(catalog.borrower_count(), 1);
    }

    #[test]
    fn search_matches_id_or_title_case_insensitively() {
        let mut catalog = Catalog::new();
        catalog.add_item("B1", "Dune", "Herbert", "I1").expect("add");
        catalog
            .add_item("B2", "Children of Dune", "Herbert", "I2")
            .expect("add");
        catalog.add_item("dune", "Emma", "Austen", "I3").expect("add");
        catalog.add_item("B4", "Ulysses", "Joyce", "I4").expect("add");

        let ids: Vec<&str> = catalog
            .search("  DUNE ")
            .into_iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["B1", "B2", "dune"]);

        assert!(catalog.search("herbert").is_empty());
        let ids: Vec<&str> = catalog.search("b4").into_iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["B4"]);
    }

    #[test]
    fn borrowed_items_skip_unknown_ids() {
        let borrower =
            Borrower::decode("M1,Ann,a@x.com,555,B2;GONE;B1").expect("borrower should decode");
        let (catalog, dropped) = Catalog::from_records(
            vec![
                Item::new("B1", "Dune", "Herbert", "I1"),
                Item::new("B2", "Emma", "Austen", "I2"),
            ],
            vec![borrower],
        );
        assert!(dropped.is_empty());

        let titles: Vec<&str> = catalog
            .borrowed_items_of("M1")
            .expect("borrower exists")
            .into_iter()
            .map(|i| i.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Emma", "Dune"]);

        let err = catalog.borrowed_items_of("M9").expect_err("unknown borrower");
        assert_eq!(err.class(), "not_found");
    }

    #[test]
    fn from_records_keeps_first_duplicate() {
        let (catalog, dropped) = Catalog::from_records(
            vec![
                Item::new("B1", "First", "A", "I1"),
                Item::new("B2", "Second", "B", "I2"),
                Item::new("B1", "Shadow", "C", "I3"),
            ],
            vec![],
        );

        assert_eq!(
            catalog.find_item("B1").map(|i| i.title.as_str()),
            Some("First")
        );
        let ids: Vec<&str> = catalog.items().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["B1", "B2"]);
        assert_eq!(
            dropped,
            vec![DroppedDuplicate {
                kind: RecordKind::Item,
                id: "B1".to_string()
            }]
        );
    }

    #[test]
    fn mixed_sequences_keep_invariants() {
        let mut catalog = Catalog::new();
        with_items(&mut catalog, &["B1", "B2", "B3", "B4", "B5"]);
        catalog.add_borrower("M1", "Ann", "", "").expect("add");
        catalog.add_borrower("M2", "Bob", "", "").expect("add");

        // (borrow?, borrower, item, expected error class)
        let steps: [(bool, &str, &str, Option<&str>); 12] = [
            (true, "M1", "B1", None),
            (true, "M1", "B2", None),
            (true, "M2", "B2", Some("not_available")),
            (true, "M1", "B3", None),
            (true, "M1", "B4", Some("limit_exceeded")),
            (false, "M1", "B2", None),
            (true, "M1", "B4", None),
            (true, "M2", "B2", None),
            (false, "M2", "B1", Some("not_held_by_borrower")),
            (true, "M2", "B5", None),
            (false, "M1", "B5", Some("not_held_by_borrower")),
            (true, "M2", "B1", Some("not_available")),
        ];
        for (index, step) in steps.into_iter().enumerate() {
            let (is_borrow, borrower_id, item_id, expected) = step;
            let result = if is_borrow {
                catalog.borrow(borrower_id, item_id)
            } else {
                catalog.return_item(borrower_id, item_id)
            };
            assert_eq!(
                result.as_ref().err().map(CatalogError::class),
                expected,
                "step {index}: {borrower_id}/{item_id}"
            );
            assert_consistent(&catalog);
        }

        let held = |id: &str| catalog.find_borrower(id).map(|b| b.holdings().to_vec());
        assert_eq!(held("M1"), Some(vec!["B1".into(), "B3".into(), "B4".into()]));
        assert_eq!(held("M2"), Some(vec!["B2".into(), "B5".into()]));
    }
}
