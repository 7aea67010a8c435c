//! # shelf-catalog
//!
//! Lending catalog core: items, borrowers and the rules between them.
//!
//! This crate provides:
//! - `Item` and `Borrower` records
//! - a delimited line codec (one line per record)
//! - `FlatFileStore` (one file per record kind, full rewrite on save)
//! - `Catalog` (the borrow/return state machine)
//! - an on-demand consistency check and a load-mutate-save helper
//!
//! It never prints. Every operation returns a structured outcome and emits
//! `tracing` events; rendering belongs to the caller.
//!
//! ## Data model
//!
//! ```text
//! books.txt / members.txt (on disk, one line per record)
//!     ↕  load_all / save_all
//! Catalog (insertion-ordered, keyed by identity)
//! ```

pub mod borrower;
pub mod catalog;
pub mod check;
pub mod codec;
pub mod config;
pub mod item;
pub mod session;
pub mod store;

pub use borrower::Borrower;
pub use catalog::{
    BORROW_LIMIT, Catalog, CatalogError, DroppedDuplicate, LoadReport, LoadSummary, SaveReport,
};
pub use check::{
    CATALOG_CHECK_KIND, CatalogCheckReport, CatalogCheckSummary, CatalogFinding,
    FAILURE_CLASS_OVER_LIMIT, FAILURE_CLASS_SHARED_ITEM, FAILURE_CLASS_UNKNOWN_ITEM,
    WARNING_CLASS_FLAG_MISMATCH, check_catalog,
};
pub use codec::{CodecError, FIELD_DELIMITER, HOLDING_DELIMITER, LineRecord, RecordKind};
pub use config::{CatalogConfig, ConfigError};
pub use item::Item;
pub use session::{MutationError, MutationOutcome, mutate_catalog};
pub use store::{
    DEFAULT_BORROWERS_FILE, DEFAULT_DATA_DIR, DEFAULT_ITEMS_FILE, FlatFileStore, LoadOutcome,
    SaveOutcome, SkippedLine, StoreError, read_records, write_records,
};
