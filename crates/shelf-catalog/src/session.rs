//! Load-mutate-save helper for one-shot callers.
//!
//! Every successful mutation that reports a change is followed by a full
//! rewrite of both files. No lock is taken: a single caller is assumed.

use crate::catalog::{Catalog, LoadReport, SaveReport};
use crate::store::{FlatFileStore, StoreError};
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum MutationError<E> {
    /// Loading or saving failed. When saving fails the mutation itself
    /// succeeded but is not on disk.
    Store(StoreError),
    Mutation(E),
}

impl<E: Display> Display for MutationError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Mutation(err) => write!(f, "{err}"),
        }
    }
}

impl<E> StdError for MutationError<E> where E: Display + std::fmt::Debug + StdError + 'static {}

/// What one load-mutate-save cycle produced.
#[derive(Debug, Clone)]
pub struct MutationOutcome<T> {
    pub value: T,
    pub load: LoadReport,
    /// `None` when the mutator reported no change and nothing was written.
    pub saved: Option<SaveReport>,
}

/// Load the catalog, apply `mutator`, and save when it reports a change.
///
/// The mutator returns `(value, changed)`. A mutator error skips the save,
/// so the files stay exactly as loaded.
pub fn mutate_catalog<T, E, F>(
    store: &FlatFileStore,
    mutator: F,
) -> Result<MutationOutcome<T>, MutationError<E>>
where
    F: FnOnce(&mut Catalog) -> Result<(T, bool), E>,
{
    let (mut catalog, load) = Catalog::load_all(store).map_err(MutationError::Store)?;
    let (value, changed) = mutator(&mut catalog).map_err(MutationError::Mutation)?;
    let saved = if changed {
        Some(catalog.save_all(store).map_err(MutationError::Store)?)
    } else {
        None
    };
    Ok(MutationOutcome { value, load, saved })
}
