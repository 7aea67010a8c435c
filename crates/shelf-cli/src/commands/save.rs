use crate::support::{load_catalog_or_exit, print_json};
use serde_json::json;
use shelf_catalog::FlatFileStore;

/// Rewrite both files from what currently decodes, dropping malformed lines
/// and duplicate identities from disk.
pub fn run(store: &FlatFileStore, json_output: bool) {
    let (catalog, load) = load_catalog_or_exit(store);
    let saved = catalog.save_all(store).unwrap_or_else(|e| {
        eprintln!("error: failed to save catalog: {e}");
        std::process::exit(1);
    });

    let skipped = load.items.skipped.len() + load.borrowers.skipped.len();
    if json_output {
        print_json(&json!({
            "action": "catalog.save",
            "loaded": {
                "items": load.items.loaded,
                "borrowers": load.borrowers.loaded
            },
            "skippedLines": skipped,
            "droppedDuplicates": load.dropped_duplicates.len(),
            "saved": {
                "items": saved.items.count,
                "borrowers": saved.borrowers.count
            },
            "itemsPath": saved.items.path.display().to_string(),
            "borrowersPath": saved.borrowers.path.display().to_string()
        }));
    } else {
        println!("shelf save");
        println!(
            "  Loaded: {} items, {} borrowers ({skipped} lines skipped)",
            load.items.loaded, load.borrowers.loaded
        );
        println!(
            "  Saved:  {} items -> {}",
            saved.items.count,
            saved.items.path.display()
        );
        println!(
            "          {} borrowers -> {}",
            saved.borrowers.count,
            saved.borrowers.path.display()
        );
    }
}
