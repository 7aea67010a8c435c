use crate::support::{load_catalog_or_exit, print_json};
use shelf_catalog::{FlatFileStore, check_catalog};

pub fn run(store: &FlatFileStore, json_output: bool) {
    let (catalog, load) = load_catalog_or_exit(store);
    let report = check_catalog(&catalog);

    if json_output {
        match serde_json::to_value(&report) {
            Ok(value) => print_json(&value),
            Err(e) => {
                eprintln!("error: failed to render check report: {e}");
                std::process::exit(1);
            }
        }
    } else {
        println!("shelf check");
        println!("  Result: {}", report.result);
        println!(
            "  Items: {} ({} held)  Borrowers: {}",
            report.summary.item_count, report.summary.held_count, report.summary.borrower_count
        );
        let skipped = load.items.skipped.len() + load.borrowers.skipped.len();
        if skipped > 0 {
            println!("  Skipped lines: {skipped}");
        }
        for finding in &report.errors {
            println!(
                "  error   [{}] {}: {}",
                finding.class, finding.subject_id, finding.message
            );
        }
        for finding in &report.warnings {
            println!(
                "  warning [{}] {}: {}",
                finding.class, finding.subject_id, finding.message
            );
        }
    }

    if !report.accepted() {
        std::process::exit(1);
    }
}
