use crate::support::{mutate_or_exit, print_json, require_id_or_exit};
use serde_json::json;
use shelf_catalog::{Borrower, FlatFileStore};

pub fn run_borrow(store: &FlatFileStore, borrower_id: String, item_id: String, json_output: bool) {
    let borrower_id = require_id_or_exit(&borrower_id, "borrower id");
    let item_id = require_id_or_exit(&item_id, "item id");

    let outcome = mutate_or_exit(store, "loan.borrow", json_output, |catalog| {
        catalog.borrow(&borrower_id, &item_id)?;
        Ok((holder_snapshot(catalog.find_borrower(&borrower_id)), true))
    });
    render(
        "loan.borrow",
        "Borrowed",
        &item_id,
        &borrower_id,
        &outcome.value,
        json_output,
    );
}

pub fn run_return(store: &FlatFileStore, borrower_id: String, item_id: String, json_output: bool) {
    let borrower_id = require_id_or_exit(&borrower_id, "borrower id");
    let item_id = require_id_or_exit(&item_id, "item id");

    let outcome = mutate_or_exit(store, "loan.return", json_output, |catalog| {
        catalog.return_item(&borrower_id, &item_id)?;
        Ok((holder_snapshot(catalog.find_borrower(&borrower_id)), true))
    });
    render(
        "loan.return",
        "Returned",
        &item_id,
        &borrower_id,
        &outcome.value,
        json_output,
    );
}

fn holder_snapshot(borrower: Option<&Borrower>) -> Vec<String> {
    borrower.map(|b| b.holdings().to_vec()).unwrap_or_default()
}

fn render(
    action: &str,
    verb: &str,
    item_id: &str,
    borrower_id: &str,
    holdings: &[String],
    json_output: bool,
) {
    if json_output {
        print_json(&json!({
            "action": action,
            "result": "accepted",
            "borrowerId": borrower_id,
            "itemId": item_id,
            "holdings": holdings
        }));
    } else {
        println!(
            "shelf {}\n  {verb}: {item_id} ({borrower_id})\n  Now holding: {}",
            action.trim_start_matches("loan."),
            if holdings.is_empty() {
                "-".to_string()
            } else {
                holdings.join(", ")
            }
        );
    }
}
