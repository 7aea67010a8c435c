use crate::cli::BorrowerCommands;
use crate::commands::item::print_item_table;
use crate::support::{
    RULE, exit_rejected, load_catalog_or_exit, mutate_or_exit, print_json, require_field_or_exit,
    require_id_or_exit, truncate,
};
use serde_json::json;
use shelf_catalog::{BORROW_LIMIT, Borrower, CatalogError, FlatFileStore, RecordKind};

pub fn run(store: &FlatFileStore, command: BorrowerCommands) {
    match command {
        BorrowerCommands::Add {
            id,
            name,
            email,
            phone,
            json,
        } => run_add(store, id, name, email, phone, json),

        BorrowerCommands::List { json } => run_list(store, json),

        BorrowerCommands::Show { id, json } => run_show(store, id, json),

        BorrowerCommands::Holdings { id, json } => run_holdings(store, id, json),
    }
}

fn run_add(
    store: &FlatFileStore,
    id: String,
    name: String,
    email: String,
    phone: String,
    json_output: bool,
) {
    let id = require_id_or_exit(&id, "borrower id");
    let name = require_field_or_exit(&name, "name");
    let email = require_field_or_exit(&email, "email");
    let phone = require_field_or_exit(&phone, "phone");
    let outcome = mutate_or_exit(store, "borrower.add", json_output, |catalog| {
        let borrower = catalog.add_borrower(&id, &name, &email, &phone)?.clone();
        Ok((borrower, true))
    });
    let borrower = outcome.value;
    let path = store.path_for(RecordKind::Borrower);

    if json_output {
        print_json(&json!({
            "action": "borrower.add",
            "borrowersPath": path.display().to_string(),
            "borrower": borrower
        }));
    } else {
        println!(
            "shelf borrower add\n  Added: {} ({})\n  Path: {}",
            borrower.id,
            borrower.name,
            path.display()
        );
    }
}

fn run_list(store: &FlatFileStore, json_output: bool) {
    let (catalog, _) = load_catalog_or_exit(store);
    let borrowers: Vec<&Borrower> = catalog.borrowers().collect();

    if json_output {
        print_json(&json!({
            "action": "borrower.list",
            "count": borrowers.len(),
            "borrowers": borrowers
        }));
        return;
    }

    if borrowers.is_empty() {
        println!("No borrowers registered.");
        return;
    }
    println!("{RULE}");
    println!(
        "{:<10} {:<20} {:<25} {:<15} {:<15}",
        "ID", "Name", "Email", "Phone", "Items Held"
    );
    println!("{RULE}");
    for borrower in borrowers {
        println!(
            "{:<10} {:<20} {:<25} {:<15} {:<15}",
            borrower.id,
            truncate(&borrower.name, 20),
            truncate(&borrower.email, 25),
            borrower.phone,
            borrower.holding_count()
        );
    }
    println!("{RULE}");
}

fn run_show(store: &FlatFileStore, id: String, json_output: bool) {
    let (catalog, _) = load_catalog_or_exit(store);
    let id = id.trim();
    let Some(borrower) = catalog.find_borrower(id) else {
        let err = CatalogError::NotFound {
            kind: RecordKind::Borrower,
            id: id.to_string(),
        };
        exit_rejected("borrower.show", &err, json_output);
    };

    if json_output {
        print_json(&json!({
            "action": "borrower.show",
            "borrower": borrower,
            "holdingCount": borrower.holding_count(),
            "borrowLimit": BORROW_LIMIT
        }));
    } else {
        println!("ID:    {}", borrower.id);
        println!("Name:  {}", borrower.name);
        println!("Email: {}", borrower.email);
        println!("Phone: {}", borrower.phone);
        println!("Held:  {}/{BORROW_LIMIT}", borrower.holding_count());
    }
}

fn run_holdings(store: &FlatFileStore, id: String, json_output: bool) {
    let (catalog, _) = load_catalog_or_exit(store);
    let id = id.trim();
    let items = catalog
        .borrowed_items_of(id)
        .unwrap_or_else(|err| exit_rejected("borrower.holdings", &err, json_output));

    if json_output {
        print_json(&json!({
            "action": "borrower.holdings",
            "borrowerId": id,
            "count": items.len(),
            "items": items
        }));
    } else if items.is_empty() {
        println!("Borrower {id} holds no items.");
    } else {
        println!("Items held by {id}:");
        print_item_table(&items);
    }
}
