use crate::cli::ItemCommands;
use crate::support::{
    RULE, exit_rejected, load_catalog_or_exit, mutate_or_exit, print_json, require_field_or_exit,
    require_id_or_exit, truncate,
};
use serde_json::json;
use shelf_catalog::{CatalogError, FlatFileStore, Item, RecordKind};

pub fn run(store: &FlatFileStore, command: ItemCommands) {
    match command {
        ItemCommands::Add {
            id,
            title,
            author,
            code,
            json,
        } => run_add(store, id, title, author, code, json),

        ItemCommands::List { json } => run_list(store, json),

        ItemCommands::Show { id, json } => run_show(store, id, json),

        ItemCommands::Search { term, json } => run_search(store, term, json),
    }
}

fn run_add(
    store: &FlatFileStore,
    id: String,
    title: String,
    author: String,
    code: String,
    json_output: bool,
) {
    let id = require_id_or_exit(&id, "item id");
    let title = require_field_or_exit(&title, "title");
    let author = require_field_or_exit(&author, "author");
    let code = require_field_or_exit(&code, "code");
    let outcome = mutate_or_exit(store, "item.add", json_output, |catalog| {
        let item = catalog.add_item(&id, &title, &author, &code)?.clone();
        Ok((item, true))
    });
    let item = outcome.value;
    let path = store.path_for(RecordKind::Item);

    if json_output {
        print_json(&json!({
            "action": "item.add",
            "itemsPath": path.display().to_string(),
            "item": item
        }));
    } else {
        println!(
            "shelf item add\n  Added: {} ({})\n  Path: {}",
            item.id,
            item.title,
            path.display()
        );
    }
}

fn run_list(store: &FlatFileStore, json_output: bool) {
    let (catalog, _) = load_catalog_or_exit(store);
    let items: Vec<&Item> = catalog.items().collect();

    if json_output {
        print_json(&json!({
            "action": "item.list",
            "count": items.len(),
            "items": items
        }));
    } else if items.is_empty() {
        println!("No items in the catalog.");
    } else {
        print_item_table(&items);
    }
}

fn run_show(store: &FlatFileStore, id: String, json_output: bool) {
    let (catalog, _) = load_catalog_or_exit(store);
    let id = id.trim();
    let Some(item) = catalog.find_item(id) else {
        let err = CatalogError::NotFound {
            kind: RecordKind::Item,
            id: id.to_string(),
        };
        exit_rejected("item.show", &err, json_output);
    };
    let holder = catalog.holder_of(id).map(|b| b.id.as_str());

    if json_output {
        print_json(&json!({
            "action": "item.show",
            "item": item,
            "heldBy": holder
        }));
    } else {
        println!("ID:        {}", item.id);
        println!("Title:     {}", item.title);
        println!("Author:    {}", item.author);
        println!("Code:      {}", item.code);
        println!("Available: {}", yes_no(item.is_available()));
        if let Some(holder) = holder {
            println!("Held by:   {holder}");
        }
    }
}

fn run_search(store: &FlatFileStore, term: String, json_output: bool) {
    let (catalog, _) = load_catalog_or_exit(store);
    let matches = catalog.search(&term);

    if json_output {
        print_json(&json!({
            "action": "item.search",
            "term": term.trim(),
            "count": matches.len(),
            "items": matches
        }));
    } else if matches.is_empty() {
        println!("No item found matching: {}", term.trim());
    } else {
        print_item_table(&matches);
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

pub(crate) fn print_item_table(items: &[&Item]) {
    println!("{RULE}");
    println!(
        "{:<10} {:<25} {:<20} {:<15} {:<10}",
        "ID", "Title", "Author", "Code", "Available"
    );
    println!("{RULE}");
    for item in items {
        println!(
            "{:<10} {:<25} {:<20} {:<15} {:<10}",
            item.id,
            truncate(&item.title, 25),
            truncate(&item.author, 20),
            item.code,
            yes_no(item.is_available())
        );
    }
    println!("{RULE}");
}
