//! Shelf CLI: the `shelf` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    support::init_logger(cli.verbose);

    let store = support::resolve_store_or_exit(cli.data_dir.as_deref(), cli.config.as_deref());
    tracing::debug!(data_dir = %store.root().display(), "resolved data directory");

    match cli.command {
        Commands::Item { command } => commands::item::run(&store, command),

        Commands::Borrower { command } => commands::borrower::run(&store, command),

        Commands::Borrow {
            borrower_id,
            item_id,
            json,
        } => commands::loan::run_borrow(&store, borrower_id, item_id, json),

        Commands::Return {
            borrower_id,
            item_id,
            json,
        } => commands::loan::run_return(&store, borrower_id, item_id, json),

        Commands::Check { json } => commands::check::run(&store, json),

        Commands::Save { json } => commands::save::run(&store, json),
    }
}
