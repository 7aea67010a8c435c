use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "shelf",
    about = "Shelf: lend catalog items to registered borrowers, stored in flat files",
    version
)]
pub struct Cli {
    /// Directory holding the data files (overrides the config file)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Optional TOML config file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage catalog items
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },

    /// Manage borrowers
    Borrower {
        #[command(subcommand)]
        command: BorrowerCommands,
    },

    /// Lend an item to a borrower
    Borrow {
        /// Borrower ID
        borrower_id: String,

        /// Item ID
        item_id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Take an item back from a borrower
    Return {
        /// Borrower ID
        borrower_id: String,

        /// Item ID
        item_id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report disagreements between the item and borrower files
    Check {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load and rewrite both data files
    Save {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum ItemCommands {
    /// Add a new item
    Add {
        /// Item ID
        id: String,

        /// Item title
        title: String,

        /// Author
        #[arg(long, default_value = "")]
        author: String,

        /// External code (ISBN or similar)
        #[arg(long, default_value = "")]
        code: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all items
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one item and its holder
    Show {
        /// Item ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search items by exact ID or title substring (case-insensitive)
    Search {
        /// Search term
        term: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum BorrowerCommands {
    /// Register a new borrower
    Add {
        /// Borrower ID
        id: String,

        /// Full name
        name: String,

        /// Email address
        #[arg(long, default_value = "")]
        email: String,

        /// Phone number
        #[arg(long, default_value = "")]
        phone: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all borrowers
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one borrower
    Show {
        /// Borrower ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the items a borrower currently holds
    Holdings {
        /// Borrower ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
