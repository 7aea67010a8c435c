use serde_json::{Value, json};
use shelf_catalog::{
    Catalog, CatalogConfig, CatalogError, FIELD_DELIMITER, FlatFileStore, HOLDING_DELIMITER,
    LoadReport, MutationError, MutationOutcome, mutate_catalog,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "warn";
const VERBOSE_LOG_FILTER: &str = "shelf=debug,shelf_catalog=debug,warn";

/// Compact stderr logging; `RUST_LOG` wins over the built-in filters.
pub fn init_logger(verbose: bool) {
    let fallback = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Resolve the store from an optional config file and an optional
/// `--data-dir` override.
pub fn resolve_store_or_exit(data_dir: Option<&str>, config_path: Option<&str>) -> FlatFileStore {
    let mut config = match config_path {
        Some(path) => CatalogConfig::load(path).unwrap_or_else(|e| {
            eprintln!("error: {e}");
            std::process::exit(1);
        }),
        None => CatalogConfig::default(),
    };
    if let Some(dir) = data_dir {
        config.data_dir = dir.into();
    }
    config.store()
}

pub fn load_catalog_or_exit(store: &FlatFileStore) -> (Catalog, LoadReport) {
    Catalog::load_all(store).unwrap_or_else(|e| {
        eprintln!("error: failed to load catalog: {e}");
        std::process::exit(1);
    })
}

/// Run one catalog mutation and persist it, exiting on any failure.
///
/// Catalog rejections are rendered as a JSON payload in `--json` mode so
/// callers can branch on the error class.
pub fn mutate_or_exit<T, F>(
    store: &FlatFileStore,
    action: &str,
    json_output: bool,
    mutator: F,
) -> MutationOutcome<T>
where
    F: FnOnce(&mut Catalog) -> Result<(T, bool), CatalogError>,
{
    match mutate_catalog(store, mutator) {
        Ok(outcome) => outcome,
        Err(MutationError::Mutation(err)) => exit_rejected(action, &err, json_output),
        Err(MutationError::Store(err)) => {
            eprintln!("error: {action}: {err}");
            std::process::exit(1);
        }
    }
}

pub fn exit_rejected(action: &str, err: &CatalogError, json_output: bool) -> ! {
    if json_output {
        print_json(&json!({
            "action": action,
            "result": "rejected",
            "error": {
                "class": err.class(),
                "message": err.to_string()
            }
        }));
    } else {
        eprintln!("error: {err}");
    }
    std::process::exit(1);
}

/// Characters no stored field may contain: they would split the line or its
/// columns.
const FORBIDDEN_IN_FIELD: [&str; 3] = [FIELD_DELIMITER, "\n", "\r"];

/// Return the first delimiter `value` contains, if any. Identities also may
/// not contain the holding delimiter.
fn forbidden_delimiter(value: &str, is_identity: bool) -> Option<&'static str> {
    let holding = is_identity.then_some(HOLDING_DELIMITER);
    FORBIDDEN_IN_FIELD
        .into_iter()
        .chain(holding)
        .find(|delimiter| value.contains(delimiter))
}

fn describe(delimiter: &str) -> String {
    match delimiter {
        "\n" => "a newline".to_string(),
        "\r" => "a carriage return".to_string(),
        other => format!("'{other}'"),
    }
}

/// Trim a caller-supplied text field and refuse delimiter characters.
pub fn require_field_or_exit(raw: &str, label: &str) -> String {
    let value = raw.trim();
    if let Some(delimiter) = forbidden_delimiter(value, false) {
        eprintln!("error: {label} must not contain {}", describe(delimiter));
        std::process::exit(1);
    }
    value.to_string()
}

/// Trim a caller-supplied identity and refuse empty ones or ones containing
/// a delimiter.
pub fn require_id_or_exit(raw: &str, label: &str) -> String {
    let id = raw.trim();
    if id.is_empty() {
        eprintln!("error: {label} must not be empty");
        std::process::exit(1);
    }
    if let Some(delimiter) = forbidden_delimiter(id, true) {
        eprintln!("error: {label} must not contain {}", describe(delimiter));
        std::process::exit(1);
    }
    id.to_string()
}

pub fn print_json(payload: &Value) {
    match serde_json::to_string_pretty(payload) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("error: json serialization failed: {e}");
            std::process::exit(1);
        }
    }
}

/// Shorten `value` to at most `max` characters, marking the cut with `...`.
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let kept: String = value.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

pub const RULE: &str =
    "------------------------------------------------------------------------------------------";
