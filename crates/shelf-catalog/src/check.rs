//! On-demand consistency check over a loaded catalog.
//!
//! Loading never enforces cross-file integrity; this check reports where the
//! two files disagree so the caller can decide what to do.

use crate::catalog::{BORROW_LIMIT, Catalog};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub const CATALOG_CHECK_KIND: &str = "shelf.catalog.check.v1";

pub const FAILURE_CLASS_UNKNOWN_ITEM: &str = "holding.unknown_item";
pub const FAILURE_CLASS_SHARED_ITEM: &str = "holding.shared";
pub const FAILURE_CLASS_OVER_LIMIT: &str = "holding.over_limit";
pub const WARNING_CLASS_FLAG_MISMATCH: &str = "availability.flag_mismatch";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFinding {
    pub subject_id: String,
    pub class: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCheckSummary {
    pub item_count: usize,
    pub borrower_count: usize,
    pub held_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCheckReport {
    pub check_kind: String,
    pub result: String,
    pub failure_classes: Vec<String>,
    pub warning_classes: Vec<String>,
    pub errors: Vec<CatalogFinding>,
    pub warnings: Vec<CatalogFinding>,
    pub summary: CatalogCheckSummary,
}

impl CatalogCheckReport {
    pub fn accepted(&self) -> bool {
        self.result == "accepted"
    }
}

fn finding(subject_id: &str, class: &str, message: String) -> CatalogFinding {
    CatalogFinding {
        subject_id: subject_id.to_string(),
        class: class.to_string(),
        message,
    }
}

fn collect_classes(findings: &[CatalogFinding]) -> Vec<String> {
    findings
        .iter()
        .map(|finding| finding.class.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn check_catalog(catalog: &Catalog) -> CatalogCheckReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut holders: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for borrower in catalog.borrowers() {
        if borrower.holding_count() > BORROW_LIMIT {
            errors.push(finding(
                &borrower.id,
                FAILURE_CLASS_OVER_LIMIT,
                format!(
                    "borrower holds {} items (limit {BORROW_LIMIT})",
                    borrower.holding_count()
                ),
            ));
        }
        for item_id in borrower.holdings() {
            if catalog.find_item(item_id).is_none() {
                errors.push(finding(
                    &borrower.id,
                    FAILURE_CLASS_UNKNOWN_ITEM,
                    format!("holding references unknown item {item_id}"),
                ));
            }
            holders
                .entry(item_id.as_str())
                .or_default()
                .push(borrower.id.as_str());
        }
    }

    for (item_id, borrower_ids) in &holders {
        if borrower_ids.len() > 1 {
            errors.push(finding(
                item_id,
                FAILURE_CLASS_SHARED_ITEM,
                format!(
                    "item held by {} borrowers: {}",
                    borrower_ids.len(),
                    borrower_ids.join(", ")
                ),
            ));
        }
    }

    let mut held_count = 0usize;
    for item in catalog.items() {
        let held = holders.contains_key(item.id.as_str());
        if held {
            held_count += 1;
        }
        if item.is_available() == held {
            let message = if held {
                "item is marked available but appears in a holding set".to_string()
            } else {
                "item is marked unavailable but no borrower holds it".to_string()
            };
            warnings.push(finding(&item.id, WARNING_CLASS_FLAG_MISMATCH, message));
        }
    }

    let failure_classes = collect_classes(&errors);
    let warning_classes = collect_classes(&warnings);
    let result = if errors.is_empty() {
        "accepted"
    } else {
        "rejected"
    };

    CatalogCheckReport {
        check_kind: CATALOG_CHECK_KIND.to_string(),
        result: result.to_string(),
        failure_classes,
        warning_classes,
        summary: CatalogCheckSummary {
            item_count: catalog.item_count(),
            borrower_count: catalog.borrower_count(),
            held_count,
            error_count: errors.len(),
            warning_count: warnings.len(),
        },
        errors,
        warnings,
    }
}
