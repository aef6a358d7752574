//! Name filter for the client and product lists.

use crate::api::Named;

/// Keep the records whose name contains `term`, ignoring case.
///
/// Matching uses Unicode lowercase on both sides. An empty term keeps
/// everything. The input order is preserved.
#[must_use]
pub fn filter_by_name<T: Named>(records: Vec<T>, term: &str) -> Vec<T> {
    if term.is_empty() {
        return records;
    }

    let needle = term.to_lowercase();
    records
        .into_iter()
        .filter(|record| record.name().to_lowercase().contains(&needle))
        .collect()
}
