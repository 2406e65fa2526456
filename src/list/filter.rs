//! Tab and free-text filtering. Both keep the input order.

use crate::entity::Entity;
use crate::types::TabFilter;

/// Keep records whose tab field equals the filter value.
///
/// `TabFilter::All` keeps everything.
pub fn filter_by_tab<'a, E: Entity>(
    records: impl IntoIterator<Item = &'a E>,
    tab: &TabFilter,
) -> Vec<&'a E> {
    records
        .into_iter()
        .filter(|record| tab.matches(record.tab()))
        .collect()
}

/// Keep records with at least one search field containing `query`,
/// ignoring case. An empty query keeps everything.
pub fn filter_by_search<'a, E: Entity>(
    records: impl IntoIterator<Item = &'a E>,
    query: &str,
) -> Vec<&'a E> {
    if query.is_empty() {
        return records.into_iter().collect();
    }
    let needle = query.to_lowercase();
    records
        .into_iter()
        .filter(|record| matches_search(*record, &needle))
        .collect()
}

/// Whether any search field contains an already-lowercased needle
pub fn matches_search<E: Entity>(record: &E, needle_lower: &str) -> bool {
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle_lower))
}
