//! Client-side journal search.
//!
//! A stable filter over an in-memory catalog. Facets combine with AND,
//! values selected within one facet combine with OR. Results keep the
//! catalog order; there is no ranking.

use crate::models::{FacetFilters, FacetValue, JournalRecord};

/// Filter `catalog` by a free-text `query` and facet constraints.
///
/// An empty query matches everything. Returned references point into
/// `catalog`, so no record can be invented or duplicated.
pub fn search_journals<'a>(
    catalog: &'a [JournalRecord],
    query: &str,
    filters: &FacetFilters,
) -> Vec<&'a JournalRecord> {
    let needle = query.to_lowercase();
    catalog
        .iter()
        .filter(|record| matches_query(record, &needle) && matches_facets(record, filters))
        .collect()
}

/// Case-insensitive substring match on title, abstract or any author.
///
/// `needle` must already be lowercased.
pub fn matches_query(record: &JournalRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    record.title.to_lowercase().contains(needle)
        || record.abstract_text.to_lowercase().contains(needle)
        || record
            .authors
            .iter()
            .any(|author| author.to_lowercase().contains(needle))
}

/// Whether a record passes every active facet.
pub fn matches_facets(record: &JournalRecord, filters: &FacetFilters) -> bool {
    in_selection(&filters.sources, Some(&record.source))
        && in_selection(
            &filters.sinta_accreditation,
            record.sinta_accreditation.as_ref(),
        )
        && filters.year_from.is_none_or(|from| record.year >= from)
        && filters.year_to.is_none_or(|to| record.year <= to)
        && in_selection(&filters.research_type, record.research_type.as_ref())
        && in_selection(&filters.language, Some(&record.language))
}

/// Empty selection passes; otherwise the value must be present and selected.
fn in_selection<T: PartialEq>(selected: &[FacetValue<T>], value: Option<&T>) -> bool {
    if selected.is_empty() {
        return true;
    }
    value.is_some_and(|v| selected.iter().any(|s| s.matches(v)))
}
