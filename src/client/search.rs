//! Search page state.

use crate::models::{FacetFilters, JournalRecord, SearchFilterSet};
use crate::services::search_journals;

/// Query input, facet selections and the last result set over one catalog.
///
/// Nothing is searched until [`SearchSession::search`] is called once; after
/// that, every facet change re-runs the search with the current input.
#[derive(Debug, Clone)]
pub struct SearchSession {
    catalog: Vec<JournalRecord>,
    pub input: String,
    filters: SearchFilterSet,
    results: Vec<JournalRecord>,
    searched: bool,
}

impl SearchSession {
    pub fn new(catalog: Vec<JournalRecord>) -> Self {
        Self {
            catalog,
            input: String::new(),
            filters: SearchFilterSet::default(),
            results: Vec::new(),
            searched: false,
        }
    }

    pub fn catalog(&self) -> &[JournalRecord] {
        &self.catalog
    }

    pub fn filters(&self) -> &SearchFilterSet {
        &self.filters
    }

    pub fn results(&self) -> &[JournalRecord] {
        &self.results
    }

    pub fn is_searched(&self) -> bool {
        self.searched
    }

    /// Run the search with the current input and facets.
    pub fn search(&mut self) -> &[JournalRecord] {
        self.filters.query = self.input.clone();
        self.results = search_journals(&self.catalog, &self.input, &self.filters.facets)
            .into_iter()
            .cloned()
            .collect();
        self.searched = true;
        log::debug!(
            "Search {:?} matched {} of {} records",
            self.input,
            self.results.len(),
            self.catalog.len()
        );
        &self.results
    }

    /// Replace the facet selection.
    pub fn set_facets(&mut self, facets: FacetFilters) {
        self.update_facets(|current| *current = facets);
    }

    /// Mutate the facet selection in place, e.g. `|f| f.toggle_source(Source::Sinta)`.
    pub fn update_facets(&mut self, change: impl FnOnce(&mut FacetFilters)) {
        change(&mut self.filters.facets);
        if self.searched {
            self.search();
        }
    }

    /// Reset every facet, keeping the query.
    pub fn clear_filters(&mut self) {
        self.update_facets(|facets| *facets = FacetFilters::default());
    }

    pub fn active_filter_count(&self) -> usize {
        self.filters.facets.active_count()
    }
}
