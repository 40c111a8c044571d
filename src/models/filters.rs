//! Search query state and facet constraints.

use serde::{Deserialize, Serialize};

use super::journal::{FacetValue, Language, ResearchType, SintaAccreditation, Source};

/// Facet constraints applied on top of the free-text query.
///
/// An empty list places no restriction on that facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetFilters {
    #[serde(default)]
    pub sources: Vec<FacetValue<Source>>,

    #[serde(default)]
    pub sinta_accreditation: Vec<FacetValue<SintaAccreditation>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_from: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_to: Option<i32>,

    #[serde(default)]
    pub research_type: Vec<FacetValue<ResearchType>>,

    #[serde(default)]
    pub language: Vec<FacetValue<Language>>,
}

impl FacetFilters {
    pub fn toggle_source(&mut self, source: Source) {
        toggle(&mut self.sources, source);
    }

    pub fn toggle_accreditation(&mut self, rank: SintaAccreditation) {
        toggle(&mut self.sinta_accreditation, rank);
    }

    pub fn toggle_research_type(&mut self, kind: ResearchType) {
        toggle(&mut self.research_type, kind);
    }

    pub fn toggle_language(&mut self, language: Language) {
        toggle(&mut self.language, language);
    }

    /// Number of active constraints: one per selected value, one per year bound.
    pub fn active_count(&self) -> usize {
        self.sources.len()
            + self.sinta_accreditation.len()
            + self.research_type.len()
            + self.language.len()
            + usize::from(self.year_from.is_some())
            + usize::from(self.year_to.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }
}

/// Add `value` if absent, remove it if present.
fn toggle<T: PartialEq + Copy>(values: &mut Vec<FacetValue<T>>, value: T) {
    if let Some(pos) = values.iter().position(|v| v.matches(&value)) {
        values.remove(pos);
    } else {
        values.push(FacetValue::Known(value));
    }
}

/// Query state owned by the caller and mutated by facet toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilterSet {
    #[serde(default)]
    pub query: String,

    #[serde(flatten)]
    pub facets: FacetFilters,
}

impl SearchFilterSet {
    /// Reset every facet, keeping the query.
    pub fn clear_facets(&mut self) {
        self.facets = FacetFilters::default();
    }
}
