//! Journal record and its enumerated attributes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AppError;

/// Index a publication was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    GoogleScholar,
    Sinta,
    Garuda,
    Pubmed,
    Arxiv,
}

impl Source {
    pub const ALL: [Source; 5] = [
        Source::GoogleScholar,
        Source::Sinta,
        Source::Garuda,
        Source::Pubmed,
        Source::Arxiv,
    ];

    /// Wire spelling, as used in filters and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::GoogleScholar => "google_scholar",
            Source::Sinta => "sinta",
            Source::Garuda => "garuda",
            Source::Pubmed => "pubmed",
            Source::Arxiv => "arxiv",
        }
    }

    /// Canonical display label, also used inside citations.
    pub fn label(&self) -> &'static str {
        match self {
            Source::GoogleScholar => "Google Scholar",
            Source::Sinta => "SINTA",
            Source::Garuda => "Garuda",
            Source::Pubmed => "PubMed",
            Source::Arxiv => "arXiv",
        }
    }
}

/// SINTA accreditation rank, S1 (highest) to S6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SintaAccreditation {
    S1,
    S2,
    S3,
    S4,
    S5,
    S6,
}

impl SintaAccreditation {
    pub const ALL: [SintaAccreditation; 6] = [
        SintaAccreditation::S1,
        SintaAccreditation::S2,
        SintaAccreditation::S3,
        SintaAccreditation::S4,
        SintaAccreditation::S5,
        SintaAccreditation::S6,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SintaAccreditation::S1 => "S1",
            SintaAccreditation::S2 => "S2",
            SintaAccreditation::S3 => "S3",
            SintaAccreditation::S4 => "S4",
            SintaAccreditation::S5 => "S5",
            SintaAccreditation::S6 => "S6",
        }
    }
}

/// Publication language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Id,
    En,
    Other,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Id, Language::En, Language::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Id => "id",
            Language::En => "en",
            Language::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::Id => "Indonesia",
            Language::En => "English",
            Language::Other => "Other",
        }
    }
}

/// Research methodology of a publication or thesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearchType {
    Kualitatif,
    Kuantitatif,
    Mixed,
}

impl ResearchType {
    pub const ALL: [ResearchType; 3] = [
        ResearchType::Kualitatif,
        ResearchType::Kuantitatif,
        ResearchType::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResearchType::Kualitatif => "kualitatif",
            ResearchType::Kuantitatif => "kuantitatif",
            ResearchType::Mixed => "mixed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResearchType::Kualitatif => "Kualitatif",
            ResearchType::Kuantitatif => "Kuantitatif",
            ResearchType::Mixed => "Mixed Method",
        }
    }

    /// Phrase used when describing the thesis to the language model.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            ResearchType::Mixed => "mixed method",
            other => other.as_str(),
        }
    }
}

fn parse_variant<T: Copy>(
    all: &[T],
    name: fn(&T) -> &'static str,
    kind: &str,
    s: &str,
) -> Result<T, AppError> {
    all.iter()
        .copied()
        .find(|v| name(v) == s)
        .ok_or_else(|| AppError::validation(format!("unknown {kind} '{s}'")))
}

impl FromStr for Source {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(&Self::ALL, Self::as_str, "source", s)
    }
}

impl FromStr for SintaAccreditation {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(&Self::ALL, Self::as_str, "SINTA accreditation", s)
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(&Self::ALL, Self::as_str, "language", s)
    }
}

impl FromStr for ResearchType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(&Self::ALL, Self::as_str, "research type", s)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SintaAccreditation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ResearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One indexed publication.
///
/// Records are either part of the fixed catalog or synthesized per
/// recommendation response; both are treated as immutable values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    pub title: String,

    /// Display names, in citation order
    #[serde(default)]
    pub authors: Vec<String>,

    #[serde(rename = "abstract", default)]
    pub abstract_text: String,

    pub year: i32,

    pub source: Source,

    /// Only meaningful when `source` is SINTA
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sinta_accreditation: Option<SintaAccreditation>,

    pub language: Language,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research_type: Option<ResearchType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    /// External citation count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<u32>,

    /// 0-100, present only on AI recommendations
    #[serde(
        default,
        deserialize_with = "relevance_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub relevance_score: Option<u8>,
}

impl JournalRecord {
    /// Create a record with the required fields; optional fields start empty.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        year: i32,
        source: Source,
        language: Language,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            authors: Vec::new(),
            abstract_text: String::new(),
            year,
            source,
            sinta_accreditation: None,
            language,
            research_type: None,
            download_url: None,
            doi: None,
            citations: None,
            relevance_score: None,
        }
    }

    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_abstract(mut self, text: impl Into<String>) -> Self {
        self.abstract_text = text.into();
        self
    }

    pub fn with_accreditation(mut self, rank: SintaAccreditation) -> Self {
        self.sinta_accreditation = Some(rank);
        self
    }

    pub fn with_research_type(mut self, kind: ResearchType) -> Self {
        self.research_type = Some(kind);
        self
    }

    pub fn with_doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = Some(doi.into());
        self
    }

    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = Some(url.into());
        self
    }

    pub fn with_citations(mut self, count: u32) -> Self {
        self.citations = Some(count);
        self
    }

    /// Whether the accreditation field respects the SINTA-only rule.
    ///
    /// The rule is a data-quality check: nothing rejects records that break it.
    pub fn has_consistent_accreditation(&self) -> bool {
        self.sinta_accreditation.is_none() || self.source == Source::Sinta
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

fn relevance_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    let score: Option<f64> = Option::deserialize(deserializer)?;
    Ok(score.map(|s| s.round().clamp(0.0, 100.0) as u8))
}

/// A selected facet value.
///
/// Values outside the declared enum are kept verbatim so they can be
/// echoed back, but they never match a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetValue<T> {
    Known(T),
    Unrecognized(String),
}

impl<T: PartialEq> FacetValue<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            FacetValue::Known(known) => known == value,
            FacetValue::Unrecognized(_) => false,
        }
    }
}

impl<T> From<T> for FacetValue<T> {
    fn from(value: T) -> Self {
        FacetValue::Known(value)
    }
}

impl<T: FromStr> FacetValue<T> {
    pub fn parse(raw: &str) -> Self {
        raw.parse()
            .map(FacetValue::Known)
            .unwrap_or_else(|_| FacetValue::Unrecognized(raw.to_string()))
    }
}

impl<T: fmt::Display> fmt::Display for FacetValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetValue::Known(v) => v.fmt(f),
            FacetValue::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

impl<T: fmt::Display> Serialize for FacetValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T: FromStr> Deserialize<'de> for FacetValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_names_round_trip() {
        for source in Source::ALL {
            assert_eq!(source.as_str().parse::<Source>().unwrap(), source);
        }
        assert_eq!("S4".parse::<SintaAccreditation>().unwrap(), SintaAccreditation::S4);
        assert!("s4".parse::<SintaAccreditation>().is_err());
        assert!("scopus".parse::<Source>().is_err());
    }

    #[test]
    fn test_record_json_uses_camel_case() {
        let json = r##"{
            "id": "1",
            "title": "Judul",
            "authors": ["Budi Santoso"],
            "abstract": "Abstrak",
            "year": 2024,
            "source": "google_scholar",
            "language": "id",
            "researchType": "mixed",
            "downloadUrl": "#"
        }"##;
        let record: JournalRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.source, Source::GoogleScholar);
        assert_eq!(record.research_type, Some(ResearchType::Mixed));
        assert_eq!(record.abstract_text, "Abstrak");
        assert_eq!(record.download_url.as_deref(), Some("#"));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["researchType"], "mixed");
        assert!(back.get("relevanceScore").is_none());
    }

    #[test]
    fn test_numeric_id_and_fractional_score_are_accepted() {
        let json = r#"{"id": 3, "title": "T", "year": 2023, "source": "sinta",
                       "language": "id", "relevanceScore": 104.6}"#;
        let record: JournalRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "3");
        assert_eq!(record.relevance_score, Some(100));
    }

    #[test]
    fn test_accreditation_consistency() {
        let sinta = JournalRecord::new("a", "T", 2020, Source::Sinta, Language::Id)
            .with_accreditation(SintaAccreditation::S2);
        let garuda = JournalRecord::new("b", "T", 2020, Source::Garuda, Language::Id)
            .with_accreditation(SintaAccreditation::S3);
        let plain = JournalRecord::new("c", "T", 2020, Source::Arxiv, Language::En);

        assert!(sinta.has_consistent_accreditation());
        assert!(!garuda.has_consistent_accreditation());
        assert!(plain.has_consistent_accreditation());
    }

    #[test]
    fn test_facet_value_keeps_unrecognized_input() {
        let values: Vec<FacetValue<Source>> =
            serde_json::from_str(r#"["sinta", "scopus"]"#).unwrap();
        assert_eq!(values[0], FacetValue::Known(Source::Sinta));
        assert_eq!(values[1], FacetValue::Unrecognized("scopus".to_string()));
        assert!(!values[1].matches(&Source::Sinta));
        assert_eq!(serde_json::to_string(&values).unwrap(), r#"["sinta","scopus"]"#);
    }
}
