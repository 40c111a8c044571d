//! Thesis analysis and journal recommendations via the text model.
//!
//! The flow is: validate the raw request body, build the Indonesian
//! prompts, call the gateway once, then pull a JSON object out of the free
//! text reply. Replies that cannot be read as the expected shape degrade to
//! the raw text as `analysis` with no recommendations.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::inference::{ChatRequest, InferenceGateway};
use crate::models::{
    GatewayConfig, JournalRecord, Messages, RecommendConfig, RecommendResponse, ResearchType,
};
use crate::utils::text::{strip_markup, truncate_graphemes, utf16_len};

/// Greedy: from the first `{` to the last `}`.
static JSON_OBJECT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").ok());

/// A request body that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThesisQuery {
    /// Trimmed title without angle brackets, never empty
    pub title: String,
    pub research_type: Option<ResearchType>,
}

/// Validate a raw `recommend-journals` body.
///
/// Every rejection is an [`AppError::Validation`] carrying the localized
/// message to return with status 400. Checks run in order: title present,
/// title length, research type, sanitized title non-empty.
pub fn validate_request(
    body: &[u8],
    config: &RecommendConfig,
    messages: &Messages,
) -> Result<ThesisQuery> {
    let required = || AppError::validation(&messages.title_required);

    let value: Value = serde_json::from_slice(body).map_err(|_| required())?;
    let title = match value.get("thesisTitle") {
        Some(Value::String(title)) if !title.is_empty() => title,
        _ => return Err(required()),
    };

    if utf16_len(title) > config.max_title_length {
        return Err(AppError::validation(
            messages
                .title_too_long
                .replace("{}", &config.max_title_length.to_string()),
        ));
    }

    let research_type = match value.get("researchType") {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) if raw.is_empty() => None,
        Some(Value::String(raw)) => Some(
            raw.parse::<ResearchType>()
                .map_err(|_| AppError::validation(&messages.invalid_research_type))?,
        ),
        Some(_) => return Err(AppError::validation(&messages.invalid_research_type)),
    };

    let title = strip_markup(title);
    if title.is_empty() {
        return Err(AppError::validation(&messages.title_empty));
    }

    Ok(ThesisQuery {
        title,
        research_type,
    })
}

pub fn system_prompt(count: usize) -> String {
    format!(
        "Kamu adalah asisten penelitian akademik yang ahli dalam mencari dan merekomendasikan jurnal ilmiah untuk mahasiswa Indonesia.

Tugasmu:
1. Analisis judul skripsi yang diberikan
2. Identifikasi kata kunci dan topik utama
3. Berikan rekomendasi {count} jurnal yang relevan dengan format JSON

Gunakan bahasa Indonesia yang mudah dipahami mahasiswa."
    )
}

/// User prompt embedding the title and a reply template.
///
/// A missing research type is presented as kualitatif.
pub fn user_prompt(query: &ThesisQuery, count: usize) -> String {
    let kind = query.research_type.unwrap_or(ResearchType::Kualitatif);
    format!(
        r#"Judul Skripsi: "{title}"
Jenis Penelitian: {label}

Berikan analisis singkat tentang topik skripsi ini dan rekomendasikan {count} jurnal pendukung yang relevan.

Balas dengan format JSON seperti ini:
{{
  "analysis": "Analisis singkat tentang topik skripsi dan kata kunci utama yang bisa digunakan untuk pencarian jurnal...",
  "recommendations": [
    {{
      "id": "1",
      "title": "Judul jurnal yang relevan",
      "authors": ["Nama Penulis 1", "Nama Penulis 2"],
      "abstract": "Abstrak singkat jurnal dan relevansinya dengan skripsi...",
      "year": 2024,
      "source": "sinta",
      "sintaAccreditation": "S2",
      "language": "id",
      "researchType": "{kind}",
      "relevanceScore": 95
    }}
  ]
}}

Catatan:
- source bisa berupa: google_scholar, sinta, garuda, pubmed, arxiv
- sintaAccreditation hanya untuk source sinta: S1, S2, S3, S4, S5, S6
- language: id atau en
- researchType: kualitatif, kuantitatif, atau mixed
- relevanceScore: 0-100 menunjukkan seberapa relevan jurnal dengan skripsi"#,
        title = query.title,
        label = kind.prompt_label(),
        kind = kind.as_str(),
    )
}

#[derive(Deserialize)]
struct RawReply {
    analysis: String,
    #[serde(default)]
    recommendations: Vec<Value>,
}

/// Read the model's free text reply.
///
/// Individual recommendations that do not decode as a [`JournalRecord`]
/// are dropped; at most `max` are kept.
pub fn parse_reply(content: &str, max: usize) -> RecommendResponse {
    let raw = match extract_reply(content) {
        Ok(raw) => raw,
        Err(e) => {
            log::error!("Failed to parse AI response: {}", e);
            return RecommendResponse {
                analysis: content.to_string(),
                recommendations: Vec::new(),
            };
        }
    };

    let mut recommendations = Vec::with_capacity(raw.recommendations.len().min(max));
    for (index, value) in raw.recommendations.into_iter().enumerate() {
        if recommendations.len() == max {
            log::debug!("Truncating recommendations to {}", max);
            break;
        }
        match serde_json::from_value::<JournalRecord>(value) {
            Ok(record) => recommendations.push(record),
            Err(e) => log::warn!("Dropping recommendation #{}: {}", index, e),
        }
    }

    RecommendResponse {
        analysis: raw.analysis,
        recommendations,
    }
}

fn extract_reply(content: &str) -> Result<RawReply> {
    let object = JSON_OBJECT
        .as_ref()
        .and_then(|re| re.find(content))
        .ok_or_else(|| AppError::validation("No JSON found in response"))?;
    Ok(serde_json::from_str(object.as_str())?)
}

/// Calls the text model for one validated query.
pub struct Recommender {
    gateway: Arc<dyn InferenceGateway>,
    model: String,
    temperature: f32,
    max_recommendations: usize,
}

impl Recommender {
    pub fn new(
        gateway: Arc<dyn InferenceGateway>,
        gateway_config: &GatewayConfig,
        config: &RecommendConfig,
    ) -> Self {
        Self {
            gateway,
            model: gateway_config.text_model.clone(),
            temperature: gateway_config.temperature,
            max_recommendations: config.max_recommendations,
        }
    }

    /// Analyse `query` and recommend journals.
    ///
    /// Gateway failures keep their upstream status; a reply without text
    /// is [`AppError::EmptyCompletion`].
    pub async fn recommend(&self, query: &ThesisQuery) -> Result<RecommendResponse> {
        log::info!(
            "Calling AI for thesis (sanitized): {}",
            truncate_graphemes(&query.title, 50)
        );

        let request = ChatRequest::new(&self.model)
            .system(system_prompt(self.max_recommendations))
            .user(user_prompt(query, self.max_recommendations))
            .temperature(self.temperature);

        let completion = self.gateway.complete(&request).await?;
        let content = completion
            .first_text()
            .ok_or_else(|| AppError::EmptyCompletion("AI tidak memberikan respons".into()))?;

        log::info!("AI response received");
        Ok(parse_reply(content, self.max_recommendations))
    }
}
