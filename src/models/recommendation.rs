//! Request and response bodies of the two remote functions.

use serde::{Deserialize, Serialize};

use super::journal::{JournalRecord, ResearchType};

/// Body sent to `recommend-journals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub thesis_title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research_type: Option<ResearchType>,
}

/// Successful `recommend-journals` reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendResponse {
    #[serde(default)]
    pub analysis: String,

    #[serde(default)]
    pub recommendations: Vec<JournalRecord>,
}

/// Successful `generate-illustration` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IllustrationResponse {
    pub image_url: String,
}

/// Error reply shared by both functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
