//! Journal card actions.

use super::notification::Notification;
use crate::models::{CitationFormat, JournalRecord, Messages};
use crate::services::{Clipboard, copy_citation, generate_citation};

/// Format `record`, copy it and report the outcome.
pub async fn copy_citation_for(
    record: &JournalRecord,
    format: CitationFormat,
    clipboard: &dyn Clipboard,
    messages: &Messages,
) -> Notification {
    let citation = generate_citation(record, format);
    match copy_citation(clipboard, &citation).await {
        Ok(()) => Notification::success(
            &messages.citation_copied,
            messages
                .citation_copied_detail
                .replace("{}", &format.as_str().to_uppercase()),
        ),
        Err(e) => {
            log::warn!("Copy failed for record {}: {}", record.id, e);
            Notification::destructive(&messages.citation_copy_failed, e.to_string())
        }
    }
}
