//! Recommendation panel state.
//!
//! Requests are never cancelled. Each submission gets a [`RequestToken`];
//! a reply that settles after a newer submission was issued is discarded,
//! so a slow first request cannot overwrite a faster second one.

use super::api::RecommendationSource;
use super::notification::Notification;
use crate::error::Result;
use crate::models::{JournalRecord, Messages, RecommendRequest, RecommendResponse, ResearchType};

/// Identifies one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

#[derive(Debug, Clone)]
pub struct RecommendationPanel {
    messages: Messages,
    pub thesis_title: String,
    pub research_type: ResearchType,
    latest: u64,
    loading: bool,
    analysis: String,
    recommendations: Vec<JournalRecord>,
}

impl RecommendationPanel {
    pub fn new(messages: Messages) -> Self {
        Self {
            messages,
            thesis_title: String::new(),
            research_type: ResearchType::Kuantitatif,
            latest: 0,
            loading: false,
            analysis: String::new(),
            recommendations: Vec::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn analysis(&self) -> &str {
        &self.analysis
    }

    pub fn recommendations(&self) -> &[JournalRecord] {
        &self.recommendations
    }

    /// Start a submission.
    ///
    /// A blank title is rejected locally and nothing is sent. Otherwise the
    /// previous result is cleared and the request to send is returned.
    pub fn begin(&mut self) -> std::result::Result<(RequestToken, RecommendRequest), Notification> {
        if self.thesis_title.trim().is_empty() {
            return Err(Notification::destructive(
                &self.messages.panel_title_required,
                &self.messages.panel_title_required_hint,
            ));
        }

        self.latest += 1;
        self.loading = true;
        self.analysis.clear();
        self.recommendations.clear();

        let request = RecommendRequest {
            thesis_title: self.thesis_title.clone(),
            research_type: Some(self.research_type),
        };
        Ok((RequestToken(self.latest), request))
    }

    /// Apply the outcome of a submission.
    ///
    /// Returns `None` when `token` was superseded; the outcome is dropped.
    pub fn settle(
        &mut self,
        token: RequestToken,
        outcome: Result<RecommendResponse>,
    ) -> Option<Notification> {
        if token.0 != self.latest {
            log::debug!("Discarding stale recommendation reply #{}", token.0);
            return None;
        }
        self.loading = false;

        match outcome {
            Ok(response) => {
                let found = response.recommendations.len();
                self.analysis = response.analysis;
                self.recommendations = response.recommendations;
                Some(Notification::success(
                    &self.messages.panel_ready,
                    self.messages.panel_found.replace("{}", &found.to_string()),
                ))
            }
            Err(e) => {
                log::error!("Error getting recommendations: {}", e);
                Some(Notification::destructive(
                    &self.messages.panel_failed,
                    e.to_string(),
                ))
            }
        }
    }

    /// Submit and wait for the reply in one step.
    pub async fn submit(&mut self, source: &dyn RecommendationSource) -> Option<Notification> {
        let (token, request) = match self.begin() {
            Ok(started) => started,
            Err(notification) => return Some(notification),
        };
        let outcome = source.recommend(&request).await;
        self.settle(token, outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::client::notification::Variant;
    use crate::error::AppError;
    use crate::models::{Language, Source};

    fn response(analysis: &str, count: usize) -> RecommendResponse {
        RecommendResponse {
            analysis: analysis.into(),
            recommendations: (0..count)
                .map(|i| JournalRecord::new(i.to_string(), "J", 2024, Source::Sinta, Language::Id))
                .collect(),
        }
    }

    struct FixedSource {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl RecommendationSource for FixedSource {
        async fn recommend(&self, request: &RecommendRequest) -> Result<RecommendResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(request.research_type, Some(ResearchType::Kuantitatif));
            if self.fail {
                Err(AppError::Remote {
                    status: 429,
                    message: "Terlalu banyak permintaan. Coba lagi dalam 1 menit.".into(),
                })
            } else {
                Ok(response("ok", 3))
            }
        }
    }

    fn panel(title: &str) -> RecommendationPanel {
        let mut panel = RecommendationPanel::new(Messages::default());
        panel.thesis_title = title.into();
        panel
    }

    #[tokio::test]
    async fn test_blank_title_never_sends() {
        let source = FixedSource {
            calls: AtomicUsize::new(0),
            fail: false,
        };
        let mut panel = panel("   ");
        let notification = panel.submit(&source).await.unwrap();

        assert_eq!(notification.title, "Judul diperlukan");
        assert_eq!(notification.variant, Variant::Destructive);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
        assert!(!panel.is_loading());
    }

    #[tokio::test]
    async fn test_success_notification() {
        let source = FixedSource {
            calls: AtomicUsize::new(0),
            fail: false,
        };
        let mut panel = panel("Analisis UMKM");
        let notification = panel.submit(&source).await.unwrap();

        assert_eq!(notification.title, "Rekomendasi siap!");
        assert_eq!(notification.description, "Ditemukan 3 jurnal yang relevan");
        assert_eq!(panel.recommendations().len(), 3);
        assert_eq!(panel.analysis(), "ok");
    }

    #[tokio::test]
    async fn test_server_error_surfaces_message() {
        let source = FixedSource {
            calls: AtomicUsize::new(0),
            fail: true,
        };
        let mut panel = panel("Analisis UMKM");
        let notification = panel.submit(&source).await.unwrap();

        assert_eq!(notification.title, "Gagal mendapatkan rekomendasi");
        assert_eq!(
            notification.description,
            "Terlalu banyak permintaan. Coba lagi dalam 1 menit."
        );
        assert!(panel.recommendations().is_empty());
        assert!(!panel.is_loading());
    }

    #[test]
    fn test_transport_failure_uses_failure_notification() {
        let mut panel = panel("Analisis UMKM");
        let (token, _) = panel.begin().unwrap();
        let refused = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");

        let notification = panel.settle(token, Err(AppError::Io(refused))).unwrap();

        assert_eq!(notification.title, "Gagal mendapatkan rekomendasi");
        assert_eq!(notification.variant, Variant::Destructive);
        assert!(notification.description.contains("refused"));
        assert!(!panel.is_loading());
    }

    #[test]
    fn test_new_submission_clears_previous_result() {
        let mut panel = panel("A");
        let (first, _) = panel.begin().unwrap();
        panel.settle(first, Ok(response("old", 2)));
        assert_eq!(panel.recommendations().len(), 2);

        let _ = panel.begin().unwrap();
        assert!(panel.recommendations().is_empty());
        assert_eq!(panel.analysis(), "");
        assert!(panel.is_loading());
    }

    #[test]
    fn test_stale_reply_is_discarded() {
        let mut panel = panel("A");
        let (slow, _) = panel.begin().unwrap();
        let (fast, _) = panel.begin().unwrap();

        assert!(panel.settle(fast, Ok(response("second", 1))).is_some());
        assert!(panel.settle(slow, Ok(response("first", 4))).is_none());

        assert_eq!(panel.analysis(), "second");
        assert_eq!(panel.recommendations().len(), 1);
        assert!(!panel.is_loading());
    }

    #[test]
    fn test_stale_reply_before_newest_settles() {
        let mut panel = panel("A");
        let (slow, _) = panel.begin().unwrap();
        let (fast, _) = panel.begin().unwrap();

        assert!(panel.settle(slow, Err(AppError::validation("x"))).is_none());
        assert!(panel.is_loading());

        panel.settle(fast, Ok(response("second", 0)));
        assert_eq!(panel.analysis(), "second");
    }
}
