//! Scripted gateway for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{
    ChatChoice, ChatCompletion, ChatRequest, ImagePart, ImageUrl, InferenceGateway, ReplyMessage,
};
use crate::error::{AppError, Result};

/// One scripted gateway answer.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Successful reply with text content
    Text(String),
    /// Successful reply carrying one image URL
    Image(String),
    /// Successful reply with no choices
    Empty,
    /// Non-success HTTP status
    Status(u16),
}

impl MockReply {
    fn into_result(self) -> Result<ChatCompletion> {
        let message = match self {
            MockReply::Text(text) => ReplyMessage {
                content: Some(text),
                images: Vec::new(),
            },
            MockReply::Image(url) => ReplyMessage {
                content: Some(String::new()),
                images: vec![ImagePart {
                    image_url: ImageUrl { url },
                }],
            },
            MockReply::Empty => return Ok(ChatCompletion::default()),
            MockReply::Status(status) => {
                return Err(AppError::upstream(status, format!("mock status {status}")));
            }
        };
        Ok(ChatCompletion {
            choices: vec![ChatChoice { message }],
        })
    }
}

/// Gateway that answers from a queue and records every request.
///
/// When the queue is drained the fallback reply is used.
pub struct MockGateway {
    replies: Mutex<VecDeque<MockReply>>,
    fallback: MockReply,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockGateway {
    pub fn new(fallback: MockReply) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(MockReply::Text(text.into()))
    }

    pub fn status(status: u16) -> Self {
        Self::new(MockReply::Status(status))
    }

    /// Queue a reply ahead of the fallback.
    pub fn then(self, reply: MockReply) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl InferenceGateway for MockGateway {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        reply.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queue_then_fallback() {
        let gateway = MockGateway::status(500).then(MockReply::Text("first".into()));
        let request = ChatRequest::new("m").user("x");

        let first = gateway.complete(&request).await.unwrap();
        assert_eq!(first.first_text(), Some("first"));

        let second = gateway.complete(&request).await.unwrap_err();
        assert_eq!(second.upstream_status(), Some(500));
        assert_eq!(gateway.call_count(), 2);
    }
}
