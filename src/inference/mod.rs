//! Inference gateway access.
//!
//! Both backend functions talk to one OpenAI-compatible chat completions
//! endpoint: the text model analyses thesis titles, the image model renders
//! the hero illustration.

mod gateway;
pub mod mock;
mod types;

use async_trait::async_trait;

use crate::error::Result;

pub use gateway::GatewayClient;
pub use mock::{MockGateway, MockReply};
pub use types::{
    ChatChoice, ChatCompletion, ChatMessage, ChatRequest, ImagePart, ImageUrl, ReplyMessage,
};

/// A chat completions backend.
#[async_trait]
pub trait InferenceGateway: Send + Sync {
    /// Send one completion request.
    ///
    /// A non-success reply surfaces as [`crate::AppError::Upstream`] carrying
    /// the gateway's status code.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion>;
}
