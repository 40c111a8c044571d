// src/lambda/mod.rs

//! AWS Lambda adapter for the functions.
//!
//! One deployment serves both functions behind a Lambda function URL:
//! 1. Reads the function name from the last segment of `rawPath`
//! 2. Decodes the body (plain or base64)
//! 3. Dispatches to [`Functions`] and maps the reply back

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use lambda_runtime::{Error as LambdaError, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::functions::{FunctionRequest, FunctionResponse, Functions};

/// Function URL (payload format 2.0) request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionUrlRequest {
    #[serde(default)]
    pub raw_path: String,

    #[serde(default)]
    pub headers: HashMap<String, String>,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub is_base64_encoded: bool,

    #[serde(default)]
    pub request_context: RequestContext,
}

#[derive(Debug, Default, Deserialize)]
pub struct RequestContext {
    #[serde(default)]
    pub http: HttpContext,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpContext {
    #[serde(default)]
    pub method: String,

    #[serde(default)]
    pub source_ip: Option<String>,
}

/// Function URL response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionUrlResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl From<FunctionResponse> for FunctionUrlResponse {
    fn from(reply: FunctionResponse) -> Self {
        Self {
            status_code: reply.status,
            headers: reply.headers.into_iter().collect(),
            body: reply.body,
            is_base64_encoded: false,
        }
    }
}

impl FunctionUrlRequest {
    /// Function name: last non-empty path segment.
    pub fn function_name(&self) -> &str {
        self.raw_path
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or_default()
    }

    fn into_function_request(self) -> FunctionRequest {
        let body = match (self.body, self.is_base64_encoded) {
            (None, _) => Vec::new(),
            (Some(body), false) => body.into_bytes(),
            (Some(body), true) => STANDARD.decode(body.as_bytes()).unwrap_or_else(|e| {
                warn!("Undecodable base64 body: {}", e);
                Vec::new()
            }),
        };

        let mut request = FunctionRequest::new(self.request_context.http.method).with_body(body);
        for (key, value) in self.headers {
            request.insert_header(&key, value);
        }
        request
    }
}

/// Main Lambda handler function.
#[instrument(skip(functions, event), fields(path = %event.payload.raw_path))]
pub async fn handler(
    functions: &Functions,
    event: LambdaEvent<FunctionUrlRequest>,
) -> std::result::Result<FunctionUrlResponse, LambdaError> {
    let (request, _context) = event.into_parts();
    let name = request.function_name().to_string();

    let reply = functions
        .dispatch(&name, &request.into_function_request())
        .await;
    info!("{} answered {}", name, reply.status);
    Ok(reply.into())
}
