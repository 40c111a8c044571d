//! Axum router serving both functions over HTTP.
//!
//! ```text
//! POST|OPTIONS /functions/recommend-journals
//! POST|OPTIONS /functions/generate-illustration
//! GET          /illustrations/*        (local storage backend only)
//! ```

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, Bytes},
    extract::{Path as UrlPath, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::functions::{FunctionRequest, FunctionResponse, Functions};

pub type SharedFunctions = Arc<Functions>;

/// Build the router. `illustrations_dir` is served under `/illustrations`.
pub fn build_router(functions: SharedFunctions, illustrations_dir: Option<&Path>) -> Router {
    let mut router = Router::new()
        .route("/functions/{name}", any(invoke))
        .with_state(functions);

    if let Some(dir) = illustrations_dir {
        router = router.nest_service("/illustrations", ServeDir::new(dir));
    }

    router.layer(TraceLayer::new_for_http())
}

async fn invoke(
    State(functions): State<SharedFunctions>,
    UrlPath(name): UrlPath<String>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut request = FunctionRequest::new(method.as_str()).with_body(body.to_vec());
    for (key, value) in &headers {
        if let Ok(value) = value.to_str() {
            request.insert_header(key.as_str(), value);
        }
    }

    into_response(functions.dispatch(&name, &request).await)
}

fn into_response(reply: FunctionResponse) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = Response::builder().status(status);
    for (key, value) in &reply.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder.body(Body::from(reply.body)).unwrap_or_else(|e| {
        tracing::error!("Failed to build response: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}
