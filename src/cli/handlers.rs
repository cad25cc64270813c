// HTTP Handlers Module
// Implements the OpenAI- and Anthropic-compatible API endpoints.
//
// Every completion request runs the same pipeline: parse, delay gate,
// budget enforcement, then either the synchronous responder or the paced
// stream emitter. All validation failures return before a stream is
// opened.

use super::state::AppState;
use crate::{
    answer::resolve_answer,
    anthropic::{self, AnthropicAdapter, MessagesRequest, MessagesResponse},
    budget::check_budget,
    delay::{apply_delay, validate_delay},
    errors::ApiError,
    openai::{
        self, models, ChatCompletionRequest, ChatCompletionResponse, ImageData, ImagesRequest,
        ImagesResponse, ModelsResponse, OpenAiAdapter,
    },
    stream::StreamEmitter,
};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::{Stream, StreamExt};
use serde_json::Value;
use std::pin::Pin;
use std::sync::Arc;

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "mockai"
    }))
}

/// POST {openai-prefix}/chat/completions
pub async fn chat_completions(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Response {
    match chat_completions_inner(state, body).await {
        Ok(response) => response,
        Err(err) => openai_error_response(&err),
    }
}

async fn chat_completions_inner(
    state: Arc<AppState>,
    body: Value,
) -> Result<Response, ApiError> {
    let request: ChatCompletionRequest =
        serde_json::from_value(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    tracing::info!(
        model = %request.model,
        stream = request.stream,
        messages = request.messages.len(),
        "Chat completion request"
    );

    validate_delay(request.request_delay, state.config.limits.max_request_delay_ms)?;
    apply_delay(request.request_delay).await;

    let content = resolve_answer(request.answer.as_deref());
    let tokens = state.tokenizer.tokenize(&content)?;
    let usage = check_budget(
        state.tokenizer.as_ref(),
        &request.messages,
        tokens.len(),
        request.token_cap(),
        state.config.limits.default_token_budget,
    )?;

    if request.stream {
        let adapter = OpenAiAdapter::new(&request.model, usage);
        let emitter = StreamEmitter::new(adapter, tokens, state.config.cadence());
        Ok(sse_response(emitter.into_sse_stream()))
    } else {
        let response = ChatCompletionResponse::new(request.model, content, usage);
        Ok(Json(response).into_response())
    }
}

/// POST {anthropic-prefix}/messages
pub async fn messages(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    match messages_inner(state, headers, body).await {
        Ok(response) => response,
        Err(err) => anthropic_error_response(&err),
    }
}

async fn messages_inner(
    state: Arc<AppState>,
    headers: HeaderMap,
    body: Value,
) -> Result<Response, ApiError> {
    // Credentials are presence-checked only, never validated.
    if headers.get("x-api-key").is_none() {
        let body =
            anthropic::ErrorResponse::new("x-api-key header is required", "authentication_error");
        return Ok((StatusCode::UNAUTHORIZED, Json(body)).into_response());
    }
    if headers.get("anthropic-version").is_none() {
        return Err(ApiError::InvalidRequest(
            "anthropic-version header is required".to_string(),
        ));
    }

    let request: MessagesRequest =
        serde_json::from_value(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    tracing::info!(
        model = %request.model,
        stream = request.stream,
        messages = request.messages.len(),
        "Messages request"
    );

    validate_delay(request.request_delay, state.config.limits.max_request_delay_ms)?;
    apply_delay(request.request_delay).await;

    let content = resolve_answer(request.answer.as_deref());
    let tokens = state.tokenizer.tokenize(&content)?;
    let usage = check_budget(
        state.tokenizer.as_ref(),
        &request.messages,
        tokens.len(),
        Some(request.max_tokens),
        state.config.limits.default_token_budget,
    )?;

    if request.stream {
        let adapter = AnthropicAdapter::new(&request.model, usage);
        let emitter = StreamEmitter::new(adapter, tokens, state.config.cadence());
        Ok(sse_response(emitter.into_sse_stream()))
    } else {
        let response = MessagesResponse::new(request.model, content, usage);
        Ok(Json(response).into_response())
    }
}

/// GET {openai-prefix}/models
pub async fn list_models() -> impl IntoResponse {
    Json(ModelsResponse::new(models::catalog()))
}

/// GET {openai-prefix}/models/{model_id}
pub async fn get_model(Path(model_id): Path<String>) -> impl IntoResponse {
    Json(models::derive_model(&model_id))
}

/// POST {openai-prefix}/images/generations
pub async fn generate_images(Json(body): Json<Value>) -> Response {
    let request: ImagesRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(e) => return openai_error_response(&ApiError::InvalidRequest(e.to_string())),
    };

    let n = request.n.unwrap_or(1);
    let (width, height) = parse_size(request.size.as_deref().unwrap_or("1024x1024"));

    let data = (0..n)
        .map(|_| ImageData {
            url: format!(
                "https://images.unsplash.com/photo-1721332155637-8b339526cf4c?h={}&w={}&auto=format",
                height, width
            ),
        })
        .collect();

    Json(ImagesResponse {
        created: chrono::Utc::now().timestamp(),
        data,
    })
    .into_response()
}

/// Parse a "WIDTHxHEIGHT" size string, falling back to 1024 per axis
fn parse_size(size: &str) -> (u32, u32) {
    let mut parts = size.splitn(2, 'x');
    let width = parts.next().and_then(|p| p.parse().ok()).unwrap_or(1024);
    let height = parts.next().and_then(|p| p.parse().ok()).unwrap_or(1024);
    (width, height)
}

/// Wrap a frame stream as a Server-Sent Events response
fn sse_response(stream: Pin<Box<dyn Stream<Item = String> + Send>>) -> Response {
    let body = Body::from_stream(stream.map(Ok::<_, std::io::Error>));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(body)
        .unwrap()
}

fn status_of(err: &ApiError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn log_server_error(err: &ApiError) {
    match err {
        ApiError::TokenizerInit(detail) => {
            tracing::error!(%detail, "Tokenizer initialization failed")
        }
        ApiError::Internal(detail) => tracing::error!(%detail, "Internal error"),
        _ => {}
    }
}

/// Render an error in the OpenAI error envelope
fn openai_error_response(err: &ApiError) -> Response {
    log_server_error(err);
    let body = openai::ErrorResponse::new(err.to_string(), err.error_type());
    (status_of(err), Json(body)).into_response()
}

/// Render an error in the Anthropic error envelope
fn anthropic_error_response(err: &ApiError) -> Response {
    log_server_error(err);
    let body = anthropic::ErrorResponse::new(err.to_string(), err.error_type());
    (status_of(err), Json(body)).into_response()
}
