//! Integration tests for the MockAI server
//!
//! These tests drive the axum handlers end-to-end (no live socket):
//! - non-streaming and streaming completion responses for both providers
//! - delay-gate and token-budget rejections
//! - usage parity between the streaming and non-streaming paths

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use mockai::cli::{handlers, AppState, Config};
use mockai::tokenizer::{BpeTokenizer, Tokenizer};
use mockai::DEFAULT_ANSWER;
use serde_json::{json, Value};
use std::sync::Arc;

fn test_state(tokenizer: &str) -> Arc<AppState> {
    let mut config = Config::default();
    // Zero cadence so streams complete immediately under test.
    config.stream.cadence_ms = 0;
    config.tokenizer.strategy = tokenizer.to_string();
    Arc::new(AppState::new(config))
}

fn anthropic_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-api-key", "test-key".parse().unwrap());
    headers.insert("anthropic-version", "2023-06-01".parse().unwrap());
    headers
}

async fn post_chat_completions(state: Arc<AppState>, body: Value) -> (StatusCode, String) {
    let response = handlers::chat_completions(State(state), Json(body)).await;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn post_messages(
    state: Arc<AppState>,
    headers: HeaderMap,
    body: Value,
) -> (StatusCode, String) {
    let response = handlers::messages(State(state), headers, Json(body)).await;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

mod openai_tests {
    use super::*;

    #[tokio::test]
    async fn test_non_streaming_returns_default_answer() {
        let body = json!({
            "stream": false,
            "model": "gpt-4",
            "messages": [{"role": "user", "content": "Hello!"}]
        });
        let (status, text) = post_chat_completions(test_state("bpe"), body).await;
        assert_eq!(status, StatusCode::OK);

        let response: Value = serde_json::from_str(&text).unwrap();
        let content = response["choices"][0]["message"]["content"].as_str().unwrap();
        assert!(content.starts_with("As an AI, I don't have personal beliefs or feelings."));
        assert_eq!(response["choices"][0]["finish_reason"], "stop");
        assert_eq!(response["choices"][0]["message"]["refusal"], "");
        assert_eq!(response["object"], "chat.completion");
        assert_eq!(response["model"], "gpt-4");

        let usage = &response["usage"];
        assert_eq!(
            usage["total_tokens"].as_u64().unwrap(),
            usage["prompt_tokens"].as_u64().unwrap() + usage["completion_tokens"].as_u64().unwrap()
        );
    }

    #[tokio::test]
    async fn test_streaming_ends_with_single_done_marker() {
        let body = json!({
            "stream": true,
            "model": "gpt-4",
            "messages": [{"role": "user", "content": "Hello!"}]
        });
        let (status, text) = post_chat_completions(test_state("bpe"), body).await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(text.matches("data: [DONE]").count(), 1);
        assert!(text.ends_with("data: [DONE]\n\n"));
        // At least the role preamble and one content delta precede it.
        assert!(text.matches("data: ").count() > 2);
        assert!(text.contains("\"object\":\"chat.completion.chunk\""));
    }

    #[tokio::test]
    async fn test_streaming_concatenates_to_full_answer() {
        let body = json!({
            "stream": true,
            "model": "gpt-4",
            "answer": "Hello streaming world."
        });
        let (_, text) = post_chat_completions(test_state("bpe"), body).await;

        let mut assembled = String::new();
        for frame in text.split("\n\n") {
            let Some(payload) = frame.strip_prefix("data: ") else {
                continue;
            };
            if payload == "[DONE]" {
                continue;
            }
            let chunk: Value = serde_json::from_str(payload).unwrap();
            if let Some(token) = chunk["choices"][0]["delta"]["content"].as_str() {
                assembled.push_str(token);
            }
        }
        assert_eq!(assembled, "Hello streaming world.");
    }

    #[tokio::test]
    async fn test_usage_parity_between_paths() {
        let request = json!({
            "model": "gpt-4",
            "messages": [{"role": "user", "content": "Hello!"}]
        });

        let mut non_streaming = request.clone();
        non_streaming["stream"] = json!(false);
        let (_, text) = post_chat_completions(test_state("bpe"), non_streaming).await;
        let response: Value = serde_json::from_str(&text).unwrap();
        let expected = response["usage"].clone();

        let mut streaming = request;
        streaming["stream"] = json!(true);
        let (_, text) = post_chat_completions(test_state("bpe"), streaming).await;
        let final_chunk = text
            .split("\n\n")
            .filter_map(|f| f.strip_prefix("data: "))
            .filter(|p| *p != "[DONE]")
            .map(|p| serde_json::from_str::<Value>(p).unwrap())
            .find(|c| c["choices"][0]["finish_reason"] == "stop")
            .expect("terminal chunk present");

        assert_eq!(final_chunk["usage"], expected);
    }

    #[tokio::test]
    async fn test_delay_over_maximum_is_rejected() {
        let state = test_state("bpe");
        let max = state.config.limits.max_request_delay_ms;
        let body = json!({
            "stream": true,
            "model": "gpt-4",
            "request_delay": max + 1
        });
        let (status, text) = post_chat_completions(state, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(text.contains("Request delay reached the maximum"));
        // No stream was opened.
        assert!(!text.contains("data: "));
    }

    #[tokio::test]
    async fn test_budget_exceeded_uses_exact_count() {
        let exact = BpeTokenizer::new().count(DEFAULT_ANSWER).unwrap() as u64;

        // One below the true count fails.
        let body = json!({
            "model": "gpt-4",
            "max_completion_tokens": exact - 1
        });
        let (status, text) = post_chat_completions(test_state("bpe"), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(text.contains("Max tokens exceeded"));

        // The boundary case succeeds.
        let body = json!({
            "model": "gpt-4",
            "max_completion_tokens": exact
        });
        let (status, text) = post_chat_completions(test_state("bpe"), body).await;
        assert_eq!(status, StatusCode::OK);
        let response: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(response["usage"]["completion_tokens"].as_u64().unwrap(), exact);
    }

    #[tokio::test]
    async fn test_unlisted_message_role_is_accepted() {
        let body = json!({
            "stream": false,
            "model": "gpt-4",
            "messages": [
                {"role": "developer", "content": "Be terse."},
                {"role": "user", "content": "Hello!"}
            ]
        });
        let (status, text) = post_chat_completions(test_state("regex"), body).await;
        assert_eq!(status, StatusCode::OK);
        let response: Value = serde_json::from_str(&text).unwrap();
        // Only the user message counts toward the prompt.
        assert_eq!(response["usage"]["prompt_tokens"].as_u64().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_missing_model_is_invalid_request() {
        let (status, text) = post_chat_completions(test_state("bpe"), json!({"stream": false})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(text.contains("invalid_request_error"));
    }

    #[tokio::test]
    async fn test_answer_override() {
        let body = json!({
            "model": "gpt-4",
            "answer": "Forty-two."
        });
        let (status, text) = post_chat_completions(test_state("regex"), body).await;
        assert_eq!(status, StatusCode::OK);
        let response: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(response["choices"][0]["message"]["content"], "Forty-two.");
    }
}

mod anthropic_tests {
    use super::*;

    #[tokio::test]
    async fn test_streaming_event_order() {
        let body = json!({
            "stream": true,
            "model": "claude-3-5-sonnet-20241022",
            "max_tokens": 1024,
            "messages": [{"role": "user", "content": "Hello!"}]
        });
        let (status, text) =
            post_messages(test_state("bpe"), anthropic_headers(), body).await;
        assert_eq!(status, StatusCode::OK);

        let positions: Vec<usize> = [
            "event: message_start\n",
            "event: content_block_start\n",
            "event: content_block_delta\n",
            "event: message_delta\n",
            "event: message_stop\n",
        ]
        .iter()
        .map(|marker| text.find(marker).expect(marker))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(text.matches("event: message_stop\n").count(), 1);
        assert!(text.contains("\"stop_reason\":\"end_turn\""));
        assert!(text.trim_end().ends_with("{\"type\":\"message_stop\"}"));
    }

    #[tokio::test]
    async fn test_non_streaming_message() {
        let body = json!({
            "stream": false,
            "model": "claude-3-5-sonnet-20241022",
            "max_tokens": 1024,
            "messages": [{"role": "user", "content": "Hello!"}]
        });
        let (status, text) =
            post_messages(test_state("bpe"), anthropic_headers(), body).await;
        assert_eq!(status, StatusCode::OK);

        let response: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(response["type"], "message");
        assert_eq!(response["role"], "assistant");
        assert_eq!(response["stop_reason"], "end_turn");
        assert!(response["id"].as_str().unwrap().starts_with("msg_"));
        let content = response["content"][0]["text"].as_str().unwrap();
        assert!(content.starts_with("As an AI, I don't have personal beliefs or feelings."));
        assert!(response["usage"]["input_tokens"].as_u64().unwrap() > 0);
        assert!(response["usage"]["output_tokens"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_usage_matches_streamed_output_tokens() {
        let request = json!({
            "model": "claude-3-5-sonnet-20241022",
            "max_tokens": 1024,
            "answer": "Hello world.",
            "messages": [{"role": "user", "content": "Hi"}]
        });

        let mut non_streaming = request.clone();
        non_streaming["stream"] = json!(false);
        let (_, text) =
            post_messages(test_state("regex"), anthropic_headers(), non_streaming).await;
        let response: Value = serde_json::from_str(&text).unwrap();
        let output_tokens = response["usage"]["output_tokens"].as_u64().unwrap();

        let mut streaming = request;
        streaming["stream"] = json!(true);
        let (_, text) = post_messages(test_state("regex"), anthropic_headers(), streaming).await;
        let deltas = text.matches("event: content_block_delta\n").count() as u64;
        assert_eq!(deltas, output_tokens);
        assert!(text.contains(&format!("\"usage\":{{\"output_tokens\":{}}}", output_tokens)));
    }

    #[tokio::test]
    async fn test_max_tokens_exceeded() {
        let body = json!({
            "model": "claude-3-5-sonnet-20241022",
            "max_tokens": 1,
            "messages": [{"role": "user", "content": "Hello!"}]
        });
        let (status, text) =
            post_messages(test_state("bpe"), anthropic_headers(), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(text.contains("Max tokens exceeded"));
        assert!(text.contains("\"type\":\"error\""));
    }

    #[tokio::test]
    async fn test_missing_max_tokens_is_invalid_request() {
        let body = json!({
            "model": "claude-3-5-sonnet-20241022",
            "messages": []
        });
        let (status, text) =
            post_messages(test_state("bpe"), anthropic_headers(), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(text.contains("invalid_request_error"));
    }

    #[tokio::test]
    async fn test_delay_over_maximum_is_rejected() {
        let state = test_state("bpe");
        let max = state.config.limits.max_request_delay_ms;
        let body = json!({
            "model": "claude-3-5-sonnet-20241022",
            "max_tokens": 1024,
            "request_delay": max + 1
        });
        let (status, text) = post_messages(state, anthropic_headers(), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(text.contains("Request delay reached the maximum"));
        assert!(!text.contains("event: "));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_unauthorized() {
        let mut headers = HeaderMap::new();
        headers.insert("anthropic-version", "2023-06-01".parse().unwrap());
        let body = json!({
            "model": "claude-3-5-sonnet-20241022",
            "max_tokens": 1024
        });
        let (status, text) = post_messages(test_state("bpe"), headers, body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(text.contains("authentication_error"));
    }

    #[tokio::test]
    async fn test_missing_version_header_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", "test-key".parse().unwrap());
        let body = json!({
            "model": "claude-3-5-sonnet-20241022",
            "max_tokens": 1024
        });
        let (status, text) = post_messages(test_state("bpe"), headers, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(text.contains("anthropic-version"));
    }
}

mod catalog_tests {
    use super::*;
    use axum::extract::Path;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn test_list_models() {
        let response = handlers::list_models().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["object"], "list");
        assert!(body["data"].as_array().unwrap().len() > 10);
    }

    #[tokio::test]
    async fn test_get_model_echoes_id() {
        let response = handlers::get_model(Path("gpt-4-turbo".to_string()))
            .await
            .into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["id"], "gpt-4-turbo");
        assert_eq!(body["object"], "model");
    }

    #[tokio::test]
    async fn test_generate_images_placeholder_urls() {
        let body = json!({"prompt": "a cat", "n": 2, "size": "512x256"});
        let response = handlers::generate_images(Json(body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        let url = data[0]["url"].as_str().unwrap();
        assert!(url.contains("h=256"));
        assert!(url.contains("w=512"));
    }
}
