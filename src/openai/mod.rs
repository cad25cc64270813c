//! OpenAI-compatible wire surface: request/response types, the streaming
//! chunk adapter, and the static model catalog.

mod adapter;
pub mod models;
mod types;

pub use adapter::OpenAiAdapter;
pub use types::{
    AssistantMessage, ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, Choice,
    ChunkChoice, ChunkDelta, ErrorDetail, ErrorResponse, ImageData, ImagesRequest, ImagesResponse,
    Message, Model, ModelsResponse, Role,
};
