// Streaming Engine Module
// One timed emission loop shared by both provider framings: preamble
// frames up front, one token delta per cadence tick, terminal frames last.

use async_stream::stream;
use futures::Stream;
use serde::Serialize;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;

/// Terminal line of an OpenAI-style event stream
pub const SSE_DONE: &str = "data: [DONE]\n\n";

/// Frame a payload as a plain `data:` Server-Sent Event
pub fn sse_data<T: Serialize>(payload: &T) -> String {
    let json = serde_json::to_string(payload).unwrap_or_else(|_| "{}".to_string());
    format!("data: {}\n\n", json)
}

/// Frame a payload as a named `event:` Server-Sent Event
pub fn sse_event<T: Serialize>(name: &str, payload: &T) -> String {
    let json = serde_json::to_string(payload).unwrap_or_else(|_| "{}".to_string());
    format!("event: {}\ndata: {}\n\n", name, json)
}

/// Protocol framing consumed by [`StreamEmitter`].
///
/// Implemented once per provider; each method returns fully framed SSE
/// strings so the emitter never inspects payloads.
pub trait StreamAdapter: Send + 'static {
    /// Frames emitted synchronously before the first paced tick
    fn preamble(&self) -> Vec<String>;

    /// Frame carrying a single token of content
    fn delta(&self, token: &str) -> String;

    /// Frames carrying final usage/finish metadata, emitted exactly once
    fn terminal(&self) -> Vec<String>;
}

/// A paced stream of protocol events over a fixed token sequence.
///
/// The produced stream is lazy; dropping it (client disconnect, response
/// teardown) cancels the pending tick and nothing further is emitted. The
/// terminal frames are always the last items yielded, including for empty
/// token sequences.
pub struct StreamEmitter<A: StreamAdapter> {
    adapter: A,
    tokens: Vec<String>,
    cadence: Duration,
}

impl<A: StreamAdapter> StreamEmitter<A> {
    pub fn new(adapter: A, tokens: Vec<String>, cadence: Duration) -> Self {
        Self {
            adapter,
            tokens,
            cadence,
        }
    }

    /// Consume the emitter into a Server-Sent Events stream
    pub fn into_sse_stream(self) -> Pin<Box<dyn Stream<Item = String> + Send>> {
        let Self {
            adapter,
            tokens,
            cadence,
        } = self;

        Box::pin(stream! {
            for frame in adapter.preamble() {
                yield frame;
            }

            if tokens.is_empty() {
                // Still close the protocol: the preamble has already been
                // written and must be matched by the terminal frames.
                tracing::warn!("Tokenized content is empty, emitting terminal frames only");
            }

            for token in &tokens {
                if !cadence.is_zero() {
                    sleep(cadence).await;
                }
                yield adapter.delta(token);
            }

            for frame in adapter.terminal() {
                yield frame;
            }
        })
    }
}
