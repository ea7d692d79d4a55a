use crate::translation::response::code_value;
use crate::utils::{errors::TASK_FAILED_CODE, ApiError};
use futures_util::{Stream, StreamExt};
use serde_json::Value as JsonValue;
use std::fmt::Display;
use tracing::{debug, warn};

pub const DATA_PREFIX: &str = "data:";
pub const DONE_SENTINEL: &str = "[DONE]";

const FRAGMENT_POINTER: &str = "/choices/0/messages/0/content/text";

/// Receives the decoded output of one stream.
///
/// Exactly one of `on_complete` and `on_error` is called, last.
pub trait StreamObserver {
    fn on_fragment(&mut self, fragment: &str);
    fn on_complete(&mut self);
    fn on_error(&mut self, error: ApiError);
}

/// Observer that keeps everything it is told, for callers that only want the text.
#[derive(Debug, Default)]
pub struct CollectedStream {
    pub fragments: Vec<String>,
    pub completed: bool,
    pub error: Option<ApiError>,
}

impl CollectedStream {
    pub fn text(&self) -> String {
        self.fragments.concat()
    }
}

impl StreamObserver for CollectedStream {
    fn on_fragment(&mut self, fragment: &str) {
        self.fragments.push(fragment.to_string());
    }

    fn on_complete(&mut self) {
        self.completed = true;
    }

    fn on_error(&mut self, error: ApiError) {
        self.error = Some(error);
    }
}

/// Reassembles newline-terminated lines from arbitrarily split byte chunks.
///
/// Bytes are kept undecoded until a full line is present, so a multi-byte
/// character split across reads is never mangled.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk and returns every line it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[start..].iter().position(|b| *b == b'\n') {
            let end = start + offset;
            lines.push(decode_line(&self.pending[start..end]));
            start = end + 1;
        }
        self.pending.drain(..start);

        lines
    }

    pub fn has_remaining(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Takes the unterminated tail, if any.
    pub fn flush(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = decode_line(&self.pending);
        self.pending.clear();
        Some(line)
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// What a single line means to the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Not a data line: keep-alives, comments, blank separators.
    Ignored,
    Done,
    Fragment(String),
    /// Valid frame without text, e.g. metadata.
    Empty,
    Malformed,
    Error(ApiError),
}

pub fn interpret_line(line: &str) -> Frame {
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return Frame::Ignored;
    };
    let payload = payload.strip_prefix(' ').unwrap_or(payload).trim_end();

    if payload == DONE_SENTINEL {
        return Frame::Done;
    }

    let parsed: JsonValue = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(_) => return Frame::Malformed,
    };

    if let Some(error) = in_band_error(&parsed) {
        return Frame::Error(error);
    }

    match parsed.pointer(FRAGMENT_POINTER).and_then(JsonValue::as_str) {
        Some(text) if !text.is_empty() => Frame::Fragment(text.to_string()),
        _ => Frame::Empty,
    }
}

fn in_band_error(frame: &JsonValue) -> Option<ApiError> {
    let error = frame.get("error")?;
    match error {
        JsonValue::Null | JsonValue::Bool(false) => None,
        JsonValue::String(message) if message.is_empty() => None,
        JsonValue::Number(n) if n.as_f64() == Some(0.0) => None,
        JsonValue::String(message) => Some(ApiError::new(TASK_FAILED_CODE, message.clone())),
        other => {
            let code = other.get("code").and_then(code_value).unwrap_or(TASK_FAILED_CODE);
            let message = other
                .get("message")
                .and_then(JsonValue::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or("error during streaming");
            Some(ApiError::new(code, message))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    Completed,
    Failed,
}

/// Outcome of feeding one line to the observer.
enum Step {
    Continue,
    Stop(StreamOutcome),
}

fn dispatch<O: StreamObserver + ?Sized>(line: &str, observer: &mut O) -> Step {
    match interpret_line(line) {
        Frame::Fragment(text) => {
            observer.on_fragment(&text);
            Step::Continue
        }
        Frame::Done => {
            observer.on_complete();
            Step::Stop(StreamOutcome::Completed)
        }
        Frame::Error(error) => {
            warn!(code = error.code(), error = %error, "In-band stream error");
            observer.on_error(error);
            Step::Stop(StreamOutcome::Failed)
        }
        Frame::Malformed => {
            warn!(line = %line, "Skipping malformed stream frame");
            Step::Continue
        }
        Frame::Ignored | Frame::Empty => Step::Continue,
    }
}

/// Decodes a streamed response body, reporting fragments in arrival order.
///
/// Ends at the `[DONE]` sentinel without reading further. A body that ends
/// without the sentinel is reported as complete as well, so a truncated
/// response is indistinguishable from a finished one.
pub async fn consume<S, B, E, O>(stream: S, observer: &mut O) -> StreamOutcome
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
    O: StreamObserver + ?Sized,
{
    let mut stream = std::pin::pin!(stream);
    let mut buffer = LineBuffer::new();
    let mut chunks = 0usize;

    while let Some(chunk) = stream.next().await {
        let bytes = match chunk {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Stream read failed");
                observer.on_error(ApiError::network(format!("stream read failed: {}", e)));
                return StreamOutcome::Failed;
            }
        };
        chunks += 1;

        for line in buffer.push(bytes.as_ref()) {
            if let Step::Stop(outcome) = dispatch(&line, observer) {
                debug!(chunks, ?outcome, "Stream stopped on frame");
                return outcome;
            }
        }
    }

    if let Some(line) = buffer.flush() {
        if let Step::Stop(outcome) = dispatch(&line, observer) {
            return outcome;
        }
    }

    debug!(chunks, "Stream ended without sentinel");
    observer.on_complete();
    StreamOutcome::Completed
}
