use std::thread;
use std::time::Duration;

use concept_graph::AiGraph;
use crossbeam_channel::{Receiver, Sender, unbounded};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

pub const NOTIFICATION_TITLE: &str = "AI Concept Map";
pub const GENERIC_FAILURE: &str = "Failed to generate concept map.";

#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    #[error("Add some text to your document first, then try again.")]
    EmptyDocument,
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("{0}")]
    Network(#[from] reqwest::Error),
    #[error("{}", GENERIC_FAILURE)]
    Decode(#[from] serde_json::Error),
}

/// Message shown for a non-success response: the body's `detail` when
/// present (rendered as JSON unless it is a string), otherwise the
/// status code.
pub fn error_message(status: u16, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned());
    match detail {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => format!("Request failed ({status})"),
        Some(other) => other.to_string(),
    }
}

/// Endpoint and timeout for the concept-map service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

/// One finished request.
#[derive(Debug)]
pub struct ImportReply {
    pub generation: u64,
    /// Storage key of the map the request was made for.
    pub key: String,
    /// Document text the request was made with; anchors resolve
    /// against it.
    pub text: String,
    pub result: Result<AiGraph, ImportError>,
}

/// Runs concept-map requests on worker threads and hands results back
/// through a channel polled from the UI loop.
///
/// Every request gets a generation number; only the reply for the
/// latest one is surfaced.
pub struct AiClient {
    config: ClientConfig,
    tx: Sender<ImportReply>,
    rx: Receiver<ImportReply>,
    generation: u64,
    pending: Option<u64>,
}

impl AiClient {
    pub fn new(config: ClientConfig) -> Self {
        let (tx, rx) = unbounded();
        Self {
            config,
            tx,
            rx,
            generation: 0,
            pending: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a request for `text`. Blank documents are rejected before
    /// anything goes on the wire.
    pub fn request(
        &mut self,
        text: String,
        key: String,
    ) -> Result<u64, ImportError> {
        if text.trim().is_empty() {
            return Err(ImportError::EmptyDocument);
        }
        self.generation += 1;
        let generation = self.generation;
        self.pending = Some(generation);

        let config = self.config.clone();
        let tx = self.tx.clone();
        info!(generation, endpoint = %config.endpoint, "requesting AI concept map");
        thread::spawn(move || {
            let result = fetch_graph(&config, &text);
            // The receiver only goes away with the app.
            let _ = tx.send(ImportReply {
                generation,
                key,
                text,
                result,
            });
        });
        Ok(generation)
    }

    /// Latest finished reply, if any. Stale replies are dropped.
    pub fn poll(&mut self) -> Option<ImportReply> {
        let mut latest = None;
        for reply in self.rx.try_iter() {
            if Some(reply.generation) == self.pending {
                latest = Some(reply);
            } else {
                debug!(generation = reply.generation, "discarding stale AI reply");
            }
        }
        if latest.is_some() {
            self.pending = None;
        }
        latest
    }
}

/// Blocking POST of `{text}` to the service.
pub fn fetch_graph(
    config: &ClientConfig,
    text: &str,
) -> Result<AiGraph, ImportError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(config.timeout)
        .build()?;
    let response = client
        .post(&config.endpoint)
        .json(&json!({ "text": text }))
        .send()?;
    let status = response.status();
    let body = response.text()?;

    if !status.is_success() {
        let message = error_message(status.as_u16(), &body);
        warn!(status = status.as_u16(), %message, "AI concept map request failed");
        return Err(ImportError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let value: Value = serde_json::from_str(&body)?;
    Ok(AiGraph::from_json(&value))
}
