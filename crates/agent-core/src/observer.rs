//! Observation side channel for node reasoning

use std::sync::Mutex;

/// Receives node output when a run asks to show reasoning
///
/// Fire-and-forget: a sink cannot fail and never feeds back into the run.
pub trait ObservationSink: Send + Sync {
    /// Observe `content` produced by the node labelled `label`
    fn observe(&self, label: &str, content: &str);
}

/// Prints reasoning blocks to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl ObservationSink for ConsoleSink {
    fn observe(&self, label: &str, content: &str) {
        println!("{}", render_reasoning(label, content));
    }
}

/// Keeps observations in memory, in arrival order
#[derive(Debug, Default)]
pub struct RecordingSink {
    seen: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Observations so far as `(label, content)` pairs
    pub fn observations(&self) -> Vec<(String, String)> {
        self.seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

impl ObservationSink for RecordingSink {
    fn observe(&self, label: &str, content: &str) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push((label.to_string(), content.to_string()));
        }
    }
}

/// Format a reasoning block: a centered banner, the body, and a rule
///
/// JSON bodies are pretty-printed; anything else is shown verbatim.
pub fn render_reasoning(label: &str, content: &str) -> String {
    let body = serde_json::from_str::<serde_json::Value>(content)
        .ok()
        .filter(|v| v.is_object() || v.is_array())
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| content.to_string());

    format!(
        "\n{bar} {label:^28} {bar}\n{body}\n{rule}",
        bar = "=".repeat(10),
        rule = "=".repeat(48)
    )
}
