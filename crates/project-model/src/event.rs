//! Interaction and layout records for the heatmap input stream.
//!
//! Records are exchanged as JSONL, one object per line. Lines starting
//! with `#` are comments and are skipped by the parser.

use serde::{Deserialize, Serialize};

/// Milliseconds on the session timeline.
pub type TimestampMs = u64;

/// A single pointer interaction in document space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionEvent {
    /// X in document pixels.
    pub document_x: f64,
    /// Y in document pixels (includes the scroll offset).
    pub document_y: f64,
    /// Milliseconds on the session timeline.
    pub timestamp_ms: TimestampMs,
}

impl InteractionEvent {
    pub fn new(document_x: f64, document_y: f64, timestamp_ms: TimestampMs) -> Self {
        Self {
            document_x,
            document_y,
            timestamp_ms,
        }
    }

    /// Build an event from viewport-relative coordinates and the current scroll offset.
    pub fn from_viewport(
        client_x: f64,
        client_y: f64,
        scroll_x: f64,
        scroll_y: f64,
        timestamp_ms: TimestampMs,
    ) -> Self {
        Self::new(client_x + scroll_x, client_y + scroll_y, timestamp_ms)
    }
}

/// Viewport and document dimensions reported by the layout observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutUpdate {
    /// Visible viewport width in pixels.
    pub viewport_width: f64,
    /// Full scrollable document height in pixels.
    pub document_height: f64,
}

impl LayoutUpdate {
    pub fn new(viewport_width: f64, document_height: f64) -> Self {
        Self {
            viewport_width,
            document_height,
        }
    }
}

/// A single recorded stream line with timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamRecord {
    /// Milliseconds on the session timeline.
    #[serde(rename = "timestampMs")]
    pub timestamp_ms: TimestampMs,

    /// The record payload.
    #[serde(flatten)]
    pub kind: RecordKind,
}

/// Discriminated union of record types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordKind {
    /// Pointer move or click in document space.
    Interaction {
        #[serde(rename = "documentX")]
        document_x: f64,
        #[serde(rename = "documentY")]
        document_y: f64,
    },

    /// Viewport resize or document reflow.
    Layout {
        #[serde(rename = "viewportWidth")]
        viewport_width: f64,
        #[serde(rename = "documentHeight")]
        document_height: f64,
    },
}

impl StreamRecord {
    /// Create an interaction record.
    pub fn interaction(timestamp_ms: TimestampMs, document_x: f64, document_y: f64) -> Self {
        Self {
            timestamp_ms,
            kind: RecordKind::Interaction {
                document_x,
                document_y,
            },
        }
    }

    /// Create a layout record.
    pub fn layout(timestamp_ms: TimestampMs, viewport_width: f64, document_height: f64) -> Self {
        Self {
            timestamp_ms,
            kind: RecordKind::Layout {
                viewport_width,
                document_height,
            },
        }
    }

    /// Extract the interaction if this record carries one.
    pub fn as_interaction(&self) -> Option<InteractionEvent> {
        match self.kind {
            RecordKind::Interaction {
                document_x,
                document_y,
            } => Some(InteractionEvent::new(
                document_x,
                document_y,
                self.timestamp_ms,
            )),
            RecordKind::Layout { .. } => None,
        }
    }

    /// Extract the layout update if this record carries one.
    pub fn as_layout(&self) -> Option<LayoutUpdate> {
        match self.kind {
            RecordKind::Layout {
                viewport_width,
                document_height,
            } => Some(LayoutUpdate::new(viewport_width, document_height)),
            RecordKind::Interaction { .. } => None,
        }
    }
}

impl From<InteractionEvent> for StreamRecord {
    fn from(event: InteractionEvent) -> Self {
        Self::interaction(event.timestamp_ms, event.document_x, event.document_y)
    }
}

/// Parse a single JSONL line. Returns `Ok(None)` for blank and comment lines.
pub fn parse_record_line(line: &str) -> Result<Option<StreamRecord>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

/// Parse records from JSONL content (one JSON object per line).
pub fn parse_records(jsonl: &str) -> Result<Vec<StreamRecord>, serde_json::Error> {
    jsonl
        .lines()
        .filter_map(|line| parse_record_line(line).transpose())
        .collect()
}

/// Serialize records to JSONL format.
pub fn serialize_records(records: &[StreamRecord]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for record in records {
        output.push_str(&serde_json::to_string(record)?);
        output.push('\n');
    }
    Ok(output)
}
