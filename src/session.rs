//! In-memory history of one interactive session.
//!
//! History is presentation state: the pipeline never reads it, and it is
//! lost when the session ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pipeline::{Label, Prediction};

/// One analyzed review.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub review: String,
    pub label: Label,
    pub confidence: f32,
    pub submitted_at: DateTime<Utc>,
}

/// Append-only list of the reviews analyzed in a session, in submission order.
#[derive(Clone, Debug, Default)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a review and its prediction.
    pub fn record<S: Into<String>>(&mut self, review: S, prediction: &Prediction) -> &HistoryEntry {
        self.entries.push(HistoryEntry {
            review: review.into(),
            label: prediction.label,
            confidence: prediction.confidence,
            submitted_at: Utc::now(),
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Entries in submission order.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Entries with the most recent first.
    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
