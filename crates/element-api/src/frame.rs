// Tabular projection of readings.
//
// A one-way, lossy convenience view: each reading becomes one flat row of
// its `data` map, indexed by `measured_at`. Rows keep the insertion order of
// the input sequence; nothing is re-sorted.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::models::Reading;

/// A time-indexed flat table of reading payloads.
///
/// Built by [`readings_frame`](crate::ElementClient::readings_frame). The
/// index holds one `measured_at` timestamp per row; each row is the
/// reading's decoded `data` map. Not every row necessarily has every
/// column -- [`column`](Self::column) yields `None` for gaps.
#[derive(Debug, Clone, Default)]
pub struct ReadingFrame {
    index: Vec<DateTime<Utc>>,
    rows: Vec<Map<String, Value>>,
}

impl ReadingFrame {
    pub(crate) fn from_readings(readings: &[Reading]) -> Self {
        let index = readings.iter().map(|r| r.measured_at).collect();
        let rows = readings.iter().map(|r| r.data.clone()).collect();
        Self { index, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The `measured_at` index, one entry per row, in insertion order.
    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    /// The rows, aligned with [`index`](Self::index).
    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    /// Column names in first-seen order across all rows.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for row in &self.rows {
            for key in row.keys() {
                if !columns.contains(&key.as_str()) {
                    columns.push(key);
                }
            }
        }
        columns
    }

    /// Extract one column, `None` where a row lacks the field.
    pub fn column(&self, name: &str) -> Vec<Option<&Value>> {
        self.rows.iter().map(|row| row.get(name)).collect()
    }
}
