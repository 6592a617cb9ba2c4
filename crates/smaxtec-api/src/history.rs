// Bounded request history
//
// Every request that reaches the transport leaves a record here, successful
// or not. The ring keeps the newest `HISTORY_CAPACITY` entries; a separate
// counter tracks the total since the client was created.

use std::collections::VecDeque;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::trace;

/// Number of records retained.
pub const HISTORY_CAPACITY: usize = 100;

/// One dispatched request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    pub url: String,
    /// `None` when the transport failed before a response arrived.
    pub status: Option<u16>,
    pub start: DateTime<Utc>,
    /// `None` while the request is in flight.
    pub end: Option<DateTime<Utc>>,
}

impl RequestRecord {
    pub fn start(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: None,
            start: Utc::now(),
            end: None,
        }
    }

    #[must_use]
    pub fn finish(mut self, status: u16) -> Self {
        self.status = Some(status);
        self.end = Some(Utc::now());
        self
    }

    /// Close a record whose request never produced a response.
    #[must_use]
    pub fn fail(mut self) -> Self {
        self.end = Some(Utc::now());
        self
    }

    pub fn is_in_flight(&self) -> bool {
        self.end.is_none()
    }

    pub fn elapsed(&self) -> Option<TimeDelta> {
        self.end.map(|end| end - self.start)
    }
}

#[derive(Debug, Default)]
pub struct RequestHistory {
    records: VecDeque<RequestRecord>,
    total: u64,
}

impl RequestHistory {
    pub fn new() -> Self {
        Self {
            records: VecDeque::with_capacity(HISTORY_CAPACITY),
            total: 0,
        }
    }

    pub fn push(&mut self, record: RequestRecord) {
        if self.records.len() == HISTORY_CAPACITY {
            if let Some(evicted) = self.records.pop_front() {
                trace!(url = %evicted.url, "evicting oldest request record");
            }
        }
        self.records.push_back(record);
        self.total += 1;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Oldest first.
    pub fn records(&self) -> impl Iterator<Item = &RequestRecord> {
        self.records.iter()
    }

    pub fn total_requests(&self) -> u64 {
        self.total
    }

    /// Human-readable summary: a count line, then one line per retained
    /// record with its duration.
    pub fn stats(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.records.len() + 1);
        lines.push(format!("{} Requests", self.total));
        for record in &self.records {
            match record.elapsed() {
                Some(elapsed) => {
                    let secs = elapsed.to_std().unwrap_or_default().as_secs_f64();
                    lines.push(format!("{} in {secs:.3} seconds", record.url));
                }
                None => lines.push(format!("{} in flight", record.url)),
            }
        }
        lines
    }
}
