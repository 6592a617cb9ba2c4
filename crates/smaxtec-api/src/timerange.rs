// Time-range splitting for chunked historical queries.

use std::iter::FusedIterator;

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::Error;

/// A half-open span of unix seconds together with the widest sub-range a
/// single request may cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: i64,
    end: i64,
    max_chunk: i64,
}

impl TimeRange {
    pub fn new(start: i64, end: i64, max_chunk: i64) -> Result<Self, Error> {
        if max_chunk <= 0 {
            return Err(Error::InvalidArgument(format!(
                "chunk size must be positive, got {max_chunk}"
            )));
        }
        Ok(Self {
            start,
            end,
            max_chunk,
        })
    }

    /// Build a range from two timestamps; sub-second precision is dropped.
    pub fn from_datetimes(
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        max_chunk: TimeDelta,
    ) -> Result<Self, Error> {
        Self::new(from.timestamp(), to.timestamp(), max_chunk.num_seconds())
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    /// Consecutive `(from, to)` pairs covering the range. Each call starts
    /// over from the beginning.
    pub fn chunks(&self) -> Chunks {
        Chunks {
            cursor: self.start,
            end: self.end,
            step: self.max_chunk,
        }
    }
}

impl IntoIterator for &TimeRange {
    type Item = (i64, i64);
    type IntoIter = Chunks;

    fn into_iter(self) -> Chunks {
        self.chunks()
    }
}

/// Iterator returned by [`TimeRange::chunks`].
#[derive(Debug, Clone)]
pub struct Chunks {
    cursor: i64,
    end: i64,
    step: i64,
}

impl Iterator for Chunks {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.end {
            return None;
        }
        let from = self.cursor;
        let to = from.saturating_add(self.step).min(self.end);
        self.cursor = to;
        Some((from, to))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.cursor >= self.end {
            return (0, Some(0));
        }
        let span = self.end.abs_diff(self.cursor);
        let n = usize::try_from(span.div_ceil(self.step.unsigned_abs())).unwrap_or(usize::MAX);
        (n, Some(n))
    }
}

impl FusedIterator for Chunks {}
