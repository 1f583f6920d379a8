//! Lazy, size-bounded sequence of corpus records.
use std::collections::VecDeque;

use super::OutputUnit;

/// Single-pass sequence of [OutputUnit], built from appended segments.
///
/// Segments are kept as they were produced and are only flattened while iterating.
/// `size` is the number of units the stream will yield in total,
/// and is always equal to `yielded + remaining`.
#[derive(Debug, Default)]
pub struct CorpusStream {
    segments: VecDeque<std::vec::IntoIter<OutputUnit>>,
    size: usize,
    yielded: usize,
    limit: Option<usize>,
}

impl CorpusStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment at the end of the stream.
    ///
    /// Units beyond a previously set [CorpusStream::truncate] bound are dropped.
    pub fn append(&mut self, mut segment: Vec<OutputUnit>) {
        if let Some(limit) = self.limit {
            segment.truncate(limit.saturating_sub(self.size));
        }
        if segment.is_empty() {
            return;
        }
        self.size += segment.len();
        self.segments.push_back(segment.into_iter());
    }

    /// Bound the stream to at most `n` units in total, counting already yielded ones.
    pub fn truncate(&mut self, n: usize) {
        let limit = self.limit.map_or(n, |l| l.min(n));
        self.limit = Some(limit);

        if self.size > limit {
            let mut keep = limit.saturating_sub(self.yielded);
            let mut kept = VecDeque::new();
            for segment in self.segments.drain(..) {
                if keep == 0 {
                    break;
                }
                let len = segment.len();
                if len <= keep {
                    kept.push_back(segment);
                    keep -= len;
                } else {
                    let truncated: Vec<OutputUnit> = segment.take(keep).collect();
                    kept.push_back(truncated.into_iter());
                    keep = 0;
                }
            }
            self.segments = kept;
            self.size = limit.max(self.yielded);
        }
    }

    /// Total number of units of the stream.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of units still to be yielded.
    pub fn remaining(&self) -> usize {
        self.size - self.yielded
    }

    /// `true` if a bound is set and has been reached.
    pub fn is_full(&self) -> bool {
        self.limit.map_or(false, |limit| self.size >= limit)
    }
}

impl Iterator for CorpusStream {
    type Item = OutputUnit;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let segment = self.segments.front_mut()?;
            match segment.next() {
                Some(unit) => {
                    self.yielded += 1;
                    return Some(unit);
                }
                None => {
                    self.segments.pop_front();
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CorpusStream {}
