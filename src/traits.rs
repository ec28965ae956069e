//! Traits used by the twobit-seq library.
//!

use async_trait::async_trait;
use bytes::Bytes;

use crate::{error::TwoBitError, io::source::ByteRange, ranges::ContigInterval, Position};

/// The [`GenericInterval`] trait defines common functionality for zero-based,
/// *right-inclusive* intervals: query ranges and the N/mask blocks of a 2bit record.
pub trait GenericInterval {
    fn start(&self) -> Position;
    fn stop(&self) -> Position;

    /// Number of basepairs covered, counting both ends; zero for a reversed interval.
    fn width(&self) -> u64 {
        (self.stop() as u64 + 1).saturating_sub(self.start() as u64)
    }

    /// Return a tuple of the inclusive range shared with another interval; `None` if no overlap.
    fn overlap_range<R: GenericInterval>(&self, other: &R) -> Option<(Position, Position)> {
        let overlap_start = std::cmp::max(self.start(), other.start());
        let overlap_stop = std::cmp::min(self.stop(), other.stop());

        if overlap_start <= overlap_stop {
            Some((overlap_start, overlap_stop))
        } else {
            None
        }
    }

    /// Return a tuple version of this interval.
    fn as_tuple(&self) -> (Position, Position) {
        (self.start(), self.stop())
    }
}

/// The payload of a [`RemoteRequest`]: the decoded base pairs of the requested range.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RemoteResponse {
    pub response: String,
}

impl RemoteResponse {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

/// A collaborator bound to one resource that can fetch decoded base pairs for
/// an inclusive [`ContigInterval`].
///
/// How the interval becomes a byte read (HTTP range request, file offset, ...) and how
/// those bytes are decoded is entirely up to the implementation. An empty `response`
/// means no data covers the interval.
#[async_trait]
pub trait RemoteRequest: Send + Sync {
    async fn get(&self, range: &ContigInterval) -> Result<RemoteResponse, TwoBitError>;
}

/// Random access to the bytes of some resource.
///
/// Implementations return at most `range.len()` bytes; fewer bytes are only returned
/// when the range runs past the end of the resource.
#[async_trait]
pub trait ByteSource: Send + Sync {
    async fn read_range(&self, range: ByteRange) -> Result<Bytes, TwoBitError>;

    /// A short description of the resource, for log messages.
    fn describe(&self) -> String;
}
