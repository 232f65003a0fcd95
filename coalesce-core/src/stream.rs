use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{self, BoxStream, Stream, StreamExt};

use crate::Record;

/// Lazy, finite, single-pass sequence of records handed to a [`Strategy`](crate::Strategy).
///
/// A `RecordStream` is not `Clone`; strategies take it by value, so it is consumed
/// exactly once. Dropping it stops any remaining provider calls.
pub struct RecordStream {
    inner: BoxStream<'static, Record>,
}

impl RecordStream {
    /// Wrap any `Send` stream of records.
    pub fn new<S>(inner: S) -> Self
    where
        S: Stream<Item = Record> + Send + 'static,
    {
        Self {
            inner: inner.boxed(),
        }
    }

    /// A stream over records that are already in memory.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
        I::IntoIter: Send + 'static,
    {
        Self::new(stream::iter(records))
    }

    /// A stream that yields nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(stream::empty())
    }
}

impl Stream for RecordStream {
    type Item = Record;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Record>> {
        self.inner.poll_next_unpin(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl std::fmt::Debug for RecordStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStream")
            .field("size_hint", &self.inner.size_hint())
            .finish()
    }
}
