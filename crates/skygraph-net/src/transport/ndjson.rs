//! Newline-delimited JSON decoding.
//!
//! [`LineDecoder`] does the framing: it accumulates bytes and hands back every
//! complete `\n`-terminated line, keeping the unterminated remainder for the
//! next chunk. Framing works on raw bytes, so a chunk boundary that falls
//! inside a multi-byte UTF-8 sequence is harmless.
//!
//! [`NdjsonStream`] pulls chunks from a [`ResponseBody`] and decodes one line
//! per call to [`NdjsonStream::next`]. Nothing is read from the network until a
//! record is requested and no complete line is buffered.

use std::collections::VecDeque;
use std::marker::PhantomData;

use bytes::{Bytes, BytesMut};
use futures_util::stream::{self, Stream};
use serde::de::DeserializeOwned;
use skygraph_core::logging::targets;

use crate::error::{NetworkError, Result};
use crate::http::ResponseBody;

/// Splits a byte stream into `\n`-terminated lines.
///
/// Between calls the internal buffer never contains a newline.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: BytesMut,
}

impl LineDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `chunk` and return every line it completed, without terminators.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Bytes> {
        let mut start = self.buffer.len();
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(offset) = self.buffer[start..].iter().position(|&b| b == b'\n') {
            let newline = start + offset;
            let mut line = self.buffer.split_to(newline + 1);
            line.truncate(newline);
            lines.push(line.freeze());
            start = 0;
        }
        lines
    }

    /// Bytes of the unterminated line buffered so far.
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Take the unterminated remainder, if any.
    pub fn finish(&mut self) -> Option<Bytes> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(self.buffer.split().freeze())
        }
    }
}

/// A lazily decoded sequence of NDJSON records.
///
/// Records come out strictly in the order they appear in the body. The first
/// error (transport, abort or decode) ends the sequence. A trailing line with
/// no `\n` terminator is dropped at end of body.
///
/// The stream is single-use; iterating again requires a new request.
pub struct NdjsonStream<T> {
    body: ResponseBody,
    decoder: LineDecoder,
    ready: VecDeque<Bytes>,
    finished: bool,
    records: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> NdjsonStream<T> {
    /// Decode records from `body`.
    pub fn new(body: ResponseBody) -> Self {
        Self {
            body,
            decoder: LineDecoder::new(),
            ready: VecDeque::new(),
            finished: false,
            records: 0,
            _marker: PhantomData,
        }
    }

    /// Number of records decoded so far.
    pub fn records_yielded(&self) -> u64 {
        self.records
    }

    /// Decode the next record.
    ///
    /// Returns `None` once the body is exhausted or after an error was returned.
    pub async fn next(&mut self) -> Option<Result<T>> {
        loop {
            if let Some(line) = self.ready.pop_front() {
                return Some(self.decode(&line));
            }
            if self.finished {
                return None;
            }

            match self.body.next_chunk().await {
                Ok(Some(chunk)) => {
                    let lines = self.decoder.feed(&chunk);
                    self.ready.extend(lines);
                }
                Ok(None) => self.end_of_body(),
                Err(err) => {
                    self.fail();
                    return Some(Err(err));
                }
            }
        }
    }

    /// Drain the stream into a vector, stopping at the first error.
    pub async fn collect_all(mut self) -> Result<Vec<T>> {
        let mut records = Vec::new();
        while let Some(record) = self.next().await {
            records.push(record?);
        }
        Ok(records)
    }

    /// Adapt into a [`Stream`] for use with `futures` combinators.
    pub fn into_stream(self) -> impl Stream<Item = Result<T>> {
        stream::unfold(self, |mut records| async move {
            let item = records.next().await?;
            Some((item, records))
        })
    }

    fn decode(&mut self, line: &[u8]) -> Result<T> {
        match serde_json::from_slice(line) {
            Ok(record) => {
                self.records += 1;
                Ok(record)
            }
            Err(err) => {
                tracing::debug!(
                    target: targets::TRANSPORT,
                    record = self.records,
                    error = %err,
                    "malformed NDJSON record"
                );
                self.fail();
                Err(NetworkError::Decode(err.to_string()))
            }
        }
    }

    fn end_of_body(&mut self) {
        self.finished = true;
        let dropped = self.decoder.finish().map_or(0, |rest| rest.len());
        if dropped > 0 {
            tracing::debug!(
                target: targets::TRANSPORT,
                bytes = dropped,
                "dropping unterminated trailing record"
            );
        }
        tracing::debug!(
            target: targets::TRANSPORT,
            records = self.records,
            bytes = self.body.bytes_received(),
            "stream ended"
        );
    }

    fn fail(&mut self) {
        self.finished = true;
        self.ready.clear();
    }
}

impl<T> std::fmt::Debug for NdjsonStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NdjsonStream")
            .field("records", &self.records)
            .field("buffered_lines", &self.ready.len())
            .field("finished", &self.finished)
            .finish()
    }
}
