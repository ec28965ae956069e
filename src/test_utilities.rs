//! Test cases and test utility functions.
//!

use async_trait::async_trait;
use bytes::Bytes;
use rand::{thread_rng, Rng};
use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::{NamedTempFile, TempDir};

use crate::{
    error::TwoBitError,
    io::source::{ByteRange, MemorySource},
    ranges::ContigInterval,
    traits::{ByteSource, RemoteRequest, RemoteResponse},
    twobit::header::{ByteOrder, SIGNATURE},
    Position,
};

// random sequence defaults
pub const MIN_N_RUN: usize = 1;
pub const MAX_N_RUN: usize = 500;
/// Chance of starting a run of N at any one base.
pub const N_RUN_PROB: f64 = 0.001;

/// Build a random nucleotide sequence of `len` bases, with occasional runs of `N`.
pub fn random_sequence(len: usize) -> String {
    let mut rng = thread_rng();
    let mut seq = String::with_capacity(len);
    while seq.len() < len {
        if rng.gen_bool(N_RUN_PROB) {
            let run = rng.gen_range(MIN_N_RUN..=MAX_N_RUN).min(len - seq.len());
            seq.extend(std::iter::repeat('N').take(run));
        } else {
            seq.push(['A', 'C', 'G', 'T'][rng.gen_range(0..4)]);
        }
    }
    seq
}

/// Builds an in-memory 2bit file from named sequences.
///
/// Runs of `N`/`n` become N-blocks and runs of lowercase bases become mask blocks,
/// as UCSC's `faToTwoBit` does.
#[derive(Clone, Debug)]
pub struct TwoBitBuilder {
    sequences: Vec<(String, String)>,
    order: ByteOrder,
    version: u32,
}

impl Default for TwoBitBuilder {
    fn default() -> Self {
        Self {
            sequences: Vec::new(),
            order: ByteOrder::Little,
            version: 0,
        }
    }
}

fn runs<F: Fn(u8) -> bool>(seq: &[u8], pred: F) -> Vec<(Position, Position)> {
    let mut runs = Vec::new();
    let mut current: Option<(usize, usize)> = None;
    for (i, &base) in seq.iter().enumerate() {
        if pred(base) {
            if let Some((_, size)) = current.as_mut() {
                *size += 1;
            } else {
                current = Some((i, 1));
            }
        } else if let Some(run) = current.take() {
            runs.push(run);
        }
    }
    runs.extend(current);
    runs.into_iter()
        .map(|(start, size)| (start as Position, size as Position))
        .collect()
}

fn pack(seq: &[u8]) -> Vec<u8> {
    seq.chunks(4)
        .map(|chunk| {
            chunk.iter().enumerate().fold(0u8, |byte, (i, base)| {
                let code = match base.to_ascii_uppercase() {
                    b'C' => 1,
                    b'A' => 2,
                    b'G' => 3,
                    _ => 0,
                };
                byte | (code << (6 - 2 * i))
            })
        })
        .collect()
}

impl TwoBitBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sequence record.
    pub fn sequence(mut self, name: impl Into<String>, seq: impl Into<String>) -> Self {
        self.sequences.push((name.into(), seq.into()));
        self
    }

    /// Write the file in big-endian byte order.
    pub fn big_endian(mut self) -> Self {
        self.order = ByteOrder::Big;
        self
    }

    /// Write a version 1 file, with 64-bit index offsets.
    pub fn version_1(mut self) -> Self {
        self.version = 1;
        self
    }

    fn put_u32(&self, out: &mut Vec<u8>, value: u32) {
        match self.order {
            ByteOrder::Little => out.extend_from_slice(&value.to_le_bytes()),
            ByteOrder::Big => out.extend_from_slice(&value.to_be_bytes()),
        }
    }

    fn put_u64(&self, out: &mut Vec<u8>, value: u64) {
        match self.order {
            ByteOrder::Little => out.extend_from_slice(&value.to_le_bytes()),
            ByteOrder::Big => out.extend_from_slice(&value.to_be_bytes()),
        }
    }

    fn put_blocks(&self, out: &mut Vec<u8>, blocks: &[(Position, Position)]) {
        self.put_u32(out, blocks.len() as u32);
        for (start, _) in blocks {
            self.put_u32(out, *start);
        }
        for (_, size) in blocks {
            self.put_u32(out, *size);
        }
    }

    fn record(&self, seq: &str) -> Vec<u8> {
        let seq = seq.as_bytes();
        let mut out = Vec::new();
        self.put_u32(&mut out, seq.len() as u32);
        self.put_blocks(&mut out, &runs(seq, |b| b.eq_ignore_ascii_case(&b'N')));
        self.put_blocks(&mut out, &runs(seq, |b| b.is_ascii_lowercase()));
        self.put_u32(&mut out, 0);
        out.extend(pack(seq));
        out
    }

    /// Serialize the 2bit file.
    pub fn build(&self) -> Vec<u8> {
        let offset_size = if self.version == 1 { 8 } else { 4 };
        let index_size: usize = self
            .sequences
            .iter()
            .map(|(name, _)| 1 + name.len() + offset_size)
            .sum();

        let mut out = Vec::new();
        self.put_u32(&mut out, SIGNATURE);
        self.put_u32(&mut out, self.version);
        self.put_u32(&mut out, self.sequences.len() as u32);
        self.put_u32(&mut out, 0);

        let records: Vec<Vec<u8>> = self.sequences.iter().map(|(_, s)| self.record(s)).collect();
        let mut offset = (16 + index_size) as u64;
        for ((name, _), record) in self.sequences.iter().zip(&records) {
            out.push(name.len() as u8);
            out.extend_from_slice(name.as_bytes());
            if self.version == 1 {
                self.put_u64(&mut out, offset);
            } else {
                self.put_u32(&mut out, offset as u32);
            }
            offset += record.len() as u64;
        }
        for record in records {
            out.extend(record);
        }
        out
    }
}

/// Create a new empty temporary file.
pub fn temp_file() -> NamedTempFile {
    NamedTempFile::new().expect("could not create temporary file")
}

/// Create a new temporary directory.
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("could not create temporary directory")
}

/// Write a 2bit file built by `builder` to a temporary file.
pub fn temp_twobit_file(builder: &TwoBitBuilder) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".2bit")
        .tempfile()
        .expect("could not create temporary 2bit file");
    file.write_all(&builder.build())
        .expect("could not write temporary 2bit file");
    file.flush().expect("could not flush temporary 2bit file");
    file
}

/// A [`RemoteRequest`] test double that returns canned responses and records every
/// request it receives.
#[derive(Debug, Default)]
pub struct MockRemote {
    responses: HashMap<ContigInterval, String>,
    fail: bool,
    requests: Mutex<Vec<ContigInterval>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to exactly `range` with `response`. Other ranges get an empty response.
    pub fn with_response(mut self, range: ContigInterval, response: impl Into<String>) -> Self {
        self.responses.insert(range, response.into());
        self
    }

    /// Fail every request with a [`TwoBitError::Network`] error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn requests(&self) -> Vec<ContigInterval> {
        self.requests.lock().expect("poisoned mock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().expect("poisoned mock").len()
    }
}

#[async_trait]
impl RemoteRequest for MockRemote {
    async fn get(&self, range: &ContigInterval) -> Result<RemoteResponse, TwoBitError> {
        self.requests
            .lock()
            .expect("poisoned mock")
            .push(range.clone());
        if self.fail {
            return Err(TwoBitError::Network("mock remote failure".to_string()));
        }
        let response = self.responses.get(range).cloned().unwrap_or_default();
        Ok(RemoteResponse::new(response))
    }
}

/// An in-memory [`ByteSource`] that counts its reads.
#[derive(Debug)]
pub struct CountingSource {
    inner: MemorySource,
    reads: AtomicUsize,
}

impl CountingSource {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            inner: MemorySource::new(data),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ByteSource for CountingSource {
    async fn read_range(&self, range: ByteRange) -> Result<Bytes, TwoBitError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read_range(range).await
    }

    fn describe(&self) -> String {
        format!("<counting {}>", self.inner.describe())
    }
}
