//! Parsers for the 2bit file header, contig index, and per-sequence record headers.
//!
//! Every parser works on a byte buffer that may be a prefix of the structure it parses.
//! When the buffer ends early the parser fails with [`TwoBitError::Incomplete`], carrying
//! the buffer length needed to make progress, so the caller can read a larger window
//! and try again.

use indexmap::IndexMap;

use crate::{error::TwoBitError, traits::GenericInterval, Position};

/// The 2bit signature, as read in the file's own byte order.
pub const SIGNATURE: u32 = 0x1A41_2743;

/// Size of the fixed file header: signature, version, sequence count, reserved.
pub const FILE_HEADER_LEN: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Detect the byte order from the first four bytes of a file.
    pub fn detect(signature: [u8; 4]) -> Result<Self, TwoBitError> {
        let raw = u32::from_le_bytes(signature);
        if raw == SIGNATURE {
            Ok(ByteOrder::Little)
        } else if raw == SIGNATURE.swap_bytes() {
            Ok(ByteOrder::Big)
        } else {
            Err(TwoBitError::InvalidSignature(raw))
        }
    }
}

/// A cursor over a possibly-incomplete buffer, decoding integers in a fixed byte order.
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8], order: ByteOrder) -> Self {
        Self { buf, pos: 0, order }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], TwoBitError> {
        let end = self.pos.checked_add(n).unwrap_or(usize::MAX);
        if end > self.buf.len() {
            return Err(TwoBitError::Incomplete(end));
        }
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], TwoBitError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn u8(&mut self) -> Result<u8, TwoBitError> {
        Ok(self.take(1)?[0])
    }

    pub fn u32(&mut self) -> Result<u32, TwoBitError> {
        let bytes = self.array::<4>()?;
        Ok(match self.order {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        })
    }

    pub fn u64(&mut self) -> Result<u64, TwoBitError> {
        let bytes = self.array::<8>()?;
        Ok(match self.order {
            ByteOrder::Little => u64::from_le_bytes(bytes),
            ByteOrder::Big => u64::from_be_bytes(bytes),
        })
    }

    /// Read `count` consecutive `u32` values.
    pub fn u32_vec(&mut self, count: usize) -> Result<Vec<u32>, TwoBitError> {
        // check the whole run is present before allocating for it
        let needed = count.checked_mul(4).unwrap_or(usize::MAX);
        let end = self.pos.checked_add(needed).unwrap_or(usize::MAX);
        if end > self.buf.len() {
            return Err(TwoBitError::Incomplete(end));
        }
        (0..count).map(|_| self.u32()).collect()
    }

    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8], TwoBitError> {
        self.take(n)
    }
}

/// The file header and contig index.
#[derive(Clone, Debug, PartialEq)]
pub struct FileHeader {
    pub order: ByteOrder,
    pub version: u32,
    /// Contig names mapped to the absolute offset of their sequence record, in file order.
    pub index: IndexMap<String, u64>,
}

/// Parse the file header and the contig index that follows it.
pub fn parse_file_header(buf: &[u8]) -> Result<FileHeader, TwoBitError> {
    if buf.len() < 4 {
        return Err(TwoBitError::Incomplete(FILE_HEADER_LEN));
    }
    let order = ByteOrder::detect([buf[0], buf[1], buf[2], buf[3]])?;
    let mut reader = ByteReader::new(buf, order);
    let _signature = reader.u32()?;
    let version = reader.u32()?;
    if version > 1 {
        return Err(TwoBitError::UnsupportedVersion(version));
    }
    let sequence_count = reader.u32()?;
    let _reserved = reader.u32()?;

    let mut index = IndexMap::new();
    for _ in 0..sequence_count {
        let name_size = reader.u8()? as usize;
        let name = String::from_utf8(reader.bytes(name_size)?.to_vec())?;
        let offset = if version == 1 {
            reader.u64()?
        } else {
            reader.u32()? as u64
        };
        index.entry(name).or_insert(offset);
    }

    Ok(FileHeader {
        order,
        version,
        index,
    })
}

/// A run of basepairs within a sequence record: either unknown (`N`) bases or
/// soft-masked (lowercase) bases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    pub start: Position,
    pub size: Position,
}

impl Block {
    pub fn new(start: Position, size: Position) -> Self {
        Self { start, size }
    }
}

/// Blocks are never empty; [`parse_sequence_header`] drops zero-sized ones.
impl GenericInterval for Block {
    fn start(&self) -> Position {
        self.start
    }
    fn stop(&self) -> Position {
        self.start.saturating_add(self.size - 1)
    }
}

/// The header of one sequence record: its size, N-blocks, mask blocks, and where its
/// packed DNA begins.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceHeader {
    pub dna_size: Position,
    pub n_blocks: Vec<Block>,
    pub mask_blocks: Vec<Block>,
    /// Absolute file offset of the first packed DNA byte.
    pub dna_offset: u64,
}

/// Sort blocks by start, dropping empty ones and merging any that overlap, so
/// both their starts and their stops are increasing.
fn normalize_blocks(mut blocks: Vec<Block>) -> Vec<Block> {
    blocks.retain(|b| b.size > 0);
    blocks.sort_by_key(|b| b.start);
    let mut merged: Vec<Block> = Vec::with_capacity(blocks.len());
    for block in blocks {
        match merged.last_mut() {
            Some(last) if block.start <= last.stop() => {
                let stop = last.stop().max(block.stop());
                last.size = (stop - last.start).saturating_add(1);
            }
            _ => merged.push(block),
        }
    }
    merged
}

fn read_blocks(reader: &mut ByteReader) -> Result<Vec<Block>, TwoBitError> {
    let count = reader.u32()? as usize;
    let starts = reader.u32_vec(count)?;
    let sizes = reader.u32_vec(count)?;
    let blocks = starts
        .into_iter()
        .zip(sizes)
        .map(|(start, size)| Block::new(start, size))
        .collect();
    Ok(normalize_blocks(blocks))
}

/// Parse the sequence record header found at absolute `offset`.
///
/// # Arguments
/// * `buf`: bytes read starting at `offset`.
/// * `offset`: the record's absolute file offset, from the index.
/// * `order`: the file's byte order.
pub fn parse_sequence_header(
    buf: &[u8],
    offset: u64,
    order: ByteOrder,
) -> Result<SequenceHeader, TwoBitError> {
    let mut reader = ByteReader::new(buf, order);
    let dna_size = reader.u32()?;
    let n_blocks = read_blocks(&mut reader)?;
    let mask_blocks = read_blocks(&mut reader)?;
    let _reserved = reader.u32()?;
    Ok(SequenceHeader {
        dna_size,
        n_blocks,
        mask_blocks,
        dna_offset: offset + reader.position() as u64,
    })
}
