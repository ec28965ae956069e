//! Unpacking of 2-bit encoded nucleotides.
//!
//! Each byte packs four bases, most significant bits first, with `T=0`, `C=1`, `A=2`
//! and `G=3`. Unknown bases and soft-masking are stored separately as blocks, and are
//! applied after unpacking.

use crate::{
    error::TwoBitError,
    sequences::nucleotide::Nucleotides,
    traits::GenericInterval,
    twobit::header::{Block, SequenceHeader},
    Position,
};

const BASES: [u8; 4] = *b"TCAG";

/// Number of packed bytes needed to cover the inclusive base range `[start, stop]`.
pub fn packed_len(start: Position, stop: Position) -> usize {
    (stop / 4 - start / 4 + 1) as usize
}

/// Unpack `count` bases from `packed`, starting `offset` bases into its first byte.
///
/// # Panics
/// Panics if `packed` holds fewer than `offset + count` bases.
pub fn unpack_dna(packed: &[u8], offset: usize, count: usize) -> Vec<u8> {
    (offset..offset + count)
        .map(|i| {
            let shift = 6 - 2 * (i % 4);
            BASES[((packed[i / 4] >> shift) & 0b11) as usize]
        })
        .collect()
}

/// Apply `func` to every base of `bases` (which starts at sequence position `start`)
/// that falls within one of `blocks`.
///
/// The blocks must be sorted and non-overlapping, as `parse_sequence_header` leaves
/// them; the blocks touching the window are then found by two binary searches.
pub fn apply_blocks<F>(bases: &mut [u8], start: Position, blocks: &[Block], func: F)
where
    F: Fn(&mut u8),
{
    if bases.is_empty() {
        return;
    }
    let window = Block::new(start, bases.len() as Position);
    let stop = window.stop();
    let first = blocks.partition_point(|b| b.stop() < start);
    let end = blocks.partition_point(|b| b.start <= stop);
    for block in &blocks[first..end.max(first)] {
        if let Some((overlap_start, overlap_stop)) = window.overlap_range(block) {
            let from = (overlap_start - start) as usize;
            let to = (overlap_stop - start) as usize;
            bases[from..=to].iter_mut().for_each(&func);
        }
    }
}

/// Decode the inclusive range `[start, stop]` of a sequence record from the packed bytes
/// read at `header.dna_offset + start / 4`.
///
/// The range must already be clamped to the record's `dna_size`.
pub fn decode_range(
    header: &SequenceHeader,
    packed: &[u8],
    start: Position,
    stop: Position,
    soft_mask: bool,
) -> Result<Nucleotides, TwoBitError> {
    let needed = packed_len(start, stop);
    if packed.len() < needed {
        return Err(TwoBitError::TruncatedFile {
            offset: header.dna_offset + (start / 4) as u64,
            needed,
        });
    }

    let mut bases = unpack_dna(packed, (start % 4) as usize, (stop - start + 1) as usize);
    apply_blocks(&mut bases, start, &header.n_blocks, |b| *b = b'N');
    if soft_mask {
        apply_blocks(&mut bases, start, &header.mask_blocks, |b| {
            b.make_ascii_lowercase()
        });
    }
    Ok(bases.into())
}
