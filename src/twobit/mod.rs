//! Reading the 2bit container format.
//!
//! See <http://genome.ucsc.edu/FAQ/FAQformat.html#format7> for the format itself. The
//! [`TwoBit`] reader parses the file header and contig index once, when opened, and then
//! serves range queries by reading only the packed bytes that cover each range. Sequence
//! record headers are parsed on first use and cached (see [`HeaderCache`]).
//!
//! [`TwoBit`] is a [`RemoteRequest`], so it plugs straight into a
//! [`SequenceAccessor`] via [`TwoBit::into_accessor`].
//!
//! [`HeaderCache`]: crate::twobit::lazy::HeaderCache
//! [`SequenceAccessor`]: crate::sequences::accessor::SequenceAccessor

use async_trait::async_trait;
use log::{debug, trace};
use std::sync::Arc;

use crate::{
    error::TwoBitError,
    io::source::ByteRange,
    ranges::{clamp_range, ContigInterval},
    sequences::{accessor::SequenceAccessor, nucleotide::Nucleotides, ContigRecord},
    traits::{ByteSource, RemoteRequest, RemoteResponse},
    Position,
};

pub mod decode;
pub mod header;
pub mod lazy;

use decode::{decode_range, packed_len};
use header::{parse_file_header, parse_sequence_header, ByteReader, FileHeader, SequenceHeader};
use lazy::HeaderCache;

/// Default size of the first read when parsing the file header/index or a record header.
pub const DEFAULT_HEADER_FETCH_SIZE: usize = 4096;

/// Options controlling how a [`TwoBit`] file is read.
#[derive(Clone, Debug)]
pub struct TwoBitOptions {
    /// Lowercase bases in soft-masked blocks (repeats). Off by default, which yields
    /// all-uppercase sequence.
    pub soft_mask: bool,
    /// Let `X` match a contig named `chrX` and vice versa, when the exact name is missing.
    pub resolve_chr_aliases: bool,
    /// Size in bytes of the first read for headers; it is doubled until the header parses.
    pub header_fetch_size: usize,
}

impl Default for TwoBitOptions {
    fn default() -> Self {
        Self {
            soft_mask: false,
            resolve_chr_aliases: true,
            header_fetch_size: DEFAULT_HEADER_FETCH_SIZE,
        }
    }
}

impl TwoBitOptions {
    pub fn with_soft_mask(mut self, soft_mask: bool) -> Self {
        self.soft_mask = soft_mask;
        self
    }

    pub fn with_chr_aliases(mut self, resolve: bool) -> Self {
        self.resolve_chr_aliases = resolve;
        self
    }

    pub fn with_header_fetch_size(mut self, size: usize) -> Self {
        self.header_fetch_size = size;
        self
    }
}

/// Read a window starting at `offset` and parse it, growing the window until `parse`
/// no longer reports [`TwoBitError::Incomplete`].
///
/// # Errors
/// [`TwoBitError::TruncatedFile`] if the source ends before the structure does.
async fn read_until_parsed<S, T, F>(
    source: &S,
    offset: u64,
    initial_size: usize,
    parse: F,
) -> Result<T, TwoBitError>
where
    S: ByteSource + ?Sized,
    F: Fn(&[u8]) -> Result<T, TwoBitError>,
{
    let mut size = initial_size;
    loop {
        let range = ByteRange::new(offset, offset.saturating_add(size as u64));
        let bytes = source.read_range(range).await?;
        match parse(&bytes) {
            Err(TwoBitError::Incomplete(needed)) => {
                if bytes.len() < size {
                    return Err(TwoBitError::TruncatedFile { offset, needed });
                }
                trace!(
                    "{} bytes at offset {} of {} were not enough, need {}",
                    size,
                    offset,
                    source.describe(),
                    needed
                );
                size = needed.max(size.saturating_mul(2));
            }
            result => return result,
        }
    }
}

/// A 2bit file opened over some [`ByteSource`].
pub struct TwoBit<S: ByteSource> {
    source: S,
    options: TwoBitOptions,
    header: FileHeader,
    contigs: Vec<ContigRecord>,
    cache: HeaderCache,
}

impl<S: ByteSource> TwoBit<S> {
    /// Open a 2bit file: parse its header and contig index, and read every contig's length.
    ///
    /// # Arguments
    /// * `source`: the bytes of the 2bit file.
    /// * `options`: see [`TwoBitOptions`].
    pub async fn open(source: S, options: TwoBitOptions) -> Result<Self, TwoBitError> {
        let header = read_until_parsed(
            &source,
            0,
            options.header_fetch_size,
            parse_file_header,
        )
        .await?;
        debug!(
            "opened 2bit v{} ({:?} endian) from {} with {} sequences",
            header.version,
            header.order,
            source.describe(),
            header.index.len()
        );

        let order = header.order;
        let mut contigs = Vec::with_capacity(header.index.len());
        for (name, &offset) in &header.index {
            let dna_size = read_until_parsed(&source, offset, 4, |buf| {
                ByteReader::new(buf, order).u32()
            })
            .await?;
            contigs.push(ContigRecord::new(name.clone(), dna_size));
        }

        Ok(Self {
            source,
            options,
            header,
            contigs,
            cache: HeaderCache::new(),
        })
    }

    /// Retrieve all contig records, in index order.
    pub fn contigs(&self) -> &[ContigRecord] {
        &self.contigs
    }

    /// Retrieve all contig names, in index order.
    pub fn contig_names(&self) -> Vec<String> {
        self.contigs.iter().map(|c| c.name.clone()).collect()
    }

    pub fn version(&self) -> u32 {
        self.header.version
    }

    /// Find the indexed name for `contig`, trying its `chr` alias if enabled.
    pub fn resolve_contig(&self, contig: &str) -> Result<&str, TwoBitError> {
        if let Some((name, _)) = self.header.index.get_key_value(contig) {
            return Ok(name.as_str());
        }
        if self.options.resolve_chr_aliases {
            let alias = match contig.strip_prefix("chr") {
                Some(stripped) => stripped.to_string(),
                None => format!("chr{}", contig),
            };
            if let Some((name, _)) = self.header.index.get_key_value(alias.as_str()) {
                return Ok(name.as_str());
            }
        }
        Err(TwoBitError::MissingContig(contig.to_string()))
    }

    /// Get the record header for `contig`, parsing and caching it on first use.
    pub async fn sequence_header(&self, contig: &str) -> Result<Arc<SequenceHeader>, TwoBitError> {
        let name = self.resolve_contig(contig)?;
        if let Some(header) = self.cache.get(name) {
            trace!("record header cache hit for '{}'", name);
            return Ok(header);
        }

        let offset = self.header.index[name];
        let order = self.header.order;
        let header = read_until_parsed(
            &self.source,
            offset,
            self.options.header_fetch_size,
            |buf| parse_sequence_header(buf, offset, order),
        )
        .await?;
        debug!(
            "loaded record header for '{}': {} bp, {} N-blocks, {} mask blocks",
            name,
            header.dna_size,
            header.n_blocks.len(),
            header.mask_blocks.len()
        );

        let header = Arc::new(header);
        self.cache.insert(name, Arc::clone(&header));
        Ok(header)
    }

    /// Return a `bool` indicating whether the record header for `contig` is cached.
    pub fn is_loaded(&self, contig: &str) -> bool {
        self.resolve_contig(contig)
            .map(|name| self.cache.is_loaded(name))
            .unwrap_or(false)
    }

    /// Clear the record header cache.
    pub fn clear_cache(&self) {
        self.cache.clear()
    }

    /// Returns the [`Nucleotides`] for `contig:start-stop` (inclusive, zero-based).
    ///
    /// The range is clamped to the contig's length; a range starting past the end
    /// returns empty [`Nucleotides`].
    pub async fn fetch(&self, range: &ContigInterval) -> Result<Nucleotides, TwoBitError> {
        range.validate()?;
        let header = self.sequence_header(range.contig()).await?;
        let Some((start, stop)) = clamp_range(range.start(), range.stop(), header.dna_size)
        else {
            return Ok(Nucleotides::default());
        };
        self.read_bases(&header, start, stop).await
    }

    async fn read_bases(
        &self,
        header: &SequenceHeader,
        start: Position,
        stop: Position,
    ) -> Result<Nucleotides, TwoBitError> {
        let first_byte = header.dna_offset + (start / 4) as u64;
        let byte_range = ByteRange::new(first_byte, first_byte + packed_len(start, stop) as u64);
        trace!(
            "reading {} for bases {}-{} from {}",
            byte_range,
            start,
            stop,
            self.source.describe()
        );
        let packed = self.source.read_range(byte_range).await?;
        decode_range(header, &packed, start, stop, self.options.soft_mask)
    }

    /// Wrap this reader in a [`SequenceAccessor`] listing all of its contigs.
    pub fn into_accessor(self) -> SequenceAccessor<Self> {
        let contigs = self.contigs.clone();
        SequenceAccessor::new(Arc::new(self), contigs)
    }
}

#[async_trait]
impl<S: ByteSource> RemoteRequest for TwoBit<S> {
    async fn get(&self, range: &ContigInterval) -> Result<RemoteResponse, TwoBitError> {
        let nucleotides = self.fetch(range).await?;
        Ok(RemoteResponse::new(nucleotides.into_string()?))
    }
}

impl<S: ByteSource> std::fmt::Debug for TwoBit<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwoBit")
            .field("source", &self.source.describe())
            .field("version", &self.header.version)
            .field("contigs", &self.contigs.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
