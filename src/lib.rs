//! Random access to base-pair ranges of [2bit](http://genome.ucsc.edu/FAQ/FAQformat.html#format7)
//! genome files.
//!
//! The main entry point is the [`SequenceAccessor`], which lists contigs and retrieves
//! decoded nucleotides for a [`ContigInterval`] through a [`RemoteRequest`] collaborator.
//! The [`TwoBit`] reader is the collaborator for 2bit files, reading from any
//! [`ByteSource`] (in-memory, local file, or HTTP range requests).
//!
//! ```no_run
//! use twobit_seq::prelude::*;
//!
//! # async fn example() -> Result<(), TwoBitError> {
//! let source = LocalFile::new("hg38.2bit");
//! let accessor = TwoBit::open(source, TwoBitOptions::default())
//!     .await?
//!     .into_accessor();
//! let bases = accessor
//!     .get_range(&ContigInterval::new("chrM", 0, 99))
//!     .await?;
//! assert_eq!(bases.len(), 100);
//! # Ok(())
//! # }
//! ```
//!
//! [`SequenceAccessor`]: crate::sequences::accessor::SequenceAccessor
//! [`ContigInterval`]: crate::ranges::ContigInterval
//! [`RemoteRequest`]: crate::traits::RemoteRequest
//! [`TwoBit`]: crate::twobit::TwoBit
//! [`ByteSource`]: crate::traits::ByteSource

pub mod commands;
pub mod error;
pub mod io;
pub mod ranges;
pub mod reporting;
pub mod sequences;
pub mod test_utilities;
pub mod traits;
pub mod twobit;

/// Zero-based sequence coordinate. 2bit stores sizes and block coordinates as 32-bit integers.
pub type Position = u32;

pub mod prelude {
    pub use crate::error::TwoBitError;
    pub use crate::io::source::{open_source, ByteRange, LocalFile, MemorySource};
    pub use crate::io::{read_contigs, write_contigs};
    pub use crate::ranges::ContigInterval;
    pub use crate::sequences::accessor::SequenceAccessor;
    pub use crate::sequences::nucleotide::Nucleotides;
    pub use crate::sequences::ContigRecord;
    pub use crate::traits::{ByteSource, GenericInterval, RemoteRequest, RemoteResponse};
    pub use crate::twobit::{TwoBit, TwoBitOptions};

    #[cfg(feature = "http")]
    pub use crate::io::source::HttpSource;
}
