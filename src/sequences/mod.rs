//! Contig descriptors and access to per-basepair nucleotide data.
//!
//! ## Main Functionality
//!
//!  - [`ContigRecord`]: a contig's name and length, as listed in a 2bit index or a
//!    contig TSV file.
//!  - [`SequenceAccessor`]: lists contigs and retrieves decoded base pairs for a range
//!    through a [`RemoteRequest`] collaborator.
//!  - [`Nucleotides`]: decoded nucleotide bytes.
//!
//! [`SequenceAccessor`]: crate::sequences::accessor::SequenceAccessor
//! [`RemoteRequest`]: crate::traits::RemoteRequest
//! [`Nucleotides`]: crate::sequences::nucleotide::Nucleotides

use serde::{Deserialize, Serialize};

use crate::Position;

pub mod accessor;
pub mod nucleotide;

/// One contig's (i.e. chromosome's) name and length in basepairs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContigRecord {
    pub name: String,
    pub length: Position,
}

impl ContigRecord {
    pub fn new(name: impl Into<String>, length: Position) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }
}
