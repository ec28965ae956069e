//! The [`SequenceAccessor`]: contig listing and range reads over a [`RemoteRequest`].
//!
//! The accessor is a thin adapter. It validates the query, hands the interval to its
//! collaborator, and returns the decoded base pairs. It does no caching of its own, so
//! repeated identical queries are fetched again, and collaborator errors are returned
//! untouched.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use twobit_seq::prelude::*;
//!
//! # async fn example() -> Result<(), TwoBitError> {
//! let twobit = Arc::new(TwoBit::open(LocalFile::new("mito.2bit"), TwoBitOptions::default()).await?);
//! let contigs = twobit.contigs().to_vec();
//! let accessor = SequenceAccessor::new(twobit, contigs);
//!
//! assert_eq!(accessor.contig_names(), vec!["chrM".to_string()]);
//! let bases = accessor.get_range(&ContigInterval::new("chrM", 0, 3)).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::{
    error::TwoBitError,
    ranges::ContigInterval,
    sequences::ContigRecord,
    traits::RemoteRequest,
    Position,
};

/// Lists the contigs of one loaded source and retrieves base pairs for inclusive ranges.
///
/// The contig list is immutable after construction; the collaborator is shared
/// (e.g. with other accessors or the code that opened it), not owned.
pub struct SequenceAccessor<R: RemoteRequest + ?Sized> {
    remote: Arc<R>,
    contigs: Vec<ContigRecord>,
}

impl<R: RemoteRequest + ?Sized> SequenceAccessor<R> {
    /// Create a new [`SequenceAccessor`]. This performs no I/O.
    ///
    /// # Arguments
    /// * `remote`: a collaborator already bound to a specific resource.
    /// * `contigs`: the pre-parsed contig index, in load order.
    pub fn new(remote: Arc<R>, contigs: Vec<ContigRecord>) -> Self {
        Self { remote, contigs }
    }

    /// Retrieve all contig names, in load order.
    pub fn contig_names(&self) -> Vec<String> {
        self.contigs.iter().map(|c| c.name.clone()).collect()
    }

    /// Retrieve all contig records, in load order.
    pub fn contigs(&self) -> &[ContigRecord] {
        &self.contigs
    }

    /// Get the length of a particular contig, if it is listed.
    pub fn contig_length(&self, name: &str) -> Option<Position> {
        self.contigs
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.length)
    }

    /// The shared collaborator handle.
    pub fn remote(&self) -> &Arc<R> {
        &self.remote
    }

    /// Returns the base pairs for `contig:start-stop`.
    ///
    /// The range is inclusive and zero-based. Returns an empty string if no
    /// data is available on this range.
    ///
    /// # Errors
    /// * [`TwoBitError::InvalidRange`] if `start > stop`. The collaborator is not called.
    /// * Any error from the collaborator, unmodified.
    pub async fn get_range(&self, range: &ContigInterval) -> Result<String, TwoBitError> {
        range.validate()?;
        let response = self.remote.get(range).await?;
        Ok(response.response)
    }
}

impl<R: RemoteRequest + ?Sized> std::fmt::Debug for SequenceAccessor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceAccessor")
            .field("contigs", &self.contigs)
            .finish_non_exhaustive()
    }
}
