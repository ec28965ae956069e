//! Types and methods for working with decoded nucleotide sequence data.

use bytes::Bytes;
use std::ops::Deref;
use std::{fmt, str};

use crate::prelude::TwoBitError;

/// A newtype around raw nucleotide [`Bytes`], for making display
/// and other operations more convenient.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Nucleotides(Bytes);

impl fmt::Display for Nucleotides {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match str::from_utf8(&self.0) {
            Ok(s) => write!(f, "{}", s),
            Err(_) => Err(fmt::Error),
        }
    }
}

impl Deref for Nucleotides {
    type Target = Bytes;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<u8>> for Nucleotides {
    fn from(bases: Vec<u8>) -> Self {
        Nucleotides(Bytes::from(bases))
    }
}

impl From<String> for Nucleotides {
    fn from(s: String) -> Self {
        let bytes = Bytes::from(s.into_bytes());
        Nucleotides(bytes)
    }
}

impl<'a> From<&'a str> for Nucleotides {
    fn from(s: &'a str) -> Self {
        let bytes = Bytes::from(s.as_bytes().to_vec());
        Nucleotides(bytes)
    }
}

impl Nucleotides {
    /// Get the length of the nucleotide sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return whether this is an empty object.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return an [`NucleotideIterator`], which iterates through all
    /// bytes in a nucleotide sequence.
    pub fn iter(&self) -> NucleotideIterator<'_> {
        let inner = self.0.iter();
        NucleotideIterator { inner }
    }

    /// Convert into an owned [`String`].
    pub fn into_string(self) -> Result<String, TwoBitError> {
        Ok(String::from_utf8(self.0.to_vec())?)
    }
}

/// Iterate over individual nucleotides.
pub struct NucleotideIterator<'a> {
    inner: std::slice::Iter<'a, u8>,
}

impl<'a> Iterator for NucleotideIterator<'a> {
    type Item = &'a u8;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

#[cfg(test)]
mod tests {
    use super::Nucleotides;

    #[test]
    fn test_nucleotides_display_and_len() {
        let nucs = Nucleotides::from("ACGTN");
        assert_eq!(nucs.len(), 5);
        assert_eq!(nucs.to_string(), "ACGTN");
        assert_eq!(nucs.iter().filter(|b| **b == b'N').count(), 1);
    }

    #[test]
    fn test_nucleotides_into_string() {
        let nucs = Nucleotides::from(b"acgt".to_vec());
        assert_eq!(nucs.into_string().unwrap(), "acgt");
        assert!(Nucleotides::default().is_empty());
    }
}
