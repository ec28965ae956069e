//! Types and methods for reading bytes and contig lists, and writing output.

pub mod file;
pub mod source;
pub mod tsv;

pub use file::{InputFile, OutputFile};
pub use source::{open_source, ByteRange, LocalFile, MemorySource};
pub use tsv::{read_contigs, write_contigs};
