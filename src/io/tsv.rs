//! Reading and writing contig lists as tab-separated `name\tlength` files
//! (the UCSC "chrom.sizes" layout).

use csv::{ReaderBuilder, WriterBuilder};
use indexmap::IndexSet;
use std::io::Write;
use std::path::PathBuf;

use super::file::InputFile;
use crate::{error::TwoBitError, sequences::ContigRecord};

/// Read a tab-delimited file of contig names and their lengths, possibly gzipped.
///
/// Lines starting with `#` are skipped. Contigs keep the file's order.
pub fn read_contigs(filepath: impl Into<PathBuf>) -> Result<Vec<ContigRecord>, TwoBitError> {
    let input_file = InputFile::new(filepath);
    let reader = input_file.reader()?;

    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .from_reader(reader);

    let mut seen = IndexSet::new();
    let mut contigs = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let (Some(name), Some(length)) = (row.get(0), row.get(1)) else {
            return Err(TwoBitError::InvalidGenomeFile(format!(
                "expected 'name<TAB>length', got '{}'",
                row.iter().collect::<Vec<_>>().join("\t")
            )));
        };
        if !seen.insert(name.to_string()) {
            return Err(TwoBitError::InvalidGenomeFile(format!(
                "sequence '{}' is duplicated",
                name
            )));
        }
        contigs.push(ContigRecord::new(name, length.trim().parse()?));
    }
    Ok(contigs)
}

/// Write contig names and lengths as a headerless TSV.
pub fn write_contigs<W: Write>(contigs: &[ContigRecord], writer: W) -> Result<(), TwoBitError> {
    let mut wtr = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(writer);
    for contig in contigs {
        wtr.serialize(contig)?;
    }
    wtr.flush()?;
    Ok(())
}
