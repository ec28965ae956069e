//! The implementations of the `twobit` command line tool's subcommands.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use log::info;

use crate::{
    io::{read_contigs, source::open_source, write_contigs, OutputFile},
    prelude::*,
    reporting::{CommandOutput, Report},
    traits::RemoteRequest,
};

/// How `twobit get` writes sequences.
#[derive(Clone, Debug)]
pub enum SequenceFormat {
    /// One sequence per line.
    Raw,
    /// FASTA records named by region, wrapped to `width` bases per line (0 = no wrapping).
    Fasta { width: usize },
}

/// Open the 2bit file at `location` (a path or an HTTP(S) URL).
pub async fn open_twobit(
    location: &str,
    options: TwoBitOptions,
) -> Result<TwoBit<Box<dyn ByteSource>>, TwoBitError> {
    let source = open_source(location)?;
    TwoBit::open(source, options).await
}

/// Turn a region string into a [`ContigInterval`]. A bare contig name selects
/// the whole contig.
pub fn parse_region<R: RemoteRequest + ?Sized>(
    region: &str,
    accessor: &SequenceAccessor<R>,
) -> Result<ContigInterval, TwoBitError> {
    if region.contains(':') {
        return region.parse();
    }
    let length = accessor
        .contig_length(region)
        .ok_or(TwoBitError::MissingContig(region.to_string()))?;
    Ok(ContigInterval::new(region, 0, length.saturating_sub(1)))
}

fn write_sequence(
    writer: &mut dyn Write,
    range: &ContigInterval,
    bases: &str,
    format: &SequenceFormat,
) -> Result<(), TwoBitError> {
    match format {
        SequenceFormat::Raw => writeln!(writer, "{}", bases)?,
        SequenceFormat::Fasta { width } => {
            writeln!(writer, ">{}", range)?;
            if *width == 0 {
                writeln!(writer, "{}", bases)?;
            } else {
                for line in bases.as_bytes().chunks(*width) {
                    writer.write_all(line)?;
                    writer.write_all(b"\n")?;
                }
            }
        }
    }
    Ok(())
}

/// List the contigs of a 2bit file as `name\tlength` TSV.
pub async fn twobit_contigs(
    twobit: &str,
    output: Option<&PathBuf>,
) -> Result<CommandOutput<usize>, TwoBitError> {
    let reader = open_twobit(twobit, TwoBitOptions::default()).await?;
    let writer = OutputFile::from_option(output).writer()?;
    write_contigs(reader.contigs(), writer)?;
    Ok(CommandOutput::new(reader.contigs().len(), Report::new()))
}

/// Retrieve the sequence of each region from a 2bit file.
///
/// # Arguments
/// * `twobit`: path or URL of the 2bit file.
/// * `regions`: `contig:start-stop` (zero-based, inclusive) or bare contig names.
/// * `seqlens`: an optional contig TSV to list contigs from, instead of the 2bit index.
/// * `options`: how to read the 2bit file.
/// * `format`: how to write the sequences.
/// * `output`: an optional output file (standard output if not specified).
///
/// # Returns
/// The number of sequences written. Regions without sequence are skipped and
/// listed in the report.
pub async fn twobit_get(
    twobit: &str,
    regions: &[String],
    seqlens: Option<&PathBuf>,
    options: TwoBitOptions,
    format: SequenceFormat,
    output: Option<&PathBuf>,
) -> Result<CommandOutput<usize>, TwoBitError> {
    let reader = open_twobit(twobit, options).await?;
    let accessor = match seqlens {
        Some(path) => {
            let contigs = read_contigs(path)?;
            info!("using {} contigs from {}", contigs.len(), path.display());
            SequenceAccessor::new(Arc::new(reader), contigs)
        }
        None => reader.into_accessor(),
    };

    let mut writer = OutputFile::from_option(output).writer()?;
    let mut report = Report::new();
    let mut written = 0;
    for region in regions {
        let range = parse_region(region, &accessor)?;
        let bases = accessor.get_range(&range).await?;
        if bases.is_empty() {
            report.add_issue(format!("no sequence available for region {}", range));
            continue;
        }
        write_sequence(&mut writer, &range, &bases, &format)?;
        written += 1;
    }
    writer.flush()?;
    Ok(CommandOutput::new(written, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::{temp_dir, temp_twobit_file, TwoBitBuilder};

    fn builder() -> TwoBitBuilder {
        TwoBitBuilder::new()
            .sequence("chrM", "GATCACAGGTCTATCACCC")
            .sequence("chr2", "acgtNNNNAC")
    }

    #[tokio::test]
    async fn test_twobit_get_fasta() {
        let file = temp_twobit_file(&builder());
        let dir = temp_dir();
        let output = dir.path().join("out.fa");
        let location = file.path().to_str().unwrap();

        let regions = vec!["chrM:0-9".to_string(), "chr2".to_string(), "chrM:50-60".to_string()];
        let result = twobit_get(
            location,
            &regions,
            None,
            TwoBitOptions::default().with_soft_mask(true),
            SequenceFormat::Fasta { width: 4 },
            Some(&output),
        )
        .await
        .unwrap();
        assert_eq!(result.value, 2);
        assert_eq!(result.report.issues().len(), 1);

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            ">chrM:0-9\nGATC\nACAG\nGT\n>chr2:0-9\nacgt\nNNNN\nAC\n"
        );
    }

    #[tokio::test]
    async fn test_twobit_get_with_seqlens() {
        let file = temp_twobit_file(&builder());
        let dir = temp_dir();
        let seqlens = dir.path().join("seqlens.tsv");
        std::fs::write(&seqlens, "chr2\t10\n").unwrap();
        let output = dir.path().join("out.txt");
        let location = file.path().to_str().unwrap();

        let result = twobit_get(
            location,
            &["chr2".to_string()],
            Some(&seqlens),
            TwoBitOptions::default(),
            SequenceFormat::Raw,
            Some(&output),
        )
        .await
        .unwrap();
        assert_eq!(result.value, 1);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "ACGTNNNNAC\n");

        // chrM is in the 2bit file, but not in the contig list
        let missing = twobit_get(
            location,
            &["chrM".to_string()],
            Some(&seqlens),
            TwoBitOptions::default(),
            SequenceFormat::Raw,
            Some(&output),
        )
        .await;
        assert!(matches!(missing, Err(TwoBitError::MissingContig(_))));
    }

    #[tokio::test]
    async fn test_twobit_contigs() {
        let file = temp_twobit_file(&builder());
        let dir = temp_dir();
        let output = dir.path().join("contigs.tsv");
        let result = twobit_contigs(file.path().to_str().unwrap(), Some(&output))
            .await
            .unwrap();
        assert_eq!(result.value, 2);
        assert_eq!(
            read_contigs(&output).unwrap(),
            vec![ContigRecord::new("chrM", 19), ContigRecord::new("chr2", 10)]
        );
    }

    #[test]
    fn test_parse_region_bare_name() {
        let accessor = SequenceAccessor::new(
            Arc::new(crate::test_utilities::MockRemote::new()),
            vec![ContigRecord::new("chrM", 16571)],
        );
        assert_eq!(
            parse_region("chrM", &accessor).unwrap(),
            ContigInterval::new("chrM", 0, 16570)
        );
        assert_eq!(
            parse_region("chrM:5-9", &accessor).unwrap(),
            ContigInterval::new("chrM", 5, 9)
        );
        assert!(matches!(
            parse_region("chrX", &accessor),
            Err(TwoBitError::MissingContig(_))
        ));
    }
}
