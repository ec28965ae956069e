use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{warn, LevelFilter};
use twobit_seq::{
    commands::{twobit_contigs, twobit_get, SequenceFormat},
    prelude::{TwoBitError, TwoBitOptions},
    reporting::CommandOutput,
    twobit::DEFAULT_HEADER_FETCH_SIZE,
};

const INFO: &str = "\
twobit: random access to 2bit genome files, local or over HTTP
usage: twobit [--help] <subcommand>

Subcommands:

  contigs: list contig names and lengths.
  get: retrieve the sequence of regions (zero-based, inclusive: chr1:0-99).

";

#[derive(Parser)]
#[clap(name = "twobit")]
#[clap(about = INFO)]
struct Cli {
    /// increase logging verbosity (-d for debug, -dd for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Contigs {
        /// a 2bit file path or HTTP(S) URL
        #[arg(required = true)]
        twobit: String,

        /// an optional output file (standard output will be used if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    Get {
        /// a 2bit file path or HTTP(S) URL
        #[arg(required = true)]
        twobit: String,

        /// regions as 'contig:start-stop' (zero-based, inclusive) or a whole contig name
        #[arg(required = true)]
        regions: Vec<String>,

        /// a TSV file of contig names and lengths to use instead of the 2bit index
        #[arg(long)]
        seqlens: Option<PathBuf>,

        /// write soft-masked (repeat) bases in lowercase
        #[arg(long)]
        soft_mask: bool,

        /// only match contig names exactly (no 'chr' prefix aliasing)
        #[arg(long)]
        no_aliases: bool,

        /// write FASTA records instead of one sequence per line
        #[arg(long)]
        fasta: bool,

        /// FASTA line width (0 for no wrapping)
        #[arg(long, default_value_t = 60)]
        width: usize,

        /// size in bytes of the first read of each header
        #[arg(long, default_value_t = DEFAULT_HEADER_FETCH_SIZE)]
        header_fetch_size: usize,

        /// an optional output file (standard output will be used if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(debug: u8) {
    let level = match debug {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

async fn run_command(command: &Commands) -> Result<CommandOutput<usize>, TwoBitError> {
    match command {
        Commands::Contigs { twobit, output } => twobit_contigs(twobit, output.as_ref()).await,
        Commands::Get {
            twobit,
            regions,
            seqlens,
            soft_mask,
            no_aliases,
            fasta,
            width,
            header_fetch_size,
            output,
        } => {
            let options = TwoBitOptions::default()
                .with_soft_mask(*soft_mask)
                .with_chr_aliases(!*no_aliases)
                .with_header_fetch_size(*header_fetch_size);
            let format = if *fasta {
                SequenceFormat::Fasta { width: *width }
            } else {
                SequenceFormat::Raw
            };
            twobit_get(
                twobit,
                regions,
                seqlens.as_ref(),
                options,
                format,
                output.as_ref(),
            )
            .await
        }
    }
}

fn run() -> Result<(), TwoBitError> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let Some(command) = &cli.command else {
        println!("{}\n", INFO);
        std::process::exit(1);
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let output = runtime.block_on(run_command(command))?;
    for issue in output.report.issues() {
        warn!("{}", issue);
    }
    Ok(())
}

fn main() {
    match run() {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
