use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fastadb::{FastaStore, OpenMode, StoreConfig, DEFAULT_INDEX_DISTANCE, DEFAULT_LINE_WIDTH};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fastadb", about = "Indexed, editable FASTA sequence store")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct StoreArgs {
    /// FASTA file backing the store.
    path: PathBuf,
    /// Bases between seek checkpoints.
    #[arg(long, default_value_t = DEFAULT_INDEX_DISTANCE)]
    index_distance: u64,
    /// Bases per line when the file is normalized.
    #[arg(long, default_value_t = DEFAULT_LINE_WIDTH)]
    line_width: usize,
    /// Reject identifiers longer than this.
    #[arg(long)]
    max_id_length: Option<usize>,
}

impl StoreArgs {
    fn open(&self, mode: OpenMode) -> Result<FastaStore> {
        let config = StoreConfig::new(&self.path)
            .with_mode(mode)
            .with_index_distance(self.index_distance)
            .with_line_width(self.line_width)
            .with_max_id_length(self.max_id_length);
        FastaStore::open(config)
            .with_context(|| format!("failed to open {}", self.path.display()))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest a file and print per-record statistics and diagnostics.
    Index {
        #[command(flatten)]
        store: StoreArgs,
        /// Leave the file untouched instead of normalizing it.
        #[arg(long)]
        read_only: bool,
    },
    /// List record headers.
    Ids {
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Print a record or a range of it.
    Get {
        #[command(flatten)]
        store: StoreArgs,
        /// Record identifier.
        id: String,
        /// First base (0-based).
        #[arg(long, default_value_t = 0)]
        offset: u64,
        /// Number of bases; defaults to the rest of the record.
        #[arg(long)]
        length: Option<u64>,
    },
    /// Replace a range of a record in place and print the old bases.
    Set {
        #[command(flatten)]
        store: StoreArgs,
        /// Record identifier.
        id: String,
        /// First base replaced (0-based).
        offset: u64,
        /// Replacement bases; may be empty to delete.
        replacement: String,
        /// Number of bases replaced; defaults to the rest of the record.
        #[arg(long)]
        length: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Index { store, read_only } => run_index(&store, read_only)?,
        Commands::Ids { store } => {
            let store = store.open(OpenMode::ReadOnly)?;
            for descriptor in store.get_descriptors() {
                println!("{descriptor}");
            }
        }
        Commands::Get {
            store,
            id,
            offset,
            length,
        } => {
            let store = store.open(OpenMode::ReadOnly)?;
            let bases = store
                .get_substr(&id, offset, length)
                .with_context(|| format!("failed to read '{id}'"))?;
            println!("{bases}");
        }
        Commands::Set {
            store,
            id,
            offset,
            replacement,
            length,
        } => {
            let mut store = store.open(OpenMode::ReadWrite)?;
            let old = store
                .set_substr(&id, offset, length, &replacement)
                .with_context(|| format!("failed to edit '{id}'"))?;
            println!("{old}");
        }
    }

    Ok(())
}

fn run_index(args: &StoreArgs, read_only: bool) -> Result<()> {
    let mode = if read_only {
        OpenMode::ReadOnly
    } else {
        OpenMode::ReadWrite
    };
    let store = args.open(mode)?;

    // Each diagnostic is already logged at warn level during ingestion.
    eprintln!("{} diagnostics", store.diagnostics().len());
    println!("id\tlength\tgc\tsubt\txn");
    for record in store.records() {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            record.id, record.length, record.gc_length, record.subt_length, record.xn_length
        );
    }
    println!(
        "total\t{}\t{}\t{}\t{}",
        store.get_seq_length(None)?,
        store.get_gc_length(None)?,
        store.get_subt_length(None)?,
        store.get_xn_length(None)?
    );
    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
