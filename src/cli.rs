use crate::pipeline::Strategy;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan genome records for reference-gene promoters and report
    /// per-gene consensus statistics
    Scan {
        /// Reference gene file (alternating name/sequence lines)
        reference_file: String,

        /// Directory of GenBank genome records (searched recursively)
        genome_dir: String,

        /// Number of worker threads (default: 4)
        #[arg(short = 't', long = "threads", default_value = "4")]
        threads: usize,

        /// Concurrency strategy
        #[arg(long, value_enum, default_value = "pool")]
        strategy: Strategy,

        /// Write the report to this file instead of stdout
        #[arg(short = 'o', long = "output")]
        output: Option<String>,
    },
}
