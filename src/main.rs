use clap::Parser;
use sigma_scan::{cli, commands};

fn main() {
    let args = cli::Args::parse();

    let result = match args.command {
        cli::Commands::Scan {
            reference_file,
            genome_dir,
            threads,
            strategy,
            output,
        } => commands::scan::run(reference_file, genome_dir, threads, strategy, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
