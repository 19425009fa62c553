use crate::catalog;
use crate::consensus::{self, Consensus};
use crate::genbank::GenbankSource;
use crate::homology::{Blosum62Scorer, HomologyFilter};
use crate::locator;
use crate::pipeline::{Pipeline, Strategy};
use crate::promoter::Sigma70Model;
use crate::utils::progress::ProgressBuilder;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};

pub fn run(
    reference_file: String,
    genome_dir: String,
    threads: usize,
    strategy: Strategy,
    output: Option<String>,
) -> Result<()> {
    let reference_genes = catalog::load_reference_genes(&reference_file)?;
    let keys = catalog::consensus_keys(&reference_genes);
    let aggregate = Consensus::new(&keys);
    let files = locator::list_genome_files(&genome_dir)?;

    let progress = ProgressBuilder::new(format!(
        "Scanning {} genome files against {} reference genes ({} threads)",
        files.len(),
        reference_genes.len(),
        threads
    ))
    .with_tick()
    .build()?;

    let source = GenbankSource;
    let filter = HomologyFilter::new(Blosum62Scorer);
    let model = Sigma70Model::default();
    let pipeline = Pipeline {
        source: &source,
        filter: &filter,
        model: &model,
        reference_genes: &reference_genes,
        consensus: &aggregate,
    };
    pipeline.run(strategy, &files, threads)?;
    progress.finish_with_message("Scan complete");

    let snapshot = aggregate.snapshot()?;
    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Cannot create report file {path}"))?;
            let mut writer = BufWriter::new(file);
            consensus::write_report(&mut writer, &snapshot)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            consensus::write_report(&mut stdout.lock(), &snapshot)?;
        }
    }
    Ok(())
}
