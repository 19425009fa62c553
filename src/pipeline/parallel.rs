//! Data-parallel strategy: the full task list is materialized up front
//! (each file parsed once), then drained by a single rayon parallel pass on
//! a dedicated pool. Mutual exclusion lives entirely inside the aggregator's
//! per-key-locked entry point; `install` returning is the join barrier.

use super::{Pipeline, TaskUnit};
use crate::genbank::RecordSource;
use crate::homology::AlignmentScorer;
use crate::promoter::PromoterModel;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::PathBuf;

pub(crate) fn run<R, S, M>(
    pipeline: Pipeline<'_, R, S, M>,
    files: &[PathBuf],
    workers: usize,
) -> Result<()>
where
    R: RecordSource,
    S: AlignmentScorer,
    M: PromoterModel,
{
    let mut tasks: Vec<TaskUnit> = Vec::new();
    for path in files {
        if let Some(record) = pipeline.parse_or_skip(path) {
            pipeline.tasks_for(record, &mut tasks);
        }
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .context("Cannot build rayon thread pool")?;

    pool.install(|| {
        tasks.par_iter().for_each(|task| {
            let reference = &pipeline.reference_genes[task.reference_idx];
            let gene = &task.record.genes[task.gene_idx];
            let outcome = pipeline.examine(reference, &task.record, gene, |name, m| {
                pipeline.consensus.add_match(name, m)
            });
            if let Err(e) = outcome {
                eprintln!("Error processing gene {}: {e:#}", gene.name);
            }
        });
    });

    Ok(())
}
