//! Bounded worker pool strategy: a fixed number of workers drain a bounded
//! task channel while the producer parses each genome file once and submits
//! one task per (reference gene, gene) pair. Workers accumulate into local
//! partial aggregates that are merged behind the join barrier, so no lock is
//! touched on the hot path.

use super::{Pipeline, TaskUnit};
use crate::consensus::LocalConsensus;
use crate::genbank::RecordSource;
use crate::homology::AlignmentScorer;
use crate::promoter::PromoterModel;
use anyhow::{anyhow, Result};
use crossbeam_channel::bounded;
use std::path::PathBuf;
use std::thread;

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
    let workers = workers.max(1);
    let (tx, rx) = bounded::<TaskUnit>(workers * 2);
    let keys = pipeline.consensus.keys().to_vec();

    thread::scope(|scope| -> Result<()> {
        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let rx = rx.clone();
            let keys = &keys;
            handles.push(scope.spawn(move || {
                let mut local = LocalConsensus::new(keys);
                while let Ok(task) = rx.recv() {
                    let reference = &pipeline.reference_genes[task.reference_idx];
                    let gene = &task.record.genes[task.gene_idx];
                    let outcome = pipeline.examine(reference, &task.record, gene, |name, m| {
                        local.add_match(name, m)
                    });
                    if let Err(e) = outcome {
                        eprintln!("Error processing gene {}: {e:#}", gene.name);
                    }
                }
                local
            }));
        }
        drop(rx);

        for path in files {
            let Some(record) = pipeline.parse_or_skip(path) else {
                continue;
            };
            let mut tasks = Vec::new();
            pipeline.tasks_for(record, &mut tasks);
            for task in tasks {
                tx.send(task)?;
            }
        }
        // Closing the channel is the workers' shutdown signal.
        drop(tx);

        for handle in handles {
            let local = handle
                .join()
                .map_err(|_| anyhow!("Worker thread panicked"))?;
            pipeline.consensus.merge_local(&local)?;
        }
        Ok(())
    })
}
