//! Thread-per-file strategy: every genome file gets its own thread, which
//! parses the file once and walks reference genes x its own genes. Homology
//! scoring runs unsynchronized; accepted matches go through the aggregator's
//! per-key locks. The caller's scope join is the completion barrier.

use super::Pipeline;
use crate::genbank::RecordSource;
use crate::homology::AlignmentScorer;
use crate::promoter::PromoterModel;
use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::thread;

pub(crate) fn run<R, S, M>(pipeline: Pipeline<'_, R, S, M>, files: &[PathBuf]) -> Result<()>
where
    R: RecordSource,
    S: AlignmentScorer,
    M: PromoterModel,
{
    thread::scope(|scope| -> Result<()> {
        let mut handles = Vec::with_capacity(files.len());
        for path in files {
            handles.push(scope.spawn(move || {
                let Some(record) = pipeline.parse_or_skip(path) else {
                    return;
                };
                for reference in pipeline.reference_genes {
                    for gene in &record.genes {
                        let outcome = pipeline.examine(reference, &record, gene, |name, m| {
                            pipeline.consensus.add_match(name, m)
                        });
                        if let Err(e) = outcome {
                            eprintln!("Error processing gene {}: {e:#}", gene.name);
                        }
                    }
                }
            }));
        }
        for handle in handles {
            handle
                .join()
                .map_err(|_| anyhow!("File thread panicked"))?;
        }
        Ok(())
    })
}
