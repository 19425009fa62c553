//! Batch orchestration: one shared per-gene pipeline step driven by three
//! interchangeable concurrency strategies. All strategies end at a blocking
//! join barrier and must leave identical contents in the aggregator.

pub mod parallel;
pub mod per_file;
pub mod pool;

use crate::consensus::Consensus;
use crate::genbank::RecordSource;
use crate::homology::{AlignmentScorer, HomologyFilter};
use crate::model::{Gene, GenomeRecord, ReferenceGene};
use crate::promoter::{PromoterMatch, PromoterModel};
use crate::upstream::upstream_region;
use anyhow::Result;
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The three orchestration disciplines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Fixed-size worker pool fed through a bounded channel; worker-local
    /// partial aggregates merged after the join barrier.
    Pool,
    /// One thread per genome file writing straight to the shared aggregator.
    PerFile,
    /// Precomputed task list drained by one rayon parallel pass.
    Parallel,
}

/// Unit of work: one (reference gene, gene) pair within one parsed record.
/// Records are shared between the tasks they spawned and dropped with the
/// last of them.
pub(crate) struct TaskUnit {
    pub reference_idx: usize,
    pub gene_idx: usize,
    pub record: Arc<GenomeRecord>,
}

/// Immutable collaborators shared by every strategy. The aggregator is the
/// only mutable shared state and synchronizes internally.
pub struct Pipeline<'a, R, S, M>
where
    R: RecordSource,
    S: AlignmentScorer,
    M: PromoterModel,
{
    pub source: &'a R,
    pub filter: &'a HomologyFilter<S>,
    pub model: &'a M,
    pub reference_genes: &'a [ReferenceGene],
    pub consensus: &'a Consensus,
}

// Manual impls: derive(Clone/Copy) would demand R: Clone etc.
impl<R: RecordSource, S: AlignmentScorer, M: PromoterModel> Clone for Pipeline<'_, R, S, M> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<R: RecordSource, S: AlignmentScorer, M: PromoterModel> Copy for Pipeline<'_, R, S, M> {}

impl<R, S, M> Pipeline<'_, R, S, M>
where
    R: RecordSource,
    S: AlignmentScorer,
    M: PromoterModel,
{
    /// Drive the chosen strategy to completion over `files`.
    pub fn run(&self, strategy: Strategy, files: &[PathBuf], workers: usize) -> Result<()> {
        match strategy {
            Strategy::Pool => pool::run(*self, files, workers),
            Strategy::PerFile => per_file::run(*self, files),
            Strategy::Parallel => parallel::run(*self, files, workers),
        }
    }

    /// The shared pipeline step: homology filter, upstream extraction,
    /// promoter prediction, then hand any accepted match to `sink`.
    pub(crate) fn examine<F>(
        &self,
        reference: &ReferenceGene,
        record: &GenomeRecord,
        gene: &Gene,
        mut sink: F,
    ) -> Result<()>
    where
        F: FnMut(&str, &PromoterMatch) -> Result<()>,
    {
        if !self
            .filter
            .is_homologous(&gene.sequence, &reference.sequence)
        {
            return Ok(());
        }
        let window = upstream_region(record, gene);
        if let Some(prediction) = self.model.best_match(&window) {
            sink(&reference.name, &prediction)?;
        }
        Ok(())
    }

    /// Parse one genome file, or warn and skip it. A malformed file never
    /// aborts the run and never yields a half-parsed record.
    pub(crate) fn parse_or_skip(&self, path: &Path) -> Option<GenomeRecord> {
        match self.source.parse(path) {
            Ok(record) => Some(record),
            Err(e) => {
                eprintln!("Warning: skipping {}: {e:#}", path.display());
                None
            }
        }
    }

    /// Expand one parsed record into the task cross product.
    pub(crate) fn tasks_for(&self, record: GenomeRecord, tasks: &mut Vec<TaskUnit>) {
        let record = Arc::new(record);
        for reference_idx in 0..self.reference_genes.len() {
            for gene_idx in 0..record.genes.len() {
                tasks.push(TaskUnit {
                    reference_idx,
                    gene_idx,
                    record: Arc::clone(&record),
                });
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::model::Strand;
    use crate::promoter::{MINUS10_CONSENSUS, MINUS35_CONSENSUS};
    use std::collections::HashMap;

    /// Scorer that looks identical sequences up as homologous and everything
    /// else as unrelated.
    pub struct IdentityScorer;

    impl AlignmentScorer for IdentityScorer {
        fn score(&self, query: &[u8], reference: &[u8]) -> f32 {
            if query == reference {
                100.0
            } else {
                0.0
            }
        }
    }

    /// In-memory record source keyed by file name.
    #[derive(Default)]
    pub struct MapSource {
        pub records: HashMap<PathBuf, GenomeRecord>,
    }

    impl RecordSource for MapSource {
        fn parse(&self, path: &Path) -> Result<GenomeRecord> {
            self.records
                .get(path)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no record for {}", path.display()))
        }
    }

    /// A record whose single forward gene at `location` carries a planted
    /// consensus promoter in its upstream window.
    pub fn promoter_record(name: &str, location: usize, peptide: &[u8]) -> GenomeRecord {
        let mut nucleotides = vec![b'G'; location + 50];
        let promoter_start = location - 60;
        nucleotides[promoter_start..promoter_start + 6].copy_from_slice(MINUS35_CONSENSUS);
        nucleotides[promoter_start + 23..promoter_start + 29].copy_from_slice(MINUS10_CONSENSUS);
        GenomeRecord {
            nucleotides,
            genes: vec![Gene {
                name: name.to_string(),
                location,
                strand: Strand::Forward,
                sequence: peptide.to_vec(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::consensus::ALL_KEY;
    use crate::promoter::Sigma70Model;

    #[test]
    fn examine_records_one_match_for_a_self_homologous_gene() {
        let source = MapSource::default();
        let filter = HomologyFilter::new(IdentityScorer);
        let model = Sigma70Model::default();
        let reference_genes = vec![ReferenceGene {
            name: "geneX".into(),
            sequence: b"MKLV".to_vec(),
        }];
        let keys = vec!["geneX".to_string(), ALL_KEY.to_string()];
        let consensus = Consensus::new(&keys);
        let pipeline = Pipeline {
            source: &source,
            filter: &filter,
            model: &model,
            reference_genes: &reference_genes,
            consensus: &consensus,
        };

        let record = promoter_record("geneX", 300, b"MKLV");
        let mut seen = Vec::new();
        pipeline
            .examine(&reference_genes[0], &record, &record.genes[0], |name, m| {
                seen.push((name.to_string(), m.clone()));
                Ok(())
            })
            .unwrap();

        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "geneX");
        assert_eq!(&seen[0].1.minus35, b"TTGACA");
        assert_eq!(seen[0].1.gap, 17);
    }

    #[test]
    fn examine_skips_non_homologous_genes() {
        let source = MapSource::default();
        let filter = HomologyFilter::new(IdentityScorer);
        let model = Sigma70Model::default();
        let reference_genes = vec![ReferenceGene {
            name: "geneX".into(),
            sequence: b"GHST".to_vec(),
        }];
        let keys = vec!["geneX".to_string(), ALL_KEY.to_string()];
        let consensus = Consensus::new(&keys);
        let pipeline = Pipeline {
            source: &source,
            filter: &filter,
            model: &model,
            reference_genes: &reference_genes,
            consensus: &consensus,
        };

        let record = promoter_record("geneX", 300, b"MKLV");
        let mut count = 0;
        pipeline
            .examine(&reference_genes[0], &record, &record.genes[0], |_, _| {
                count += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(count, 0);
    }
}
