use bio::alignment::pairwise::Aligner;
use bio::scores::blosum62;

/// Alignment score at or above which two peptides count as homologous.
pub const HOMOLOGY_THRESHOLD: f32 = 60.0;

/// Gap-open penalty fed to the local aligner.
pub const GAP_OPEN: f32 = 10.0;

/// Gap-extend penalty fed to the local aligner.
pub const GAP_EXTEND: f32 = 0.5;

/// External pairwise-alignment scorer. Implementations must be deterministic
/// and side-effect-free for identical inputs.
pub trait AlignmentScorer: Send + Sync {
    fn score(&self, query: &[u8], reference: &[u8]) -> f32;
}

/// Smith-Waterman local alignment under BLOSUM62 with gap open 10.0 and gap
/// extend 0.5. The aligner works in integers, so all quantities are scaled
/// to half-units (matrix x2, open 20, extend 1); every reachable score is a
/// multiple of 0.5, which keeps the scaling exact.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blosum62Scorer;

impl AlignmentScorer for Blosum62Scorer {
    fn score(&self, query: &[u8], reference: &[u8]) -> f32 {
        if query.is_empty() || reference.is_empty() {
            return 0.0;
        }
        let mut aligner = Aligner::with_capacity(
            query.len(),
            reference.len(),
            -((GAP_OPEN * 2.0) as i32),
            -((GAP_EXTEND * 2.0) as i32),
            |a: u8, b: u8| 2 * blosum62(a, b),
        );
        aligner.local(query, reference).score as f32 / 2.0
    }
}

/// Decides query-vs-reference homology by thresholding the injected scorer.
pub struct HomologyFilter<S> {
    scorer: S,
}

impl<S: AlignmentScorer> HomologyFilter<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    pub fn is_homologous(&self, query: &[u8], reference: &[u8]) -> bool {
        self.scorer.score(query, reference) >= HOMOLOGY_THRESHOLD
    }
}
