//! Sigma70 promoter model: two fixed-width motif boxes separated by a
//! variable-length spacer, scored position-weight-matrix style against an
//! upstream window.

/// Width of each motif box.
pub const BOX_WIDTH: usize = 6;

/// Canonical -35 hexamer.
pub const MINUS35_CONSENSUS: &[u8; BOX_WIDTH] = b"TTGACA";

/// Canonical -10 hexamer.
pub const MINUS10_CONSENSUS: &[u8; BOX_WIDTH] = b"TATAAT";

/// Allowed spacer lengths between the two boxes.
pub const MIN_SPACER: usize = 15;
pub const MAX_SPACER: usize = 21;

/// Default model threshold on the normalized combined box score.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Best-scoring placement of the two boxes within one upstream window.
#[derive(Debug, Clone, PartialEq)]
pub struct PromoterMatch {
    pub minus35: [u8; BOX_WIDTH],
    pub minus10: [u8; BOX_WIDTH],
    /// Spacer length between the boxes.
    pub gap: usize,
    /// Normalized combined score in [0, 1].
    pub score: f64,
}

/// External promoter-prediction engine contract. The default model scores
/// with `&self` and keeps no per-call state, so one instance may be shared
/// across workers; a stateful engine would need one instance per worker.
pub trait PromoterModel: Send + Sync {
    fn best_match(&self, window: &[u8]) -> Option<PromoterMatch>;
}

// Log-odds weights for one box against a uniform background. Built from a
// pseudocount-smoothed consensus observation, so the normalized score of a
// window degrades linearly with its mismatch count.
#[derive(Debug, Clone)]
struct BoxWeights {
    matrix: [[f64; 4]; BOX_WIDTH],
    min_score: f64,
    max_score: f64,
}

const CONSENSUS_FREQ: f64 = 0.91;
const OTHER_FREQ: f64 = 0.03;
const BACKGROUND: f64 = 0.25;

fn base_index(base: u8) -> Option<usize> {
    match base.to_ascii_uppercase() {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

impl BoxWeights {
    fn from_consensus(consensus: &[u8; BOX_WIDTH]) -> Self {
        let hit = f64::log2(CONSENSUS_FREQ / BACKGROUND);
        let miss = f64::log2(OTHER_FREQ / BACKGROUND);
        let mut matrix = [[miss; 4]; BOX_WIDTH];
        for (pos, &base) in consensus.iter().enumerate() {
            let idx = base_index(base).expect("consensus boxes are ACGT");
            matrix[pos][idx] = hit;
        }
        BoxWeights {
            matrix,
            min_score: miss * BOX_WIDTH as f64,
            max_score: hit * BOX_WIDTH as f64,
        }
    }

    // Normalized score of one box-width slice in [0, 1]. Bases outside
    // ACGT (including the extractor's zeroed ambiguity bytes) take the
    // worst-case weight so garbage windows cannot score as promoters.
    fn score(&self, window: &[u8]) -> f64 {
        let raw: f64 = window
            .iter()
            .enumerate()
            .map(|(pos, &base)| match base_index(base) {
                Some(idx) => self.matrix[pos][idx],
                None => self.min_score / BOX_WIDTH as f64,
            })
            .sum();
        (raw - self.min_score) / (self.max_score - self.min_score)
    }
}

/// Default sigma70 two-box model over the canonical -35/-10 hexamers.
#[derive(Debug, Clone)]
pub struct Sigma70Model {
    minus35: BoxWeights,
    minus10: BoxWeights,
    threshold: f64,
}

impl Sigma70Model {
    pub fn new(threshold: f64) -> Self {
        Sigma70Model {
            minus35: BoxWeights::from_consensus(MINUS35_CONSENSUS),
            minus10: BoxWeights::from_consensus(MINUS10_CONSENSUS),
            threshold,
        }
    }
}

impl Default for Sigma70Model {
    fn default() -> Self {
        Sigma70Model::new(DEFAULT_THRESHOLD)
    }
}

impl PromoterModel for Sigma70Model {
    fn best_match(&self, window: &[u8]) -> Option<PromoterMatch> {
        let footprint = 2 * BOX_WIDTH + MIN_SPACER;
        if window.len() < footprint {
            return None;
        }

        let mut best: Option<PromoterMatch> = None;
        for start35 in 0..=window.len() - footprint {
            let minus35 = &window[start35..start35 + BOX_WIDTH];
            let s35 = self.minus35.score(minus35);
            for spacer in MIN_SPACER..=MAX_SPACER {
                let start10 = start35 + BOX_WIDTH + spacer;
                if start10 + BOX_WIDTH > window.len() {
                    break;
                }
                let minus10 = &window[start10..start10 + BOX_WIDTH];
                let score = (s35 + self.minus10.score(minus10)) / 2.0;
                if best.as_ref().map_or(true, |b| score > b.score) {
                    best = Some(PromoterMatch {
                        minus35: minus35.try_into().expect("box width"),
                        minus10: minus10.try_into().expect("box width"),
                        gap: spacer,
                        score,
                    });
                }
            }
        }

        best.filter(|m| m.score >= self.threshold)
    }
}
