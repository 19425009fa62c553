use crate::model::{Gene, GenomeRecord, Strand};

/// Longest upstream window ever extracted, in bases.
pub const UPSTREAM_DISTANCE: usize = 250;

// Complement lookup for ACGT in either case. Every other byte maps to 0,
// matching the batch tool's historical passthrough for ambiguity codes.
const COMPLEMENT: [u8; 256] = build_complement();

const fn build_complement() -> [u8; 256] {
    let mut table = [0u8; 256];
    table[b'A' as usize] = b'T';
    table[b'a' as usize] = b't';
    table[b'C' as usize] = b'G';
    table[b'c' as usize] = b'g';
    table[b'G' as usize] = b'C';
    table[b'g' as usize] = b'c';
    table[b'T' as usize] = b'A';
    table[b't' as usize] = b'a';
    table
}

/// Complement of a single base; 0 for anything outside ACGT/acgt.
pub fn complement(base: u8) -> u8 {
    COMPLEMENT[base as usize]
}

/// Extract the strand-aware upstream window of `gene`, of length
/// `min(250, location - 1)`. A gene at location 1 yields an empty window.
///
/// Forward genes read the bases immediately preceding the gene start in
/// original orientation. Reverse genes read the bases genomically after the
/// gene's reverse-strand start, complemented and reversed, which is the
/// upstream region as seen by the reverse-strand transcription machinery.
pub fn upstream_region(record: &GenomeRecord, gene: &Gene) -> Vec<u8> {
    debug_assert!(gene.location >= 1, "gene locations are 1-based");
    let dna = &record.nucleotides;
    let distance = UPSTREAM_DISTANCE.min(gene.location - 1);

    match gene.strand {
        Strand::Forward => dna[gene.location - distance - 1..gene.location - 1].to_vec(),
        Strand::Reverse => {
            let reverse_start = dna.len() - gene.location + distance;
            (0..distance)
                .map(|i| complement(dna[reverse_start - i]))
                .collect()
        }
    }
}
