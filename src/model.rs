/// Orientation of an annotated gene on its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

/// A gene annotated on a genome record. `location` is the 1-based offset of
/// the gene's first transcribed base, measured along the strand the gene is
/// read on (for reverse-strand genes that is the distance from the 3' end of
/// the forward sequence).
#[derive(Debug, Clone)]
pub struct Gene {
    pub name: String,
    pub location: usize,
    pub strand: Strand,
    /// Peptide sequence of the translated product.
    pub sequence: Vec<u8>,
}

/// A catalog entry used as a homology query. Reference genes carry no
/// location or strand, so they can never be fed to the upstream extractor.
#[derive(Debug, Clone)]
pub struct ReferenceGene {
    pub name: String,
    pub sequence: Vec<u8>,
}

/// One parsed genome record: the full nucleotide sequence plus its annotated
/// genes.
#[derive(Debug, Clone, Default)]
pub struct GenomeRecord {
    pub nucleotides: Vec<u8>,
    pub genes: Vec<Gene>,
}
