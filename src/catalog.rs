use crate::model::ReferenceGene;
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Load the reference gene catalog: alternating name/sequence line pairs
/// until end of input. A name line without a matching sequence line is a
/// parse error rather than a silently dropped entry.
pub fn load_reference_genes(path: impl AsRef<Path>) -> Result<Vec<ReferenceGene>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Cannot open reference gene file {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut genes = Vec::new();
    let mut lines = reader.lines();
    loop {
        let name = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        if name.is_empty() {
            // Blank trailing input is not an error.
            continue;
        }
        let sequence = match lines.next() {
            Some(line) => line?,
            None => bail!(
                "Malformed reference gene file {}: name {:?} has no sequence line",
                path.display(),
                name
            ),
        };
        genes.push(ReferenceGene {
            name,
            sequence: sequence.into_bytes(),
        });
    }

    Ok(genes)
}

/// The aggregator key set implied by a catalog: every gene name plus "all".
pub fn consensus_keys(genes: &[ReferenceGene]) -> Vec<String> {
    let mut keys: Vec<String> = genes.iter().map(|g| g.name.clone()).collect();
    keys.push("all".to_string());
    keys
}
