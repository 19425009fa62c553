//! GenBank record adapter. Format parsing itself is owned by `gb-io`; this
//! module only maps its output onto the pipeline's data model.

use crate::model::{Gene, GenomeRecord, Strand};
use anyhow::{bail, Context, Result};
use gb_io::seq::{Feature, Location, Seq};
use std::path::Path;

/// External genome record parser contract. `parse` fails on unreadable or
/// malformed input; callers decide whether that skips the file or aborts.
pub trait RecordSource: Send + Sync {
    fn parse(&self, path: &Path) -> Result<GenomeRecord>;
}

/// Default source reading GenBank flat files through `gb-io`. One genome
/// record per file; trailing records in multi-record files are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenbankSource;

impl RecordSource for GenbankSource {
    fn parse(&self, path: &Path) -> Result<GenomeRecord> {
        let mut seqs = gb_io::reader::parse_file(path)
            .with_context(|| format!("Cannot parse GenBank file {}", path.display()))?;
        if seqs.is_empty() {
            bail!("GenBank file {} contains no records", path.display());
        }
        Ok(record_from_seq(seqs.swap_remove(0)))
    }
}

fn record_from_seq(seq: Seq) -> GenomeRecord {
    let len = seq.seq.len();
    let genes = seq
        .features
        .iter()
        .filter(|f| f.kind.to_string().eq_ignore_ascii_case("CDS"))
        .filter_map(|f| gene_from_feature(f, len))
        .collect();
    GenomeRecord {
        nucleotides: seq.seq,
        genes,
    }
}

// Maps one CDS feature to a Gene. Features without a gene name, without a
// translation, or with unresolvable bounds are skipped. The stored location
// is the 1-based offset of the first transcribed base measured along the
// gene's own strand, which is what the upstream extractor expects.
fn gene_from_feature(feature: &Feature, seq_len: usize) -> Option<Gene> {
    let name = feature.qualifier_values("gene".into()).next()?.to_string();
    let translation: Vec<u8> = feature
        .qualifier_values("translation".into())
        .next()?
        .bytes()
        .filter(u8::is_ascii_alphabetic)
        .collect();

    let (start, end) = feature.location.find_bounds().ok()?;
    if start < 0 || end as usize > seq_len {
        return None;
    }
    let (location, strand) = match feature.location {
        Location::Complement(_) => (seq_len - end as usize + 1, Strand::Reverse),
        _ => (start as usize + 1, Strand::Forward),
    };

    Some(Gene {
        name,
        location,
        strand,
        sequence: translation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gb_io::seq::{Feature, Location, Seq};

    fn cds(location: Location, name: &str, translation: &str) -> Feature {
        Feature {
            kind: "CDS".into(),
            location,
            qualifiers: vec![
                ("gene".into(), Some(name.to_string())),
                ("translation".into(), Some(translation.to_string())),
            ],
        }
    }

    fn seq_with_features(nucleotides: &[u8], features: Vec<Feature>) -> Seq {
        let mut seq = Seq::empty();
        seq.name = Some("test_record".to_string());
        seq.seq = nucleotides.to_vec();
        seq.len = Some(nucleotides.len());
        seq.features = features;
        seq
    }

    #[test]
    fn forward_cds_maps_to_one_based_start() {
        let seq = seq_with_features(
            &vec![b'A'; 100],
            vec![cds(Location::simple_range(40, 70), "geneX", "MKLV")],
        );
        let record = record_from_seq(seq);
        assert_eq!(record.genes.len(), 1);
        let gene = &record.genes[0];
        assert_eq!(gene.name, "geneX");
        assert_eq!(gene.location, 41);
        assert_eq!(gene.strand, Strand::Forward);
        assert_eq!(gene.sequence, b"MKLV");
    }

    #[test]
    fn reverse_cds_location_is_measured_from_the_far_end() {
        let seq = seq_with_features(
            &vec![b'A'; 100],
            vec![cds(
                Location::Complement(Box::new(Location::simple_range(40, 70))),
                "geneY",
                "MKLV",
            )],
        );
        let record = record_from_seq(seq);
        let gene = &record.genes[0];
        // 100 - 70 + 1: 1-based start along the reverse strand.
        assert_eq!(gene.location, 31);
        assert_eq!(gene.strand, Strand::Reverse);
    }

    #[test]
    fn features_without_gene_or_translation_are_skipped() {
        let mut no_translation = cds(Location::simple_range(0, 9), "geneX", "MK");
        no_translation.qualifiers.retain(|(k, _)| k.as_ref() != "translation");
        let unnamed = Feature {
            kind: "CDS".into(),
            location: Location::simple_range(10, 19),
            qualifiers: vec![("translation".into(), Some("MK".to_string()))],
        };
        let non_cds = Feature {
            kind: "tRNA".into(),
            location: Location::simple_range(20, 29),
            qualifiers: vec![
                ("gene".into(), Some("geneZ".to_string())),
                ("translation".into(), Some("MK".to_string())),
            ],
        };
        let seq = seq_with_features(&vec![b'A'; 50], vec![no_translation, unnamed, non_cds]);
        assert!(record_from_seq(seq).genes.is_empty());
    }

    #[test]
    fn multiline_translations_are_joined() {
        let seq = seq_with_features(
            &vec![b'A'; 50],
            vec![cds(Location::simple_range(0, 30), "geneX", "MKLV\nGHST")],
        );
        let record = record_from_seq(seq);
        assert_eq!(record.genes[0].sequence, b"MKLVGHST");
    }

    #[test]
    fn round_trips_through_the_genbank_writer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.gbk");
        let seq = seq_with_features(
            &vec![b'a'; 120],
            vec![cds(Location::simple_range(60, 90), "geneX", "MKLVGHST")],
        );
        let file = std::fs::File::create(&path).unwrap();
        gb_io::writer::write(file, &seq).unwrap();

        let record = GenbankSource.parse(&path).unwrap();
        assert_eq!(record.nucleotides.len(), 120);
        assert_eq!(record.genes.len(), 1);
        assert_eq!(record.genes[0].location, 61);
    }

    #[test]
    fn unparseable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.gbk");
        std::fs::write(&path, "this is not genbank\n").unwrap();
        assert!(GenbankSource.parse(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(GenbankSource.parse(Path::new("/no/such/file.gbk")).is_err());
    }
}
