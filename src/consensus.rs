//! Thread-safe accumulation of positional promoter consensus statistics,
//! keyed by reference gene name plus the global `"all"` entry.

use crate::promoter::{PromoterMatch, BOX_WIDTH};
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::sync::Mutex;

/// Key of the aggregate entry spanning every reference gene.
pub const ALL_KEY: &str = "all";

const BASES: [u8; 4] = *b"ACGT";

/// Running positional statistics for one key. The combine operation is a
/// commutative monoid: `add` folds in one match, `absorb` folds in another
/// entry, and any application order over the same multiset of matches yields
/// bit-identical contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusEntry {
    minus35: [[u64; 4]; BOX_WIDTH],
    minus10: [[u64; 4]; BOX_WIDTH],
    spacer_sum: u64,
    matches: u64,
}

impl Default for ConsensusEntry {
    fn default() -> Self {
        ConsensusEntry {
            minus35: [[0; 4]; BOX_WIDTH],
            minus10: [[0; 4]; BOX_WIDTH],
            spacer_sum: 0,
            matches: 0,
        }
    }
}

fn count_box(counts: &mut [[u64; 4]; BOX_WIDTH], observed: &[u8; BOX_WIDTH]) {
    for (pos, &base) in observed.iter().enumerate() {
        if let Some(idx) = BASES.iter().position(|&b| b == base.to_ascii_uppercase()) {
            counts[pos][idx] += 1;
        }
    }
}

fn consensus_base(counts: &[u64; 4]) -> char {
    let best = counts
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
        .map(|(idx, &count)| (idx, count));
    match best {
        Some((idx, count)) if count > 0 => BASES[idx] as char,
        _ => '-',
    }
}

fn format_box(counts: &[[u64; 4]; BOX_WIDTH]) -> String {
    counts
        .iter()
        .map(|position| consensus_base(position).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

impl ConsensusEntry {
    /// Fold one accepted promoter match into the statistics.
    pub fn add(&mut self, m: &PromoterMatch) {
        count_box(&mut self.minus35, &m.minus35);
        count_box(&mut self.minus10, &m.minus10);
        self.spacer_sum += m.gap as u64;
        self.matches += 1;
    }

    /// Fold another entry into this one.
    pub fn absorb(&mut self, other: &ConsensusEntry) {
        for (mine, theirs) in self.minus35.iter_mut().zip(&other.minus35) {
            for (a, b) in mine.iter_mut().zip(theirs) {
                *a += b;
            }
        }
        for (mine, theirs) in self.minus10.iter_mut().zip(&other.minus10) {
            for (a, b) in mine.iter_mut().zip(theirs) {
                *a += b;
            }
        }
        self.spacer_sum += other.spacer_sum;
        self.matches += other.matches;
    }

    pub fn matches(&self) -> u64 {
        self.matches
    }

    fn average_spacer(&self) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            self.spacer_sum as f64 / self.matches as f64
        }
    }
}

impl fmt::Display for ConsensusEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Consensus: -35: {} gap: {:.1} -10: {}  ({} matches)",
            format_box(&self.minus35),
            self.average_spacer(),
            format_box(&self.minus10),
            self.matches
        )
    }
}

/// Worker-local, lock-free partial aggregate. Built over the same fixed key
/// set as the shared [`Consensus`] and merged into it at the join barrier.
pub struct LocalConsensus {
    entries: HashMap<String, ConsensusEntry>,
}

impl LocalConsensus {
    pub fn new(keys: &[String]) -> Self {
        LocalConsensus {
            entries: keys
                .iter()
                .map(|k| (k.clone(), ConsensusEntry::default()))
                .collect(),
        }
    }

    pub fn add_match(&mut self, name: &str, m: &PromoterMatch) -> Result<()> {
        for key in [name, ALL_KEY] {
            self.entries
                .get_mut(key)
                .ok_or_else(|| anyhow!("Unknown consensus key {key:?}"))?
                .add(m);
        }
        Ok(())
    }
}

/// Shared consensus aggregator. The key set is fixed at construction; only
/// entry contents mutate afterwards, each under its own lock, so updates for
/// one key are linearizable without a process-wide critical section.
pub struct Consensus {
    order: Vec<String>,
    entries: HashMap<String, Mutex<ConsensusEntry>>,
}

impl Consensus {
    /// Create one zeroed entry per key. `keys` is the catalog's key set and
    /// already ends with [`ALL_KEY`].
    pub fn new(keys: &[String]) -> Self {
        Consensus {
            order: keys.to_vec(),
            entries: keys
                .iter()
                .map(|k| (k.clone(), Mutex::new(ConsensusEntry::default())))
                .collect(),
        }
    }

    /// The key set, in report order.
    pub fn keys(&self) -> &[String] {
        &self.order
    }

    /// Fold one match into `name` and [`ALL_KEY`]. Locks are taken per key,
    /// always in that order.
    pub fn add_match(&self, name: &str, m: &PromoterMatch) -> Result<()> {
        for key in [name, ALL_KEY] {
            let mut entry = self
                .entries
                .get(key)
                .ok_or_else(|| anyhow!("Unknown consensus key {key:?}"))?
                .lock()
                .map_err(|_| anyhow!("Consensus entry {key:?} poisoned"))?;
            entry.add(m);
        }
        Ok(())
    }

    /// Merge a worker-local partial aggregate.
    pub fn merge_local(&self, local: &LocalConsensus) -> Result<()> {
        for (key, partial) in &local.entries {
            let mut entry = self
                .entries
                .get(key)
                .ok_or_else(|| anyhow!("Unknown consensus key {key:?}"))?
                .lock()
                .map_err(|_| anyhow!("Consensus entry {key:?} poisoned"))?;
            entry.absorb(partial);
        }
        Ok(())
    }

    /// Read view of every entry in report order. Only meaningful once all
    /// writers have been joined.
    pub fn snapshot(&self) -> Result<Vec<(String, ConsensusEntry)>> {
        self.order
            .iter()
            .map(|key| {
                let entry = self.entries[key]
                    .lock()
                    .map_err(|_| anyhow!("Consensus entry {key:?} poisoned"))?;
                Ok((key.clone(), entry.clone()))
            })
            .collect()
    }
}

/// Write the per-key report, one line per key.
pub fn write_report<W: Write>(writer: &mut W, snapshot: &[(String, ConsensusEntry)]) -> Result<()> {
    for (key, entry) in snapshot {
        writeln!(writer, "{key} {entry}")?;
    }
    Ok(())
}
