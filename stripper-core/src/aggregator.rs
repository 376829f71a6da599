use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::Serialize;

use stripper_rules::PassType;

/// Tallies and distinct keyword signatures for one shader pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PassLogEntry {
    pub include_count: usize,
    pub strip_count: usize,
    pub include_variants: BTreeSet<String>,
    pub strip_variants: BTreeSet<String>,
}

impl PassLogEntry {
    fn merge(&mut self, other: Self) {
        self.include_count += other.include_count;
        self.strip_count += other.strip_count;
        self.include_variants.extend(other.include_variants);
        self.strip_variants.extend(other.strip_variants);
    }
}

/// Handle to a pass entry inside a [`RunAggregator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSlot(usize);

/// Run-scoped bookkeeping of every keep/strip decision.
///
/// Pass entries are kept in first-seen order. Workers that evaluate passes
/// in parallel each own an aggregator and [`merge`](Self::merge) them at the end.
#[derive(Debug, Clone)]
pub struct RunAggregator {
    entries: Vec<(String, PassLogEntry)>,
    index: HashMap<String, usize>,
    total_included: usize,
    total_stripped: usize,
    strip_time: Duration,
    started: Instant,
}

impl Default for RunAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl RunAggregator {
    /// Creates an empty aggregator and starts the build timer.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            total_included: 0,
            total_stripped: 0,
            strip_time: Duration::ZERO,
            started: Instant::now(),
        }
    }

    /// Report key of a shader pass: `<shader>::<pass type>::<pass name>`.
    pub fn pass_key(shader_name: &str, pass_type: PassType, pass_name: &str) -> String {
        format!("{shader_name}::{pass_type}::{pass_name}")
    }

    /// Returns the slot for `key`, creating an empty entry on first use.
    pub fn slot(&mut self, key: &str) -> PassSlot {
        if let Some(&i) = self.index.get(key) {
            return PassSlot(i);
        }
        let i = self.entries.len();
        self.entries.push((key.to_owned(), PassLogEntry::default()));
        self.index.insert(key.to_owned(), i);
        PassSlot(i)
    }

    /// Records one decision for the pass behind `slot`.
    pub fn record(&mut self, slot: PassSlot, signature: String, kept: bool) {
        let entry = &mut self.entries[slot.0].1;
        if kept {
            entry.include_count += 1;
            entry.include_variants.insert(signature);
            self.total_included += 1;
        } else {
            entry.strip_count += 1;
            entry.strip_variants.insert(signature);
            self.total_stripped += 1;
        }
    }

    pub fn add_strip_time(&mut self, elapsed: Duration) {
        self.strip_time += elapsed;
    }

    /// Folds another aggregator into this one.
    ///
    /// Keys new to `self` are appended in `other`'s order. The build timer of
    /// `self` is kept.
    pub fn merge(&mut self, other: Self) {
        for (key, entry) in other.entries {
            let slot = self.slot(&key);
            self.entries[slot.0].1.merge(entry);
        }
        self.total_included += other.total_included;
        self.total_stripped += other.total_stripped;
        self.strip_time += other.strip_time;
    }

    /// Pass entries in first-seen order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &PassLogEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn entry(&self, key: &str) -> Option<&PassLogEntry> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_included(&self) -> usize {
        self.total_included
    }

    pub fn total_stripped(&self) -> usize {
        self.total_stripped
    }

    /// Time spent evaluating variants.
    pub fn strip_time(&self) -> Duration {
        self.strip_time
    }

    /// Time since the aggregator was created or last reset.
    pub fn build_time(&self) -> Duration {
        self.started.elapsed()
    }

    /// Clears all state and restarts the build timer.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
