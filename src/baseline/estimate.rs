use std::collections::BTreeMap;

use rand::distr::{Bernoulli, Distribution};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};
use tracing::debug;

use crate::model::Record;

use super::BaselineError;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Grouping {
    /// `(journal_id, descriptor_id)`
    Journals,
    /// `descriptor_id` alone
    Descriptors,
}

impl Grouping {
    pub fn from_flag(use_journals: bool) -> Self {
        if use_journals {
            Self::Journals
        } else {
            Self::Descriptors
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Journals => "journals",
            Self::Descriptors => "descriptors",
        }
    }

    pub fn key_for(self, record: &Record) -> GroupKey {
        match self {
            Self::Journals => GroupKey::Journal {
                journal_id: record.journal_id,
                descriptor_id: record.descriptor_id.clone(),
            },
            Self::Descriptors => GroupKey::Descriptor(record.descriptor_id.clone()),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum GroupKey {
    Descriptor(String),
    Journal {
        journal_id: i64,
        descriptor_id: String,
    },
}

#[derive(Debug, Clone)]
pub struct CooccurrenceCounts {
    grouping: Grouping,
    totals: BTreeMap<GroupKey, usize>,
    pairs: BTreeMap<GroupKey, BTreeMap<String, usize>>,
}

impl CooccurrenceCounts {
    pub fn from_records(grouping: Grouping, records: &[Record]) -> Self {
        let mut totals: BTreeMap<GroupKey, usize> = BTreeMap::new();
        let mut pairs: BTreeMap<GroupKey, BTreeMap<String, usize>> = BTreeMap::new();

        for record in records {
            let key = grouping.key_for(record);
            *pairs
                .entry(key.clone())
                .or_default()
                .entry(record.qualifier_id.clone())
                .or_insert(0) += 1;
            *totals.entry(key).or_insert(0) += 1;
        }

        Self {
            grouping,
            totals,
            pairs,
        }
    }

    pub fn grouping(&self) -> Grouping {
        self.grouping
    }

    pub fn group_count(&self) -> usize {
        self.totals.len()
    }

    pub fn total(&self, key: &GroupKey) -> usize {
        self.totals.get(key).copied().unwrap_or(0)
    }

    pub fn occurrences(&self, key: &GroupKey, qualifier_id: &str) -> usize {
        self.pairs
            .get(key)
            .and_then(|qualifiers| qualifiers.get(qualifier_id))
            .copied()
            .unwrap_or(0)
    }

    /// Empirical `P(qualifier | group)`; zero for unseen pairs.
    pub fn frequency(&self, key: &GroupKey, qualifier_id: &str) -> f64 {
        let total = self.total(key);
        if total == 0 {
            return 0.0;
        }
        self.occurrences(key, qualifier_id) as f64 / total as f64
    }

    fn observed(&self) -> impl Iterator<Item = (&GroupKey, &str, f64)> {
        self.pairs.iter().flat_map(move |(key, qualifiers)| {
            qualifiers.keys().map(move |qualifier_id| {
                (key, qualifier_id.as_str(), self.frequency(key, qualifier_id))
            })
        })
    }
}

/// Source of the single Bernoulli draw made for each table entry.
pub trait OutcomeSampler {
    fn sample(&mut self, probability: f64) -> Result<bool, BaselineError>;
}

pub struct BernoulliSampler<R> {
    rng: R,
}

impl<R: Rng> BernoulliSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl BernoulliSampler<StdRng> {
    /// Seeded when `seed` is given, otherwise seeded from the OS.
    pub fn seeded(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(rng)
    }
}

impl<R: Rng> OutcomeSampler for BernoulliSampler<R> {
    fn sample(&mut self, probability: f64) -> Result<bool, BaselineError> {
        let dist =
            Bernoulli::new(probability).map_err(|_| BaselineError::InvalidProbability(probability))?;
        Ok(dist.sample(&mut self.rng))
    }
}

/// Sampled 0/1 outcome per observed (group, qualifier) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityTable {
    grouping: Grouping,
    entries: BTreeMap<GroupKey, BTreeMap<String, u8>>,
}

impl ProbabilityTable {
    pub fn new(grouping: Grouping) -> Self {
        Self {
            grouping,
            entries: BTreeMap::new(),
        }
    }

    pub fn grouping(&self) -> Grouping {
        self.grouping
    }

    pub fn insert(&mut self, key: GroupKey, qualifier_id: impl Into<String>, outcome: bool) {
        self.entries
            .entry(key)
            .or_default()
            .insert(qualifier_id.into(), u8::from(outcome));
    }

    /// Stored outcome, or 0 when the pair was never observed in training.
    pub fn outcome(&self, key: &GroupKey, qualifier_id: &str) -> u8 {
        self.entries
            .get(key)
            .and_then(|qualifiers| qualifiers.get(qualifier_id))
            .copied()
            .unwrap_or(0)
    }

    pub fn group_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn positive_count(&self) -> usize {
        self.entries
            .values()
            .flat_map(BTreeMap::values)
            .filter(|outcome| **outcome == 1)
            .count()
    }

    pub fn to_nested_json(&self) -> Value {
        let mut root = Map::new();
        for (key, qualifiers) in &self.entries {
            let outcomes: Map<String, Value> = qualifiers
                .iter()
                .map(|(qualifier_id, outcome)| (qualifier_id.clone(), Value::from(*outcome)))
                .collect();

            match key {
                GroupKey::Descriptor(descriptor_id) => {
                    root.insert(descriptor_id.clone(), Value::Object(outcomes));
                }
                GroupKey::Journal {
                    journal_id,
                    descriptor_id,
                } => {
                    let journal = root
                        .entry(journal_id.to_string())
                        .or_insert_with(|| Value::Object(Map::new()));
                    if let Value::Object(descriptors) = journal {
                        descriptors.insert(descriptor_id.clone(), Value::Object(outcomes));
                    }
                }
            }
        }
        Value::Object(root)
    }
}

pub fn estimate<S: OutcomeSampler + ?Sized>(
    grouping: Grouping,
    training: &[Record],
    sampler: &mut S,
) -> Result<ProbabilityTable, BaselineError> {
    let counts = CooccurrenceCounts::from_records(grouping, training);
    debug!(
        grouping = counts.grouping().as_str(),
        groups = counts.group_count(),
        records = training.len(),
        "aggregated training co-occurrences"
    );

    let mut table = ProbabilityTable::new(grouping);

    for (key, qualifier_id, frequency) in counts.observed() {
        let outcome = sampler.sample(frequency)?;
        table.insert(key.clone(), qualifier_id, outcome);
    }

    Ok(table)
}
