//! Naive qualifier-assignment baseline: split, estimate, score.
//!
//! The estimator draws one Bernoulli outcome per observed (group, qualifier)
//! pair from the training split, and the scorer replays those outcomes
//! against the held-out split.

use thiserror::Error;

mod estimate;
mod score;
mod split;
mod universe;

pub use estimate::{
    BernoulliSampler, CooccurrenceCounts, GroupKey, Grouping, OutcomeSampler, ProbabilityTable,
    estimate,
};
pub use score::{EPSILON, RecordScore, ScoreReport, label_vectors, score_records, score_vectors};
pub use split::{DEFAULT_SPLIT_RATIO, DatasetSplit, split_records, train_len, validate_ratio};
pub use universe::QualifierUniverse;

#[derive(Debug, Error)]
pub enum BaselineError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("qualifier '{0}' is not part of the qualifier universe")]
    UnknownQualifier(String),
    #[error("testing split is empty; nothing to score")]
    EmptyTestingSplit,
    #[error("label vectors differ in length: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("invalid outcome probability {0}")]
    InvalidProbability(f64),
}
