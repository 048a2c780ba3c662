use serde::Serialize;

use crate::model::Record;

use super::estimate::ProbabilityTable;
use super::universe::QualifierUniverse;
use super::BaselineError;

pub const EPSILON: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecordScore {
    pub matches: usize,
    pub predictions: usize,
    pub actual: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Aggregate metrics: per-record means, each further divided by the label count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreReport {
    pub f1: f64,
    pub precision: f64,
    pub recall: f64,
    pub example_count: usize,
    pub label_count: usize,
}

impl ScoreReport {
    pub fn render(&self) -> String {
        format!(
            "F1 Score:\t{:.6}\nPrecision:\t{:.6}\nRecall:\t\t{:.6}",
            self.f1, self.precision, self.recall
        )
    }
}

pub fn label_vectors(
    table: &ProbabilityTable,
    universe: &QualifierUniverse,
    record: &Record,
) -> Result<(Vec<u8>, Vec<u8>), BaselineError> {
    let true_index = universe.index_of(&record.qualifier_id)?;

    let mut y_true = vec![0_u8; universe.len()];
    y_true[true_index] = 1;

    let key = table.grouping().key_for(record);
    let y_pred = universe
        .iter()
        .map(|qualifier_id| table.outcome(&key, qualifier_id))
        .collect();

    Ok((y_true, y_pred))
}

/// Precision, recall and F1 for one pair of 0/1 vectors.
///
/// `matches` counts every position where the vectors agree, negatives
/// included, so these are not the textbook definitions.
pub fn score_vectors(y_true: &[u8], y_pred: &[u8]) -> Result<RecordScore, BaselineError> {
    if y_true.len() != y_pred.len() {
        return Err(BaselineError::LengthMismatch {
            expected: y_true.len(),
            found: y_pred.len(),
        });
    }

    let mut matches = 0_usize;
    let mut predictions = 0_usize;
    let mut actual = 0_usize;

    for (truth, pred) in y_true.iter().zip(y_pred) {
        if truth == pred {
            matches += 1;
        }
        if *truth == 1 {
            actual += 1;
        }
        if *pred == 1 {
            predictions += 1;
        }
    }

    let precision = matches as f64 / (predictions as f64 + EPSILON);
    let recall = matches as f64 / (actual as f64 + EPSILON);
    let f1 = 2.0 * precision * recall / (precision + recall + EPSILON);

    Ok(RecordScore {
        matches,
        predictions,
        actual,
        precision,
        recall,
        f1,
    })
}

pub fn score_records(
    table: &ProbabilityTable,
    universe: &QualifierUniverse,
    testing: &[Record],
) -> Result<ScoreReport, BaselineError> {
    if testing.is_empty() {
        return Err(BaselineError::EmptyTestingSplit);
    }

    let mut f1_sum = 0.0;
    let mut precision_sum = 0.0;
    let mut recall_sum = 0.0;

    for record in testing {
        let (y_true, y_pred) = label_vectors(table, universe, record)?;
        let score = score_vectors(&y_true, &y_pred)?;
        f1_sum += score.f1;
        precision_sum += score.precision;
        recall_sum += score.recall;
    }

    let examples = testing.len() as f64;
    let labels = universe.len() as f64;

    Ok(ScoreReport {
        f1: f1_sum / examples / labels,
        precision: precision_sum / examples / labels,
        recall: recall_sum / examples / labels,
        example_count: testing.len(),
        label_count: universe.len(),
    })
}
