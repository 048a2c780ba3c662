use crate::model::Record;

use super::BaselineError;

pub const DEFAULT_SPLIT_RATIO: f64 = 0.85;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetSplit {
    pub training: Vec<Record>,
    pub testing: Vec<Record>,
}

pub fn validate_ratio(ratio: f64) -> Result<(), BaselineError> {
    if ratio > 0.0 && ratio <= 1.0 {
        Ok(())
    } else {
        Err(BaselineError::Configuration(format!(
            "split ratio must be in (0, 1], got {ratio}"
        )))
    }
}

/// Number of leading records assigned to training: `floor(ratio * n)`.
pub fn train_len(n: usize, ratio: f64) -> usize {
    ((ratio * n as f64).floor() as usize).min(n)
}

pub fn split_records(mut records: Vec<Record>, ratio: f64) -> Result<DatasetSplit, BaselineError> {
    validate_ratio(ratio)?;
    let testing = records.split_off(train_len(records.len(), ratio));
    Ok(DatasetSplit {
        training: records,
        testing,
    })
}
