use serde::{Deserialize, Serialize};

/// One observed assignment of a qualifier to a descriptor within a citation.
///
/// Persisted as a positional `[descriptor_id, qualifier_id, journal_id, year]`
/// array so cache files stay compact and readable by other tooling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RecordRow", into = "RecordRow")]
pub struct Record {
    pub descriptor_id: String,
    pub qualifier_id: String,
    pub journal_id: i64,
    pub year: i32,
}

type RecordRow = (String, String, i64, i32);

impl Record {
    pub fn new(
        descriptor_id: impl Into<String>,
        qualifier_id: impl Into<String>,
        journal_id: i64,
        year: i32,
    ) -> Self {
        Self {
            descriptor_id: descriptor_id.into(),
            qualifier_id: qualifier_id.into(),
            journal_id,
            year,
        }
    }
}

impl From<RecordRow> for Record {
    fn from((descriptor_id, qualifier_id, journal_id, year): RecordRow) -> Self {
        Self {
            descriptor_id,
            qualifier_id,
            journal_id,
            year,
        }
    }
}

impl From<Record> for RecordRow {
    fn from(record: Record) -> Self {
        (
            record.descriptor_id,
            record.qualifier_id,
            record.journal_id,
            record.year,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub ratio: f64,
    #[serde(default)]
    pub qualifiers: Vec<String>,
    pub snapshot_sha256: Option<String>,
    pub snapshot_records: usize,
    pub training_records: usize,
    pub testing_records: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreRunPaths {
    pub cache_root: String,
    pub training_path: String,
    pub testing_path: String,
    pub table_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreRunCounts {
    pub training_records: usize,
    pub testing_records: usize,
    pub table_groups: usize,
    pub table_entries: usize,
    pub table_positive_entries: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub generated_at: String,
    pub cache_state: String,
    pub grouping: String,
    pub seed: Option<u64>,
    pub ratio: f64,
    pub qualifiers: Vec<String>,
    pub f1: f64,
    pub precision: f64,
    pub recall: f64,
    pub paths: ScoreRunPaths,
    pub counts: ScoreRunCounts,
}
