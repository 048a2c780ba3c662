use std::path::PathBuf;

use anyhow::Result;

use crate::baseline::{BaselineError, QualifierUniverse};
use crate::model::Record;

mod sqlite;
#[cfg(test)]
mod tests;

pub use sqlite::{SqliteRecordSource, query_records};

pub trait RecordSource {
    fn fetch(&self, universe: &QualifierUniverse) -> Result<Vec<Record>>;
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionParams {
    pub host: Option<String>,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl ConnectionParams {
    /// Resolves the database file location; host and database are both required.
    pub fn database_path(&self) -> Result<PathBuf, BaselineError> {
        match (non_empty(&self.host), non_empty(&self.database)) {
            (Some(host), Some(database)) => Ok(PathBuf::from(host).join(database)),
            _ => Err(BaselineError::Configuration(
                "missing hostname and database; pass --hostname and --database".to_string(),
            )),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}
