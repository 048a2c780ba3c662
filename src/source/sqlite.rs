use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags, params_from_iter};
use tracing::{debug, info};

use crate::baseline::QualifierUniverse;
use crate::model::Record;

use super::{ConnectionParams, RecordSource};

pub const MIN_COMPLETED_YEAR: i32 = 2015;
pub const INDEXING_METHOD: &str = "Human";

/// Reads records from a local SQLite mirror of the MEDLINE citation tables.
#[derive(Debug, Clone)]
pub struct SqliteRecordSource {
    params: ConnectionParams,
}

impl SqliteRecordSource {
    pub fn new(params: ConnectionParams) -> Self {
        Self { params }
    }
}

impl RecordSource for SqliteRecordSource {
    fn fetch(&self, universe: &QualifierUniverse) -> Result<Vec<Record>> {
        let db_path = self.params.database_path()?;

        if self.params.user.is_some() || self.params.password.is_some() {
            debug!("sqlite connections ignore username and password");
        }

        let connection = Connection::open_with_flags(&db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .with_context(|| format!("failed to open {}", db_path.display()))?;
        info!(path = %db_path.display(), "connected to citation database");

        let records = query_records(&connection, universe)?;
        info!(records = records.len(), "fetched citation records");
        Ok(records)
    }
}

/// Selects human-indexed records completed on or after `MIN_COMPLETED_YEAR`
/// whose qualifier belongs to `universe`.
pub fn query_records(connection: &Connection, universe: &QualifierUniverse) -> Result<Vec<Record>> {
    let placeholders = vec!["?"; universe.len()].join(", ");
    let sql = format!(
        "
        SELECT
          md.ui,
          mq.ui,
          c.journal_id,
          CAST(strftime('%Y', c.date_completed) AS INTEGER)
        FROM citation_mesh_topics AS cmt
        JOIN citations AS c ON cmt.citation_id = c.id
        JOIN mesh_topics AS mt ON cmt.mesh_topic_id = mt.id
        JOIN mesh_descriptors AS md ON mt.mesh_descriptor_id = md.id
        JOIN mesh_qualifiers AS mq ON mt.mesh_qualifier_id = mq.id
        WHERE CAST(strftime('%Y', c.date_completed) AS INTEGER) >= {MIN_COMPLETED_YEAR}
          AND c.indexing_method = '{INDEXING_METHOD}'
          AND mq.ui IN ({placeholders})
        ORDER BY cmt.rowid
        "
    );

    let mut statement = connection
        .prepare(&sql)
        .context("failed to prepare citation record query")?;
    let rows = statement
        .query_map(params_from_iter(universe.iter()), |row| {
            Ok(Record::new(
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get(2)?,
                row.get(3)?,
            ))
        })
        .context("failed to run citation record query")?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row.context("failed to decode citation record row")?);
    }
    Ok(records)
}
