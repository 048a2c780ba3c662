use rusqlite::Connection;

use super::*;

fn universe(ids: &[&str]) -> QualifierUniverse {
    QualifierUniverse::new(ids.iter().map(|id| id.to_string()).collect())
        .expect("universe should build")
}

fn seeded_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("in-memory db should open");
    connection
        .execute_batch(
            "
            CREATE TABLE citations (
              id INTEGER PRIMARY KEY,
              journal_id INTEGER NOT NULL,
              date_completed TEXT,
              indexing_method TEXT
            );
            CREATE TABLE mesh_descriptors (id INTEGER PRIMARY KEY, ui TEXT NOT NULL);
            CREATE TABLE mesh_qualifiers (id INTEGER PRIMARY KEY, ui TEXT NOT NULL);
            CREATE TABLE mesh_topics (
              id INTEGER PRIMARY KEY,
              mesh_descriptor_id INTEGER NOT NULL,
              mesh_qualifier_id INTEGER
            );
            CREATE TABLE citation_mesh_topics (
              citation_id INTEGER NOT NULL,
              mesh_topic_id INTEGER NOT NULL
            );

            INSERT INTO citations VALUES
              (1, 100, '2016-03-01', 'Human'),
              (2, 200, '2014-12-31', 'Human'),
              (3, 300, '2019-07-15', 'Automated'),
              (4, 100, '2021-01-02', 'Human');
            INSERT INTO mesh_descriptors VALUES (1, 'D000001'), (2, 'D000002');
            INSERT INTO mesh_qualifiers VALUES (1, 'Q000001'), (2, 'Q000002'), (3, 'Q000003');
            INSERT INTO mesh_topics VALUES
              (1, 1, 1),
              (2, 1, 2),
              (3, 2, 3),
              (4, 2, 1);
            INSERT INTO citation_mesh_topics VALUES
              (1, 1),
              (1, 3),
              (2, 1),
              (3, 2),
              (4, 4),
              (4, 2);
            ",
        )
        .expect("fixture schema should load");
    connection
}

#[test]
fn query_filters_by_universe_year_and_indexing_method() {
    let connection = seeded_connection();
    let records = query_records(&connection, &universe(&["Q000001", "Q000002"])).unwrap();

    assert_eq!(
        records,
        vec![
            Record::new("D000001", "Q000001", 100, 2016),
            Record::new("D000002", "Q000001", 100, 2021),
            Record::new("D000001", "Q000002", 100, 2021),
        ]
    );
}

#[test]
fn query_returns_nothing_for_unmatched_universe() {
    let connection = seeded_connection();
    let records = query_records(&connection, &universe(&["Q999999"])).unwrap();
    assert!(records.is_empty());
}

#[test]
fn connection_params_require_host_and_database() {
    let missing_host = ConnectionParams {
        database: Some("medline.sqlite".to_string()),
        ..ConnectionParams::default()
    };
    assert!(matches!(
        missing_host.database_path(),
        Err(BaselineError::Configuration(_))
    ));

    let blank_database = ConnectionParams {
        host: Some("/srv/medline".to_string()),
        database: Some("  ".to_string()),
        ..ConnectionParams::default()
    };
    assert!(blank_database.database_path().is_err());

    let complete = ConnectionParams {
        host: Some("/srv/medline".to_string()),
        database: Some("medline.sqlite".to_string()),
        ..ConnectionParams::default()
    };
    assert_eq!(
        complete.database_path().unwrap(),
        PathBuf::from("/srv/medline/medline.sqlite")
    );
}

#[test]
fn sqlite_source_fails_fast_without_connection_params() {
    let source = SqliteRecordSource::new(ConnectionParams::default());
    let err = source
        .fetch(&universe(&["Q000001"]))
        .expect_err("fetch should fail without params");
    assert!(matches!(
        err.downcast_ref::<BaselineError>(),
        Some(BaselineError::Configuration(_))
    ));
}

#[test]
fn sqlite_source_reads_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("medline.sqlite");
    {
        let connection = seeded_connection();
        connection
            .execute("VACUUM INTO ?1", [db_path.to_string_lossy().into_owned()])
            .unwrap();
    }

    let source = SqliteRecordSource::new(ConnectionParams {
        host: Some(dir.path().to_string_lossy().into_owned()),
        database: Some("medline.sqlite".to_string()),
        user: Some("reader".to_string()),
        password: None,
    });
    let records = source.fetch(&universe(&["Q000002"])).unwrap();
    assert_eq!(records, vec![Record::new("D000001", "Q000002", 100, 2021)]);
}
