//! FILENAME: storage/src/reader.rs
//! The reader contract and its SQLite implementation.

use composer::BoundQuery;
use report_engine::FlatRecord;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, ToSql};

use crate::error::StorageError;

// ============================================================================
// READER CONTRACT
// ============================================================================

/// Runs a bound statement and returns its flat rows.
///
/// Implementations must execute inside a read-only transaction and bind the
/// query's named parameters; errors are returned verbatim to the caller.
pub trait Reader {
    fn select(&self, query: &BoundQuery) -> Result<Vec<FlatRecord>, StorageError>;
}

// ============================================================================
// SQLITE READER
// ============================================================================

/// Reader over an owned SQLite connection.
pub struct SqliteReader {
    conn: Connection,
}

impl SqliteReader {
    pub fn new(conn: Connection) -> Self {
        SqliteReader { conn }
    }

    pub fn open(path: &str) -> Result<Self, StorageError> {
        Ok(SqliteReader {
            conn: Connection::open(path)?,
        })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(SqliteReader {
            conn: Connection::open_in_memory()?,
        })
    }

    /// The underlying connection, e.g. for seeding fixtures.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl Reader for SqliteReader {
    fn select(&self, query: &BoundQuery) -> Result<Vec<FlatRecord>, StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        let records = run_select(&tx, query);
        // Read-only: the transaction always rolls back.
        tx.finish()?;
        records
    }
}

fn run_select(
    conn: &Connection,
    query: &BoundQuery,
) -> Result<Vec<FlatRecord>, StorageError> {
    let mut stmt = conn.prepare(&query.sql)?;
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let params: Vec<(&str, &dyn ToSql)> = query
        .params
        .iter()
        .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
        .collect();

    let mut records = Vec::new();
    let mut rows = stmt.query(&params[..])?;
    while let Some(row) = rows.next()? {
        let mut record = FlatRecord::default();
        for (index, column) in column_names.iter().enumerate() {
            record.insert(column.clone(), cell_text(row.get_ref(index)?, column)?);
        }
        records.push(record);
    }

    Ok(records)
}

/// Converts one SQL value to its boundary string form. NULL becomes the
/// empty string; only BLOBs have no text form and fail the request.
fn cell_text(value: ValueRef<'_>, column: &str) -> Result<String, StorageError> {
    match value {
        ValueRef::Null => Ok(String::new()),
        ValueRef::Integer(i) => Ok(format!("{i}")),
        ValueRef::Real(f) => Ok(format!("{f}")),
        ValueRef::Text(text) => Ok(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(_) => Err(StorageError::UnsupportedValue {
            column: column.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use composer::{CostReportOptions, Interval};
    use std::collections::BTreeMap;

    fn create_test_reader() -> SqliteReader {
        let reader = SqliteReader::open_in_memory().unwrap();
        fixtures::seed_cost_lines(reader.conn()).unwrap();
        fixtures::seed_uptime_samples(reader.conn()).unwrap();
        reader
    }

    fn create_test_options() -> CostReportOptions {
        CostReportOptions {
            start_date: Some("2025-01-01".to_string()),
            end_date: Some("2025-04-30".to_string()),
            interval: Interval::Monthly,
            team: Some("true".to_string()),
            account: Some("".to_string()),
            region: Some("".to_string()),
            service: Some("".to_string()),
        }
    }

    #[test]
    fn test_select_returns_flat_records() {
        let reader = create_test_reader();
        let records = reader.select(&create_test_options().statement()).unwrap();

        // 2 teams x 4 months of seeded costs.
        assert_eq!(records.len(), 8);
        for record in &records {
            assert!(record.contains_key("date"));
            assert!(record.contains_key("team"));
            assert!(record.contains_key("cost"));
        }
    }

    #[test]
    fn test_filtered_dimension_binds() {
        let reader = create_test_reader();
        let mut options = create_test_options();
        options.team = Some("T01".to_string());

        let records = reader.select(&options.statement()).unwrap();
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.get("team").map(String::as_str) == Some("T01")));
    }

    #[test]
    fn test_date_range_bounds() {
        let reader = create_test_reader();
        let mut options = create_test_options();
        options.start_date = Some("2025-03-01".to_string());

        let records = reader.select(&options.statement()).unwrap();
        // Only March and April survive the range.
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| {
            let date = r.get("date").unwrap();
            date == "2025-03" || date == "2025-04"
        }));
    }

    #[test]
    fn test_sql_errors_pass_through() {
        let reader = create_test_reader();
        let query = BoundQuery {
            sql: "SELECT nope FROM missing_table".to_string(),
            params: BTreeMap::new(),
        };
        assert!(matches!(
            reader.select(&query).unwrap_err(),
            StorageError::Sqlite(_)
        ));
    }

    #[test]
    fn test_blob_cells_are_rejected() {
        let reader = SqliteReader::open_in_memory().unwrap();
        reader
            .conn()
            .execute_batch(
                "CREATE TABLE payloads (name TEXT, body BLOB);
                 INSERT INTO payloads VALUES ('a', x'00ff');",
            )
            .unwrap();

        let query = BoundQuery {
            sql: "SELECT name, body FROM payloads".to_string(),
            params: BTreeMap::new(),
        };
        assert!(matches!(
            reader.select(&query).unwrap_err(),
            StorageError::UnsupportedValue { ref column } if column == "body"
        ));
    }

    #[test]
    fn test_file_backed_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports.db");
        {
            let conn = Connection::open(&path).unwrap();
            fixtures::seed_cost_lines(&conn).unwrap();
        }

        let reader = SqliteReader::open(path.to_str().unwrap()).unwrap();
        let records = reader.select(&create_test_options().statement()).unwrap();
        assert_eq!(records.len(), 8);
    }
}
