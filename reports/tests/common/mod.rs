//! FILENAME: tests/common/mod.rs
//! Shared setup for report integration tests.

use storage::SqliteReader;

/// In-memory reader seeded with the deterministic cost/uptime fixtures.
pub fn create_seeded_reader() -> SqliteReader {
    let reader = SqliteReader::open_in_memory().expect("open in-memory database");
    storage::fixtures::seed_cost_lines(reader.conn()).expect("seed cost fixtures");
    storage::fixtures::seed_uptime_samples(reader.conn()).expect("seed uptime fixtures");
    reader
}
