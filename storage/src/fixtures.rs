//! FILENAME: storage/src/fixtures.rs
//! Deterministic seed data for tests and the demo tool.
//!
//! Two teams across two regions and two services, four months of cost lines
//! and one week of uptime samples. Values follow simple index formulas so
//! expected aggregates can be computed by hand in tests.

use rusqlite::{named_params, Connection};

use crate::error::StorageError;

pub const TEAMS: [&str; 2] = ["T01", "T02"];
pub const REGIONS: [&str; 2] = ["eu-west-1", "us-east-1"];
pub const SERVICES: [&str; 2] = ["compute", "storage"];

/// Creates and fills `cost_lines`: one line per team/region/service/month,
/// 2025-01 through 2025-04.
pub fn seed_cost_lines(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE cost_lines (
            team       TEXT NOT NULL,
            account    TEXT NOT NULL,
            region     TEXT NOT NULL,
            service    TEXT NOT NULL,
            usage_date TEXT NOT NULL,
            cost       REAL NOT NULL
        );",
    )?;

    let mut insert = conn.prepare(
        "INSERT INTO cost_lines (team, account, region, service, usage_date, cost)
         VALUES (:team, :account, :region, :service, :usage_date, :cost)",
    )?;

    for (t, team) in TEAMS.iter().enumerate() {
        let account = if t == 0 { "prod" } else { "dev" };
        for (r, region) in REGIONS.iter().enumerate() {
            for (s, service) in SERVICES.iter().enumerate() {
                for month in 1..=4u32 {
                    let cost = ((t + 1) * 100 + r * 20 + s * 5 + month as usize) as f64;
                    insert.execute(named_params! {
                        ":team": team,
                        ":account": account,
                        ":region": region,
                        ":service": service,
                        ":usage_date": format!("2025-{month:02}-15"),
                        ":cost": cost,
                    })?;
                }
            }
        }
    }

    Ok(())
}

/// Creates and fills `uptime_samples`: one sample per team/service/day,
/// 2025-04-01 through 2025-04-07.
pub fn seed_uptime_samples(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE uptime_samples (
            team       TEXT NOT NULL,
            service    TEXT NOT NULL,
            sampled_at TEXT NOT NULL,
            uptime     REAL NOT NULL
        );",
    )?;

    let mut insert = conn.prepare(
        "INSERT INTO uptime_samples (team, service, sampled_at, uptime)
         VALUES (:team, :service, :sampled_at, :uptime)",
    )?;

    for (t, team) in TEAMS.iter().enumerate() {
        for (s, service) in SERVICES.iter().enumerate() {
            for day in 1..=7u32 {
                let uptime = 100.0 - (t as f64) * 0.5 - (s as f64) * 0.25 - (day % 2) as f64 * 0.1;
                insert.execute(named_params! {
                    ":team": team,
                    ":service": service,
                    ":sampled_at": format!("2025-04-{day:02}"),
                    ":uptime": uptime,
                })?;
            }
        }
    }

    Ok(())
}
