//! FILENAME: tools/report-demo/src/main.rs
//! Demo runner: seeds a database, runs both reports, prints the payloads.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use composer::{CostReportOptions, Interval, UptimeReportOptions};
use report_engine::PivotTable;
use reports::{CostReport, UptimeReport};
use storage::SqliteReader;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum IntervalArg {
    Daily,
    Monthly,
}

impl From<IntervalArg> for Interval {
    fn from(arg: IntervalArg) -> Self {
        match arg {
            IntervalArg::Daily => Interval::Daily,
            IntervalArg::Monthly => Interval::Monthly,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "report-demo")]
#[command(about = "Run the cost and uptime reports against a SQLite database")]
struct Args {
    /// Database path. Omitted: an in-memory database seeded with demo data.
    #[arg(long)]
    db: Option<String>,

    /// Inclusive range start, %Y-%m-%d. Omitted: the default window.
    #[arg(long)]
    start_date: Option<String>,

    /// Inclusive range end, %Y-%m-%d.
    #[arg(long)]
    end_date: Option<String>,

    #[arg(long, value_enum, default_value_t = IntervalArg::Monthly)]
    interval: IntervalArg,

    /// Tri-state dimension: absent = always-on, "" = off, "true" = group,
    /// anything else = exact-match filter. Same for the flags below.
    #[arg(long)]
    team: Option<String>,

    #[arg(long)]
    account: Option<String>,

    #[arg(long)]
    region: Option<String>,

    #[arg(long)]
    service: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let reader = open_reader(args.db.as_deref())?;

    let cost_options = CostReportOptions {
        start_date: args.start_date.clone(),
        end_date: args.end_date.clone(),
        interval: args.interval.into(),
        team: args.team.clone(),
        account: args.account.clone(),
        region: args.region.clone(),
        service: args.service.clone(),
    };
    let cost_table = CostReport::new(&reader).run(&cost_options)?;
    print_table("cost", &cost_table)?;

    let uptime_options = UptimeReportOptions {
        start_date: args.start_date,
        end_date: args.end_date,
        interval: args.interval.into(),
        team: args.team,
        service: args.service,
    };
    let uptime_table = UptimeReport::new(&reader).run(&uptime_options)?;
    print_table("uptime", &uptime_table)?;

    Ok(())
}

fn open_reader(db: Option<&str>) -> Result<SqliteReader> {
    match db {
        Some(path) => Ok(SqliteReader::open(path)?),
        None => {
            let reader = SqliteReader::open_in_memory()?;
            storage::fixtures::seed_cost_lines(reader.conn())?;
            storage::fixtures::seed_uptime_samples(reader.conn())?;
            Ok(reader)
        }
    }
}

/// Prints a table the way the dashboard receives it: one JSON object per
/// row, then the footer.
fn print_table(title: &str, table: &PivotTable) -> Result<()> {
    println!("== {title} ({} rows)", table.rows.len());
    for row in &table.rows {
        println!("{}", serde_json::to_string(row)?);
    }
    println!("footer: {}", serde_json::to_string(&table.footer)?);
    Ok(())
}
