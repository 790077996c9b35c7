//! FILENAME: reports/src/buckets.rs
//! Time-bucket derivation.
//!
//! The skeleton builder needs the full ordered bucket list up front so every
//! row covers the whole range, observed or not. Buckets are derived from the
//! same inclusive date range the statement binds, so a record can only ever
//! fall inside the requested buckets.

use chrono::{Datelike, Days, NaiveDate};

use composer::Interval;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Expands an inclusive date range into its ordered bucket labels.
pub fn buckets_for_range(
    start_date: &str,
    end_date: &str,
    interval: Interval,
) -> Result<Vec<String>, chrono::ParseError> {
    let start = NaiveDate::parse_from_str(start_date, DATE_FORMAT)?;
    let end = NaiveDate::parse_from_str(end_date, DATE_FORMAT)?;

    let mut buckets = Vec::new();
    match interval {
        Interval::Daily => {
            let mut day = start;
            while day <= end {
                buckets.push(day.format(DATE_FORMAT).to_string());
                match day.checked_add_days(Days::new(1)) {
                    Some(next) => day = next,
                    None => break,
                }
            }
        }
        Interval::Monthly => {
            let mut current = month_index(start);
            let last = month_index(end);
            while current <= last {
                buckets.push(format!(
                    "{:04}-{:02}",
                    current / 12,
                    current % 12 + 1
                ));
                current += 1;
            }
        }
    }
    Ok(buckets)
}

/// Default inclusive range ending today: the last 6 calendar months for
/// monthly reports, the last 14 days for daily ones.
pub fn default_range(today: NaiveDate, interval: Interval) -> (String, String) {
    let start = match interval {
        Interval::Daily => today.checked_sub_days(Days::new(13)).unwrap_or(today),
        Interval::Monthly => {
            let index = month_index(today).saturating_sub(5);
            NaiveDate::from_ymd_opt(index as i32 / 12, index as u32 % 12 + 1, 1)
                .unwrap_or(today)
        }
    };
    (
        start.format(DATE_FORMAT).to_string(),
        today.format(DATE_FORMAT).to_string(),
    )
}

fn month_index(date: NaiveDate) -> usize {
    date.year() as usize * 12 + date.month0() as usize
}
