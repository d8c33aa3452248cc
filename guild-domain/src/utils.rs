use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate, Utc};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn current_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn today() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

pub fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|err| anyhow!(err))
}

/// Validates a user supplied date and returns it in canonical form.
pub fn normalize_date(date: &str) -> Result<String> {
    Ok(parse_date(date)?.format(DATE_FORMAT).to_string())
}

pub fn shift_date(date: &str, days: i64) -> Result<String> {
    let parsed = parse_date(date)?;
    let shifted = parsed
        .checked_add_signed(chrono::Duration::days(days))
        .ok_or_else(|| anyhow!("date out of range: {}", date))?;
    Ok(shifted.format(DATE_FORMAT).to_string())
}
