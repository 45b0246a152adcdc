use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Builds the key a weekly value is stored under: `"<year>-W<NN>"`.
///
/// `number` is the 1-based position of the week inside a graph's window, not
/// the ISO week number.
pub fn week_key(year: i32, number: u32) -> String {
    format!("{}-W{:02}", year, number)
}

/// Inverse of [`week_key`]. Returns `(year, number)` for well formed keys.
pub fn parse_week_key(key: &str) -> Option<(i32, u32)> {
    let (year, number) = key.split_once("-W")?;
    if number.len() != 2 || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if year.is_empty() || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number: u32 = number.parse().ok()?;
    if number == 0 {
        return None;
    }
    Some((year.parse().ok()?, number))
}

/// One step of the week walk shared by the option list and the chart series.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekSlot {
    pub number: u32,
    pub key: String,
    pub date: NaiveDate,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeekOption {
    pub key: String,
    pub label: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}
