use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::model::week::{week_key, ChartPoint, WeekOption, WeekSlot};
use crate::time::{add_months, parse_start_date};

/// Length of the window a graph covers, in calendar months.
pub const WINDOW_MONTHS: u32 = 2;
/// Hard cap on weeks per window, independent of the window length.
pub const MAX_WEEKS: u32 = 9;
/// en-US short date, e.g. `12/1/2023`.
pub const DEFAULT_DATE_LABEL_FORMAT: &str = "%-m/%-d/%Y";

/// Walks a graph's window one week at a time.
///
/// Stops at whichever comes first: the end of the window or [`MAX_WEEKS`].
/// A start date that does not parse gives an empty walk.
#[derive(Debug, Clone)]
pub struct WeekGrid {
    current: Option<NaiveDate>,
    end: Option<NaiveDate>,
    number: u32,
}

impl WeekGrid {
    pub fn new(start_date: &str) -> Self {
        let current = parse_start_date(start_date);
        Self::from_date(current)
    }

    pub fn from_date(start: Option<NaiveDate>) -> Self {
        let end = start.and_then(|d| add_months(d, WINDOW_MONTHS));
        Self {
            current: start,
            end,
            number: 1,
        }
    }
}

impl Iterator for WeekGrid {
    type Item = WeekSlot;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        let end = self.end?;
        if current >= end || self.number > MAX_WEEKS {
            return None;
        }

        let slot = WeekSlot {
            number: self.number,
            key: week_key(current.year(), self.number),
            date: current,
        };

        self.current = current.checked_add_signed(Duration::days(7));
        self.number += 1;
        Some(slot)
    }
}

/// The selectable weeks for a start date, labelled with the default format.
pub fn week_options(start_date: &str) -> Vec<WeekOption> {
    week_options_with_format(start_date, DEFAULT_DATE_LABEL_FORMAT)
}

/// Like [`week_options`], with the date in each label rendered by `date_format`
/// (a chrono format string). A format chrono cannot render falls back to
/// [`DEFAULT_DATE_LABEL_FORMAT`].
pub fn week_options_with_format(start_date: &str, date_format: &str) -> Vec<WeekOption> {
    WeekGrid::new(start_date)
        .map(|slot| WeekOption {
            label: format!("Week {} ({})", slot.number, date_label(slot.date, date_format)),
            key: slot.key,
        })
        .collect()
}

/// Whether chrono can render a calendar date with `date_format`.
pub fn is_valid_date_format(date_format: &str) -> bool {
    try_format(NaiveDate::MIN, date_format).is_some()
}

fn date_label(date: NaiveDate, date_format: &str) -> String {
    try_format(date, date_format)
        .unwrap_or_else(|| date.format(DEFAULT_DATE_LABEL_FORMAT).to_string())
}

// `to_string` panics when a format item fails, `write!` reports it
fn try_format(date: NaiveDate, date_format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(date_format)).ok()?;
    Some(out)
}

/// The chart series for a graph: one point per week in the window.
///
/// Weeks without a stored value plot as `0`; so do stored `NaN` values.
pub fn weekly_data(start_date: &str, weekly_values: &BTreeMap<String, f64>) -> Vec<ChartPoint> {
    WeekGrid::new(start_date)
        .map(|slot| ChartPoint {
            label: format!("Week {}", slot.number),
            value: plotted_value(weekly_values.get(&slot.key).copied()),
        })
        .collect()
}

fn plotted_value(stored: Option<f64>) -> f64 {
    match stored {
        Some(v) if !v.is_nan() => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(start_date: &str) -> Vec<String> {
        WeekGrid::new(start_date).map(|s| s.key).collect()
    }

    #[test]
    fn test_december_start_crosses_year() {
        assert_eq!(
            keys("2023-12-01"),
            vec![
                "2023-W01", "2023-W02", "2023-W03", "2023-W04", "2023-W05",
                "2024-W06", "2024-W07", "2024-W08", "2024-W09",
            ]
        );
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(keys("2024-03-15"), keys("2024-03-15"));
    }

    #[test]
    fn test_never_more_than_nine_weeks() {
        // two calendar months never span more than 62 days
        for start in ["2024-01-31", "2023-12-31", "2024-07-01", "2023-12-01"] {
            assert!(WeekGrid::new(start).count() <= MAX_WEEKS as usize, "{}", start);
        }
    }

    #[test]
    fn test_shortest_windows_still_hold_nine_weeks() {
        // Feb 1 → Apr 1 is 60 days: weeks start on days 0..=56, all 9 fit
        assert_eq!(WeekGrid::new("2023-02-01").count(), 9);
        // Dec 31 → Feb 29: 60 days
        assert_eq!(WeekGrid::new("2023-12-31").count(), 9);
        // Jan 1 → Mar 1 in a common year is 59 days: the 9th week starts on day 56
        assert_eq!(WeekGrid::new("2023-01-01").count(), 9);
    }

    #[test]
    fn test_window_end_is_exclusive() {
        // Feb 28 → Apr 28 is 59 days; day 56 is inside, day 63 is not
        let slots: Vec<WeekSlot> = WeekGrid::new("2023-02-28").collect();
        assert_eq!(slots.len(), 9);
        assert_eq!(slots[8].date, NaiveDate::from_ymd_opt(2023, 4, 25).unwrap());
    }

    #[test]
    fn test_invalid_start_date_is_empty() {
        assert!(WeekGrid::new("").next().is_none());
        assert!(week_options("2023-02-30").is_empty());
        assert!(weekly_data("garbage", &BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_week_options_labels() {
        let options = week_options("2023-12-01");
        assert_eq!(options.len(), 9);
        assert_eq!(options[0].key, "2023-W01");
        assert_eq!(options[0].label, "Week 1 (12/1/2023)");
        assert_eq!(options[5].key, "2024-W06");
        assert_eq!(options[5].label, "Week 6 (1/5/2024)");
    }

    #[test]
    fn test_week_options_custom_format() {
        let options = week_options_with_format("2023-12-01", "%Y-%m-%d");
        assert_eq!(options[1].label, "Week 2 (2023-12-08)");
    }

    #[test]
    fn test_unrenderable_format_uses_default_labels() {
        // %Q is not a specifier; %H needs a time of day
        for format in ["%Q", "%H:%M", "%"] {
            assert!(!is_valid_date_format(format));
            let options = week_options_with_format("2023-12-01", format);
            assert_eq!(options.len(), 9);
            assert_eq!(options[0].label, "Week 1 (12/1/2023)");
        }
        assert!(is_valid_date_format("%d.%m.%Y"));
        assert!(is_valid_date_format(DEFAULT_DATE_LABEL_FORMAT));
    }

    #[test]
    fn test_weekly_data_fills_missing_with_zero() {
        let mut values = BTreeMap::new();
        values.insert("2023-W01".to_string(), 15.0);

        let data = weekly_data("2023-12-01", &values);
        assert_eq!(data.len(), 9);
        assert_eq!(data[0], ChartPoint { label: "Week 1".to_string(), value: 15.0 });
        for (i, point) in data.iter().enumerate().skip(1) {
            assert_eq!(point.label, format!("Week {}", i + 1));
            assert_eq!(point.value, 0.0);
        }
    }

    #[test]
    fn test_weekly_data_nan_plots_as_zero() {
        let mut values = BTreeMap::new();
        values.insert("2023-W02".to_string(), f64::NAN);
        values.insert("2023-W03".to_string(), -4.0);

        let data = weekly_data("2023-12-01", &values);
        assert_eq!(data[1].value, 0.0);
        assert_eq!(data[2].value, -4.0);
    }

    #[test]
    fn test_stale_keys_are_ignored_after_start_change() {
        let mut values = BTreeMap::new();
        values.insert("2023-W01".to_string(), 15.0);

        // same year, W01 now means a different week but still matches
        assert_eq!(weekly_data("2023-06-01", &values)[0].value, 15.0);
        // different year, the key no longer matches anything
        assert!(weekly_data("2024-06-01", &values).iter().all(|p| p.value == 0.0));
    }
}
