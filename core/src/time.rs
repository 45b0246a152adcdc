use anyhow::{anyhow, Result};
use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses the start date of a graph as typed into the date field.
///
/// Surrounding whitespace is ignored. Anything that is not a valid ISO
/// calendar date yields `None`, which downstream code treats as an empty week
/// window rather than an error.
pub fn parse_start_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), ISO_DATE_FORMAT).ok()
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Calendar month addition.
///
/// The day of month is kept when the target month has it and clamped to the
/// last day of the target month otherwise (Dec 31 + 2 months = Feb 28/29).
/// Returns `None` only when the result leaves chrono's representable range.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Resolves a human friendly date relative to `today`.
///
/// Accepted forms: `today`/`tod`, `tomorrow`/`tom`, `eow`, `eom`,
/// `+Nd`/`+Nw`/`+Nm`, weekday names (`fri`, `2:fri`) and ISO dates.
pub fn parse_human_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Empty date string"));
    }

    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "tomorrow" | "tom" => return add_days(today, 1, input),
        "eow" => {
            // Sunday closes the week
            let days_to_sunday = (7 - today.weekday().num_days_from_sunday() as u64) % 7;
            return add_days(today, days_to_sunday, input);
        }
        "eom" => {
            return today
                .with_day(1)
                .and_then(|first| add_months(first, 1))
                .and_then(|next_first| next_first.pred_opt())
                .ok_or_else(|| anyhow!("Could not resolve end of month"));
        }
        _ => {}
    }

    if let Some(relative) = input.strip_prefix('+') {
        return parse_relative(relative, today);
    }

    if let Some(date) = parse_start_date(input) {
        return Ok(date);
    }

    if let Some((count, day_str)) = parse_weekday_token(input) {
        if let Ok(target) = parse_weekday_str(day_str) {
            let mut days_needed = target.num_days_from_sunday() as i64
                - today.weekday().num_days_from_sunday() as i64;
            if days_needed <= 0 {
                days_needed += 7;
            }
            // 1:fri is the next Friday, 2:fri the one after that
            let days = (count - 1)
                .checked_mul(7)
                .and_then(|extra| extra.checked_add(days_needed as u64))
                .ok_or_else(|| anyhow!("Date out of range: {}", input))?;
            return add_days(today, days, input);
        }
    }

    Err(anyhow!("Could not parse date: {}", input))
}

fn parse_relative(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let Some(unit) = input.chars().last() else {
        return Err(anyhow!("Invalid relative format"));
    };
    let num_str = &input[..input.len() - unit.len_utf8()];
    let count: u32 = num_str
        .parse()
        .map_err(|_| anyhow!("Invalid relative format: +{}", input))?;

    match unit.to_ascii_lowercase() {
        'd' => add_days(today, u64::from(count), input),
        'w' => add_days(today, u64::from(count) * 7, input),
        'm' => add_months(today, count).ok_or_else(|| anyhow!("Date out of range: +{}", input)),
        _ => Err(anyhow!("Unknown unit in relative time: {}", unit)),
    }
}

fn add_days(date: NaiveDate, days: u64, input: &str) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| anyhow!("Date out of range: {}", input))
}

fn parse_weekday_token(input: &str) -> Option<(u64, &str)> {
    match input.split_once(':') {
        Some((count, day)) => {
            let count = count.parse::<u64>().ok()?;
            (count >= 1).then_some((count, day))
        }
        None => Some((1, input)),
    }
}

fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday")),
    }
}
