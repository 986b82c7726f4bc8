use chrono::{Datelike, Duration, Local, Months, NaiveDate, Weekday};
use anyhow::{anyhow, Result};

/// Parses a due date relative to today's local date.
pub fn parse_due_date(input: &str) -> Result<NaiveDate> {
    parse_due_date_from(input, Local::now().date_naive())
}

/// Accepts `today`, `tomorrow`, `eow`, `eom`, `+Nd`/`+Nw`/`+Nm`,
/// weekday names (`fri`, `2:fri`) and `YYYY-MM-DD`.
pub fn parse_due_date_from(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Empty date string"));
    }

    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "tomorrow" | "tom" => return add_days(today, 1),
        "eow" => {
            // Sunday closes the week
            let days_to_sunday = 6 - today.weekday().num_days_from_monday() as i64;
            return add_days(today, days_to_sunday);
        }
        "eom" => {
            let first_of_month = today.with_day(1).ok_or_else(|| anyhow!("Invalid date"))?;
            let next_month = first_of_month
                .checked_add_months(Months::new(1))
                .ok_or_else(|| anyhow!("Date out of range"))?;
            return next_month.pred_opt().ok_or_else(|| anyhow!("Date out of range"));
        }
        _ => {}
    }

    if let Some(relative) = input.strip_prefix('+') {
        return parse_relative(relative, today);
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Some((count, day_str)) = parse_weekday_token(input) {
        if let Ok(target) = parse_weekday_str(day_str) {
            let mut days_needed = target.num_days_from_monday() as i64
                - today.weekday().num_days_from_monday() as i64;
            if days_needed <= 0 {
                days_needed += 7;
            }
            let extra_weeks = (count.max(1) - 1)
                .checked_mul(7)
                .and_then(|days| days.checked_add(days_needed))
                .ok_or_else(|| anyhow!("Date out of range: {}", input))?;
            return add_days(today, extra_weeks);
        }
    }

    Err(anyhow!("Could not parse date: {}", input))
}

fn parse_relative(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let unit = input
        .chars()
        .last()
        .ok_or_else(|| anyhow!("Invalid relative format: +{}", input))?;
    let num_str = &input[..input.len() - unit.len_utf8()];
    let count: u32 = num_str
        .parse()
        .map_err(|_| anyhow!("Invalid relative format: +{}", input))?;

    match unit {
        'd' => add_days(today, count as i64),
        'w' => add_days(today, count as i64 * 7),
        // chrono clamps to the last day of shorter months
        'm' => today
            .checked_add_months(Months::new(count))
            .ok_or_else(|| anyhow!("Date out of range")),
        _ => Err(anyhow!("Unknown unit in relative date: {}", unit)),
    }
}

fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| anyhow!("Date out of range: {} days from {}", days, date))
}

fn parse_weekday_token(input: &str) -> Option<(i64, &str)> {
    match input.split_once(':') {
        Some((count, day)) => count.parse::<i64>().ok().map(|c| (c, day)),
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

/// Signed days until `due`; negative once it has passed.
pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}
