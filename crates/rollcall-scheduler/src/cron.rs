//! Lightweight cron expression parser, evaluated in a local time zone.
//! Supports: "MIN HOUR DOM MON DOW" (5-field, no seconds)
//! Fields: *, */N, N, A-B, A-B/N and comma lists of those.
//! Example: "0 20 * * *" = every day at 20:00 local time.
//!
//! Time arithmetic is done on absolute instants and fields are read in the
//! local zone, so a local time skipped by a DST jump never fires.

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike};

/// A parsed cron expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CronSchedule {
    expression: String,
    minutes: Vec<u32>,
    hours: Vec<u32>,
    days_of_month: Vec<u32>,
    months: Vec<u32>,
    /// 0 = Sunday.
    days_of_week: Vec<u32>,
    dom_restricted: bool,
    dow_restricted: bool,
}

/// How far ahead `next_after` searches.
const SEARCH_DAYS: i64 = 366;

impl CronSchedule {
    pub fn parse(expression: &str) -> Result<Self, String> {
        let parts: Vec<&str> = expression.split_whitespace().collect();
        if parts.len() != 5 {
            return Err(format!(
                "Invalid cron expression: '{expression}' (need 5 fields: MIN HOUR DOM MON DOW)"
            ));
        }

        let field = |spec: &str, min: u32, max: u32, label: &str| {
            parse_field(spec, min, max)
                .ok_or_else(|| format!("Invalid {label} field '{spec}' in cron '{expression}'"))
        };

        let mut days_of_week = field(parts[4], 0, 7, "day-of-week")?;
        // 7 is an alias for Sunday.
        for d in days_of_week.iter_mut() {
            if *d == 7 {
                *d = 0;
            }
        }
        days_of_week.sort_unstable();
        days_of_week.dedup();

        Ok(Self {
            expression: expression.to_string(),
            minutes: field(parts[0], 0, 59, "minute")?,
            hours: field(parts[1], 0, 23, "hour")?,
            days_of_month: field(parts[2], 1, 31, "day-of-month")?,
            months: field(parts[3], 1, 12, "month")?,
            days_of_week,
            dom_restricted: parts[2] != "*",
            dow_restricted: parts[4] != "*",
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    fn day_matches<Tz: TimeZone>(&self, t: &DateTime<Tz>) -> bool {
        let dom = self.days_of_month.contains(&t.day());
        let dow = self
            .days_of_week
            .contains(&t.weekday().num_days_from_sunday());
        // Classic cron: when both day fields are restricted, either may match.
        match (self.dom_restricted, self.dow_restricted) {
            (true, true) => dom || dow,
            (true, false) => dom,
            (false, true) => dow,
            (false, false) => true,
        }
    }

    /// Whether the local minute of `t` matches.
    pub fn matches<Tz: TimeZone>(&self, t: &DateTime<Tz>) -> bool {
        self.minutes.contains(&t.minute())
            && self.hours.contains(&t.hour())
            && self.months.contains(&t.month())
            && self.day_matches(t)
    }

    /// First matching minute strictly after `after`.
    pub fn next_after<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let start = after.clone() + Duration::minutes(1);
        let mut candidate = start
            .with_nanosecond(0)
            .and_then(|c| c.with_second(0))
            .unwrap_or(start);
        let limit = after.clone() + Duration::days(SEARCH_DAYS);

        while candidate <= limit {
            let hour_ok = self.hours.contains(&candidate.hour())
                && self.months.contains(&candidate.month())
                && self.day_matches(&candidate);
            if !hour_ok {
                // Jump to the top of the next hour.
                candidate += Duration::minutes(i64::from(60 - candidate.minute()));
                continue;
            }
            if self.minutes.contains(&candidate.minute()) {
                return Some(candidate);
            }
            candidate += Duration::minutes(1);
        }

        None
    }
}

/// Parse a cron field into a sorted list of matching values.
fn parse_field(field: &str, min: u32, max: u32) -> Option<Vec<u32>> {
    let mut values = Vec::new();
    for item in field.split(',') {
        values.extend(parse_item(item.trim(), min, max)?);
    }
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    values.dedup();
    Some(values)
}

/// One list item: `*`, `*/N`, `N`, `A-B` or `A-B/N`.
fn parse_item(item: &str, min: u32, max: u32) -> Option<Vec<u32>> {
    let (range, step) = match item.split_once('/') {
        Some((range, step)) => {
            let n: u32 = step.parse().ok()?;
            if n == 0 {
                return None;
            }
            (range, n)
        }
        None => (item, 1),
    };

    let (lo, hi) = if range == "*" {
        (min, max)
    } else if let Some((a, b)) = range.split_once('-') {
        (a.parse().ok()?, b.parse().ok()?)
    } else {
        let n: u32 = range.parse().ok()?;
        // "N/step" means from N to the end of the range.
        if item.contains('/') { (n, max) } else { (n, n) }
    };

    if lo < min || hi > max || lo > hi {
        return None;
    }
    Some((lo..=hi).step_by(step as usize).collect())
}
