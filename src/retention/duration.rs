//! Duration normalisation for free-text sentence lengths.
//!
//! Court clerks record custodial lengths as prose ("10 Years 3 Months 25 Days",
//! "260 Weeks"). These are turned into a canonical `<Y>Y<M>M<D>D` period by
//! adding the parts to an anchor date with calendar arithmetic and measuring
//! the elapsed years, months and days between the anchor and the end date.
//!
//! # Design Decisions
//!
//! - **Calendar, not ratios**: a year is not 365 days and a month is not 30;
//!   the same text can normalise differently from different anchors
//! - **Weeks fold into days**: `n weeks` contributes `7n` days
//! - **Unknown units are ignored**: they contribute nothing and never fail

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use thiserror::Error;
use tracing::debug;

/// Elapsed calendar period in years, months and days
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Period {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl Period {
    pub const fn new(years: u32, months: u32, days: u32) -> Self {
        Self {
            years,
            months,
            days,
        }
    }

    /// Add this period to `anchor`: years first, then months, then days.
    ///
    /// Month-end overflow clamps to the last valid day (Feb 29 + 1 year is Feb 28).
    pub fn end_date(&self, anchor: NaiveDate) -> NaiveDate {
        let date = add_months(anchor, self.years.saturating_mul(12));
        let date = add_months(date, self.months);
        add_days(date, u64::from(self.days))
    }

    /// Elapsed days between `anchor` and [`Period::end_date`]
    pub fn days_from(&self, anchor: NaiveDate) -> i64 {
        (self.end_date(anchor) - anchor).num_days()
    }

    /// The period from `start` to `end`, counting whole months first and the
    /// remaining days after them. An `end` before `start` yields zero.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        if end <= start {
            return Self::default();
        }

        let mut total_months = (i64::from(end.year()) * 12 + i64::from(end.month0()))
            - (i64::from(start.year()) * 12 + i64::from(start.month0()));
        let mut days = i64::from(end.day()) - i64::from(start.day());

        if total_months > 0 && days < 0 {
            total_months -= 1;
            let whole_months = add_months(start, u32::try_from(total_months).unwrap_or(u32::MAX));
            days = (end - whole_months).num_days();
        }

        let total_months = u32::try_from(total_months).unwrap_or(0);
        Self {
            years: total_months / 12,
            months: total_months % 12,
            days: u32::try_from(days).unwrap_or(0),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Y{}M{}D", self.years, self.months, self.days)
    }
}

/// Error returned when a string is not a canonical `<Y>Y<M>M<D>D` period
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a canonical period (expected e.g. 7Y0M0D): {input}")]
pub struct PeriodParseError {
    pub input: String,
}

impl FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PeriodParseError {
            input: s.to_string(),
        };

        let upper = s.trim().to_ascii_uppercase();
        let (years, rest) = upper.split_once('Y').ok_or_else(err)?;
        let (months, rest) = rest.split_once('M').ok_or_else(err)?;
        let days = rest.strip_suffix('D').ok_or_else(err)?;

        Ok(Self {
            years: years.parse().map_err(|_| err())?,
            months: months.parse().map_err(|_| err())?,
            days: days.parse().map_err(|_| err())?,
        })
    }
}

/// Raw duration parts as written, before calendar normalisation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationParts {
    pub years: u32,
    pub months: u32,
    pub weeks: u32,
    pub days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Year,
    Month,
    Week,
    Day,
}

fn parse_unit(token: &str) -> Option<Unit> {
    match token.trim_end_matches(['.', ';', ':']) {
        "year" | "years" | "yr" | "yrs" | "y" => Some(Unit::Year),
        "month" | "months" | "mth" | "mths" | "m" => Some(Unit::Month),
        "week" | "weeks" | "wk" | "wks" | "w" => Some(Unit::Week),
        "day" | "days" | "d" => Some(Unit::Day),
        _ => None,
    }
}

/// Split `"10years"` into `("10", "years")`; plain tokens come back unchanged
fn split_glued(token: &str) -> (&str, Option<&str>) {
    let digits = token
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(token.len());
    if digits > 0 && digits < token.len() {
        (&token[..digits], Some(&token[digits..]))
    } else {
        (token, None)
    }
}

/// Tokenise a free-text duration into `(count, unit)` parts.
///
/// Counts without a recognised unit after them are dropped.
pub fn parse_duration(text: &str) -> DurationParts {
    let lower = text.to_ascii_lowercase().replace(',', " ");
    let mut tokens: Vec<&str> = Vec::new();
    for token in lower.split_whitespace() {
        match split_glued(token) {
            (count, Some(unit)) => {
                tokens.push(count);
                tokens.push(unit);
            }
            (token, None) => tokens.push(token),
        }
    }

    let mut parts = DurationParts::default();
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        let Ok(count) = token.parse::<u32>() else {
            continue;
        };

        let unit = iter.peek().copied().and_then(parse_unit);
        match unit {
            Some(unit) => {
                iter.next();
                let slot = match unit {
                    Unit::Year => &mut parts.years,
                    Unit::Month => &mut parts.months,
                    Unit::Week => &mut parts.weeks,
                    Unit::Day => &mut parts.days,
                };
                *slot = slot.saturating_add(count);
            }
            None => debug!(count, text, "Ignoring duration count without a recognised unit"),
        }
    }

    parts
}

/// A duration resolved against its anchor date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedDuration {
    pub anchor: NaiveDate,
    pub end: NaiveDate,
    pub period: Period,
}

impl NormalizedDuration {
    /// Total elapsed days from the anchor
    pub fn total_days(&self) -> i64 {
        (self.end - self.anchor).num_days()
    }
}

/// Normalise free text against `anchor`
pub fn normalize_duration(text: &str, anchor: NaiveDate) -> NormalizedDuration {
    let parts = parse_duration(text);

    let end = add_months(anchor, parts.years.saturating_mul(12));
    let end = add_months(end, parts.months);
    let end = add_days(
        end,
        u64::from(parts.weeks) * 7 + u64::from(parts.days),
    );

    NormalizedDuration {
        anchor,
        end,
        period: Period::between(anchor, end),
    }
}

/// The longest of several competing durations, by total days from their anchors
pub fn longest_duration<'a, I>(durations: I) -> Option<NormalizedDuration>
where
    I: IntoIterator<Item = (&'a str, NaiveDate)>,
{
    durations
        .into_iter()
        .map(|(text, anchor)| normalize_duration(text, anchor))
        .fold(None, |best: Option<NormalizedDuration>, candidate| match best {
            Some(b) if b.total_days() >= candidate.total_days() => Some(b),
            _ => Some(candidate),
        })
}

/// Raise `duration` to `minimum` when it ends on or before the minimum's end
/// date from the same anchor.
pub fn clamp_to_minimum(duration: &NormalizedDuration, minimum: Period) -> Period {
    if duration.end <= minimum.end_date(duration.anchor) {
        minimum
    } else {
        duration.period
    }
}

fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days))
        .unwrap_or(NaiveDate::MAX)
}
