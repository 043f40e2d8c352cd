//! Free-text date handling for the `Ship Bundle` column and range bounds.
//!
//! All values are local wall-clock date-times without an offset. A date with
//! no time of day resolves to midnight.

use std::cmp::Ordering;

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};
use tracing::debug;

pub const DEFAULT_RANGE_DAYS: i64 = 7;

const MONTHS: [(&str, Month); 12] = [
    ("january", Month::January),
    ("february", Month::February),
    ("march", Month::March),
    ("april", Month::April),
    ("may", Month::May),
    ("june", Month::June),
    ("july", Month::July),
    ("august", Month::August),
    ("september", Month::September),
    ("october", Month::October),
    ("november", Month::November),
    ("december", Month::December),
];

/// A parsed ship date, or the not-a-date marker for unparseable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipDate(Option<PrimitiveDateTime>);

impl ShipDate {
    pub fn parse(raw: &str) -> Self {
        Self(parse_date_text(raw))
    }

    pub fn instant(self) -> Option<PrimitiveDateTime> {
        self.0
    }

    /// Total order used for sorting: valid dates ascending, invalid dates last
    /// and equal to each other.
    pub fn sort_cmp(self, other: Self) -> Ordering {
        match (self.0, other.0) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

#[cfg(test)]
impl ShipDate {
    pub fn from_instant(instant: PrimitiveDateTime) -> Self {
        Self(Some(instant))
    }

    pub fn invalid() -> Self {
        Self(None)
    }

    pub fn is_valid(self) -> bool {
        self.0.is_some()
    }
}

pub fn parse_date_text(raw: &str) -> Option<PrimitiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    parse_iso(trimmed)
        .or_else(|| parse_slashed(trimmed))
        .or_else(|| parse_month_name(trimmed))
}

fn parse_iso(raw: &str) -> Option<PrimitiveDateTime> {
    if let Ok(date) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
        return Some(date.midnight());
    }
    if let Ok(stamp) = OffsetDateTime::parse(raw, &Rfc3339) {
        return local_wall_time(stamp, local_offset());
    }

    let normalized = raw.replacen(' ', "T", 1);
    PrimitiveDateTime::parse(
        &normalized,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            &normalized,
            format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        )
    })
    .ok()
}

/// `M/D/YYYY` with an optional `H:MM[:SS]` and optional `AM`/`PM`.
fn parse_slashed(raw: &str) -> Option<PrimitiveDateTime> {
    let mut tokens = raw.split_whitespace();
    let mut fields = tokens.next()?.split('/');
    let month = fields.next()?.parse::<u8>().ok()?;
    let day = fields.next()?.parse::<u8>().ok()?;
    let year = expand_year(fields.next()?.parse::<i32>().ok()?);
    if fields.next().is_some() {
        return None;
    }

    let date = Date::from_calendar_date(year, Month::try_from(month).ok()?, day).ok()?;
    Some(PrimitiveDateTime::new(date, parse_clock(tokens)?))
}

/// `Oct 19, 2026`, `October 19 2026` or `19 Oct 2026`, optionally followed by
/// a clock time.
fn parse_month_name(raw: &str) -> Option<PrimitiveDateTime> {
    let cleaned = raw.replace(',', " ");
    let mut tokens = cleaned.split_whitespace();
    let first = tokens.next()?;
    let second = tokens.next()?;
    let (month, day) = match month_from_name(first) {
        Some(month) => (month, second.parse::<u8>().ok()?),
        None => (month_from_name(second)?, first.parse::<u8>().ok()?),
    };
    let year = tokens.next()?.parse::<i32>().ok()?;

    let date = Date::from_calendar_date(year, month, day).ok()?;
    Some(PrimitiveDateTime::new(date, parse_clock(tokens)?))
}

fn month_from_name(token: &str) -> Option<Month> {
    let lower = token.trim_end_matches('.').to_ascii_lowercase();
    if lower.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .find(|(name, _)| name.starts_with(&lower))
        .map(|(_, month)| *month)
}

fn parse_clock<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<Time> {
    let Some(clock) = tokens.next() else {
        return Some(Time::MIDNIGHT);
    };
    let meridiem = tokens.next().map(str::to_ascii_uppercase);
    if tokens.next().is_some() {
        return None;
    }

    let mut parts = clock.split(':');
    let mut hour = parts.next()?.parse::<u8>().ok()?;
    let minute = parts.next()?.parse::<u8>().ok()?;
    let second = match parts.next() {
        Some(raw) => raw.parse::<u8>().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }

    match meridiem.as_deref() {
        None => {}
        Some("AM") if hour <= 12 => {
            if hour == 12 {
                hour = 0;
            }
        }
        Some("PM") if hour <= 12 => {
            if hour < 12 {
                hour += 12;
            }
        }
        Some(_) => return None,
    }
    Time::from_hms(hour, minute, second).ok()
}

/// Wall time of `stamp` at `local`; `None` past the representable range.
fn local_wall_time(stamp: OffsetDateTime, local: UtcOffset) -> Option<PrimitiveDateTime> {
    let shift = i64::from(local.whole_seconds()) - i64::from(stamp.offset().whole_seconds());
    PrimitiveDateTime::new(stamp.date(), stamp.time()).checked_add(Duration::seconds(shift))
}

fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or_else(|_| {
        debug!("local offset unavailable; reading offsets as UTC");
        UtcOffset::UTC
    })
}

fn expand_year(year: i32) -> i32 {
    match year {
        0..=49 => 2000 + year,
        50..=99 => 1900 + year,
        _ => year,
    }
}

/// ISO weekday number, Monday = 1 through Sunday = 7.
pub fn weekday_number(instant: PrimitiveDateTime) -> u8 {
    instant.weekday().number_from_monday()
}

pub fn now_local() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| {
        debug!("local offset unavailable; using UTC wall time");
        OffsetDateTime::now_utc()
    });
    PrimitiveDateTime::new(now.date(), now.time())
}

/// `[now, now + 7 days]`, keeping the time of day of `now`.
pub fn default_range(now: PrimitiveDateTime) -> (PrimitiveDateTime, PrimitiveDateTime) {
    (now, now + Duration::days(DEFAULT_RANGE_DAYS))
}

pub fn short_day_label(instant: PrimitiveDateTime) -> Option<String> {
    instant
        .format(format_description!(
            "[month repr:short] [day padding:none]"
        ))
        .ok()
}

pub fn format_instant(instant: PrimitiveDateTime) -> String {
    instant
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .unwrap_or_else(|_| instant.to_string())
}
