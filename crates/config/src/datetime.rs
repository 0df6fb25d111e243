use std::fmt;

use time::Date;
use time::Month;
use time::OffsetDateTime;
use time::PrimitiveDateTime;
use time::Time;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

type Format = &'static [BorrowedFormatItem<'static>];

/// How dates are written back out, as Jekyll does.
const DISPLAY: Format = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute]"
);

const WITH_OFFSET: &[Format] = &[
    format_description!(
        version = 2,
        "[year]-[month padding:none]-[day padding:none] [hour padding:none]:[minute]:[second][optional [.[subsecond]]] [offset_hour sign:mandatory][optional [:]][offset_minute]"
    ),
    format_description!(
        version = 2,
        "[year]-[month padding:none]-[day padding:none] [hour padding:none]:[minute]:[second][optional [.[subsecond]]][offset_hour sign:mandatory][optional [:]][offset_minute]"
    ),
    format_description!(
        version = 2,
        "[year]-[month padding:none]-[day padding:none] [hour padding:none]:[minute] [offset_hour sign:mandatory][optional [:]][offset_minute]"
    ),
    format_description!(
        version = 2,
        "[year]-[month padding:none]-[day padding:none] [hour padding:none]:[minute][offset_hour sign:mandatory][optional [:]][offset_minute]"
    ),
];

const WITHOUT_OFFSET: &[Format] = &[
    format_description!(
        version = 2,
        "[year]-[month padding:none]-[day padding:none] [hour padding:none]:[minute]:[second][optional [.[subsecond]]]"
    ),
    format_description!(
        "[year]-[month padding:none]-[day padding:none] [hour padding:none]:[minute]"
    ),
];

const DATE_ONLY: Format = format_description!("[year]-[month padding:none]-[day padding:none]");

/// A publish date as written in front matter or a post's file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime(OffsetDateTime);

impl DateTime {
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = Month::try_from(month).ok()?;
        let date = Date::from_calendar_date(year, month, day).ok()?;
        Some(Self(PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_utc()))
    }

    pub fn from_system_time(time: std::time::SystemTime) -> Self {
        Self(OffsetDateTime::from(time))
    }

    /// Parse `YYYY-MM-DD`, optionally followed by `HH:MM[:SS]` and a UTC offset.
    ///
    /// The time may also follow a `T`, and `Z` stands for UTC.  Without an offset the date
    /// is taken as UTC.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let value = match value.get(10..11) {
            Some("T") => format!("{} {}", &value[..10], &value[11..]),
            _ => value.to_owned(),
        };
        let value = value.strip_suffix('Z').unwrap_or(&value).trim_end();

        WITH_OFFSET
            .iter()
            .find_map(|format| OffsetDateTime::parse(value, *format).ok())
            .or_else(|| {
                WITHOUT_OFFSET
                    .iter()
                    .find_map(|format| PrimitiveDateTime::parse(value, *format).ok())
                    .map(PrimitiveDateTime::assume_utc)
            })
            .or_else(|| {
                Date::parse(value, DATE_ONLY)
                    .ok()
                    .map(|date| date.midnight().assume_utc())
            })
            .map(Self)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u8 {
        u8::from(self.0.month())
    }

    pub fn day(&self) -> u8 {
        self.0.day()
    }

    pub fn ordinal(&self) -> u16 {
        self.0.ordinal()
    }

    pub fn iso_week(&self) -> u8 {
        self.0.iso_week()
    }

    pub fn hour(&self) -> u8 {
        self.0.hour()
    }

    pub fn minute(&self) -> u8 {
        self.0.minute()
    }

    pub fn second(&self) -> u8 {
        self.0.second()
    }

    pub fn weekday_name(&self) -> String {
        self.0.weekday().to_string()
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self.0.format(DISPLAY).map_err(|_| fmt::Error)?;
        f.write_str(&formatted)
    }
}
