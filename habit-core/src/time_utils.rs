use time::{macros::format_description, Date, Duration, OffsetDateTime, UtcOffset};

const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Today's date in the local offset, falling back to UTC when the offset is unknown.
pub fn local_today() -> Date {
    OffsetDateTime::now_utc()
        .to_offset(UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
        .date()
}

pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month() as u8,
        date.day()
    )
}

/// Parse a `YYYY-MM-DD` string. Surrounding whitespace is ignored.
pub fn parse_date(value: &str) -> Option<Date> {
    Date::parse(value.trim(), DATE_FORMAT).ok()
}

pub fn week_start(date: Date) -> Date {
    let days_from_monday = date.weekday().number_days_from_monday() as i64;
    date.checked_sub(Duration::days(days_from_monday))
        .unwrap_or(date)
}

/// Monday through Sunday of the week containing `date`. Days past the end of
/// the representable calendar are dropped.
pub fn week_days(date: Date) -> Vec<Date> {
    let start = week_start(date);
    (0..7)
        .filter_map(|offset| start.checked_add(Duration::days(offset)))
        .collect()
}

pub(crate) mod iso_date {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).ok_or_else(|| D::Error::custom(format!("invalid date: {raw}")))
    }
}
