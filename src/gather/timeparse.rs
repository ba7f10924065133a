use super::grammar::ParseError;
use chrono::{DateTime, Datelike, LocalResult, TimeZone, Utc};
use chrono_tz::Tz;

/// Resolves partial `[[[YYYY-]MM-]DD'T']HH[:mm[:ss]]` expressions against a
/// fixed reference instant, in a fixed timezone. One instance lives for the
/// duration of a pass so every decision in the pass sees the same "now".
#[derive(Debug, Clone, Copy)]
pub struct TimeParser {
    now: i64,
    tz: Tz,
}

impl TimeParser {
    pub fn new(now: i64, tz: Tz) -> Self {
        Self { now, tz }
    }

    pub fn now(&self) -> i64 {
        self.now
    }

    /// Absent input resolves to absent; the caller picks its own default.
    pub fn parse_optional(&self, input: Option<&str>) -> Result<Option<i64>, ParseError> {
        input.map(|raw| self.parse_datetime(raw)).transpose()
    }

    pub fn parse_datetime(&self, input: &str) -> Result<i64, ParseError> {
        let parts: Vec<&str> = input.split('T').collect();
        let (date_fragment, time_fragment) = match parts.as_slice() {
            [time] => (None, *time),
            [date, time] => (Some(*date), *time),
            _ => {
                return Err(Self::error(input, "expected at most one `T` separator"));
            }
        };

        let (year, month, day) = match date_fragment {
            Some(fragment) => self.parse_date(fragment, input)?,
            None => {
                let today = self.local_now();
                (today.year(), today.month(), today.day())
            }
        };
        let (hour, minute, second) = parse_time(time_fragment, input)?;

        match self.tz.with_ymd_and_hms(year, month, day, hour, minute, second) {
            LocalResult::Single(resolved) => Ok(resolved.timestamp()),
            LocalResult::Ambiguous(earlier, _) => Ok(earlier.timestamp()),
            LocalResult::None => Err(Self::error(input, "no such local time")),
        }
    }

    /// Render an instant for display, in the configured timezone.
    pub fn format(&self, timestamp: i64) -> String {
        DateTime::<Utc>::from_timestamp(timestamp, 0)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
            .with_timezone(&self.tz)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    }

    fn local_now(&self) -> DateTime<Tz> {
        DateTime::<Utc>::from_timestamp(self.now, 0)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
            .with_timezone(&self.tz)
    }

    fn parse_date(&self, fragment: &str, input: &str) -> Result<(i32, u32, u32), ParseError> {
        let parts: Vec<&str> = fragment.split('-').collect();
        match parts.as_slice() {
            [day] => {
                let today = self.local_now();
                Ok((today.year(), today.month(), segment(day, input)?))
            }
            [month, day] => {
                let today = self.local_now();
                Ok((today.year(), segment(month, input)?, segment(day, input)?))
            }
            [year, month, day] => Ok((
                segment(year, input)?,
                segment(month, input)?,
                segment(day, input)?,
            )),
            _ => Err(Self::error(input, "expected at most three date components")),
        }
    }

    fn error(input: &str, message: &str) -> ParseError {
        ParseError::new(input, "datetime", 0, message)
    }
}

fn parse_time(fragment: &str, input: &str) -> Result<(u32, u32, u32), ParseError> {
    let parts: Vec<&str> = fragment.split(':').collect();
    match parts.as_slice() {
        [hour] => Ok((segment(hour, input)?, 0, 0)),
        [hour, minute] => Ok((segment(hour, input)?, segment(minute, input)?, 0)),
        [hour, minute, second] => Ok((
            segment(hour, input)?,
            segment(minute, input)?,
            segment(second, input)?,
        )),
        _ => Err(TimeParser::error(
            input,
            "expected at most three time components",
        )),
    }
}

fn segment<T: std::str::FromStr>(raw: &str, input: &str) -> Result<T, ParseError> {
    raw.parse::<T>()
        .map_err(|_| ParseError::new(input, "datetime", 0, format!("invalid number `{raw}`")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn berlin() -> Tz {
        "Europe/Berlin".parse().expect("timezone")
    }

    fn berlin_ts(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> i64 {
        berlin()
            .with_ymd_and_hms(year, month, day, hour, minute, second)
            .single()
            .expect("unambiguous local time")
            .timestamp()
    }

    fn parser() -> TimeParser {
        // 2024-05-15 08:00:00 in Berlin
        TimeParser::new(berlin_ts(2024, 5, 15, 8, 0, 0), berlin())
    }

    #[test]
    fn full_datetime_resolves_in_timezone() {
        let parsed = parser().parse_datetime("2024-05-01T09:30").expect("parsed");
        assert_eq!(parsed, berlin_ts(2024, 5, 1, 9, 30, 0));
    }

    #[test]
    fn bare_hour_means_today() {
        let parsed = parser().parse_datetime("10").expect("parsed");
        assert_eq!(parsed, berlin_ts(2024, 5, 15, 10, 0, 0));
    }

    #[test]
    fn month_day_keeps_current_year() {
        let parsed = parser().parse_datetime("5-20T8").expect("parsed");
        assert_eq!(parsed, berlin_ts(2024, 5, 20, 8, 0, 0));
    }

    #[test]
    fn day_only_keeps_current_month() {
        let parsed = parser().parse_datetime("20T18:45:30").expect("parsed");
        assert_eq!(parsed, berlin_ts(2024, 5, 20, 18, 45, 30));
    }

    #[test]
    fn absent_input_resolves_to_absent() {
        assert_eq!(parser().parse_optional(None).expect("parsed"), None);
        assert_eq!(
            parser().parse_optional(Some("10")).expect("parsed"),
            Some(berlin_ts(2024, 5, 15, 10, 0, 0))
        );
    }

    #[test]
    fn malformed_inputs_are_rejected() {
        let parser = parser();
        assert!(parser.parse_datetime("1T2T3").is_err());
        assert!(parser.parse_datetime("2024-05-01-01T5").is_err());
        assert!(parser.parse_datetime("10:20:30:40").is_err());
        assert!(parser.parse_datetime("abc").is_err());
        assert!(parser.parse_datetime("").is_err());
        assert!(parser.parse_datetime("2024-13-01T5").is_err());
    }

    #[test]
    fn nonexistent_local_time_is_rejected() {
        // Berlin skips 02:00-03:00 on 2024-03-31
        assert!(parser().parse_datetime("2024-03-31T02:30").is_err());
    }

    #[test]
    fn format_renders_in_timezone() {
        let parser = parser();
        let ts = berlin_ts(2024, 5, 1, 18, 5, 0);
        assert_eq!(parser.format(ts), "2024-05-01 18:05");
    }
}
