use chrono::{DateTime, Duration, NaiveDate, TimeZone};

/// Date suffix layout of time-partitioned indices, i.e `logstash-2021.05.11`
pub const INDEX_DATE_FORMAT: &str = "%Y.%m.%d";

/// Length of a formatted date token, `YYYY.MM.DD`
pub const INDEX_DATE_LEN: usize = 10;

/// How long an index may live before it becomes eligible for deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retention {
    pub max_age_days: u32,
}

impl Retention {
    pub fn new(max_age_days: u32) -> Self {
        Retention { max_age_days }
    }

    /// Return the retention cutoff: the local calendar day of
    /// `now - 24 * max_age_days` hours. Indices dated strictly before this
    /// day are expired.
    ///
    /// Comparing calendar days keeps the decision independent of the time of
    /// day the cleaner runs at. A retention reaching before the earliest
    /// representable date yields `NaiveDate::MIN`, so nothing is expired.
    pub fn cutoff<Tz: TimeZone>(&self, now: DateTime<Tz>) -> NaiveDate {
        let age = Duration::hours(24 * i64::from(self.max_age_days));
        match now.checked_sub_signed(age) {
            Some(old) => old.naive_local().date(),
            None => NaiveDate::MIN,
        }
    }

    pub fn is_expired(&self, date: NaiveDate, cutoff: NaiveDate) -> bool {
        date < cutoff
    }
}

/// Parse the date token embedded in an index name.
pub fn parse_index_date(token: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(token, INDEX_DATE_FORMAT)
}
