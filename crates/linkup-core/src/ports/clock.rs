use chrono::{DateTime, NaiveDate, Utc};

/// Time source - supplies "now" and the viewer's calendar date.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date of `at` in the viewer's local time zone.
    fn local_date(&self, at: DateTime<Utc>) -> NaiveDate;

    /// Today's local calendar date.
    fn today(&self) -> NaiveDate {
        self.local_date(self.now())
    }
}
