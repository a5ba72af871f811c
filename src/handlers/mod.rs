pub mod admin;
pub mod courses;
pub mod export;
pub mod questions;
pub mod quiz;
pub mod settings;
pub mod stats;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use crate::rejections::AppError;

/// Optional ISO-8601 date-range filter accepted by the stats, clear-data and
/// export endpoints, as query parameters or JSON body fields.
#[derive(Debug, Default, Deserialize)]
pub struct DateRange {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRange {
    pub fn parse(&self) -> Result<(Option<NaiveDateTime>, Option<NaiveDateTime>), AppError> {
        let start = self
            .start_date
            .as_deref()
            .map(parse_iso_datetime)
            .transpose()?;
        let end = self.end_date.as_deref().map(parse_iso_datetime).transpose()?;
        Ok((start, end))
    }
}

/// Accepts `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` or a bare date
/// (which means midnight, for both ends of the range).
fn parse_iso_datetime(value: &str) -> Result<NaiveDateTime, AppError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN)))
        .map_err(|_| AppError::Input("無效的日期格式".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_accepts_bare_dates_and_timestamps() {
        let range = DateRange {
            start_date: Some("2024-05-01".to_string()),
            end_date: Some("2024-05-02T10:30:00".to_string()),
        };
        let (start, end) = range.parse().unwrap();
        assert_eq!(start.unwrap().to_string(), "2024-05-01 00:00:00");
        assert_eq!(end.unwrap().to_string(), "2024-05-02 10:30:00");
    }

    #[test]
    fn garbage_dates_are_rejected() {
        let range = DateRange {
            start_date: Some("yesterday".to_string()),
            end_date: None,
        };
        assert!(range.parse().is_err());
    }
}
