//! Date handling for route parameters and the fixed "last year of data" window.

use time::{macros::date, Date, Duration, Month};

use crate::Error;

/// Last recorded date in the Hawaii dataset.
pub const REFERENCE_DATE: Date = date!(2017 - 08 - 23);

/// Length of the "last year of data" window, counted back from [`REFERENCE_DATE`].
pub const LOOKBACK_DAYS: i64 = 365;

/// Station with the most observations in the dataset, picked offline.
pub const MOST_ACTIVE_STATION: &str = "USC00519281";

/// The slice of the dataset served by the precipitation and tobs endpoints.
///
/// Built once at startup and injected through `AppState`; nothing here is
/// derived from the wall clock or from the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetWindow {
    pub reference_date: Date,
    pub station: String,
}

impl Default for DatasetWindow {
    fn default() -> Self {
        Self {
            reference_date: REFERENCE_DATE,
            station: MOST_ACTIVE_STATION.to_string(),
        }
    }
}

impl DatasetWindow {
    /// First date (inclusive) of the window.
    pub fn cutoff(&self) -> Date {
        self.reference_date
            .saturating_sub(Duration::days(LOOKBACK_DAYS))
    }

    /// Key of the tobs response. Clients index the payload by this exact
    /// text, misspelling and unpadded dates included.
    pub fn tobs_label(&self) -> String {
        format!(
            "Date and Temparture Observations for station {} From {} to {}",
            self.station,
            label_date(self.cutoff()),
            label_date(self.reference_date)
        )
    }
}

/// Parses a loosely hyphenated date like `2017-01-01`, `20170101` or `2017-0101`.
///
/// Every `-` is dropped and what remains must be exactly eight digits forming
/// a valid `YYYYMMDD` calendar date.
pub fn parse_date_param(raw: &str) -> Result<Date, Error> {
    let invalid = || Error::DateParse(raw.to_string());

    let compact: String = raw.chars().filter(|c| *c != '-').collect();
    if compact.len() != 8 || !compact.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let year: i32 = compact[0..4].parse().map_err(|_| invalid())?;
    let month: u8 = compact[4..6].parse().map_err(|_| invalid())?;
    let day: u8 = compact[6..8].parse().map_err(|_| invalid())?;
    if year < 1 {
        return Err(invalid());
    }

    let month = Month::try_from(month).map_err(|_| invalid())?;
    Date::from_calendar_date(year, month, day).map_err(|_| invalid())
}

/// Canonical `YYYY-MM-DD`, the same text the `measurement.date` column holds.
pub fn iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// `Y-M-D` without zero padding, e.g. `2016-8-23`.
fn label_date(date: Date) -> String {
    format!("{}-{}-{}", date.year(), u8::from(date.month()), date.day())
}
