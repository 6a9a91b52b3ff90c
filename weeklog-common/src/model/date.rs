use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{Error, Unexpected},
};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;
use time::{Date, Weekday, format_description::BorrowedFormatItem, macros::format_description};

/// No journal entries exist for dates before this year.
pub const SERVICE_EPOCH_YEAR: i32 = 2019;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Calendar date of a journal entry, always rendered as `YYYY-MM-DD`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct EntryDate(Date);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Not a date in YYYY-MM-DD form: {0:?}")]
pub struct InvalidEntryDateError(String);

impl EntryDate {
    #[must_use]
    pub fn new(date: Date) -> Self {
        Self(date)
    }

    #[must_use]
    pub fn get(self) -> Date {
        self.0
    }

    /// Whether this date may carry a journal entry, judged from `today`.
    ///
    /// Entries are weekly and anchored to Fridays: the date must be a
    /// Friday, must not predate the service epoch, and must not lie beyond
    /// the current week's Friday (no entries for weeks that have not
    /// happened yet).
    #[must_use]
    pub fn is_eligible(self, today: Date) -> bool {
        if self.0.year() < SERVICE_EPOCH_YEAR {
            return false;
        }
        if self.0.weekday() != Weekday::Friday {
            return false;
        }
        self.0 <= this_friday(today)
    }
}

/// The Friday of the week `today` falls in: `today` itself if it is a
/// Friday, otherwise the nearest Friday after it.
#[must_use]
pub fn this_friday(today: Date) -> Date {
    let mut day = today;
    while day.weekday() != Weekday::Friday {
        day = day.next_day().expect("ran off the end of the calendar");
    }
    day
}

/// String-level form of the eligibility check: anything that does not
/// parse as `YYYY-MM-DD` is ineligible, never an error.
#[must_use]
pub fn is_eligible_date(date: &str, today: Date) -> bool {
    date.parse::<EntryDate>()
        .is_ok_and(|parsed| parsed.is_eligible(today))
}

impl FromStr for EntryDate {
    type Err = InvalidEntryDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Date::parse(s, DATE_FORMAT)
            .map(Self)
            .map_err(|_| InvalidEntryDateError(s.to_owned()))
    }
}

impl Display for EntryDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (year, month, day) = (self.0.year(), u8::from(self.0.month()), self.0.day());
        write!(f, "{year:04}-{month:02}-{day:02}")
    }
}

impl Serialize for EntryDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntryDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        inner
            .parse()
            .map_err(|_| Error::invalid_value(Unexpected::Str(&inner), &"EntryDate"))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::date::{EntryDate, is_eligible_date, this_friday};
    use time::macros::date;

    #[test]
    fn malformed_dates_are_ineligible() {
        let today = date!(2024 - 06 - 14);

        for bad in [
            "",
            "banana",
            "2024-06-14T00:00:00",
            "06/14/2024",
            "2024-13-01",
            "2024-06-1",
            "2024-06-14 ",
        ] {
            assert!(!is_eligible_date(bad, today), "{bad:?}");
        }
    }

    #[test]
    fn dates_before_the_service_epoch_are_ineligible() {
        // A Friday, but in 2018.
        assert!(!is_eligible_date("2018-12-28", date!(2024 - 06 - 14)));
    }

    #[test]
    fn non_fridays_are_ineligible() {
        // A Wednesday.
        assert!(!is_eligible_date("2022-06-15", date!(2022 - 06 - 17)));
        // The Friday of the same week is fine.
        assert!(is_eligible_date("2022-06-17", date!(2022 - 06 - 17)));
    }

    #[test]
    fn future_weeks_are_ineligible() {
        let friday = date!(2024 - 06 - 14);

        assert!(is_eligible_date("2024-06-14", friday));
        assert!(is_eligible_date("2024-06-07", friday));
        assert!(!is_eligible_date("2024-06-21", friday));
    }

    #[test]
    fn upcoming_friday_is_eligible_mid_week() {
        // On Wednesday the 12th, the entry for Friday the 14th may already
        // be written, but next week's may not.
        let wednesday = date!(2024 - 06 - 12);

        assert!(is_eligible_date("2024-06-14", wednesday));
        assert!(!is_eligible_date("2024-06-21", wednesday));
    }

    #[test]
    fn this_friday_walks_forward_to_the_next_friday() {
        assert_eq!(this_friday(date!(2024 - 06 - 12)), date!(2024 - 06 - 14));
        assert_eq!(this_friday(date!(2024 - 06 - 14)), date!(2024 - 06 - 14));
        assert_eq!(this_friday(date!(2024 - 06 - 15)), date!(2024 - 06 - 21));
    }

    #[test]
    fn entry_date_round_trips_through_display() {
        let date = "2024-06-14".parse::<EntryDate>().unwrap();
        assert_eq!(date.to_string(), "2024-06-14");
        assert_eq!(date.get(), date!(2024 - 06 - 14));
    }
}
