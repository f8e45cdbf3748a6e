// src/normalize/calendar.rs
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// English month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn month_name(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

/// Quarter label in `2024Q3` form.
pub fn quarter_label(date: NaiveDate) -> String {
    format!("{}Q{}", date.year(), (date.month0() / 3) + 1)
}

/// Month-year label in `Aug-2025` form.
pub fn month_year_label(date: NaiveDate) -> String {
    date.format("%b-%Y").to_string()
}

/// Closing-month bucket: whether a date falls in the current calendar month,
/// the next one, or anywhere else (including no date at all).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClosingBucket {
    ThisMonth,
    NextMonth,
    Other,
}

impl ClosingBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClosingBucket::ThisMonth => "this_month",
            ClosingBucket::NextMonth => "next_month",
            ClosingBucket::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClosingBucket::ThisMonth => "This Month",
            ClosingBucket::NextMonth => "Next Month",
            ClosingBucket::Other => "Other",
        }
    }

    pub fn all() -> [ClosingBucket; 3] {
        [
            ClosingBucket::ThisMonth,
            ClosingBucket::NextMonth,
            ClosingBucket::Other,
        ]
    }
}

impl std::str::FromStr for ClosingBucket {
    type Err = String;

    /// Accepts both the token form (`this_month`) and the display label
    /// (`This Month`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "this_month" | "This Month" => Ok(ClosingBucket::ThisMonth),
            "next_month" | "Next Month" => Ok(ClosingBucket::NextMonth),
            "other" | "Other" => Ok(ClosingBucket::Other),
            other => Err(format!("unknown closing bucket: {other}")),
        }
    }
}

/// Bucket a date relative to `today`.
pub fn closing_bucket(date: Option<NaiveDate>, today: NaiveDate) -> ClosingBucket {
    let Some(date) = date else {
        return ClosingBucket::Other;
    };
    let (next_year, next_month) = month_after(today.year(), today.month());
    if (date.year(), date.month()) == (today.year(), today.month()) {
        ClosingBucket::ThisMonth
    } else if (date.year(), date.month()) == (next_year, next_month) {
        ClosingBucket::NextMonth
    } else {
        ClosingBucket::Other
    }
}

fn month_after(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}
