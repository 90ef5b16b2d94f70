//! Billing period model
//!
//! A billing period is one calendar month of one year.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A (month, year) pair identifying one billing month
///
/// Field order makes the derived ordering chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub year: i32,
    pub month: u32,
}

impl BillingPeriod {
    pub fn new(month: u32, year: i32) -> Self {
        Self { year, month }
    }

    /// Period containing the given date
    pub fn of_date(date: NaiveDate) -> Self {
        Self::new(date.month(), date.year())
    }

    /// Period containing the given timestamp
    pub fn of_datetime(time: NaiveDateTime) -> Self {
        Self::of_date(time.date())
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}
