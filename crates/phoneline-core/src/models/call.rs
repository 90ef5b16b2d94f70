//! Call model
//!
//! A completed phone call as supplied by the call log. Billing reads only the
//! duration and the timestamp.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::BillingPeriod;

/// (longitude, latitude) of a call endpoint
pub type Location = (f64, f64);

/// One completed phone call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    /// Caller number
    pub src_number: String,

    /// Called number
    pub dst_number: String,

    /// When the call started
    pub time: NaiveDateTime,

    /// Call duration in seconds
    pub duration: u32,

    /// Caller location
    pub src_loc: Location,

    /// Callee location
    pub dst_loc: Location,
}

impl Call {
    pub fn new(
        src_number: impl Into<String>,
        dst_number: impl Into<String>,
        time: NaiveDateTime,
        duration: u32,
        src_loc: Location,
        dst_loc: Location,
    ) -> Self {
        Self {
            src_number: src_number.into(),
            dst_number: dst_number.into(),
            time,
            duration,
            src_loc,
            dst_loc,
        }
    }

    /// Duration rounded up to whole minutes
    ///
    /// Any started minute is billed as a full minute.
    #[inline]
    pub fn billable_minutes(&self) -> u32 {
        self.duration.div_ceil(60)
    }

    /// Billing period the call belongs to
    pub fn period(&self) -> BillingPeriod {
        BillingPeriod::of_datetime(self.time)
    }
}
