//! Common traits for contract billing
//!
//! Every contract plan implements [`BillingContract`]. The operations must be
//! called in month order: `advance_month` once per month, then the month's
//! calls through `bill_call`, then optionally `cancel`.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Bill, Call};
use crate::AppResult;

/// Billing policy of one phone line contract
pub trait BillingContract {
    /// Start a new billing month
    ///
    /// Takes ownership of the fresh `bill` for `month`/`year`, sets its rate
    /// and charges the plan's fixed costs. Advancing twice to the same month
    /// charges the fixed costs twice.
    fn advance_month(&mut self, month: u32, year: i32, bill: Bill) -> AppResult<()>;

    /// Charge a call made during the current month
    fn bill_call(&mut self, call: &Call) -> AppResult<()>;

    /// Close the contract and return the amount owed
    ///
    /// The contract cannot be used afterwards.
    fn cancel(&mut self) -> AppResult<Decimal>;

    /// Bill of the current month, if a month has been started
    fn bill(&self) -> Option<&Bill>;

    /// Release the current bill, e.g. to archive it
    fn take_bill(&mut self) -> Option<Bill>;

    /// Contract start date, `None` once cancelled
    fn start_date(&self) -> Option<NaiveDate>;

    fn is_closed(&self) -> bool {
        self.start_date().is_none()
    }
}
