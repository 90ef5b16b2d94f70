//! Phone line ledger
//!
//! Drives one contract through its billing months: opens a fresh bill for
//! each month, routes the month's calls to the contract and keeps the bills
//! of finished months for reporting.

use phoneline_core::{
    models::{Bill, BillSummary, BillingPeriod, Call},
    traits::BillingContract,
    AppError, AppResult,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

use crate::contract::Contract;

/// One phone number and its contract
#[derive(Debug, Clone)]
pub struct PhoneLine {
    number: String,
    contract: Contract,
    /// Bills of months that are over, by period
    archived: BTreeMap<BillingPeriod, Bill>,
    /// Month the contract's current bill belongs to
    current: Option<BillingPeriod>,
}

impl PhoneLine {
    pub fn new(number: impl Into<String>, contract: Contract) -> Self {
        Self {
            number: number.into(),
            contract,
            archived: BTreeMap::new(),
            current: None,
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn current_period(&self) -> Option<BillingPeriod> {
        self.current
    }

    /// Open the billing month `month`/`year`
    ///
    /// A month that was already opened is left untouched, so its fixed costs
    /// are never charged twice. Months only move forward: a month earlier than
    /// the open one that was never opened is rejected.
    #[instrument(skip(self), fields(number = %self.number))]
    pub fn new_month(&mut self, month: u32, year: i32) -> AppResult<()> {
        let period = BillingPeriod::new(month, year);

        if self.contract.is_closed() {
            warn!(%period, "Cannot open a month on a cancelled line");
            return Err(AppError::ContractClosed);
        }

        if self.current == Some(period) || self.archived.contains_key(&period) {
            debug!(%period, "Month already opened");
            return Ok(());
        }

        if let Some(current) = self.current.filter(|current| period < *current) {
            warn!(%period, %current, "Cannot open a month before the open one");
            return Err(AppError::PeriodNotOpen {
                month: period.month,
                year: period.year,
            });
        }

        self.archive_current();
        self.contract.advance_month(month, year, Bill::new())?;
        self.current = Some(period);

        info!(%period, "Billing month opened");
        Ok(())
    }

    /// Bill a call made from this line
    ///
    /// The call must belong to the month currently open on the line.
    pub fn make_call(&mut self, call: &Call) -> AppResult<()> {
        if self.contract.is_closed() {
            warn!(number = %self.number, "Call on a cancelled line");
            return Err(AppError::ContractClosed);
        }

        let period = call.period();

        if self.current != Some(period) {
            warn!(number = %self.number, %period, "Call outside the open billing month");
            return Err(AppError::PeriodNotOpen {
                month: period.month,
                year: period.year,
            });
        }

        self.contract.bill_call(call)
    }

    /// Cancel the line's contract and return the amount owed
    #[instrument(skip(self), fields(number = %self.number))]
    pub fn cancel_line(&mut self) -> AppResult<Decimal> {
        let owed = self.contract.cancel()?;
        self.archive_current();
        Ok(owed)
    }

    /// Summary of the bill for `month`/`year`, if that month was opened
    pub fn bill_summary(&self, month: u32, year: i32) -> Option<BillSummary> {
        let period = BillingPeriod::new(month, year);

        if self.current == Some(period) {
            if let Some(bill) = self.contract.bill() {
                return Some(bill.summary());
            }
        }

        self.archived.get(&period).map(Bill::summary)
    }

    /// Total cost of every opened month, in calendar order
    pub fn monthly_totals(&self) -> Vec<(BillingPeriod, Decimal)> {
        let mut totals: Vec<_> = self
            .archived
            .iter()
            .map(|(period, bill)| (*period, bill.get_total_cost()))
            .collect();

        if let (Some(period), Some(bill)) = (self.current, self.contract.bill()) {
            totals.push((period, bill.get_total_cost()));
        }

        totals.sort_by_key(|(period, _)| *period);
        totals
    }

    /// Move the contract's bill into the archive
    fn archive_current(&mut self) {
        if let Some(period) = self.current.take() {
            if let Some(bill) = self.contract.take_bill() {
                debug!(%period, total = %bill.get_total_cost(), "Bill archived");
                self.archived.insert(period, bill);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use phoneline_core::models::TariffSchedule;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn call_on(day: NaiveDate, duration: u32) -> Call {
        let time = day.and_hms_opt(14, 0, 0).unwrap();
        Call::new("416-555-0123", "416-555-0456", time, duration, (-79.4, 43.7), (-79.4, 43.6))
    }

    fn mtm_line() -> PhoneLine {
        let tariffs = TariffSchedule::default();
        PhoneLine::new(
            "416-555-0123",
            Contract::month_to_month(date(2024, 1, 1), &tariffs),
        )
    }

    #[test]
    fn test_new_month_is_idempotent() {
        let mut line = mtm_line();
        line.new_month(1, 2024).unwrap();
        line.new_month(1, 2024).unwrap();

        let summary = line.bill_summary(1, 2024).unwrap();
        assert_eq!(summary.fixed_cost, dec!(50.00));
    }

    #[test]
    fn test_reopening_archived_month_is_ignored() {
        let mut line = mtm_line();
        line.new_month(1, 2024).unwrap();
        line.new_month(2, 2024).unwrap();
        line.new_month(1, 2024).unwrap();

        assert_eq!(line.current_period(), Some(BillingPeriod::new(2, 2024)));
        assert_eq!(line.monthly_totals().len(), 2);
    }

    #[test]
    fn test_earlier_unopened_month_rejected() {
        let mut line = mtm_line();
        line.new_month(1, 2024).unwrap();
        line.new_month(3, 2024).unwrap();

        assert_eq!(
            line.new_month(2, 2024),
            Err(AppError::PeriodNotOpen { month: 2, year: 2024 })
        );
        assert_eq!(
            line.new_month(12, 2023),
            Err(AppError::PeriodNotOpen { month: 12, year: 2023 })
        );
        assert_eq!(line.current_period(), Some(BillingPeriod::new(3, 2024)));
        assert_eq!(line.monthly_totals().len(), 2);
    }

    #[test]
    fn test_cancelled_line_rejects_calls_and_months() {
        let mut line = mtm_line();
        line.new_month(1, 2024).unwrap();
        line.cancel_line().unwrap();

        assert_eq!(
            line.make_call(&call_on(date(2024, 1, 5), 90)),
            Err(AppError::ContractClosed)
        );
        assert_eq!(line.new_month(1, 2024), Err(AppError::ContractClosed));
        assert_eq!(line.cancel_line(), Err(AppError::ContractClosed));
        // The final bill is untouched
        assert_eq!(line.bill_summary(1, 2024).unwrap().total, dec!(50.00));
    }

    #[test]
    fn test_calls_go_to_their_month() {
        let mut line = mtm_line();
        line.new_month(1, 2024).unwrap();
        line.make_call(&call_on(date(2024, 1, 3), 90)).unwrap();
        line.new_month(2, 2024).unwrap();
        line.make_call(&call_on(date(2024, 2, 3), 600)).unwrap();

        assert_eq!(line.bill_summary(1, 2024).unwrap().billed_minutes, 2);
        assert_eq!(line.bill_summary(2, 2024).unwrap().billed_minutes, 10);
        assert_eq!(
            line.monthly_totals(),
            vec![
                (BillingPeriod::new(1, 2024), dec!(50.10)),
                (BillingPeriod::new(2, 2024), dec!(50.50)),
            ]
        );
    }

    #[test]
    fn test_call_outside_open_month_rejected() {
        let mut line = mtm_line();
        assert_eq!(
            line.make_call(&call_on(date(2024, 1, 3), 90)),
            Err(AppError::PeriodNotOpen { month: 1, year: 2024 })
        );

        line.new_month(1, 2024).unwrap();
        assert_eq!(
            line.make_call(&call_on(date(2024, 2, 3), 90)),
            Err(AppError::PeriodNotOpen { month: 2, year: 2024 })
        );
    }

    #[test]
    fn test_cancel_line_archives_final_bill() {
        let mut line = mtm_line();
        line.new_month(1, 2024).unwrap();
        line.make_call(&call_on(date(2024, 1, 3), 90)).unwrap();

        assert_eq!(line.cancel_line().unwrap(), dec!(50.10));
        assert_eq!(line.current_period(), None);
        assert_eq!(line.bill_summary(1, 2024).unwrap().total, dec!(50.10));
        assert_eq!(line.new_month(2, 2024), Err(AppError::ContractClosed));
    }

    #[test]
    fn test_unknown_month_has_no_summary() {
        let line = mtm_line();
        assert!(line.bill_summary(1, 2024).is_none());
        assert!(line.monthly_totals().is_empty());
    }
}
