//! Fixed-term contract
//!
//! A term contract commits the customer until its end date. The first month
//! carries a deposit on top of the monthly fee, and every month includes an
//! allowance of free minutes that is consumed before any minute is billed.

use chrono::NaiveDate;
use phoneline_core::{
    models::{Bill, BillingPeriod, Call, PlanLabel, TermTariff},
    traits::BillingContract,
    AppError, AppResult,
};
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::ContractCore;

#[derive(Debug, Clone, PartialEq)]
pub struct TermContract {
    core: ContractCore,
    end: NaiveDate,
    /// Most recent month the contract was advanced to
    current: BillingPeriod,
    tariff: TermTariff,
}

impl TermContract {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        Self::with_tariff(start, end, TermTariff::default())
    }

    pub fn with_tariff(start: NaiveDate, end: NaiveDate, tariff: TermTariff) -> AppResult<Self> {
        if end < start {
            return Err(AppError::InvalidTerm { start, end });
        }

        Ok(Self {
            core: ContractCore::new(start),
            end,
            current: BillingPeriod::of_date(start),
            tariff,
        })
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end
    }

    pub fn current_period(&self) -> BillingPeriod {
        self.current
    }
}

/// Whether cancelling in `current` returns the deposit of a term ending in `end`
///
/// Refunds only when the end month is earlier in the same year, or the end
/// year is earlier. Cancelling in the end month itself keeps the deposit.
pub fn deposit_refundable(end: BillingPeriod, current: BillingPeriod) -> bool {
    (end.month < current.month && end.year == current.year) || end.year < current.year
}

impl BillingContract for TermContract {
    fn advance_month(&mut self, month: u32, year: i32, bill: Bill) -> AppResult<()> {
        let period = BillingPeriod::new(month, year);
        let start_period = self.core.start_period()?;

        let bill = self.core.open_month(bill)?;
        bill.add_fixed_cost(self.tariff.monthly_fee);
        bill.set_rate(PlanLabel::Term, self.tariff.rate_per_minute);

        if period == start_period {
            bill.add_fixed_cost(self.tariff.deposit);
            debug!(%period, deposit = %self.tariff.deposit, "Term deposit charged");
        }

        self.current = period;
        debug!(%period, fee = %self.tariff.monthly_fee, "Term month opened");
        Ok(())
    }

    fn bill_call(&mut self, call: &Call) -> AppResult<()> {
        let minutes = call.billable_minutes();
        let bill = self.core.active_bill()?;

        bill.add_free_minutes(minutes);
        let overflow = bill.cap_free_minutes(self.tariff.free_minutes);

        debug!(
            duration = call.duration,
            minutes,
            overflow,
            free_used = bill.free_minutes_used(),
            "Call billed"
        );
        Ok(())
    }

    fn cancel(&mut self) -> AppResult<Decimal> {
        let end = BillingPeriod::of_date(self.end);
        let current = self.current;
        let bill = self.core.close()?;

        if deposit_refundable(end, current) {
            bill.add_fixed_cost(-self.tariff.deposit);
            info!(%end, %current, deposit = %self.tariff.deposit, "Term deposit refunded");
        } else {
            info!(%end, %current, deposit = %self.tariff.deposit, "Term deposit forfeited");
        }

        Ok(bill.get_total_cost())
    }

    fn bill(&self) -> Option<&Bill> {
        self.core.bill()
    }

    fn take_bill(&mut self) -> Option<Bill> {
        self.core.take_bill()
    }

    fn start_date(&self) -> Option<NaiveDate> {
        self.core.start()
    }
}
