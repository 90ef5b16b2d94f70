//! Month-to-month contract
//!
//! No end date, no deposit, no free minutes: a fixed monthly fee plus every
//! call minute at a flat rate.

use chrono::NaiveDate;
use phoneline_core::{
    models::{Bill, Call, MonthToMonthTariff, PlanLabel},
    traits::BillingContract,
    AppResult,
};
use rust_decimal::Decimal;
use tracing::debug;

use super::ContractCore;

#[derive(Debug, Clone, PartialEq)]
pub struct MonthToMonthContract {
    core: ContractCore,
    tariff: MonthToMonthTariff,
}

impl MonthToMonthContract {
    pub fn new(start: NaiveDate) -> Self {
        Self::with_tariff(start, MonthToMonthTariff::default())
    }

    pub fn with_tariff(start: NaiveDate, tariff: MonthToMonthTariff) -> Self {
        Self {
            core: ContractCore::new(start),
            tariff,
        }
    }
}

impl BillingContract for MonthToMonthContract {
    fn advance_month(&mut self, month: u32, year: i32, bill: Bill) -> AppResult<()> {
        let bill = self.core.open_month(bill)?;
        bill.set_rate(PlanLabel::Mtm, self.tariff.rate_per_minute);
        bill.add_fixed_cost(self.tariff.monthly_fee);

        debug!(month, year, fee = %self.tariff.monthly_fee, "Month-to-month month opened");
        Ok(())
    }

    fn bill_call(&mut self, call: &Call) -> AppResult<()> {
        let minutes = self.core.bill_minutes(call)?;
        debug!(duration = call.duration, minutes, "Call billed");
        Ok(())
    }

    fn cancel(&mut self) -> AppResult<Decimal> {
        Ok(self.core.close()?.get_total_cost())
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

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn call(duration: u32) -> Call {
        let time = start().and_hms_opt(9, 0, 0).unwrap();
        Call::new("416-555-0100", "416-555-0101", time, duration, (-79.4, 43.7), (-79.3, 43.6))
    }

    #[test]
    fn test_month_charges_fee_and_rate() {
        let mut contract = MonthToMonthContract::new(start());
        contract.advance_month(3, 2024, Bill::new()).unwrap();

        let bill = contract.bill().unwrap();
        assert_eq!(bill.plan_label(), Some(PlanLabel::Mtm));
        assert_eq!(bill.rate_per_minute(), dec!(0.05));
        assert_eq!(bill.fixed_cost(), dec!(50.00));
    }

    #[test]
    fn test_ninety_second_call() {
        let mut contract = MonthToMonthContract::new(start());
        contract.advance_month(3, 2024, Bill::new()).unwrap();
        contract.bill_call(&call(90)).unwrap();

        let bill = contract.bill().unwrap();
        assert_eq!(bill.billed_minutes(), 2);
        assert_eq!(bill.free_minutes_used(), 0);
        assert_eq!(bill.get_total_cost(), dec!(50.10));
    }

    #[test]
    fn test_every_month_charges_fee() {
        let mut contract = MonthToMonthContract::new(start());
        contract.advance_month(3, 2024, Bill::new()).unwrap();
        contract.advance_month(4, 2024, Bill::new()).unwrap();

        assert_eq!(contract.bill().unwrap().fixed_cost(), dec!(50.00));
    }

    #[test]
    fn test_cancel_returns_bill_total() {
        let mut contract = MonthToMonthContract::new(start());
        contract.advance_month(3, 2024, Bill::new()).unwrap();
        contract.bill_call(&call(600)).unwrap();

        // 50.00 + 10 * 0.05
        assert_eq!(contract.cancel().unwrap(), dec!(50.50));
        assert!(contract.is_closed());
    }

    #[test]
    fn test_custom_tariff() {
        let tariff = MonthToMonthTariff {
            monthly_fee: dec!(35.00),
            rate_per_minute: dec!(0.08),
        };
        let mut contract = MonthToMonthContract::with_tariff(start(), tariff);
        contract.advance_month(3, 2024, Bill::new()).unwrap();
        contract.bill_call(&call(120)).unwrap();

        assert_eq!(contract.cancel().unwrap(), dec!(35.16));
    }
}
