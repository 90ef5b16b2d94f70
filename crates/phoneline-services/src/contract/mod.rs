//! Contract billing state machines
//!
//! Each plan is its own type implementing [`BillingContract`]; [`Contract`]
//! wraps them for callers that handle lines of any plan.
//!
//! # Lifecycle
//!
//! ```text
//! new ──advance_month──▶ billing ──bill_call*──▶ billing ──cancel──▶ closed
//!                          ▲   │
//!                          └───┘ advance_month (next month)
//! ```

mod month_to_month;
mod prepaid;
mod term;

pub use month_to_month::MonthToMonthContract;
pub use prepaid::PrepaidContract;
pub use term::{deposit_refundable, TermContract};

use chrono::NaiveDate;
use phoneline_core::{
    models::{Bill, BillingPeriod, Call, PlanLabel, TariffSchedule},
    traits::BillingContract,
    AppError, AppResult,
};
use rust_decimal::Decimal;
use tracing::{info, instrument};

/// State shared by every plan: the start date and the current bill
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ContractCore {
    start: Option<NaiveDate>,
    bill: Option<Bill>,
}

impl ContractCore {
    pub(crate) fn new(start: NaiveDate) -> Self {
        Self { start: Some(start), bill: None }
    }

    pub(crate) fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    /// Billing period of the start date
    pub(crate) fn start_period(&self) -> AppResult<BillingPeriod> {
        self.start
            .map(BillingPeriod::of_date)
            .ok_or(AppError::ContractClosed)
    }

    /// Install the bill for a new month
    pub(crate) fn open_month(&mut self, bill: Bill) -> AppResult<&mut Bill> {
        if self.start.is_none() {
            return Err(AppError::ContractClosed);
        }
        Ok(self.bill.insert(bill))
    }

    /// Bill that calls of the current month are charged to
    pub(crate) fn active_bill(&mut self) -> AppResult<&mut Bill> {
        if self.start.is_none() {
            return Err(AppError::ContractClosed);
        }
        self.bill.as_mut().ok_or(AppError::NoActiveBill)
    }

    /// Default call policy: every started minute is billed
    pub(crate) fn bill_minutes(&mut self, call: &Call) -> AppResult<u32> {
        let minutes = call.billable_minutes();
        self.active_bill()?.add_billed_minutes(minutes);
        Ok(minutes)
    }

    /// Mark the contract closed and hand back the final bill
    pub(crate) fn close(&mut self) -> AppResult<&mut Bill> {
        if self.start.is_none() {
            return Err(AppError::ContractClosed);
        }
        let bill = self.bill.as_mut().ok_or(AppError::NoActiveBill)?;
        self.start = None;
        Ok(bill)
    }

    pub(crate) fn bill(&self) -> Option<&Bill> {
        self.bill.as_ref()
    }

    pub(crate) fn take_bill(&mut self) -> Option<Bill> {
        self.bill.take()
    }
}

/// A contract of any plan
#[derive(Debug, Clone, PartialEq)]
pub enum Contract {
    MonthToMonth(MonthToMonthContract),
    Term(TermContract),
    Prepaid(PrepaidContract),
}

impl Contract {
    /// Month-to-month contract on the schedule's tariff
    pub fn month_to_month(start: NaiveDate, tariffs: &TariffSchedule) -> Self {
        MonthToMonthContract::with_tariff(start, tariffs.month_to_month.clone()).into()
    }

    /// Term contract from `start` to `end` on the schedule's tariff
    pub fn term(start: NaiveDate, end: NaiveDate, tariffs: &TariffSchedule) -> AppResult<Self> {
        Ok(TermContract::with_tariff(start, end, tariffs.term.clone())?.into())
    }

    /// Prepaid contract with an initial top-up of `balance`
    pub fn prepaid(start: NaiveDate, balance: Decimal, tariffs: &TariffSchedule) -> AppResult<Self> {
        Ok(PrepaidContract::with_tariff(start, balance, tariffs.prepaid.clone())?.into())
    }

    pub fn plan_label(&self) -> PlanLabel {
        match self {
            Contract::MonthToMonth(_) => PlanLabel::Mtm,
            Contract::Term(_) => PlanLabel::Term,
            Contract::Prepaid(_) => PlanLabel::Prepaid,
        }
    }

    fn inner(&self) -> &dyn BillingContract {
        match self {
            Contract::MonthToMonth(c) => c,
            Contract::Term(c) => c,
            Contract::Prepaid(c) => c,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn BillingContract {
        match self {
            Contract::MonthToMonth(c) => c,
            Contract::Term(c) => c,
            Contract::Prepaid(c) => c,
        }
    }
}

impl BillingContract for Contract {
    #[instrument(skip(self, bill), fields(plan = %self.plan_label()))]
    fn advance_month(&mut self, month: u32, year: i32, bill: Bill) -> AppResult<()> {
        self.inner_mut().advance_month(month, year, bill)
    }

    fn bill_call(&mut self, call: &Call) -> AppResult<()> {
        self.inner_mut().bill_call(call)
    }

    #[instrument(skip(self), fields(plan = %self.plan_label()))]
    fn cancel(&mut self) -> AppResult<Decimal> {
        let owed = self.inner_mut().cancel()?;
        info!(%owed, "Contract cancelled");
        Ok(owed)
    }

    fn bill(&self) -> Option<&Bill> {
        self.inner().bill()
    }

    fn take_bill(&mut self) -> Option<Bill> {
        self.inner_mut().take_bill()
    }

    fn start_date(&self) -> Option<NaiveDate> {
        self.inner().start_date()
    }
}

impl From<MonthToMonthContract> for Contract {
    fn from(c: MonthToMonthContract) -> Self {
        Contract::MonthToMonth(c)
    }
}

impl From<TermContract> for Contract {
    fn from(c: TermContract) -> Self {
        Contract::Term(c)
    }
}

impl From<PrepaidContract> for Contract {
    fn from(c: PrepaidContract) -> Self {
        Contract::Prepaid(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn call(duration: u32) -> Call {
        let time = date(2024, 1, 10).and_hms_opt(12, 0, 0).unwrap();
        Call::new("100-0001", "100-0002", time, duration, (-79.4, 43.7), (-79.4, 43.7))
    }

    #[test]
    fn test_constructors_pick_plan() {
        let tariffs = TariffSchedule::default();
        let start = date(2024, 1, 1);

        let mtm = Contract::month_to_month(start, &tariffs);
        let term = Contract::term(start, date(2025, 1, 1), &tariffs).unwrap();
        let prepaid = Contract::prepaid(start, dec!(40), &tariffs).unwrap();

        assert_eq!(mtm.plan_label(), PlanLabel::Mtm);
        assert_eq!(term.plan_label(), PlanLabel::Term);
        assert_eq!(prepaid.plan_label(), PlanLabel::Prepaid);
    }

    #[test]
    fn test_enum_dispatches_to_plan() {
        let tariffs = TariffSchedule::default();
        let mut contract = Contract::month_to_month(date(2024, 1, 1), &tariffs);

        contract.advance_month(1, 2024, Bill::new()).unwrap();
        contract.bill_call(&call(90)).unwrap();

        let bill = contract.bill().unwrap();
        assert_eq!(bill.plan_label(), Some(PlanLabel::Mtm));
        assert_eq!(bill.billed_minutes(), 2);
        assert_eq!(contract.cancel().unwrap(), dec!(50.10));
        assert!(contract.is_closed());
    }

    #[test]
    fn test_bill_call_without_month_fails() {
        let tariffs = TariffSchedule::default();
        let mut contract = Contract::month_to_month(date(2024, 1, 1), &tariffs);

        assert_eq!(contract.bill_call(&call(30)), Err(AppError::NoActiveBill));
        assert_eq!(contract.cancel(), Err(AppError::NoActiveBill));
        // A failed cancel leaves the contract open
        assert!(!contract.is_closed());
    }

    #[test]
    fn test_closed_contract_rejects_operations() {
        let tariffs = TariffSchedule::default();
        let mut contract = Contract::month_to_month(date(2024, 1, 1), &tariffs);
        contract.advance_month(1, 2024, Bill::new()).unwrap();
        contract.cancel().unwrap();

        assert_eq!(contract.start_date(), None);
        assert_eq!(contract.bill_call(&call(30)), Err(AppError::ContractClosed));
        assert_eq!(contract.cancel(), Err(AppError::ContractClosed));
        assert_eq!(
            contract.advance_month(2, 2024, Bill::new()),
            Err(AppError::ContractClosed)
        );
    }

    #[test]
    fn test_take_bill_releases_current_bill() {
        let tariffs = TariffSchedule::default();
        let mut contract = Contract::month_to_month(date(2024, 1, 1), &tariffs);
        contract.advance_month(1, 2024, Bill::new()).unwrap();

        let bill = contract.take_bill().unwrap();
        assert_eq!(bill.fixed_cost(), dec!(50.00));
        assert!(contract.bill().is_none());
        assert_eq!(contract.bill_call(&call(30)), Err(AppError::NoActiveBill));
    }
}
