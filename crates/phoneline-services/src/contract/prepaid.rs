//! Prepaid contract
//!
//! The customer prepays an arbitrary amount at sign-up. The running balance
//! is negative while the line holds credit and positive when the customer
//! owes money. It is kept apart from the monthly bill: calls are billed on
//! the bill and debited from the balance at the same time.

use chrono::NaiveDate;
use phoneline_core::{
    models::{Bill, BillingPeriod, Call, PlanLabel, PrepaidTariff},
    traits::BillingContract,
    AppError, AppResult,
};
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::ContractCore;

#[derive(Debug, Clone, PartialEq)]
pub struct PrepaidContract {
    core: ContractCore,
    /// Negative while the line holds credit
    balance: Decimal,
    tariff: PrepaidTariff,
}

impl PrepaidContract {
    /// New prepaid line holding `balance` of credit
    pub fn new(start: NaiveDate, balance: Decimal) -> AppResult<Self> {
        Self::with_tariff(start, balance, PrepaidTariff::default())
    }

    pub fn with_tariff(start: NaiveDate, balance: Decimal, tariff: PrepaidTariff) -> AppResult<Self> {
        if balance < Decimal::ZERO {
            return Err(AppError::InvalidInput(format!(
                "initial prepaid balance cannot be negative: {}",
                balance
            )));
        }

        Ok(Self {
            core: ContractCore::new(start),
            balance: -balance,
            tariff,
        })
    }

    /// Current balance; negative means credit
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Whether the balance is low enough to require a top-up
    #[inline]
    pub fn needs_top_up(&self) -> bool {
        self.balance > -self.tariff.top_up_threshold
    }
}

impl BillingContract for PrepaidContract {
    fn advance_month(&mut self, month: u32, year: i32, bill: Bill) -> AppResult<()> {
        let period = BillingPeriod::new(month, year);
        let start_period = self.core.start_period()?;
        let needs_top_up = self.needs_top_up();

        let bill = self.core.open_month(bill)?;
        bill.set_rate(PlanLabel::Prepaid, self.tariff.rate_per_minute);

        if needs_top_up && period != start_period {
            self.balance += self.tariff.top_up_amount;
            info!(
                %period,
                top_up = %self.tariff.top_up_amount,
                balance = %self.balance,
                "Prepaid balance topped up"
            );
        }
        bill.add_fixed_cost(self.balance);

        debug!(%period, balance = %self.balance, "Prepaid month opened");
        Ok(())
    }

    fn bill_call(&mut self, call: &Call) -> AppResult<()> {
        let minutes = self.core.bill_minutes(call)?;
        self.balance += Decimal::from(minutes) * self.tariff.rate_per_minute;

        debug!(duration = call.duration, minutes, balance = %self.balance, "Call billed");
        Ok(())
    }

    fn cancel(&mut self) -> AppResult<Decimal> {
        let balance = self.balance;
        let bill = self.core.close()?;

        if balance < Decimal::ZERO {
            info!(%balance, "Unused prepaid credit forfeited");
            return Ok(Decimal::ZERO);
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
