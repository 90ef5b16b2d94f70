//! Domain models for phone line billing

pub mod bill;
pub mod call;
pub mod period;
pub mod tariff;

pub use bill::{Bill, BillSummary, PlanLabel};
pub use call::{Call, Location};
pub use period::BillingPeriod;
pub use tariff::{MonthToMonthTariff, PrepaidTariff, TariffSchedule, TermTariff};
