//! Contract billing services
//!
//! This crate contains the stateful billing logic:
//!
//! - `Contract` - month-to-month, term and prepaid billing policies
//! - `PhoneLine` - per-line ledger that opens billing months, routes calls
//!   and archives finished bills
//!
//! All operations are synchronous and instrumented with tracing.

pub mod contract;
pub mod phone_line;

pub use contract::{Contract, MonthToMonthContract, PrepaidContract, TermContract};
pub use phone_line::PhoneLine;
