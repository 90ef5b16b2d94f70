//! Tariff models
//!
//! Per-plan fees, rates and allowances. The defaults are the commercial
//! schedule; deployments can override any of them through configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AppError;

/// Month-to-month plan: monthly fee and a flat per-minute rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthToMonthTariff {
    #[serde(default = "default_mtm_fee")]
    pub monthly_fee: Decimal,

    #[serde(default = "default_mtm_rate")]
    pub rate_per_minute: Decimal,
}

fn default_mtm_fee() -> Decimal {
    dec!(50.00)
}

fn default_mtm_rate() -> Decimal {
    dec!(0.05)
}

impl Default for MonthToMonthTariff {
    fn default() -> Self {
        Self {
            monthly_fee: default_mtm_fee(),
            rate_per_minute: default_mtm_rate(),
        }
    }
}

/// Fixed-term plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermTariff {
    #[serde(default = "default_term_fee")]
    pub monthly_fee: Decimal,

    #[serde(default = "default_term_rate")]
    pub rate_per_minute: Decimal,

    /// Charged in the first month, refundable on cancellation after the term
    #[serde(default = "default_term_deposit")]
    pub deposit: Decimal,

    /// Free minutes included every month
    #[serde(default = "default_term_free_minutes")]
    pub free_minutes: u32,
}

fn default_term_fee() -> Decimal {
    dec!(20.00)
}

fn default_term_rate() -> Decimal {
    dec!(0.10)
}

fn default_term_deposit() -> Decimal {
    dec!(300.00)
}

fn default_term_free_minutes() -> u32 {
    100
}

impl Default for TermTariff {
    fn default() -> Self {
        Self {
            monthly_fee: default_term_fee(),
            rate_per_minute: default_term_rate(),
            deposit: default_term_deposit(),
            free_minutes: default_term_free_minutes(),
        }
    }
}

/// Prepaid plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepaidTariff {
    #[serde(default = "default_prepaid_rate")]
    pub rate_per_minute: Decimal,

    /// Credit below which the line is topped up at the start of a month
    #[serde(default = "default_top_up_threshold")]
    pub top_up_threshold: Decimal,

    /// Amount of a forced top-up
    #[serde(default = "default_top_up_amount")]
    pub top_up_amount: Decimal,
}

fn default_prepaid_rate() -> Decimal {
    dec!(0.025)
}

fn default_top_up_threshold() -> Decimal {
    dec!(10.00)
}

fn default_top_up_amount() -> Decimal {
    dec!(25.00)
}

impl Default for PrepaidTariff {
    fn default() -> Self {
        Self {
            rate_per_minute: default_prepaid_rate(),
            top_up_threshold: default_top_up_threshold(),
            top_up_amount: default_top_up_amount(),
        }
    }
}

/// Tariffs for every plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TariffSchedule {
    #[serde(default)]
    pub month_to_month: MonthToMonthTariff,

    #[serde(default)]
    pub term: TermTariff,

    #[serde(default)]
    pub prepaid: PrepaidTariff,
}

impl TariffSchedule {
    /// Validate tariff configuration
    pub fn validate(&self) -> Result<(), AppError> {
        let non_negative = [
            ("month_to_month.monthly_fee", self.month_to_month.monthly_fee),
            ("month_to_month.rate_per_minute", self.month_to_month.rate_per_minute),
            ("term.monthly_fee", self.term.monthly_fee),
            ("term.rate_per_minute", self.term.rate_per_minute),
            ("term.deposit", self.term.deposit),
            ("prepaid.rate_per_minute", self.prepaid.rate_per_minute),
            ("prepaid.top_up_amount", self.prepaid.top_up_amount),
        ];

        if let Some((name, value)) = non_negative.iter().find(|(_, v)| *v < Decimal::ZERO) {
            warn!(setting = *name, %value, "Negative tariff rejected");
            return Err(AppError::Config(format!("{} cannot be negative", name)));
        }

        if self.prepaid.top_up_threshold <= Decimal::ZERO {
            warn!(threshold = %self.prepaid.top_up_threshold, "Prepaid top-up threshold rejected");
            return Err(AppError::Config(
                "prepaid.top_up_threshold must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
