//! Unified error handling for phone line billing
//!
//! Numeric inputs (durations, amounts) are trusted. The errors below cover
//! out-of-order contract operations and invalid configuration.

use chrono::NaiveDate;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    // ==================== Contract Lifecycle Errors ====================
    #[error("No active bill: advance the contract to a month first")]
    NoActiveBill,

    #[error("Contract is closed")]
    ContractClosed,

    #[error("Invalid term: end date {end} precedes start date {start}")]
    InvalidTerm { start: NaiveDate, end: NaiveDate },

    #[error("Billing period {month:02}/{year} is not open on this line")]
    PeriodNotOpen { month: u32, year: i32 },

    // ==================== Validation Errors ====================
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ==================== Internal Errors ====================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Returns a stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NoActiveBill => "no_active_bill",
            AppError::ContractClosed => "contract_closed",
            AppError::InvalidTerm { .. } => "invalid_term",
            AppError::PeriodNotOpen { .. } => "period_not_open",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Config(_) => "config_error",
            AppError::Serialization(_) => "serialization_error",
        }
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
