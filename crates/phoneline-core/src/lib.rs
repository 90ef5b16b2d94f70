//! Phone line billing core library
//!
//! This crate provides the foundational types, traits, and error handling
//! for contract billing. It includes:
//!
//! - Domain models (Bill, Call, BillingPeriod, tariffs)
//! - The `BillingContract` trait shared by every contract plan
//! - Unified error handling
//! - Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod traits;

pub use config::AppConfig;
pub use error::AppError;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
