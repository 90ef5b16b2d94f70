//! Phone line billing tariff tool
//!
//! Loads the application configuration, validates the tariff schedule that
//! contracts will be billed on and prints it as JSON.
//!
//! Usage: `phoneline-billing [CONFIG_FILE]`. Without a file the layered
//! configuration (`config/default`, `config/{RUN_MODE}`, environment) is used.

use anyhow::Context;
use phoneline_core::{models::PlanLabel, AppConfig};
use std::env;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging
fn init_tracing(config: &AppConfig) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "phoneline_billing={level},phoneline_core={level},phoneline_services={level}",
            level = config.log.level
        ))
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.log.json {
        registry
            .with(fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_level(true))
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let config = match env::args().nth(1) {
        Some(path) => AppConfig::from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => AppConfig::load().context("Failed to load configuration")?,
    };

    init_tracing(&config);

    info!("Starting phoneline-billing v{}", env!("CARGO_PKG_VERSION"));

    config
        .tariffs
        .validate()
        .context("Invalid tariff schedule")?;

    let tariffs = &config.tariffs;
    info!(
        plan = %PlanLabel::Mtm,
        fee = %tariffs.month_to_month.monthly_fee,
        rate = %tariffs.month_to_month.rate_per_minute,
        "Tariff loaded"
    );
    info!(
        plan = %PlanLabel::Term,
        fee = %tariffs.term.monthly_fee,
        rate = %tariffs.term.rate_per_minute,
        deposit = %tariffs.term.deposit,
        free_minutes = tariffs.term.free_minutes,
        "Tariff loaded"
    );
    info!(
        plan = %PlanLabel::Prepaid,
        rate = %tariffs.prepaid.rate_per_minute,
        top_up = %tariffs.prepaid.top_up_amount,
        "Tariff loaded"
    );
    debug!(?tariffs, "Full tariff schedule");

    let schedule = serde_json::to_string_pretty(tariffs).context("Failed to render tariffs")?;
    println!("{}", schedule);

    Ok(())
}
