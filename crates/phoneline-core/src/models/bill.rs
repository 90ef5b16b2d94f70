//! Monthly bill model
//!
//! A bill accumulates the fixed charges and call minutes of one contract for
//! one billing month.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Plan label printed on a bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlanLabel {
    /// Month-to-month contract
    Mtm,
    /// Fixed-term contract
    Term,
    /// Prepaid contract
    Prepaid,
}

impl fmt::Display for PlanLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanLabel::Mtm => write!(f, "MTM"),
            PlanLabel::Term => write!(f, "TERM"),
            PlanLabel::Prepaid => write!(f, "PREPAID"),
        }
    }
}

/// Bill for one contract and one month
///
/// Created empty at the start of the month and handed to the contract, which
/// sets the rate and charges the fixed costs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// Plan label, set by the contract when the month starts
    plan_label: Option<PlanLabel>,

    /// Rate per billed minute
    rate_per_minute: Decimal,

    /// Monthly fee, deposits, prepaid balance carry-over
    fixed_cost: Decimal,

    /// Minutes covered by the plan allowance
    free_minutes_used: u32,

    /// Minutes charged at `rate_per_minute`
    billed_minutes: u32,
}

impl Bill {
    /// Create an empty bill
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_rate(&mut self, plan_label: PlanLabel, rate_per_minute: Decimal) {
        self.plan_label = Some(plan_label);
        self.rate_per_minute = rate_per_minute;
    }

    /// Add to the fixed cost. Negative amounts are refunds.
    pub fn add_fixed_cost(&mut self, amount: Decimal) {
        self.fixed_cost += amount;
    }

    /// Record minutes against the free allowance
    ///
    /// The caller reconciles any overflow with [`Bill::cap_free_minutes`].
    /// Counters saturate at `u32::MAX`.
    pub fn add_free_minutes(&mut self, minutes: u32) {
        self.free_minutes_used = self.free_minutes_used.saturating_add(minutes);
    }

    pub fn add_billed_minutes(&mut self, minutes: u32) {
        self.billed_minutes = self.billed_minutes.saturating_add(minutes);
    }

    /// Move free minutes above `allowance` into billed minutes
    ///
    /// Returns the number of minutes moved.
    pub fn cap_free_minutes(&mut self, allowance: u32) -> u32 {
        if self.free_minutes_used <= allowance {
            return 0;
        }

        let excess = self.free_minutes_used - allowance;
        self.add_billed_minutes(excess);
        self.free_minutes_used = allowance;
        excess
    }

    /// Total cost: fixed cost plus billed minutes at the bill's rate
    #[inline]
    pub fn get_total_cost(&self) -> Decimal {
        self.fixed_cost + Decimal::from(self.billed_minutes) * self.rate_per_minute
    }

    pub fn plan_label(&self) -> Option<PlanLabel> {
        self.plan_label
    }

    pub fn rate_per_minute(&self) -> Decimal {
        self.rate_per_minute
    }

    pub fn fixed_cost(&self) -> Decimal {
        self.fixed_cost
    }

    pub fn free_minutes_used(&self) -> u32 {
        self.free_minutes_used
    }

    pub fn billed_minutes(&self) -> u32 {
        self.billed_minutes
    }

    /// Snapshot of the bill for reporting
    pub fn summary(&self) -> BillSummary {
        BillSummary {
            plan_label: self.plan_label,
            rate_per_minute: self.rate_per_minute,
            fixed_cost: self.fixed_cost,
            free_minutes_used: self.free_minutes_used,
            billed_minutes: self.billed_minutes,
            total: self.get_total_cost(),
        }
    }
}

/// Serializable view of a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillSummary {
    pub plan_label: Option<PlanLabel>,
    pub rate_per_minute: Decimal,
    pub fixed_cost: Decimal,
    pub free_minutes_used: u32,
    pub billed_minutes: u32,
    pub total: Decimal,
}
