//! Derived budget item state.
//!
//! An item stores `budget_amount` and `spent_amount`; everything else shown for it is
//! computed here. Inputs are not validated: negative amounts flow through into
//! nonsensical but well-defined outputs, and an overspent item has a negative
//! available amount.

use crate::entities::ItemStatus;

/// Fields recomputed together every time an item's amounts change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFields {
    /// `budget - spent`, unclamped
    pub available_amount: f64,
    /// Rounded spent/budget ratio in percent
    pub percentage: i32,
    /// Health label for the ratio
    pub status: ItemStatus,
}

/// Classifies the spent/budget ratio.
///
/// A zero budget is always healthy. Otherwise: above 100% is exceeded, 90% to 100%
/// inclusive is critical, 75% up to 90% is warning, anything lower is healthy.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn item_status(spent: f64, budget: f64) -> ItemStatus {
    if budget == 0.0 {
        return ItemStatus::Healthy;
    }
    let ratio = spent / budget * 100.0;

    if ratio > 100.0 {
        ItemStatus::Exceeded
    } else if ratio >= 90.0 {
        ItemStatus::Critical
    } else if ratio >= 75.0 {
        ItemStatus::Warning
    } else {
        ItemStatus::Healthy
    }
}

/// Spent/budget ratio in whole percent, `0` when the budget is zero or negative.
///
/// Halves round towards positive infinity.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn item_percentage(spent: f64, budget: f64) -> i32 {
    if budget <= 0.0 {
        return 0;
    }
    (spent / budget * 100.0 + 0.5).floor() as i32
}

/// `budget - spent`; negative when overspent.
#[must_use]
pub fn available_amount(spent: f64, budget: f64) -> f64 {
    budget - spent
}

/// Computes all derived fields for an item.
#[must_use]
pub fn derive(spent: f64, budget: f64) -> DerivedFields {
    DerivedFields {
        available_amount: available_amount(spent, budget),
        percentage: item_percentage(spent, budget),
        status: item_status(spent, budget),
    }
}

impl ItemStatus {
    /// Severity rank, 0 (healthy) to 3 (exceeded).
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::Healthy => 0,
            Self::Warning => 1,
            Self::Critical => 2,
            Self::Exceeded => 3,
        }
    }
}
