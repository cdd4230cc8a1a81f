//! Percentage-based payment accrual.
//!
//! Every payment against a project records a share of the contract value as a
//! percentage. The cumulative share for a project may never exceed 100%.
//!
//! Amounts are compared in basis points (hundredths of a percent) so that
//! fractional splits behave predictably: `33.33 * 3` is 9 999 bp and fits,
//! `70 + 30` is exactly 10 000 bp and fits, `70 + 30.01` does not.
//!
//! The checked value is the stored value: callers persist [`quantize`]d
//! amounts, never the raw request figure.

use crate::error::CoreError;

/// The cumulative ceiling for all payments on a project, in percent.
pub const PAYMENT_CEILING_PCT: f64 = 100.0;

/// The cumulative ceiling in basis points.
pub const PAYMENT_CEILING_BP: i64 = 10_000;

/// Basis points per percent.
const BP_PER_PCT: f64 = 100.0;

/// Well-known payment status names. Must match the `payment_status` enum in
/// the migrations.
pub const PAYMENT_STATUS_PAID: &str = "Paid";
pub const PAYMENT_STATUS_SUBMITTED: &str = "Submitted";
pub const PAYMENT_STATUS_UNDER_APPROVAL: &str = "Under-approval";
pub const PAYMENT_STATUS_REJECTED: &str = "Rejected";

/// Quantize a percentage to whole basis points.
pub fn to_basis_points(pct: f64) -> i64 {
    (pct * BP_PER_PCT).round() as i64
}

/// Convert basis points back to a percentage.
pub fn from_basis_points(bp: i64) -> f64 {
    bp as f64 / BP_PER_PCT
}

/// Round a percentage to whole basis points, as it is checked and stored.
///
/// `30.004` becomes `30.0` and `0.004` becomes `0.0`.
pub fn quantize(pct: f64) -> f64 {
    from_basis_points(to_basis_points(pct))
}

/// Render a percentage with at most two decimals and no trailing zeros.
pub fn format_percent(pct: f64) -> String {
    let s = format!("{:.2}", from_basis_points(to_basis_points(pct)));
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Validate a single payment amount: finite and within `[0, 100]`.
pub fn validate_amount(amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() {
        return Err(CoreError::Validation(
            "amount must be a finite number".into(),
        ));
    }
    let bp = to_basis_points(amount);
    if !(0..=PAYMENT_CEILING_BP).contains(&bp) {
        return Err(CoreError::Validation(format!(
            "amount must be between 0 and 100, got {amount}"
        )));
    }
    Ok(())
}

/// Headroom left by an existing sum, in percent.
pub fn headroom_after(existing_sum: f64) -> f64 {
    headroom_from_bp(to_basis_points(existing_sum))
}

fn headroom_from_bp(existing_bp: i64) -> f64 {
    from_basis_points((PAYMENT_CEILING_BP - existing_bp).max(0))
}

/// Running total of the payments already recorded against one project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaymentLedger {
    existing_bp: i64,
    payment_count: usize,
}

impl PaymentLedger {
    /// Build a ledger from the amounts of the existing payments.
    pub fn from_amounts<I>(amounts: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        amounts
            .into_iter()
            .fold(Self::default(), |ledger, amount| ledger.record(amount))
    }

    fn record(self, amount: f64) -> Self {
        Self {
            existing_bp: self.existing_bp + to_basis_points(amount),
            payment_count: self.payment_count + 1,
        }
    }

    /// Sum of existing payments, in percent.
    pub fn existing_sum(&self) -> f64 {
        from_basis_points(self.existing_bp)
    }

    /// Number of payments folded into the ledger.
    pub fn payment_count(&self) -> usize {
        self.payment_count
    }

    /// Remaining percentage before the ceiling. Never negative, even for
    /// legacy data that already overshoots.
    pub fn headroom(&self) -> f64 {
        headroom_from_bp(self.existing_bp)
    }

    /// Check whether `requested` can be added without exceeding the ceiling.
    ///
    /// Returns the ledger including the new amount on success, or
    /// [`CoreError::PaymentCeiling`] carrying the existing sum on violation.
    pub fn accrue(self, requested: f64) -> Result<PaymentLedger, CoreError> {
        validate_amount(requested)?;
        let next = self.record(requested);
        if next.existing_bp > PAYMENT_CEILING_BP {
            return Err(CoreError::PaymentCeiling {
                existing_sum: self.existing_sum(),
                requested,
            });
        }
        Ok(next)
    }
}
