//! Employer-only contributions.
//!
//! FUTA, SUTA and workers' compensation premiums are paid by the employer
//! and never withheld from the check. The unemployment calculators cap the
//! gross passed to each call; they do not track cumulative wages.

use rust_decimal::Decimal;

use crate::config::PayrollSettings;

use super::round_money;

/// Federal unemployment rate after the standard credit (0.6%).
pub const FUTA_RATE: Decimal = Decimal::from_parts(6, 0, 0, false, 3);
/// Federal unemployment wage base.
pub const FUTA_WAGE_BASE: Decimal = Decimal::from_parts(7_000, 0, 0, false, 0);
/// Default state unemployment rate (2.7%).
pub const SUTA_RATE: Decimal = Decimal::from_parts(27, 0, 0, false, 3);
/// Default state unemployment wage base.
pub const SUTA_WAGE_BASE: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Federal unemployment tax on the supplied gross.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::compute_futa;
/// use payroll_engine::config::PayrollSettings;
/// use rust_decimal::Decimal;
///
/// let futa = compute_futa(Decimal::new(10_000, 0), &PayrollSettings::default());
/// assert_eq!(futa, Decimal::new(4200, 2));
/// ```
pub fn compute_futa(gross: Decimal, settings: &PayrollSettings) -> Decimal {
    round_money(gross.min(settings.futa_wage_base).max(Decimal::ZERO) * settings.futa_rate)
}

/// State unemployment tax on the supplied gross.
pub fn compute_suta(gross: Decimal, settings: &PayrollSettings) -> Decimal {
    round_money(gross.min(settings.suta_wage_base).max(Decimal::ZERO) * settings.suta_rate)
}

/// Workers' compensation premium: `payroll / 100 x rate`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::compute_wc_premium;
/// use rust_decimal::Decimal;
///
/// // $52,000 of clerical payroll at $0.25 per $100
/// let premium = compute_wc_premium(Decimal::new(52_000, 0), Decimal::new(25, 2));
/// assert_eq!(premium, Decimal::new(130, 0));
/// ```
pub fn compute_wc_premium(payroll: Decimal, rate_per_hundred: Decimal) -> Decimal {
    round_money(payroll / Decimal::ONE_HUNDRED * rate_per_hundred)
}
