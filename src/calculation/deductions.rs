//! Deduction calculation.
//!
//! Every active deduction applies to every check; there is no per-employee
//! enrollment. Each deduction is a flat amount or a percentage of gross,
//! optionally capped per period.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AuditStep, Deduction, DeductionMethod};

use super::round_money;

/// The amount withheld for one deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionLine {
    /// The deduction's code.
    pub code: String,
    /// The deduction's name.
    pub name: String,
    /// Amount withheld, after any per-period cap.
    pub amount: Decimal,
    /// Whether the per-period cap reduced the amount.
    pub capped: bool,
}

/// The result of applying all deductions to a check.
#[derive(Debug, Clone)]
pub struct DeductionsResult {
    /// One line per applied deduction.
    pub lines: Vec<DeductionLine>,
    /// Sum of all lines.
    pub total: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates a single deduction against gross pay.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::deduction_amount;
/// use payroll_engine::models::DeductionMethod;
/// use rust_decimal::Decimal;
///
/// let method = DeductionMethod::Percent { percent: Decimal::new(5, 0) };
/// let (amount, capped) = deduction_amount(Decimal::new(2000, 0), method, Some(Decimal::new(80, 0)));
/// assert_eq!(amount, Decimal::new(80, 0));
/// assert!(capped);
/// ```
pub fn deduction_amount(
    gross: Decimal,
    method: DeductionMethod,
    max_per_period: Option<Decimal>,
) -> (Decimal, bool) {
    let raw = match method {
        DeductionMethod::Flat { amount } => amount,
        DeductionMethod::Percent { percent } => gross * (percent / Decimal::ONE_HUNDRED),
    };
    let amount = round_money(raw);
    match max_per_period {
        Some(cap) if amount > cap => (cap, true),
        _ => (amount, false),
    }
}

/// Applies every active deduction to a check's gross pay.
pub fn calculate_deductions(
    gross: Decimal,
    deductions: &[Deduction],
    step_number: u32,
) -> DeductionsResult {
    let lines: Vec<DeductionLine> = deductions
        .iter()
        .filter(|d| d.active)
        .map(|d| {
            let (amount, capped) = deduction_amount(gross, d.method, d.max_per_period);
            DeductionLine {
                code: d.code.clone(),
                name: d.name.clone(),
                amount,
                capped,
            }
        })
        .collect();

    let total: Decimal = lines.iter().map(|l| l.amount).sum();

    let audit_step = AuditStep {
        step_number,
        rule_id: "deductions".to_string(),
        rule_name: "Deductions".to_string(),
        input: serde_json::json!({
            "gross_pay": gross.to_string(),
            "configured": deductions.len()
        }),
        output: serde_json::json!({
            "lines": lines,
            "total": total.to_string()
        }),
        reasoning: if lines.is_empty() {
            "No active deductions configured".to_string()
        } else {
            format!("{} deductions totalling ${}", lines.len(), total)
        },
    };

    DeductionsResult {
        lines,
        total,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewDeduction, SetupRecord};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn deduction(code: &str, method: DeductionMethod, cap: Option<&str>) -> Deduction {
        Deduction::from_new(
            format!("ded_{code}"),
            NewDeduction {
                code: code.to_string(),
                name: code.to_lowercase(),
                method,
                max_per_period: cap.map(dec),
                max_per_year: None,
            },
        )
    }

    /// DD-001: flat amount
    #[test]
    fn test_flat_deduction() {
        let result = calculate_deductions(
            dec("2000"),
            &[deduction("PARK", DeductionMethod::Flat { amount: dec("45.00") }, None)],
            9,
        );
        assert_eq!(result.total, dec("45.00"));
        assert_eq!(result.lines[0].code, "PARK");
        assert!(!result.lines[0].capped);
        assert_eq!(result.audit_step.step_number, 9);
    }

    /// DD-002: percent of gross
    #[test]
    fn test_percent_deduction() {
        let result = calculate_deductions(
            dec("2600"),
            &[deduction("401K", DeductionMethod::Percent { percent: dec("6") }, None)],
            1,
        );
        assert_eq!(result.total, dec("156.00"));
    }

    /// DD-003: per-period cap applies
    #[test]
    fn test_per_period_cap() {
        let result = calculate_deductions(
            dec("10000"),
            &[deduction(
                "401K",
                DeductionMethod::Percent { percent: dec("10") },
                Some("500"),
            )],
            1,
        );
        assert_eq!(result.total, dec("500"));
        assert!(result.lines[0].capped);
    }

    /// DD-004: all deductions are summed
    #[test]
    fn test_sum_across_deductions() {
        let result = calculate_deductions(
            dec("1000"),
            &[
                deduction("PARK", DeductionMethod::Flat { amount: dec("20") }, None),
                deduction("HSA", DeductionMethod::Percent { percent: dec("2.5") }, None),
            ],
            1,
        );
        assert_eq!(result.total, dec("45.00"));
        assert_eq!(result.lines.len(), 2);
    }

    #[test]
    fn test_inactive_deductions_are_skipped() {
        let mut inactive = deduction("OLD", DeductionMethod::Flat { amount: dec("99") }, None);
        inactive.active = false;

        let result = calculate_deductions(dec("1000"), &[inactive], 1);
        assert_eq!(result.total, Decimal::ZERO);
        assert!(result.lines.is_empty());
    }

    #[test]
    fn test_percent_rounds_to_cent() {
        let (amount, _) = deduction_amount(
            dec("1234.57"),
            DeductionMethod::Percent { percent: dec("3") },
            None,
        );
        // 37.0371
        assert_eq!(amount, dec("37.04"));
    }
}
