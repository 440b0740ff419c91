//! Gross pay calculation.
//!
//! This module turns approved time entries into gross pay using the pay
//! type multipliers, and provides the salaried fallback used when an
//! employee has no hours in the period.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, PayFrequency, PayType, TimeEntry};

use super::round_money;

/// Returns the pay multiplier for a pay type.
///
/// | Pay type     | Multiplier |
/// |--------------|------------|
/// | `regular`    | 1.0        |
/// | `overtime`   | 1.5        |
/// | `doubletime` | 2.0        |
/// | `premium`    | 1.0        |
/// | `perdiem`    | 1.0        |
pub fn pay_type_multiplier(pay_type: PayType) -> Decimal {
    match pay_type {
        PayType::Regular | PayType::Premium | PayType::Perdiem => Decimal::ONE,
        PayType::Overtime => Decimal::new(15, 1),
        PayType::Doubletime => Decimal::TWO,
    }
}

/// The result of calculating gross pay from time entries.
#[derive(Debug, Clone)]
pub struct GrossPayResult {
    /// Gross pay, rounded to the cent after each entry.
    pub gross_pay: Decimal,
    /// Hours from `regular` entries.
    pub regular_hours: Decimal,
    /// Hours from `overtime` and `doubletime` entries.
    pub overtime_hours: Decimal,
    /// Number of entries that were paid.
    pub entries_paid: usize,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates gross pay from time entries at an hourly rate.
///
/// Each entry contributes `hours x rate x multiplier`; the running total is
/// rounded to the cent after every addition. Unapproved entries are skipped.
///
/// Returns [`EngineError::InvalidInput`] if an amount exceeds the range of
/// [`Decimal`].
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_gross_pay;
/// use payroll_engine::models::{NewTimeEntry, PayType, TimeEntry};
/// use chrono::{NaiveDate, Utc};
/// use rust_decimal::Decimal;
///
/// let mut entry = TimeEntry::from_new("te_1".to_string(), NewTimeEntry {
///     employee_id: "emp_001".to_string(),
///     job_id: None,
///     date: NaiveDate::from_ymd_opt(2026, 1, 6).unwrap(),
///     hours: Decimal::new(8, 0),
///     pay_type: PayType::Overtime,
///     description: None,
/// });
/// entry.approve("mgr", Utc::now()).unwrap();
///
/// let result = calculate_gross_pay(&[entry], Decimal::new(50, 0), 1).unwrap();
/// assert_eq!(result.gross_pay, Decimal::new(60000, 2));
/// assert_eq!(result.overtime_hours, Decimal::new(8, 0));
/// ```
pub fn calculate_gross_pay(
    entries: &[TimeEntry],
    pay_rate: Decimal,
    step_number: u32,
) -> EngineResult<GrossPayResult> {
    let mut gross_pay = Decimal::ZERO;
    let mut regular_hours = Decimal::ZERO;
    let mut overtime_hours = Decimal::ZERO;
    let mut lines = Vec::new();

    for entry in entries.iter().filter(|e| e.approved) {
        let multiplier = pay_type_multiplier(entry.pay_type);
        let amount = entry
            .hours
            .checked_mul(pay_rate)
            .and_then(|a| a.checked_mul(multiplier))
            .ok_or_else(|| out_of_range(entry))?;
        gross_pay = round_money(
            gross_pay
                .checked_add(amount)
                .ok_or_else(|| out_of_range(entry))?,
        );

        match entry.pay_type {
            PayType::Regular => regular_hours += entry.hours,
            PayType::Overtime | PayType::Doubletime => overtime_hours += entry.hours,
            PayType::Premium | PayType::Perdiem => {}
        }

        lines.push(serde_json::json!({
            "time_entry_id": entry.id,
            "hours": entry.hours.normalize().to_string(),
            "pay_type": entry.pay_type,
            "multiplier": multiplier.normalize().to_string(),
            "amount": round_money(amount).to_string()
        }));
    }

    let entries_paid = lines.len();
    let audit_step = AuditStep {
        step_number,
        rule_id: "gross_from_time_entries".to_string(),
        rule_name: "Gross Pay From Time Entries".to_string(),
        input: serde_json::json!({
            "pay_rate": pay_rate.normalize().to_string(),
            "entries": lines
        }),
        output: serde_json::json!({
            "gross_pay": gross_pay.to_string(),
            "regular_hours": regular_hours.normalize().to_string(),
            "overtime_hours": overtime_hours.normalize().to_string()
        }),
        reasoning: format!(
            "{} approved entries at ${}/hr = ${}",
            entries_paid,
            pay_rate.normalize(),
            gross_pay
        ),
    };

    Ok(GrossPayResult {
        gross_pay,
        regular_hours,
        overtime_hours,
        entries_paid,
        audit_step,
    })
}

fn out_of_range(entry: &TimeEntry) -> EngineError {
    EngineError::invalid_input(
        "pay_rate",
        format!("gross for time entry '{}' is out of range", entry.id),
    )
}

/// The result of the salaried fallback.
#[derive(Debug, Clone)]
pub struct SalariedGrossResult {
    /// Gross pay for one period, rounded to the cent.
    pub gross_pay: Decimal,
    /// The divisor used.
    pub periods_per_year: u32,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates one period's gross for a salaried employee.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_salaried_gross;
/// use payroll_engine::models::PayFrequency;
/// use rust_decimal::Decimal;
///
/// let result = calculate_salaried_gross(Decimal::new(78000, 0), PayFrequency::Biweekly, 1);
/// assert_eq!(result.gross_pay, Decimal::new(300000, 2));
/// ```
pub fn calculate_salaried_gross(
    annual_salary: Decimal,
    frequency: PayFrequency,
    step_number: u32,
) -> SalariedGrossResult {
    let periods_per_year = frequency.periods_per_year();
    let gross_pay = round_money(annual_salary / Decimal::from(periods_per_year));

    let audit_step = AuditStep {
        step_number,
        rule_id: "salaried_gross".to_string(),
        rule_name: "Salaried Gross Pay".to_string(),
        input: serde_json::json!({
            "annual_salary": annual_salary.normalize().to_string(),
            "pay_frequency": frequency
        }),
        output: serde_json::json!({
            "periods_per_year": periods_per_year,
            "gross_pay": gross_pay.to_string()
        }),
        reasoning: format!(
            "No approved hours; ${} / {} periods = ${}",
            annual_salary.normalize(),
            periods_per_year,
            gross_pay
        ),
    };

    SalariedGrossResult {
        gross_pay,
        periods_per_year,
        audit_step,
    }
}
