//! Gross-to-net pay check calculation.
//!
//! [`compute_pay_check`] is a pure function of the pay run, the employee,
//! their time entries, the configured deductions and the settings. It does
//! no I/O; the payroll service gathers inputs and persists the result.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PayrollSettings;
use crate::error::EngineResult;
use crate::models::{AuditStep, Deduction, Employee, PayCheck, PayRun, TimeEntry};

use super::{
    DeductionLine, calculate_deductions, calculate_gross_pay, calculate_salaried_gross,
    calculate_withholding, round_money,
};

/// Everything the calculation reads.
#[derive(Debug, Clone, Copy)]
pub struct PayCheckInput<'a> {
    pub pay_run: &'a PayRun,
    pub employee: &'a Employee,
    /// Candidate entries; only approved entries for this employee inside the
    /// run's period are paid.
    pub time_entries: &'a [TimeEntry],
    pub deductions: &'a [Deduction],
    pub settings: &'a PayrollSettings,
    /// Gross already paid this year, used for wage-base caps in
    /// year-to-date mode. Zero in per-check mode.
    pub prior_wages: Decimal,
}

/// The full result of a gross-to-net calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayCheckCalculation {
    pub pay_run_id: String,
    pub employee_id: String,
    pub gross_pay: Decimal,
    pub regular_hours: Decimal,
    pub overtime_hours: Decimal,
    /// True if gross came from the salaried fallback.
    pub salaried: bool,
    pub federal_tax: Decimal,
    pub state_tax: Decimal,
    pub local_tax: Decimal,
    pub social_security: Decimal,
    pub medicare: Decimal,
    pub deductions: Vec<DeductionLine>,
    pub total_deductions: Decimal,
    pub net_pay: Decimal,
    pub audit_steps: Vec<AuditStep>,
}

impl PayCheckCalculation {
    /// Returns the sum of the five employee tax components.
    pub fn total_taxes(&self) -> Decimal {
        self.federal_tax + self.state_tax + self.local_tax + self.social_security + self.medicare
    }

    /// Converts the calculation into the immutable check snapshot.
    pub fn into_pay_check(
        self,
        id: String,
        pay_run: &PayRun,
        created_at: DateTime<Utc>,
    ) -> PayCheck {
        PayCheck {
            id,
            pay_run_id: self.pay_run_id,
            employee_id: self.employee_id,
            pay_date: pay_run.pay_date,
            gross_pay: self.gross_pay,
            federal_tax: self.federal_tax,
            state_tax: self.state_tax,
            local_tax: self.local_tax,
            social_security: self.social_security,
            medicare: self.medicare,
            total_deductions: self.total_deductions,
            net_pay: self.net_pay,
            regular_hours: self.regular_hours,
            overtime_hours: self.overtime_hours,
            created_at,
        }
    }
}

/// Runs the gross-to-net pipeline for one employee in one pay run.
///
/// 1. Pay approved entries inside `[period_start, period_end]`.
/// 2. With no payable entries, a salaried employee gets one period's salary.
/// 3. Withhold federal, state, local, social security and Medicare.
/// 4. Apply every active deduction.
/// 5. Net is gross minus taxes minus deductions, rounded to the cent.
///
/// Fails only when an entry's amount exceeds the range of [`Decimal`].
pub fn compute_pay_check(input: PayCheckInput<'_>) -> EngineResult<PayCheckCalculation> {
    let PayCheckInput {
        pay_run,
        employee,
        time_entries,
        deductions,
        settings,
        prior_wages,
    } = input;

    let payable: Vec<TimeEntry> = time_entries
        .iter()
        .filter(|e| e.approved && e.employee_id == employee.id && pay_run.contains_date(e.date))
        .cloned()
        .collect();

    let mut audit_steps = Vec::new();
    let mut step_number = 1;

    let gross = calculate_gross_pay(&payable, employee.pay_rate, step_number)?;
    audit_steps.push(gross.audit_step);
    step_number += 1;

    let mut gross_pay = gross.gross_pay;
    let salaried = gross.entries_paid == 0 && employee.is_salaried();
    if salaried {
        let fallback =
            calculate_salaried_gross(employee.pay_rate, employee.pay_frequency, step_number);
        gross_pay = fallback.gross_pay;
        audit_steps.push(fallback.audit_step);
        step_number += 1;
    }

    let withholding = calculate_withholding(
        gross_pay,
        employee.state.as_deref(),
        prior_wages,
        settings,
        step_number,
    );
    step_number += withholding.audit_steps.len() as u32;
    let total_taxes = withholding.total();

    let deducted = calculate_deductions(gross_pay, deductions, step_number);
    step_number += 1;

    let net_pay = round_money(gross_pay - total_taxes - deducted.total);

    audit_steps.extend(withholding.audit_steps.iter().cloned());
    audit_steps.push(deducted.audit_step);
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "net_pay".to_string(),
        rule_name: "Net Pay".to_string(),
        input: serde_json::json!({
            "gross_pay": gross_pay.to_string(),
            "total_taxes": total_taxes.to_string(),
            "total_deductions": deducted.total.to_string()
        }),
        output: serde_json::json!({ "net_pay": net_pay.to_string() }),
        reasoning: format!(
            "${} - ${} taxes - ${} deductions = ${}",
            gross_pay, total_taxes, deducted.total, net_pay
        ),
    });

    debug!(
        employee_id = %employee.id,
        pay_run_id = %pay_run.id,
        gross_pay = %gross_pay,
        net_pay = %net_pay,
        entries = gross.entries_paid,
        salaried,
        "Computed pay check"
    );

    Ok(PayCheckCalculation {
        pay_run_id: pay_run.id.clone(),
        employee_id: employee.id.clone(),
        gross_pay,
        regular_hours: gross.regular_hours,
        overtime_hours: gross.overtime_hours,
        salaried,
        federal_tax: withholding.federal_tax,
        state_tax: withholding.state_tax,
        local_tax: withholding.local_tax,
        social_security: withholding.social_security,
        medicare: withholding.medicare,
        deductions: deducted.lines,
        total_deductions: deducted.total,
        net_pay,
        audit_steps,
    })
}
