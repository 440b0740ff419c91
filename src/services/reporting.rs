//! Read-only payroll reports.
//!
//! Every report is an aggregation over stored pay checks; nothing here
//! writes to a store or emits events.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::calculation::{compute_futa, compute_suta};
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, PayCheck, PayRun, PayRunStatus};
use crate::store::{Op, Query};

use super::context::ServiceContext;

/// One line of a payroll register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterLine {
    /// `"Last, First"`.
    pub employee_name: String,
    pub pay_check: PayCheck,
}

/// All checks in a run with employee names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRegister {
    pub pay_run: PayRun,
    /// Sorted by employee name.
    pub lines: Vec<RegisterLine>,
}

/// Tax totals for one calendar quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyTaxSummary {
    pub year: i32,
    pub quarter: u32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Completed runs with a pay date in the quarter.
    pub pay_run_count: usize,
    /// Distinct employees paid.
    pub employee_count: usize,
    pub total_gross: Decimal,
    pub federal_tax: Decimal,
    pub state_tax: Decimal,
    pub local_tax: Decimal,
    pub social_security: Decimal,
    pub medicare: Decimal,
    /// Employer FUTA, recomputed per check.
    pub futa: Decimal,
    /// Employer SUTA, recomputed per check.
    pub suta: Decimal,
}

/// Running totals over a set of checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EarningsTotals {
    pub gross_pay: Decimal,
    pub federal_tax: Decimal,
    pub state_tax: Decimal,
    pub local_tax: Decimal,
    pub social_security: Decimal,
    pub medicare: Decimal,
    pub total_deductions: Decimal,
    pub net_pay: Decimal,
}

impl EarningsTotals {
    /// Adds one check's amounts.
    pub fn add(&mut self, check: &PayCheck) {
        self.gross_pay += check.gross_pay;
        self.federal_tax += check.federal_tax;
        self.state_tax += check.state_tax;
        self.local_tax += check.local_tax;
        self.social_security += check.social_security;
        self.medicare += check.medicare;
        self.total_deductions += check.total_deductions;
        self.net_pay += check.net_pay;
    }
}

/// A check and the totals through it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsHistoryEntry {
    pub pay_check: PayCheck,
    pub year_to_date: EarningsTotals,
}

/// Every check paid to one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsHistory {
    pub employee_id: String,
    pub employee_name: String,
    /// Ordered by pay date, then creation time.
    pub entries: Vec<EarningsHistoryEntry>,
    pub totals: EarningsTotals,
}

/// Returns the first and last day of a calendar quarter.
///
/// # Examples
///
/// ```
/// use payroll_engine::services::quarter_window;
/// use chrono::NaiveDate;
///
/// let (start, end) = quarter_window(2026, 2).unwrap();
/// assert_eq!(start, NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
/// assert_eq!(end, NaiveDate::from_ymd_opt(2026, 6, 30).unwrap());
/// assert!(quarter_window(2026, 5).is_err());
/// ```
pub fn quarter_window(year: i32, quarter: u32) -> EngineResult<(NaiveDate, NaiveDate)> {
    if !(1..=4).contains(&quarter) {
        return Err(EngineError::invalid_input("quarter", "must be between 1 and 4"));
    }
    let start_month = (quarter - 1) * 3 + 1;
    let start = NaiveDate::from_ymd_opt(year, start_month, 1);
    let end = if quarter == 4 {
        NaiveDate::from_ymd_opt(year, 12, 31)
    } else {
        NaiveDate::from_ymd_opt(year, start_month + 3, 1).and_then(|d| d.pred_opt())
    };

    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(EngineError::invalid_input("year", "out of range")),
    }
}

/// Payroll register, quarterly tax summary and earnings history.
#[derive(Clone)]
pub struct ReportingService {
    ctx: ServiceContext,
}

impl ReportingService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Lists a run's checks with employee names, sorted by `"Last, First"`.
    pub async fn payroll_register(&self, pay_run_id: &str) -> EngineResult<PayrollRegister> {
        let pay_run = self.ctx.stores().pay_runs.require(pay_run_id).await?;
        let checks = self.checks_for_run(pay_run_id).await?;

        let mut names: HashMap<String, String> = HashMap::new();
        let mut lines = Vec::with_capacity(checks.len());
        for check in checks {
            let name = match names.get(&check.employee_id) {
                Some(name) => name.clone(),
                None => {
                    let employee = self.employee(&check.employee_id).await?;
                    let name = employee.display_name();
                    names.insert(check.employee_id.clone(), name.clone());
                    name
                }
            };
            lines.push(RegisterLine {
                employee_name: name,
                pay_check: check,
            });
        }
        lines.sort_by(|a, b| a.employee_name.cmp(&b.employee_name));

        Ok(PayrollRegister { pay_run, lines })
    }

    /// Sums taxes over completed runs paid in the quarter.
    ///
    /// FUTA and SUTA are recomputed from each check's gross, capped per
    /// check.
    pub async fn quarterly_tax_summary(
        &self,
        year: i32,
        quarter: u32,
    ) -> EngineResult<QuarterlyTaxSummary> {
        let (period_start, period_end) = quarter_window(year, quarter)?;
        let settings = self.ctx.settings();

        let runs = self
            .ctx
            .stores()
            .pay_runs
            .query(
                &Query::new()
                    .filter("status", Op::Eq, json!(PayRunStatus::Completed))
                    .filter("pay_date", Op::Gte, json!(period_start))
                    .filter("pay_date", Op::Lte, json!(period_end)),
            )
            .await?;

        let mut summary = QuarterlyTaxSummary {
            year,
            quarter,
            period_start,
            period_end,
            pay_run_count: runs.len(),
            employee_count: 0,
            total_gross: Decimal::ZERO,
            federal_tax: Decimal::ZERO,
            state_tax: Decimal::ZERO,
            local_tax: Decimal::ZERO,
            social_security: Decimal::ZERO,
            medicare: Decimal::ZERO,
            futa: Decimal::ZERO,
            suta: Decimal::ZERO,
        };
        let mut employees = HashSet::new();

        for run in &runs {
            for check in self.checks_for_run(&run.id).await? {
                summary.total_gross += check.gross_pay;
                summary.federal_tax += check.federal_tax;
                summary.state_tax += check.state_tax;
                summary.local_tax += check.local_tax;
                summary.social_security += check.social_security;
                summary.medicare += check.medicare;
                summary.futa += compute_futa(check.gross_pay, settings);
                summary.suta += compute_suta(check.gross_pay, settings);
                employees.insert(check.employee_id);
            }
        }
        summary.employee_count = employees.len();

        info!(
            year,
            quarter,
            pay_runs = summary.pay_run_count,
            employees = summary.employee_count,
            total_gross = %summary.total_gross,
            "Quarterly tax summary built"
        );
        Ok(summary)
    }

    /// Every check for an employee with running totals.
    pub async fn employee_earnings_history(&self, employee_id: &str) -> EngineResult<EarningsHistory> {
        let employee = self.employee(employee_id).await?;
        let mut checks = self
            .ctx
            .stores()
            .pay_checks
            .query(&Query::new().filter("employee_id", Op::Eq, json!(employee_id)))
            .await?;
        checks.sort_by(|a, b| {
            a.pay_date
                .cmp(&b.pay_date)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });

        let mut totals = EarningsTotals::default();
        let entries = checks
            .into_iter()
            .map(|check| {
                totals.add(&check);
                EarningsHistoryEntry {
                    pay_check: check,
                    year_to_date: totals,
                }
            })
            .collect();

        Ok(EarningsHistory {
            employee_id: employee.id.clone(),
            employee_name: employee.display_name(),
            entries,
            totals,
        })
    }

    async fn checks_for_run(&self, pay_run_id: &str) -> EngineResult<Vec<PayCheck>> {
        self.ctx
            .stores()
            .pay_checks
            .query(&Query::new().filter("pay_run_id", Op::Eq, json!(pay_run_id)))
            .await
    }

    async fn employee(&self, id: &str) -> EngineResult<Employee> {
        self.ctx.stores().employees.require(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_windows() {
        let d = |m, day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
        assert_eq!(quarter_window(2026, 1).unwrap(), (d(1, 1), d(3, 31)));
        assert_eq!(quarter_window(2026, 3).unwrap(), (d(7, 1), d(9, 30)));
        assert_eq!(quarter_window(2026, 4).unwrap(), (d(10, 1), d(12, 31)));
    }

    #[test]
    fn test_invalid_quarter() {
        assert!(matches!(
            quarter_window(2026, 0),
            Err(EngineError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_earnings_totals_add() {
        let check = PayCheck {
            id: "chk_1".to_string(),
            pay_run_id: "run_1".to_string(),
            employee_id: "emp_1".to_string(),
            pay_date: NaiveDate::from_ymd_opt(2026, 1, 23).unwrap(),
            gross_pay: Decimal::new(200_000, 2),
            federal_tax: Decimal::new(44_000, 2),
            state_tax: Decimal::new(18_600, 2),
            local_tax: Decimal::ZERO,
            social_security: Decimal::new(12_400, 2),
            medicare: Decimal::new(2_900, 2),
            total_deductions: Decimal::ZERO,
            net_pay: Decimal::new(122_100, 2),
            regular_hours: Decimal::new(40, 0),
            overtime_hours: Decimal::ZERO,
            created_at: chrono::Utc::now(),
        };
        let mut totals = EarningsTotals::default();
        totals.add(&check);
        totals.add(&check);
        assert_eq!(totals.gross_pay, Decimal::new(400_000, 2));
        assert_eq!(totals.net_pay, Decimal::new(244_200, 2));
    }
}
