//! Pay run lifecycle and pay check creation.
//!
//! The service gathers inputs from the stores, hands them to the pure
//! [`compute_pay_check`] pipeline, then persists the check and updates the
//! run's totals. Nothing is held in memory between calls.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{info, warn};

use crate::calculation::{self, PayCheckCalculation, PayCheckInput, compute_pay_check};
use crate::config::WageBaseMode;
use crate::error::{EngineError, EngineResult};
use crate::events::PayrollEvent;
use crate::models::{
    Employee, EmploymentStatus, NewPayRun, PayCheck, PayRun, PayRunAction, PayRunStatus,
};
use crate::store::{Direction, Op, Query};

use super::context::{ServiceContext, new_id};

/// Computes pay checks and drives pay runs through their lifecycle.
#[derive(Clone)]
pub struct PayrollEngine {
    ctx: ServiceContext,
}

impl PayrollEngine {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Opens a draft pay run.
    pub async fn create_pay_run(&self, new: NewPayRun) -> EngineResult<PayRun> {
        if new.period_start > new.period_end {
            warn!(
                period_start = %new.period_start,
                period_end = %new.period_end,
                "Pay run rejected: period ends before it starts"
            );
            return Err(EngineError::invalid_input(
                "period_end",
                "must not be before period_start",
            ));
        }

        let run = PayRun::from_new(new_id("run"), new);
        let run = self.ctx.stores().pay_runs.insert(run).await?;

        info!(
            pay_run_id = %run.id,
            period_start = %run.period_start,
            period_end = %run.period_end,
            pay_date = %run.pay_date,
            "Pay run created"
        );
        self.ctx.emit(PayrollEvent::PayRunCreated(run.clone()));
        Ok(run)
    }

    pub async fn get_pay_run(&self, id: &str) -> EngineResult<PayRun> {
        self.ctx.stores().pay_runs.require(id).await
    }

    /// Lists pay runs, optionally in one status, by period start.
    pub async fn list_pay_runs(&self, status: Option<PayRunStatus>) -> EngineResult<Vec<PayRun>> {
        let mut query = Query::new();
        if let Some(status) = status {
            query = query.filter("status", Op::Eq, json!(status));
        }
        let query = query.order_by("period_start", Direction::Asc);
        self.ctx.stores().pay_runs.query(&query).await
    }

    /// Moves a draft run to processing.
    pub async fn start_processing(&self, id: &str) -> EngineResult<PayRun> {
        self.transition(id, PayRunAction::Process).await
    }

    /// Finalizes a processing run.
    pub async fn complete_pay_run(&self, id: &str) -> EngineResult<PayRun> {
        let run = self.transition(id, PayRunAction::Complete).await?;
        self.ctx.emit(PayrollEvent::PayRunCompleted(run.clone()));
        Ok(run)
    }

    /// Voids a run. Totals and checks are left in place.
    pub async fn void_pay_run(&self, id: &str) -> EngineResult<PayRun> {
        self.transition(id, PayRunAction::Void).await
    }

    /// Computes, stores and totals one employee's check in a run.
    ///
    /// Fails if the run does not accept checks, if either record is
    /// missing, or if the employee already has a check in the run.
    pub async fn add_pay_check(&self, pay_run_id: &str, employee_id: &str) -> EngineResult<PayCheck> {
        let (mut run, employee) = self.load_inputs(pay_run_id, employee_id).await?;

        let existing = self
            .ctx
            .stores()
            .pay_checks
            .count(
                &Query::new()
                    .filter("pay_run_id", Op::Eq, json!(pay_run_id))
                    .filter("employee_id", Op::Eq, json!(employee_id)),
            )
            .await?;
        if existing > 0 {
            warn!(pay_run_id, employee_id, "Duplicate pay check rejected");
            return Err(EngineError::DuplicatePayCheck {
                pay_run_id: pay_run_id.to_string(),
                employee_id: employee_id.to_string(),
            });
        }

        let calculation = self.calculate(&run, &employee).await?;
        let check = calculation.into_pay_check(new_id("chk"), &run, Utc::now());
        let check = self.ctx.stores().pay_checks.insert(check).await?;

        run.add_pay_check(&check);
        self.ctx.stores().pay_runs.update(run).await?;

        info!(
            pay_check_id = %check.id,
            pay_run_id,
            employee_id,
            gross_pay = %check.gross_pay,
            net_pay = %check.net_pay,
            "Pay check created"
        );
        self.ctx.emit(PayrollEvent::PayCheckCreated(check.clone()));
        Ok(check)
    }

    /// Runs the calculation without persisting anything.
    pub async fn preview_pay_check(
        &self,
        pay_run_id: &str,
        employee_id: &str,
    ) -> EngineResult<PayCheckCalculation> {
        let (run, employee) = self.load_inputs(pay_run_id, employee_id).await?;
        self.calculate(&run, &employee).await
    }

    /// Adds a check for every active employee not yet paid in the run.
    ///
    /// Employees are processed one at a time, in last-name order. The first
    /// failure stops the batch; checks already added stay.
    pub async fn run_payroll(&self, pay_run_id: &str) -> EngineResult<Vec<PayCheck>> {
        let run = self.ctx.stores().pay_runs.require(pay_run_id).await?;
        run.ensure_accepts_pay_checks()?;

        let employees = self
            .ctx
            .stores()
            .employees
            .query(
                &Query::new()
                    .filter("status", Op::Eq, json!(EmploymentStatus::Active))
                    .order_by("last_name", Direction::Asc)
                    .order_by("first_name", Direction::Asc),
            )
            .await?;
        let already_paid: Vec<String> = self
            .pay_checks_for_run(pay_run_id)
            .await?
            .into_iter()
            .map(|c| c.employee_id)
            .collect();

        let mut checks = Vec::new();
        for employee in employees {
            if already_paid.contains(&employee.id) {
                continue;
            }
            checks.push(self.add_pay_check(pay_run_id, &employee.id).await?);
        }

        info!(pay_run_id, checks = checks.len(), "Payroll run finished");
        Ok(checks)
    }

    /// All checks in a run, in creation order.
    pub async fn pay_checks_for_run(&self, pay_run_id: &str) -> EngineResult<Vec<PayCheck>> {
        self.ctx
            .stores()
            .pay_checks
            .query(&Query::new().filter("pay_run_id", Op::Eq, json!(pay_run_id)))
            .await
    }

    pub async fn get_pay_check(&self, id: &str) -> EngineResult<PayCheck> {
        self.ctx.stores().pay_checks.require(id).await
    }

    /// Employer FUTA on a gross amount.
    pub fn compute_futa(&self, gross: Decimal) -> Decimal {
        calculation::compute_futa(gross, self.ctx.settings())
    }

    /// Employer SUTA on a gross amount.
    pub fn compute_suta(&self, gross: Decimal) -> Decimal {
        calculation::compute_suta(gross, self.ctx.settings())
    }

    async fn transition(&self, id: &str, action: PayRunAction) -> EngineResult<PayRun> {
        let mut run = self.ctx.stores().pay_runs.require(id).await?;
        let from = run.status;

        if let Err(err) = run.transition(action, Utc::now()) {
            warn!(pay_run_id = %id, from = %from, action = action.as_str(), "Pay run transition rejected");
            return Err(err);
        }
        let run = self.ctx.stores().pay_runs.update(run).await?;

        info!(pay_run_id = %id, from = %from, to = %run.status, "Pay run transitioned");
        Ok(run)
    }

    async fn load_inputs(&self, pay_run_id: &str, employee_id: &str) -> EngineResult<(PayRun, Employee)> {
        let run = self.ctx.stores().pay_runs.require(pay_run_id).await?;
        if let Err(err) = run.ensure_accepts_pay_checks() {
            warn!(pay_run_id, status = %run.status, "Pay run does not accept checks");
            return Err(err);
        }
        let employee = self.ctx.stores().employees.require(employee_id).await?;
        Ok((run, employee))
    }

    async fn calculate(&self, run: &PayRun, employee: &Employee) -> EngineResult<PayCheckCalculation> {
        let entries = self
            .ctx
            .stores()
            .time_entries
            .query(
                &Query::new()
                    .filter("employee_id", Op::Eq, json!(employee.id))
                    .filter("approved", Op::Eq, json!(true))
                    .filter("date", Op::Gte, json!(run.period_start))
                    .filter("date", Op::Lte, json!(run.period_end))
                    .order_by("date", Direction::Asc),
            )
            .await?;
        let deductions = self.ctx.stores().deductions.query(&Query::new()).await?;

        let prior_wages = match self.ctx.settings().wage_base_mode {
            WageBaseMode::PerCheck => Decimal::ZERO,
            WageBaseMode::YearToDate => self.gross_paid_in_year(&employee.id, run.pay_date).await?,
        };

        compute_pay_check(PayCheckInput {
            pay_run: run,
            employee,
            time_entries: &entries,
            deductions: &deductions,
            settings: self.ctx.settings(),
            prior_wages,
        })
    }

    /// Gross on the employee's checks dated in the same calendar year.
    async fn gross_paid_in_year(&self, employee_id: &str, pay_date: NaiveDate) -> EngineResult<Decimal> {
        let year = pay_date.year();
        let (Some(start), Some(end)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        ) else {
            return Err(EngineError::invalid_input("pay_date", "year out of range"));
        };

        let checks = self
            .ctx
            .stores()
            .pay_checks
            .query(
                &Query::new()
                    .filter("employee_id", Op::Eq, json!(employee_id))
                    .filter("pay_date", Op::Gte, json!(start))
                    .filter("pay_date", Op::Lte, json!(end)),
            )
            .await?;
        Ok(checks.iter().map(|c| c.gross_pay).sum())
    }
}
