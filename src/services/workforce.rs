//! Employee and time entry management.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::events::PayrollEvent;
use crate::models::{
    Employee, EmployeeFilter, EmployeeUpdate, EmploymentStatus, NewEmployee, NewTimeEntry,
    TimeEntry,
};
use crate::store::{Direction, Op, Query, Record};

use super::context::{ServiceContext, new_id};

/// Normalizes an SSN to `ddd-dd-dddd`.
///
/// Accepts nine digits with or without dashes.
///
/// # Examples
///
/// ```
/// use payroll_engine::services::normalize_ssn;
///
/// assert_eq!(normalize_ssn("123456789").unwrap(), "123-45-6789");
/// assert_eq!(normalize_ssn("123-45-6789").unwrap(), "123-45-6789");
/// assert!(normalize_ssn("12-345-678").is_err());
/// ```
pub fn normalize_ssn(ssn: &str) -> EngineResult<String> {
    let trimmed = ssn.trim();
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    let dashed_ok = trimmed.len() == 11
        && trimmed.char_indices().all(|(i, c)| match i {
            3 | 6 => c == '-',
            _ => c.is_ascii_digit(),
        });
    let plain_ok = trimmed.len() == 9 && digits.len() == 9;

    if !(dashed_ok || plain_ok) {
        return Err(EngineError::invalid_input(
            "ssn",
            "must be 9 digits, optionally formatted ddd-dd-dddd",
        ));
    }
    Ok(format!("{}-{}-{}", &digits[0..3], &digits[3..5], &digits[5..9]))
}

/// Employee records and their time entries.
#[derive(Clone)]
pub struct WorkforceLedger {
    ctx: ServiceContext,
}

impl WorkforceLedger {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Registers a new active employee.
    ///
    /// Fails with `DuplicateValue` if another employee has the same SSN.
    pub async fn create_employee(&self, mut new: NewEmployee) -> EngineResult<Employee> {
        new.ssn = normalize_ssn(&new.ssn)?;
        new.state = new.state.map(|s| normalize_state(&s));
        validate_names(&new.first_name, &new.last_name)?;
        validate_pay_rate(new.pay_rate)?;
        self.ensure_ssn_free(&new.ssn, None).await?;

        let employee = Employee::from_new(new_id("emp"), new);
        let employee = self.ctx.stores().employees.insert(employee).await?;

        info!(
            employee_id = %employee.id,
            name = %employee.display_name(),
            pay_basis = ?employee.pay_basis,
            "Employee created"
        );
        self.ctx.emit(PayrollEvent::EmployeeCreated(employee.clone()));
        Ok(employee)
    }

    /// Applies an HR update. An SSN change is re-validated for uniqueness.
    pub async fn update_employee(
        &self,
        id: &str,
        mut update: EmployeeUpdate,
    ) -> EngineResult<Employee> {
        let mut employee = self.ctx.stores().employees.require(id).await?;

        if let Some(ssn) = update.ssn.take() {
            let ssn = normalize_ssn(&ssn)?;
            if ssn != employee.ssn {
                self.ensure_ssn_free(&ssn, Some(id)).await?;
            }
            update.ssn = Some(ssn);
        }
        if let Some(rate) = update.pay_rate {
            validate_pay_rate(rate)?;
        }
        update.state = update.state.map(|s| normalize_state(&s));

        employee.apply(update);
        validate_names(&employee.first_name, &employee.last_name)?;
        let employee = self.ctx.stores().employees.update(employee).await?;

        info!(employee_id = %employee.id, status = ?employee.status, "Employee updated");
        self.ctx.emit(PayrollEvent::EmployeeUpdated(employee.clone()));
        Ok(employee)
    }

    /// Deletes an employee who has never been paid.
    pub async fn delete_employee(&self, id: &str) -> EngineResult<()> {
        let employee = self.ctx.stores().employees.require(id).await?;

        let checks = self
            .ctx
            .stores()
            .pay_checks
            .count(&Query::new().filter("employee_id", Op::Eq, json!(id)))
            .await?;
        if checks > 0 {
            warn!(employee_id = %id, checks, "Employee delete blocked by pay checks");
            return Err(EngineError::ReferentialBlock {
                entity: Employee::KIND.to_string(),
                id: id.to_string(),
                reason: format!("{} pay check(s) reference this employee", checks),
            });
        }

        self.ctx.stores().employees.remove(&employee.id).await?;
        info!(employee_id = %id, "Employee deleted");
        self.ctx.emit(PayrollEvent::EmployeeDeleted {
            employee_id: id.to_string(),
        });
        Ok(())
    }

    pub async fn get_employee(&self, id: &str) -> EngineResult<Employee> {
        self.ctx.stores().employees.require(id).await
    }

    /// Looks up an employee by SSN, in either accepted format.
    pub async fn find_by_ssn(&self, ssn: &str) -> EngineResult<Option<Employee>> {
        let ssn = normalize_ssn(ssn)?;
        self.ctx
            .stores()
            .employees
            .first(&Query::new().filter("ssn", Op::Eq, json!(ssn)))
            .await
    }

    /// Lists employees matching the filter, ordered by last then first name.
    pub async fn list_employees(&self, filter: &EmployeeFilter) -> EngineResult<Vec<Employee>> {
        let mut query = Query::new();
        if let Some(status) = filter.status {
            query = query.filter("status", Op::Eq, json!(status));
        }
        if let Some(state) = &filter.state {
            query = query.filter("state", Op::Eq, json!(normalize_state(state)));
        }
        if let Some(department) = &filter.department {
            query = query.filter("department", Op::Eq, json!(department));
        }
        if let Some(pay_basis) = filter.pay_basis {
            query = query.filter("pay_basis", Op::Eq, json!(pay_basis));
        }
        let query = query
            .order_by("last_name", Direction::Asc)
            .order_by("first_name", Direction::Asc);

        self.ctx.stores().employees.query(&query).await
    }

    /// Records hours for an employee. Entries start unapproved.
    pub async fn create_time_entry(&self, new: NewTimeEntry) -> EngineResult<TimeEntry> {
        let employee = self.ctx.stores().employees.require(&new.employee_id).await?;

        if employee.status == EmploymentStatus::Terminated {
            warn!(employee_id = %employee.id, "Time entry rejected for terminated employee");
            return Err(EngineError::invalid_input(
                "employee_id",
                format!("employee '{}' is terminated", employee.id),
            ));
        }
        if new.hours <= Decimal::ZERO {
            return Err(EngineError::invalid_input("hours", "must be greater than 0"));
        }

        let entry = TimeEntry::from_new(new_id("te"), new);
        let entry = self.ctx.stores().time_entries.insert(entry).await?;

        info!(
            time_entry_id = %entry.id,
            employee_id = %entry.employee_id,
            date = %entry.date,
            hours = %entry.hours,
            "Time entry created"
        );
        self.ctx.emit(PayrollEvent::TimeEntryCreated(entry.clone()));
        Ok(entry)
    }

    /// Approves an entry, making it payable. Approval happens once.
    pub async fn approve_time_entry(&self, id: &str, approver: &str) -> EngineResult<TimeEntry> {
        let mut entry = self.ctx.stores().time_entries.require(id).await?;

        if let Err(err) = entry.approve(approver, Utc::now()) {
            warn!(time_entry_id = %id, error = %err, "Time entry approval rejected");
            return Err(err);
        }
        let entry = self.ctx.stores().time_entries.update(entry).await?;

        info!(time_entry_id = %entry.id, approver, "Time entry approved");
        self.ctx.emit(PayrollEvent::TimeEntryApproved(entry.clone()));
        Ok(entry)
    }

    pub async fn get_time_entry(&self, id: &str) -> EngineResult<TimeEntry> {
        self.ctx.stores().time_entries.require(id).await
    }

    /// All entries for an employee, by date.
    pub async fn time_entries_for_employee(
        &self,
        employee_id: &str,
    ) -> EngineResult<Vec<TimeEntry>> {
        let query = Query::new()
            .filter("employee_id", Op::Eq, json!(employee_id))
            .order_by("date", Direction::Asc);
        self.ctx.stores().time_entries.query(&query).await
    }

    /// All entries charged to a job, by date.
    pub async fn time_entries_for_job(&self, job_id: &str) -> EngineResult<Vec<TimeEntry>> {
        let query = Query::new()
            .filter("job_id", Op::Eq, json!(job_id))
            .order_by("date", Direction::Asc);
        self.ctx.stores().time_entries.query(&query).await
    }

    /// Entries dated within `[start, end]`, optionally for one employee.
    pub async fn time_entries_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        employee_id: Option<&str>,
    ) -> EngineResult<Vec<TimeEntry>> {
        let mut query = Query::new()
            .filter("date", Op::Gte, json!(start))
            .filter("date", Op::Lte, json!(end));
        if let Some(employee_id) = employee_id {
            query = query.filter("employee_id", Op::Eq, json!(employee_id));
        }
        let query = query.order_by("date", Direction::Asc);
        self.ctx.stores().time_entries.query(&query).await
    }

    /// Approved entries for an employee within `[start, end]`.
    pub async fn approved_entries_in_period(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<TimeEntry>> {
        let query = Query::new()
            .filter("employee_id", Op::Eq, json!(employee_id))
            .filter("approved", Op::Eq, json!(true))
            .filter("date", Op::Gte, json!(start))
            .filter("date", Op::Lte, json!(end))
            .order_by("date", Direction::Asc);
        self.ctx.stores().time_entries.query(&query).await
    }

    async fn ensure_ssn_free(&self, ssn: &str, except_id: Option<&str>) -> EngineResult<()> {
        let existing = self
            .ctx
            .stores()
            .employees
            .query(&Query::new().filter("ssn", Op::Eq, json!(ssn)))
            .await?;

        if existing.iter().any(|e| Some(e.id.as_str()) != except_id) {
            warn!("Duplicate SSN rejected");
            return Err(EngineError::DuplicateValue {
                entity: Employee::KIND.to_string(),
                field: "ssn".to_string(),
                value: mask_ssn(ssn),
            });
        }
        Ok(())
    }
}

fn normalize_state(state: &str) -> String {
    state.trim().to_ascii_uppercase()
}

fn validate_names(first_name: &str, last_name: &str) -> EngineResult<()> {
    if first_name.trim().is_empty() {
        return Err(EngineError::invalid_input("first_name", "must not be empty"));
    }
    if last_name.trim().is_empty() {
        return Err(EngineError::invalid_input("last_name", "must not be empty"));
    }
    Ok(())
}

fn validate_pay_rate(rate: Decimal) -> EngineResult<()> {
    if rate.is_sign_negative() {
        return Err(EngineError::invalid_input("pay_rate", "must not be negative"));
    }
    Ok(())
}

/// `***-**-6789`
fn mask_ssn(ssn: &str) -> String {
    format!("***-**-{}", &ssn[ssn.len().saturating_sub(4)..])
}
