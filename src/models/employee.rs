//! Employee model and related types.
//!
//! This module defines the Employee record, the enums describing how an
//! employee is paid, and the payloads used to register and update one.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::Record;

/// Employment status of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    /// Currently employed and payable.
    #[default]
    Active,
    /// On leave or otherwise not being paid.
    Inactive,
    /// No longer employed.
    Terminated,
}

/// How an employee's pay rate is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayBasis {
    /// `pay_rate` is an hourly rate.
    Hourly,
    /// `pay_rate` is an annual salary.
    Salary,
}

/// How often an employee is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    /// 52 pay periods per year.
    Weekly,
    /// 26 pay periods per year.
    #[default]
    Biweekly,
    /// 24 pay periods per year.
    Semimonthly,
    /// 12 pay periods per year.
    Monthly,
}

impl PayFrequency {
    /// Returns the number of pay periods in a year for this frequency.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::PayFrequency;
    ///
    /// assert_eq!(PayFrequency::Weekly.periods_per_year(), 52);
    /// assert_eq!(PayFrequency::Monthly.periods_per_year(), 12);
    /// ```
    pub fn periods_per_year(self) -> u32 {
        match self {
            PayFrequency::Weekly => 52,
            PayFrequency::Biweekly => 26,
            PayFrequency::Semimonthly => 24,
            PayFrequency::Monthly => 12,
        }
    }

    /// Parses a frequency code, returning `None` for unrecognized codes.
    ///
    /// Matching is case-insensitive and tolerates `bi-weekly`/`semi-monthly`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().replace('-', "").as_str() {
            "weekly" => Some(PayFrequency::Weekly),
            "biweekly" => Some(PayFrequency::Biweekly),
            "semimonthly" => Some(PayFrequency::Semimonthly),
            "monthly" => Some(PayFrequency::Monthly),
            _ => None,
        }
    }
}

/// Represents an employee on the payroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name, used for register ordering.
    pub last_name: String,
    /// Social security number, unique across employees.
    pub ssn: String,
    /// Current employment status.
    pub status: EmploymentStatus,
    /// Whether `pay_rate` is hourly or annual.
    pub pay_basis: PayBasis,
    /// Hourly rate or annual salary, depending on `pay_basis`.
    pub pay_rate: Decimal,
    /// How often the employee is paid.
    #[serde(default)]
    pub pay_frequency: PayFrequency,
    /// Two-letter state code used for state withholding.
    #[serde(default)]
    pub state: Option<String>,
    /// Locality used for local withholding.
    #[serde(default)]
    pub locality: Option<String>,
    /// Workers' compensation class code.
    #[serde(default)]
    pub wc_class_code: Option<String>,
    /// Department the employee belongs to.
    #[serde(default)]
    pub department: Option<String>,
    /// The date the employee started employment.
    pub hire_date: NaiveDate,
    /// The date employment ended, if terminated.
    #[serde(default)]
    pub termination_date: Option<NaiveDate>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Returns the register display name, `"Last, First"`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use payroll_engine::models::{Employee, NewEmployee, PayBasis};
    /// # use chrono::NaiveDate;
    /// # use rust_decimal::Decimal;
    /// let employee = Employee::from_new(
    ///     "emp_001".to_string(),
    ///     NewEmployee {
    ///         first_name: "Ada".to_string(),
    ///         last_name: "Lovelace".to_string(),
    ///         ssn: "123-45-6789".to_string(),
    ///         pay_basis: PayBasis::Hourly,
    ///         pay_rate: Decimal::new(50, 0),
    ///         pay_frequency: Default::default(),
    ///         state: Some("CA".to_string()),
    ///         locality: None,
    ///         wc_class_code: None,
    ///         department: None,
    ///         hire_date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
    ///     },
    /// );
    /// assert_eq!(employee.display_name(), "Lovelace, Ada");
    /// ```
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    /// Returns true if the employee is paid an annual salary.
    pub fn is_salaried(&self) -> bool {
        self.pay_basis == PayBasis::Salary
    }

    /// Builds a fresh active employee from a registration payload.
    pub fn from_new(id: String, new: NewEmployee) -> Self {
        let now = Utc::now();
        Self {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            ssn: new.ssn,
            status: EmploymentStatus::Active,
            pay_basis: new.pay_basis,
            pay_rate: new.pay_rate,
            pay_frequency: new.pay_frequency,
            state: new.state,
            locality: new.locality,
            wc_class_code: new.wc_class_code,
            department: new.department,
            hire_date: new.hire_date,
            termination_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies an HR update in place, leaving unset fields untouched.
    pub fn apply(&mut self, update: EmployeeUpdate) {
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if let Some(ssn) = update.ssn {
            self.ssn = ssn;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(pay_basis) = update.pay_basis {
            self.pay_basis = pay_basis;
        }
        if let Some(pay_rate) = update.pay_rate {
            self.pay_rate = pay_rate;
        }
        if let Some(pay_frequency) = update.pay_frequency {
            self.pay_frequency = pay_frequency;
        }
        if let Some(state) = update.state {
            self.state = Some(state);
        }
        if let Some(locality) = update.locality {
            self.locality = Some(locality);
        }
        if let Some(wc_class_code) = update.wc_class_code {
            self.wc_class_code = Some(wc_class_code);
        }
        if let Some(department) = update.department {
            self.department = Some(department);
        }
        if let Some(termination_date) = update.termination_date {
            self.termination_date = Some(termination_date);
        }
        self.updated_at = Utc::now();
    }
}

impl Record for Employee {
    const KIND: &'static str = "Employee";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Registration payload for a new employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub ssn: String,
    pub pay_basis: PayBasis,
    pub pay_rate: Decimal,
    #[serde(default)]
    pub pay_frequency: PayFrequency,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub wc_class_code: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    pub hire_date: NaiveDate,
}

/// HR update payload; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub ssn: Option<String>,
    pub status: Option<EmploymentStatus>,
    pub pay_basis: Option<PayBasis>,
    pub pay_rate: Option<Decimal>,
    pub pay_frequency: Option<PayFrequency>,
    pub state: Option<String>,
    pub locality: Option<String>,
    pub wc_class_code: Option<String>,
    pub department: Option<String>,
    pub termination_date: Option<NaiveDate>,
}

/// Optional filters for listing employees.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub status: Option<EmploymentStatus>,
    pub state: Option<String>,
    pub department: Option<String>,
    pub pay_basis: Option<PayBasis>,
}
