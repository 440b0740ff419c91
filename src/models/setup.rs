//! Payroll setup records.
//!
//! Earnings, deductions, benefits, tax tables, tax filings and workers'
//! compensation classes. All of them are managed through the
//! configuration registry via the [`SetupRecord`] trait.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::round_money;
use crate::error::{EngineError, EngineResult};
use crate::store::Record;

/// A record managed by the configuration registry.
pub trait SetupRecord: Record {
    /// Name of the unique code field, if this record is coded.
    const CODE_FIELD: Option<&'static str> = None;

    /// Creation payload.
    type New: Send;

    /// Builds the record from its creation payload.
    fn from_new(id: String, new: Self::New) -> Self;

    /// The record's unique code, if it has one.
    fn code(&self) -> Option<&str> {
        None
    }

    /// Rounds every money field to the cent.
    fn round_money(&mut self) {}

    /// Checks field-level invariants before a write.
    fn validate(&self) -> EngineResult<()> {
        Ok(())
    }
}

fn round_opt(value: Option<Decimal>) -> Option<Decimal> {
    value.map(round_money)
}

fn ensure_non_negative(field: &str, value: Decimal) -> EngineResult<()> {
    if value.is_sign_negative() {
        return Err(EngineError::invalid_input(field, "must not be negative"));
    }
    Ok(())
}

fn ensure_code(code: &str) -> EngineResult<()> {
    if code.trim().is_empty() {
        return Err(EngineError::invalid_input("code", "must not be empty"));
    }
    Ok(())
}

/// A named kind of earnings, such as bonus or holiday pay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Earning {
    pub id: String,
    pub code: String,
    pub name: String,
    /// Multiplier applied to the base rate.
    pub multiplier: Decimal,
    /// Whether the earning is subject to withholding.
    pub taxable: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Creation payload for an [`Earning`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEarning {
    pub code: String,
    pub name: String,
    pub multiplier: Decimal,
    #[serde(default = "default_true")]
    pub taxable: bool,
}

impl Record for Earning {
    const KIND: &'static str = "Earning";

    fn id(&self) -> &str {
        &self.id
    }
}

impl SetupRecord for Earning {
    const CODE_FIELD: Option<&'static str> = Some("code");
    type New = NewEarning;

    fn from_new(id: String, new: NewEarning) -> Self {
        Self {
            id,
            code: new.code,
            name: new.name,
            multiplier: new.multiplier,
            taxable: new.taxable,
            active: true,
            created_at: Utc::now(),
        }
    }

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn validate(&self) -> EngineResult<()> {
        ensure_code(&self.code)?;
        ensure_non_negative("multiplier", self.multiplier)
    }
}

/// How a deduction amount is derived from gross pay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeductionMethod {
    /// A fixed amount per check.
    Flat {
        /// Amount withheld per check.
        amount: Decimal,
    },
    /// A percentage of gross pay; `5` means 5%.
    Percent {
        /// Percentage of gross withheld.
        percent: Decimal,
    },
}

/// A deduction withheld from every check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deduction {
    pub id: String,
    pub code: String,
    pub name: String,
    pub method: DeductionMethod,
    /// Cap on the amount withheld from one check.
    #[serde(default)]
    pub max_per_period: Option<Decimal>,
    /// Annual cap; stored for reference, not enforced per check.
    #[serde(default)]
    pub max_per_year: Option<Decimal>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Creation payload for a [`Deduction`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDeduction {
    pub code: String,
    pub name: String,
    pub method: DeductionMethod,
    #[serde(default)]
    pub max_per_period: Option<Decimal>,
    #[serde(default)]
    pub max_per_year: Option<Decimal>,
}

impl Record for Deduction {
    const KIND: &'static str = "Deduction";

    fn id(&self) -> &str {
        &self.id
    }
}

impl SetupRecord for Deduction {
    const CODE_FIELD: Option<&'static str> = Some("code");
    type New = NewDeduction;

    fn from_new(id: String, new: NewDeduction) -> Self {
        Self {
            id,
            code: new.code,
            name: new.name,
            method: new.method,
            max_per_period: new.max_per_period,
            max_per_year: new.max_per_year,
            active: true,
            created_at: Utc::now(),
        }
    }

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn round_money(&mut self) {
        if let DeductionMethod::Flat { amount } = self.method {
            self.method = DeductionMethod::Flat {
                amount: round_money(amount),
            };
        }
        self.max_per_period = round_opt(self.max_per_period);
        self.max_per_year = round_opt(self.max_per_year);
    }

    fn validate(&self) -> EngineResult<()> {
        ensure_code(&self.code)?;
        match self.method {
            DeductionMethod::Flat { amount } => ensure_non_negative("amount", amount)?,
            DeductionMethod::Percent { percent } => {
                ensure_non_negative("percent", percent)?;
                if percent > Decimal::ONE_HUNDRED {
                    return Err(EngineError::invalid_input(
                        "percent",
                        "must not exceed 100",
                    ));
                }
            }
        }
        if let Some(cap) = self.max_per_period {
            ensure_non_negative("max_per_period", cap)?;
        }
        if let Some(cap) = self.max_per_year {
            ensure_non_negative("max_per_year", cap)?;
        }
        Ok(())
    }
}

/// A benefit plan with employee and employer costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benefit {
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub provider: Option<String>,
    /// Cost borne by the employee per period.
    pub employee_cost: Decimal,
    /// Cost borne by the employer per period.
    pub employer_cost: Decimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Creation payload for a [`Benefit`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBenefit {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub provider: Option<String>,
    pub employee_cost: Decimal,
    pub employer_cost: Decimal,
}

impl Record for Benefit {
    const KIND: &'static str = "Benefit";

    fn id(&self) -> &str {
        &self.id
    }
}

impl SetupRecord for Benefit {
    const CODE_FIELD: Option<&'static str> = Some("code");
    type New = NewBenefit;

    fn from_new(id: String, new: NewBenefit) -> Self {
        Self {
            id,
            code: new.code,
            name: new.name,
            provider: new.provider,
            employee_cost: new.employee_cost,
            employer_cost: new.employer_cost,
            active: true,
            created_at: Utc::now(),
        }
    }

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn round_money(&mut self) {
        self.employee_cost = round_money(self.employee_cost);
        self.employer_cost = round_money(self.employer_cost);
    }

    fn validate(&self) -> EngineResult<()> {
        ensure_code(&self.code)?;
        ensure_non_negative("employee_cost", self.employee_cost)?;
        ensure_non_negative("employer_cost", self.employer_cost)
    }
}

/// Level of government a tax table belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Jurisdiction {
    Federal,
    State,
    Local,
}

/// A jurisdiction-scoped tax rate. Informational; the engine uses its
/// configured settings for live withholding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxTable {
    pub id: String,
    pub jurisdiction: Jurisdiction,
    /// State or locality code; `None` for federal tables.
    #[serde(default)]
    pub region: Option<String>,
    /// What the rate applies to, e.g. `income` or `unemployment`.
    pub tax_type: String,
    pub rate: Decimal,
    #[serde(default)]
    pub wage_base: Option<Decimal>,
    pub effective_date: NaiveDate,
}

/// Creation payload for a [`TaxTable`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTaxTable {
    pub jurisdiction: Jurisdiction,
    #[serde(default)]
    pub region: Option<String>,
    pub tax_type: String,
    pub rate: Decimal,
    #[serde(default)]
    pub wage_base: Option<Decimal>,
    pub effective_date: NaiveDate,
}

impl Record for TaxTable {
    const KIND: &'static str = "TaxTable";

    fn id(&self) -> &str {
        &self.id
    }
}

impl SetupRecord for TaxTable {
    type New = NewTaxTable;

    fn from_new(id: String, new: NewTaxTable) -> Self {
        Self {
            id,
            jurisdiction: new.jurisdiction,
            region: new.region.map(|r| r.to_ascii_uppercase()),
            tax_type: new.tax_type,
            rate: new.rate,
            wage_base: new.wage_base,
            effective_date: new.effective_date,
        }
    }

    fn round_money(&mut self) {
        self.wage_base = round_opt(self.wage_base);
    }

    fn validate(&self) -> EngineResult<()> {
        ensure_non_negative("rate", self.rate)?;
        if self.rate > Decimal::ONE {
            return Err(EngineError::invalid_input(
                "rate",
                "must be a fraction between 0 and 1",
            ));
        }
        Ok(())
    }
}

/// Payroll tax form being filed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingForm {
    /// Quarterly federal return.
    Form941,
    /// Annual federal unemployment return.
    Form940,
    /// Annual wage statement.
    W2,
    /// State quarterly wage and unemployment report.
    StateQuarterly,
}

impl FilingForm {
    /// Returns true if the form is filed per quarter.
    pub fn is_quarterly(self) -> bool {
        matches!(self, FilingForm::Form941 | FilingForm::StateQuarterly)
    }
}

/// Whether a filing has been submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    Pending,
    Filed,
}

/// A payroll tax filing obligation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxFiling {
    pub id: String,
    pub form: FilingForm,
    pub year: i32,
    /// Quarter 1-4 for quarterly forms.
    #[serde(default)]
    pub quarter: Option<u32>,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub status: FilingStatus,
    #[serde(default)]
    pub filed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub confirmation: Option<String>,
}

impl TaxFiling {
    /// Marks a pending filing as filed.
    pub fn mark_filed(&mut self, confirmation: Option<String>, at: DateTime<Utc>) -> EngineResult<()> {
        if self.status == FilingStatus::Filed {
            return Err(EngineError::InvalidTransition {
                entity: Self::KIND.to_string(),
                id: self.id.clone(),
                from: "filed".to_string(),
                action: "file".to_string(),
            });
        }
        self.status = FilingStatus::Filed;
        self.filed_at = Some(at);
        self.confirmation = confirmation;
        Ok(())
    }
}

/// Creation payload for a [`TaxFiling`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTaxFiling {
    pub form: FilingForm,
    pub year: i32,
    #[serde(default)]
    pub quarter: Option<u32>,
    pub due_date: NaiveDate,
    pub amount: Decimal,
}

impl Record for TaxFiling {
    const KIND: &'static str = "TaxFiling";

    fn id(&self) -> &str {
        &self.id
    }
}

impl SetupRecord for TaxFiling {
    type New = NewTaxFiling;

    fn from_new(id: String, new: NewTaxFiling) -> Self {
        Self {
            id,
            form: new.form,
            year: new.year,
            quarter: new.quarter,
            due_date: new.due_date,
            amount: new.amount,
            status: FilingStatus::Pending,
            filed_at: None,
            confirmation: None,
        }
    }

    fn round_money(&mut self) {
        self.amount = round_money(self.amount);
    }

    fn validate(&self) -> EngineResult<()> {
        ensure_non_negative("amount", self.amount)?;
        match (self.form.is_quarterly(), self.quarter) {
            (true, Some(1..=4)) | (false, None) => Ok(()),
            (true, _) => Err(EngineError::invalid_input(
                "quarter",
                "quarterly forms need a quarter between 1 and 4",
            )),
            (false, Some(_)) => Err(EngineError::invalid_input(
                "quarter",
                "annual forms do not take a quarter",
            )),
        }
    }
}

/// A workers' compensation classification and its premium rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerComp {
    pub id: String,
    pub class_code: String,
    pub description: String,
    /// Premium per $100 of payroll.
    pub rate: Decimal,
    #[serde(default)]
    pub state: Option<String>,
}

/// Creation payload for a [`WorkerComp`] class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkerComp {
    pub class_code: String,
    pub description: String,
    pub rate: Decimal,
    #[serde(default)]
    pub state: Option<String>,
}

impl Record for WorkerComp {
    const KIND: &'static str = "WorkerComp";

    fn id(&self) -> &str {
        &self.id
    }
}

impl SetupRecord for WorkerComp {
    const CODE_FIELD: Option<&'static str> = Some("class_code");
    type New = NewWorkerComp;

    fn from_new(id: String, new: NewWorkerComp) -> Self {
        Self {
            id,
            class_code: new.class_code,
            description: new.description,
            rate: new.rate,
            state: new.state,
        }
    }

    fn code(&self) -> Option<&str> {
        Some(&self.class_code)
    }

    fn validate(&self) -> EngineResult<()> {
        ensure_code(&self.class_code)?;
        ensure_non_negative("rate", self.rate)
    }
}

fn default_true() -> bool {
    true
}
