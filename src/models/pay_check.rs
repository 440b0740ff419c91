//! Pay check model.
//!
//! A pay check is the immutable snapshot of one employee's gross-to-net
//! result within a pay run.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::Record;

/// One employee's computed pay within a pay run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayCheck {
    /// Unique identifier for the check.
    pub id: String,
    /// The pay run the check belongs to.
    pub pay_run_id: String,
    /// The employee being paid.
    pub employee_id: String,
    /// Pay date copied from the run.
    pub pay_date: NaiveDate,
    /// Gross pay before withholding.
    pub gross_pay: Decimal,
    /// Federal income tax withheld.
    pub federal_tax: Decimal,
    /// State income tax withheld.
    pub state_tax: Decimal,
    /// Local income tax withheld.
    pub local_tax: Decimal,
    /// Employee share of social security.
    pub social_security: Decimal,
    /// Employee share of Medicare, including the additional rate.
    pub medicare: Decimal,
    /// Sum of all deductions.
    pub total_deductions: Decimal,
    /// Take-home pay.
    pub net_pay: Decimal,
    /// Hours paid at the regular rate.
    pub regular_hours: Decimal,
    /// Hours paid as overtime or double time.
    pub overtime_hours: Decimal,
    /// When the check was created.
    pub created_at: DateTime<Utc>,
}

impl PayCheck {
    /// Returns the sum of the five employee tax components.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::PayCheck;
    /// use chrono::{NaiveDate, Utc};
    /// use rust_decimal::Decimal;
    /// use std::str::FromStr;
    ///
    /// let check = PayCheck {
    ///     id: "chk_001".to_string(),
    ///     pay_run_id: "run_001".to_string(),
    ///     employee_id: "emp_001".to_string(),
    ///     pay_date: NaiveDate::from_ymd_opt(2026, 1, 23).unwrap(),
    ///     gross_pay: Decimal::from_str("2000.00").unwrap(),
    ///     federal_tax: Decimal::from_str("440.00").unwrap(),
    ///     state_tax: Decimal::from_str("186.00").unwrap(),
    ///     local_tax: Decimal::ZERO,
    ///     social_security: Decimal::from_str("124.00").unwrap(),
    ///     medicare: Decimal::from_str("29.00").unwrap(),
    ///     total_deductions: Decimal::ZERO,
    ///     net_pay: Decimal::from_str("1221.00").unwrap(),
    ///     regular_hours: Decimal::from_str("40").unwrap(),
    ///     overtime_hours: Decimal::ZERO,
    ///     created_at: Utc::now(),
    /// };
    /// assert_eq!(check.total_taxes(), Decimal::from_str("779.00").unwrap());
    /// ```
    pub fn total_taxes(&self) -> Decimal {
        self.federal_tax + self.state_tax + self.local_tax + self.social_security + self.medicare
    }
}

impl Record for PayCheck {
    const KIND: &'static str = "PayCheck";

    fn id(&self) -> &str {
        &self.id
    }
}
