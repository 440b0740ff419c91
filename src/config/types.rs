//! Configuration types for payroll calculation.
//!
//! These structures are deserialized from YAML. Every field has a default,
//! so a settings file only needs to name the values it overrides.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::calculation::{
    ADDITIONAL_MEDICARE_RATE, ADDITIONAL_MEDICARE_THRESHOLD, FEDERAL_INCOME_RATE, FUTA_RATE,
    FUTA_WAGE_BASE, MEDICARE_RATE, SOCIAL_SECURITY_RATE, SOCIAL_SECURITY_WAGE_BASE, SUTA_RATE,
    SUTA_WAGE_BASE, default_state_rates,
};

/// How wage-base caps are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WageBaseMode {
    /// Each check is capped on its own gross.
    #[default]
    PerCheck,
    /// Caps account for the employee's gross already paid this calendar year.
    YearToDate,
}

/// Rates and limits used by the payroll calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollSettings {
    pub federal_income_rate: Decimal,
    pub social_security_rate: Decimal,
    pub social_security_wage_base: Decimal,
    pub medicare_rate: Decimal,
    pub additional_medicare_rate: Decimal,
    pub additional_medicare_threshold: Decimal,
    pub futa_rate: Decimal,
    pub futa_wage_base: Decimal,
    pub suta_rate: Decimal,
    pub suta_wage_base: Decimal,
    pub wage_base_mode: WageBaseMode,
    /// Flat income tax rate keyed by upper-case state code.
    ///
    /// Entries read from YAML overlay the built-in table.
    #[serde(deserialize_with = "overlay_state_rates")]
    pub state_rates: HashMap<String, Decimal>,
}

impl PayrollSettings {
    /// Replaces or adds state rates, upper-casing each code.
    pub fn merge_state_rates(&mut self, rates: HashMap<String, Decimal>) {
        for (code, rate) in rates {
            self.state_rates.insert(code.trim().to_ascii_uppercase(), rate);
        }
    }
}

fn overlay_state_rates<'de, D>(deserializer: D) -> Result<HashMap<String, Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = HashMap::<String, Decimal>::deserialize(deserializer)?;
    let mut settings = PayrollSettings::default();
    settings.merge_state_rates(overrides);
    Ok(settings.state_rates)
}

impl Default for PayrollSettings {
    fn default() -> Self {
        Self {
            federal_income_rate: FEDERAL_INCOME_RATE,
            social_security_rate: SOCIAL_SECURITY_RATE,
            social_security_wage_base: SOCIAL_SECURITY_WAGE_BASE,
            medicare_rate: MEDICARE_RATE,
            additional_medicare_rate: ADDITIONAL_MEDICARE_RATE,
            additional_medicare_threshold: ADDITIONAL_MEDICARE_THRESHOLD,
            futa_rate: FUTA_RATE,
            futa_wage_base: FUTA_WAGE_BASE,
            suta_rate: SUTA_RATE,
            suta_wage_base: SUTA_WAGE_BASE,
            wage_base_mode: WageBaseMode::default(),
            state_rates: default_state_rates(),
        }
    }
}

/// The optional `state_rates.yaml` file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StateRatesConfig {
    /// Rates that replace or extend the built-in table.
    #[serde(default)]
    pub state_rates: HashMap<String, Decimal>,
}
