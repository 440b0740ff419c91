//! Employee tax withholding.
//!
//! Federal income tax is a flat rate. State income tax uses the flat state
//! table. Local income tax is an unconfigured extension point and is always
//! zero. Social security and Medicare follow the FICA rates, with wage-base
//! caps evaluated against `prior_wages` (zero unless year-to-date mode is on).

use rust_decimal::Decimal;

use crate::config::PayrollSettings;
use crate::models::AuditStep;

use super::{round_money, state_rate};

/// Flat federal income tax rate (22%).
pub const FEDERAL_INCOME_RATE: Decimal = Decimal::from_parts(22, 0, 0, false, 2);
/// Employee social security rate (6.2%).
pub const SOCIAL_SECURITY_RATE: Decimal = Decimal::from_parts(62, 0, 0, false, 3);
/// Social security wage base.
pub const SOCIAL_SECURITY_WAGE_BASE: Decimal = Decimal::from_parts(168_600, 0, 0, false, 0);
/// Employee Medicare rate (1.45%).
pub const MEDICARE_RATE: Decimal = Decimal::from_parts(145, 0, 0, false, 4);
/// Additional Medicare rate above the threshold (0.9%).
pub const ADDITIONAL_MEDICARE_RATE: Decimal = Decimal::from_parts(9, 0, 0, false, 3);
/// Wages above which additional Medicare applies.
pub const ADDITIONAL_MEDICARE_THRESHOLD: Decimal = Decimal::from_parts(200_000, 0, 0, false, 0);

/// The five withheld tax components for one check.
#[derive(Debug, Clone)]
pub struct WithholdingResult {
    pub federal_tax: Decimal,
    pub state_tax: Decimal,
    pub local_tax: Decimal,
    pub social_security: Decimal,
    pub medicare: Decimal,
    /// One audit step per component, in the order above.
    pub audit_steps: Vec<AuditStep>,
}

impl WithholdingResult {
    /// Returns the sum of all five components.
    pub fn total(&self) -> Decimal {
        self.federal_tax + self.state_tax + self.local_tax + self.social_security + self.medicare
    }
}

/// Federal income tax: flat rate on gross.
pub fn federal_income_tax(gross: Decimal, settings: &PayrollSettings) -> Decimal {
    round_money(gross * settings.federal_income_rate)
}

/// State income tax: gross times the state's flat rate.
pub fn state_income_tax(gross: Decimal, state: Option<&str>, settings: &PayrollSettings) -> Decimal {
    round_money(gross * state_rate(&settings.state_rates, state))
}

/// Social security on the part of gross still under the wage base.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::social_security_tax;
/// use payroll_engine::config::PayrollSettings;
/// use rust_decimal::Decimal;
///
/// let settings = PayrollSettings::default();
/// // capped at 168,600 x 6.2%
/// let tax = social_security_tax(Decimal::new(500_000, 0), Decimal::ZERO, &settings);
/// assert_eq!(tax, Decimal::new(1_045_320, 2));
/// ```
pub fn social_security_tax(
    gross: Decimal,
    prior_wages: Decimal,
    settings: &PayrollSettings,
) -> Decimal {
    let remaining_base = (settings.social_security_wage_base - prior_wages).max(Decimal::ZERO);
    round_money(gross.min(remaining_base) * settings.social_security_rate)
}

/// Medicare on gross, plus the additional rate on wages over the threshold.
pub fn medicare_tax(gross: Decimal, prior_wages: Decimal, settings: &PayrollSettings) -> Decimal {
    let over_threshold = (prior_wages + gross - settings.additional_medicare_threshold)
        .max(Decimal::ZERO)
        .min(gross);
    round_money(
        gross * settings.medicare_rate + over_threshold * settings.additional_medicare_rate,
    )
}

/// Calculates every withheld tax component for one check.
///
/// Each component is rounded to the cent independently.
pub fn calculate_withholding(
    gross: Decimal,
    state: Option<&str>,
    prior_wages: Decimal,
    settings: &PayrollSettings,
    step_number: u32,
) -> WithholdingResult {
    let federal_tax = federal_income_tax(gross, settings);
    let rate = state_rate(&settings.state_rates, state);
    let state_tax = state_income_tax(gross, state, settings);
    let local_tax = Decimal::ZERO;
    let social_security = social_security_tax(gross, prior_wages, settings);
    let medicare = medicare_tax(gross, prior_wages, settings);

    let gross_str = gross.to_string();
    let audit_steps = vec![
        AuditStep {
            step_number,
            rule_id: "federal_income_tax".to_string(),
            rule_name: "Federal Income Tax".to_string(),
            input: serde_json::json!({
                "gross_pay": gross_str,
                "rate": settings.federal_income_rate.normalize().to_string()
            }),
            output: serde_json::json!({ "amount": federal_tax.to_string() }),
            reasoning: format!(
                "${} x {} = ${}",
                gross,
                settings.federal_income_rate.normalize(),
                federal_tax
            ),
        },
        AuditStep {
            step_number: step_number + 1,
            rule_id: "state_income_tax".to_string(),
            rule_name: "State Income Tax".to_string(),
            input: serde_json::json!({
                "gross_pay": gross_str,
                "state": state,
                "rate": rate.normalize().to_string()
            }),
            output: serde_json::json!({ "amount": state_tax.to_string() }),
            reasoning: match state {
                Some(code) if !rate.is_zero() => format!(
                    "${} x {} ({}) = ${}",
                    gross,
                    rate.normalize(),
                    code.to_ascii_uppercase(),
                    state_tax
                ),
                Some(code) => format!("No state income tax for '{}'", code),
                None => "No state on file".to_string(),
            },
        },
        AuditStep {
            step_number: step_number + 2,
            rule_id: "local_income_tax".to_string(),
            rule_name: "Local Income Tax".to_string(),
            input: serde_json::json!({ "gross_pay": gross_str }),
            output: serde_json::json!({ "amount": local_tax.to_string() }),
            reasoning: "Local income tax is not configured".to_string(),
        },
        AuditStep {
            step_number: step_number + 3,
            rule_id: "social_security".to_string(),
            rule_name: "FICA Social Security".to_string(),
            input: serde_json::json!({
                "gross_pay": gross_str,
                "prior_wages": prior_wages.to_string(),
                "wage_base": settings.social_security_wage_base.to_string(),
                "rate": settings.social_security_rate.normalize().to_string()
            }),
            output: serde_json::json!({ "amount": social_security.to_string() }),
            reasoning: format!(
                "min(${}, remaining base) x {} = ${}",
                gross,
                settings.social_security_rate.normalize(),
                social_security
            ),
        },
        AuditStep {
            step_number: step_number + 4,
            rule_id: "medicare".to_string(),
            rule_name: "FICA Medicare".to_string(),
            input: serde_json::json!({
                "gross_pay": gross_str,
                "prior_wages": prior_wages.to_string(),
                "threshold": settings.additional_medicare_threshold.to_string()
            }),
            output: serde_json::json!({ "amount": medicare.to_string() }),
            reasoning: format!(
                "${} x {} plus {} over ${} = ${}",
                gross,
                settings.medicare_rate.normalize(),
                settings.additional_medicare_rate.normalize(),
                settings.additional_medicare_threshold,
                medicare
            ),
        },
    ];

    WithholdingResult {
        federal_tax,
        state_tax,
        local_tax,
        social_security,
        medicare,
        audit_steps,
    }
}
