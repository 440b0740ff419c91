//! Calculation logic for the payroll engine.
//!
//! This module contains the pure gross-to-net functions: gross pay from
//! time entries or salary, employee withholding, deductions, employer-only
//! taxes, and the pipeline in [`compute_pay_check`] that ties them together.
//! Every money amount is rounded half away from zero to the cent.

mod deductions;
mod employer_taxes;
mod gross_pay;
mod gross_to_net;
mod rounding;
mod state_rates;
mod withholding;

pub use deductions::{DeductionLine, DeductionsResult, calculate_deductions, deduction_amount};
pub use employer_taxes::{
    FUTA_RATE, FUTA_WAGE_BASE, SUTA_RATE, SUTA_WAGE_BASE, compute_futa, compute_suta,
    compute_wc_premium,
};
pub use gross_pay::{
    GrossPayResult, SalariedGrossResult, calculate_gross_pay, calculate_salaried_gross,
    pay_type_multiplier,
};
pub use gross_to_net::{PayCheckCalculation, PayCheckInput, compute_pay_check};
pub use rounding::round_money;
pub use state_rates::{default_state_rates, state_rate};
pub use withholding::{
    ADDITIONAL_MEDICARE_RATE, ADDITIONAL_MEDICARE_THRESHOLD, FEDERAL_INCOME_RATE, MEDICARE_RATE,
    SOCIAL_SECURITY_RATE, SOCIAL_SECURITY_WAGE_BASE, WithholdingResult, calculate_withholding,
    federal_income_tax, medicare_tax, social_security_tax, state_income_tax,
};
