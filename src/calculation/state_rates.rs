//! Flat state income tax rates.
//!
//! One flat rate per state plus DC, applied to the whole check's gross.
//! States with no wage income tax are listed at zero so that a lookup
//! miss always means an unknown code.

use std::collections::HashMap;

use rust_decimal::Decimal;

/// State code and rate in ten-thousandths (`930` is 9.30%).
const STATE_RATES: [(&str, i64); 51] = [
    ("AL", 500),
    ("AK", 0),
    ("AZ", 250),
    ("AR", 440),
    ("CA", 930),
    ("CO", 440),
    ("CT", 699),
    ("DE", 660),
    ("DC", 1075),
    ("FL", 0),
    ("GA", 549),
    ("HI", 1100),
    ("ID", 580),
    ("IL", 495),
    ("IN", 305),
    ("IA", 570),
    ("KS", 570),
    ("KY", 400),
    ("LA", 425),
    ("ME", 715),
    ("MD", 575),
    ("MA", 500),
    ("MI", 425),
    ("MN", 985),
    ("MS", 470),
    ("MO", 480),
    ("MT", 590),
    ("NE", 584),
    ("NV", 0),
    ("NH", 0),
    ("NJ", 1075),
    ("NM", 590),
    ("NY", 1090),
    ("NC", 450),
    ("ND", 250),
    ("OH", 350),
    ("OK", 475),
    ("OR", 990),
    ("PA", 307),
    ("RI", 599),
    ("SC", 640),
    ("SD", 0),
    ("TN", 0),
    ("TX", 0),
    ("UT", 465),
    ("VT", 875),
    ("VA", 575),
    ("WA", 0),
    ("WV", 512),
    ("WI", 765),
    ("WY", 0),
];

/// Returns the built-in state rate table keyed by upper-case state code.
pub fn default_state_rates() -> HashMap<String, Decimal> {
    STATE_RATES
        .iter()
        .map(|(code, rate)| (code.to_string(), Decimal::new(*rate, 4)))
        .collect()
}

/// Looks up a state's flat rate, case-insensitively.
///
/// Returns zero for a missing or unrecognized state.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{default_state_rates, state_rate};
/// use rust_decimal::Decimal;
///
/// let rates = default_state_rates();
/// assert_eq!(state_rate(&rates, Some("ca")), Decimal::new(930, 4));
/// assert_eq!(state_rate(&rates, Some("TX")), Decimal::ZERO);
/// assert_eq!(state_rate(&rates, None), Decimal::ZERO);
/// ```
pub fn state_rate(rates: &HashMap<String, Decimal>, state: Option<&str>) -> Decimal {
    state
        .map(|s| s.trim().to_ascii_uppercase())
        .and_then(|code| rates.get(&code).copied())
        .unwrap_or(Decimal::ZERO)
}
