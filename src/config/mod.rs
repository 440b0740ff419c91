//! Configuration loading for the payroll engine.
//!
//! Settings come from YAML files; anything a file leaves out falls back
//! to the built-in federal rates and state table.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Wage base mode: {:?}", config.settings().wage_base_mode);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{PayrollSettings, StateRatesConfig, WageBaseMode};
