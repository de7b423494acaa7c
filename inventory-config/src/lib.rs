//! Configuration loading for the inventory services.
//!
//! Every binary loads its configuration the same way: a `base` file plus an
//! environment-specific file from the `configuration/` directory, with
//! `APP_`-prefixed environment variable overrides applied last.

mod environment;
pub mod load;
pub mod shared;

pub use environment::Environment;
pub use load::{LoadConfigError, load_config, load_config_from};
