pub mod config;
pub mod error;
pub mod intake;
pub mod types;

pub use config::{Config, load_site_config, parse_site_toml};
pub use error::{Error, Result};
pub use intake::{IntakeOutcome, handle};
pub use types::*;
