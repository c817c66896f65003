//! Shared types and configuration for the GEOVIS visibility scanner.
//!
//! Hosts the app config loaded from environment variables, domain
//! normalization/validation, and the serde types for the scan-result
//! contract returned to callers.

mod app_config;
mod config;
pub mod contract;
pub mod domain;
mod error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use domain::{brand_token, normalize_domain, validate_domain};
pub use error::{ConfigError, DomainError};
