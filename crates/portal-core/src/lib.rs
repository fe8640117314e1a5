//! portal-core: Shared types, errors, configuration and amount formatting
//!
//! This crate provides the foundational types used across the portal workspace.

pub mod chains;
pub mod config;
pub mod errors;
pub mod format;
pub mod types;

pub use chains::chain_display_name;
pub use config::*;
pub use errors::*;
pub use format::{format_decimal_amount, parse_decimal_amount};
pub use types::*;
