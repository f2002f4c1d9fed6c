pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use config::TomlConfig;

pub use adapters::http::ApiClient;
pub use core::{CheckoutReceipt, CheckoutStage, OrderTotals, PosSession, Selection};
pub use domain::money::Money;
pub use utils::error::{PosError, Result};
