use super::toml_config::{TomlConfig, DEFAULT_TIMEOUT_SECONDS};
use crate::core::order_selector::DEFAULT_TAX_RATE_BPS;
use crate::domain::model::PaymentMethod;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_range, validate_url, Validate};
use clap::{Parser, Subcommand, ValueEnum};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

#[derive(Debug, Clone, Parser)]
#[command(name = "pos-console")]
#[command(about = "Point-of-sale console for the store backend")]
pub struct CliConfig {
    /// Backend base URL [default: http://localhost:3000/api]
    #[arg(long, env = "POS_API_URL")]
    pub api_url: Option<String>,

    #[arg(long, env = "POS_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[arg(long, env = "POS_BRANCH_ID")]
    pub branch: Option<String>,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_secs: u64,

    /// Tax rate used when the server leaves an order's tax out
    #[arg(long, default_value_t = DEFAULT_TAX_RATE_BPS)]
    pub tax_rate_bps: u32,

    /// TOML file with [api], [session] and [logging] sections
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines on stderr")]
    pub json_logs: bool,

    #[arg(skip)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PeriodArg {
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the catalog with variant counts
    Products {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    Customers,
    /// Show the current pending order
    Orders,
    /// Add one unit of a product to the current order
    Add {
        #[arg(long)]
        product: String,
        #[arg(long)]
        variant: Option<String>,
    },
    /// Change a cart line's quantity
    Qty {
        #[arg(long)]
        item: String,
        #[arg(long, allow_negative_numbers = true)]
        quantity: i64,
    },
    Remove {
        #[arg(long)]
        item: String,
    },
    /// Attach a customer, create the payment and verify it
    Checkout {
        #[arg(long)]
        customer: String,
        #[arg(long, default_value = "cash")]
        method: PaymentMethod,
    },
    Branches,
    Users,
    Roles,
    /// Show the token owner's profile, or another user's with --user
    Profile {
        #[arg(long)]
        user: Option<String>,
    },
    /// Sales report; with --period, the pre-aggregated window instead
    Report {
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        payment_method: Option<String>,
        #[arg(long, value_enum)]
        period: Option<PeriodArg>,
    },
    Stock,
}

impl CliConfig {
    /// Flags that were set (or moved off their defaults) win; the file fills the rest.
    pub fn merged_with(mut self, file: &TomlConfig) -> Self {
        if self.api_url.is_none() {
            self.api_url = Some(file.api.base_url.clone());
        }
        if self.token.is_none() {
            self.token = file.auth_token().map(str::to_string);
        }
        if self.branch.is_none() {
            self.branch = file.branch_id().map(str::to_string);
        }
        if self.timeout_secs == DEFAULT_TIMEOUT_SECONDS {
            self.timeout_secs = file.timeout_seconds();
        }
        if self.tax_rate_bps == DEFAULT_TAX_RATE_BPS {
            self.tax_rate_bps = file.fallback_tax_rate_bps();
        }
        self.json_logs = self.json_logs || file.json_logs();
        if self.log_level.is_none() {
            self.log_level = file.log_level().map(str::to_string);
        }
        self
    }
}

impl ConfigProvider for CliConfig {
    fn api_base_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    fn auth_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }

    fn branch_id(&self) -> Option<&str> {
        self.branch.as_deref().filter(|b| !b.trim().is_empty())
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn fallback_tax_rate_bps(&self) -> u32 {
        self.tax_rate_bps
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_url", self.api_base_url())?;
        validate_positive_number("timeout_secs", self.timeout_secs, 1)?;
        validate_range("tax_rate_bps", self.tax_rate_bps, 0, 10_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliConfig {
        let mut argv = vec!["pos-console"];
        argv.extend_from_slice(args);
        CliConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["orders"]);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.tax_rate_bps, 500);
        assert!(matches!(config.command, Command::Orders));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_checkout_arguments() {
        let config = parse(&["checkout", "--customer", "c1", "--method", "credit_card"]);
        match config.command {
            Command::Checkout { customer, method } => {
                assert_eq!(customer, "c1");
                assert_eq!(method, PaymentMethod::CreditCard);
            }
            other => panic!("unexpected command {:?}", other),
        }

        let config = parse(&["profile", "--user", "u7"]);
        assert!(matches!(config.command, Command::Profile { user: Some(ref u) } if u == "u7"));

        let config = parse(&["qty", "--item", "i1", "--quantity", "-1"]);
        assert!(matches!(config.command, Command::Qty { quantity: -1, .. }));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let bad_url = parse(&["--api-url", "not a url", "orders"]);
        assert!(bad_url.validate().is_err());

        let zero_timeout = parse(&["--timeout-secs", "0", "orders"]);
        assert!(zero_timeout.validate().is_err());

        let bad_rate = parse(&["--tax-rate-bps", "10001", "orders"]);
        assert!(bad_rate.validate().is_err());
    }

    #[test]
    fn test_flags_win_over_file() {
        let file = TomlConfig::from_toml_str(
            r#"
[api]
base_url = "https://file.example.com"
token = "file-token"
timeout_seconds = 12

[session]
branch_id = "file-branch"
fallback_tax_rate_bps = 800

[logging]
level = "warn"
"#,
        )
        .unwrap();

        let merged = parse(&["--branch", "cli-branch", "--tax-rate-bps", "1000", "orders"])
            .merged_with(&file);

        assert_eq!(merged.api_base_url(), "https://file.example.com");
        assert_eq!(merged.auth_token(), Some("file-token"));
        assert_eq!(merged.branch_id(), Some("cli-branch"));
        assert_eq!(merged.request_timeout(), Duration::from_secs(12));
        assert_eq!(merged.fallback_tax_rate_bps(), 1000);
        assert_eq!(merged.log_level.as_deref(), Some("warn"));
    }
}
