use thiserror::Error;

#[derive(Error, Debug)]
pub enum PosError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("no active order")]
    NoActiveOrder,

    #[error("current order has no items")]
    EmptyCart,

    #[error("no customer assigned to the order")]
    CustomerNotAssigned,

    #[error("order has not been confirmed for payment")]
    PaymentNotReady,

    #[error("no payment to verify")]
    NoPaymentToVerify,

    #[error("a payment is awaiting verification")]
    PaymentInProgress,

    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),

    #[error("no product is waiting for a variant choice")]
    NoVariantSelection,

    #[error("variant {variant_id} does not belong to product {product_id}")]
    VariantMismatch {
        product_id: String,
        variant_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Config,
    Validation,
    Checkout,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PosError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PosError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PosError::Http(_) => ErrorCategory::Network,
            PosError::Api { .. } => ErrorCategory::Api,
            PosError::Config { .. }
            | PosError::InvalidConfigValue { .. } => ErrorCategory::Config,
            PosError::Validation { .. } | PosError::InvalidQuantity(_) => {
                ErrorCategory::Validation
            }
            PosError::NotFound { .. }
            | PosError::NoActiveOrder
            | PosError::EmptyCart
            | PosError::CustomerNotAssigned
            | PosError::PaymentNotReady
            | PosError::NoPaymentToVerify
            | PosError::PaymentInProgress
            | PosError::NoVariantSelection
            | PosError::VariantMismatch { .. } => ErrorCategory::Checkout,
            PosError::Serialization(_) | PosError::Io(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Checkout | ErrorCategory::Validation => ErrorSeverity::High,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Api => match self {
                PosError::Api { status, .. } if *status >= 500 => ErrorSeverity::Medium,
                _ => ErrorSeverity::High,
            },
            ErrorCategory::Config => ErrorSeverity::Critical,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.severity() == ErrorSeverity::Medium
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PosError::Http(e) if e.is_timeout() => {
                "The backend did not answer in time; raise --timeout-secs or retry".to_string()
            }
            PosError::Http(_) => "Check that the API URL is reachable".to_string(),
            PosError::Api { status: 401, .. } | PosError::Api { status: 403, .. } => {
                "Refresh the API token (POS_API_TOKEN)".to_string()
            }
            PosError::Api { status, .. } if *status >= 500 => {
                "The backend failed; retry in a moment".to_string()
            }
            PosError::Api { .. } => "Check the request values and try again".to_string(),
            PosError::Config { .. }
            | PosError::InvalidConfigValue { .. } => {
                "Fix the configuration file or command line flags".to_string()
            }
            PosError::Validation { field, .. } => format!("Correct the '{}' field", field),
            PosError::NoActiveOrder => "Add a product to start an order".to_string(),
            PosError::EmptyCart => "Add at least one item before paying".to_string(),
            PosError::CustomerNotAssigned => "Assign a customer with --customer".to_string(),
            PosError::PaymentNotReady => "Process the payment for the order first".to_string(),
            PosError::NoPaymentToVerify => "Create a payment before verifying".to_string(),
            PosError::PaymentInProgress => {
                "Verify the pending payment before changing the order".to_string()
            }
            PosError::InvalidQuantity(_) => "Remove the item instead of setting 0".to_string(),
            PosError::NotFound { kind, .. } => format!("Refresh the {} list", kind),
            PosError::NoVariantSelection => "Select a product first".to_string(),
            PosError::VariantMismatch { .. } => {
                "Choose one of the variants listed for the product".to_string()
            }
            PosError::Serialization(_) | PosError::Io(_) => {
                "Run with --verbose and report the log".to_string()
            }
        }
    }

    /// Short message meant for the cashier, not the log.
    pub fn user_friendly_message(&self) -> String {
        match self {
            PosError::Http(_) => "Cannot reach the POS backend".to_string(),
            PosError::Api { message, .. } => message.clone(),
            PosError::NoActiveOrder => "No active order to update".to_string(),
            PosError::EmptyCart => "No items in current order".to_string(),
            PosError::CustomerNotAssigned => "Please select a customer first".to_string(),
            PosError::PaymentNotReady => "No active order found".to_string(),
            PosError::NoPaymentToVerify => "No payment to verify".to_string(),
            PosError::Validation { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PosError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_errors_use_cashier_wording() {
        assert_eq!(
            PosError::CustomerNotAssigned.user_friendly_message(),
            "Please select a customer first"
        );
        assert_eq!(
            PosError::EmptyCart.user_friendly_message(),
            "No items in current order"
        );
        assert_eq!(PosError::EmptyCart.category(), ErrorCategory::Checkout);
    }

    #[test]
    fn test_server_errors_are_retryable() {
        let err = PosError::Api {
            status: 503,
            message: "down".to_string(),
        };
        assert!(err.is_retryable());

        let err = PosError::Api {
            status: 422,
            message: "bad".to_string(),
        };
        assert!(!err.is_retryable());
        assert_eq!(err.user_friendly_message(), "bad");
    }
}
