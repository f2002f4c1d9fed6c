use crate::domain::model::{
    BranchDraft, CustomerDraft, OrderDraft, ProductDraft, ProfileDraft, StockDraft, UserDraft,
    VariantDraft,
};
use crate::domain::money::has_at_most_two_decimals;
use crate::utils::error::{PosError, Result};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(PosError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(PosError::InvalidConfigValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(PosError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(PosError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(PosError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Form fields
// ---------------------------------------------------------------------------

pub fn validate_non_empty_string(field_name: &str, value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PosError::validation(field_name, message));
    }
    Ok(())
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

pub fn validate_email(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value, "Email is required")?;
    if !email_pattern().is_match(value.trim()) {
        return Err(PosError::validation(field_name, "Invalid email address"));
    }
    Ok(())
}

const PASSWORD_SPECIALS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

pub fn validate_password(field_name: &str, value: &str) -> Result<()> {
    if value.chars().count() < 8 {
        return Err(PosError::validation(
            field_name,
            "Password must be at least 8 characters long",
        ));
    }
    let rules: [(fn(char) -> bool, &str); 4] = [
        (
            |c| c.is_ascii_lowercase(),
            "Password must contain at least one lowercase letter",
        ),
        (
            |c| c.is_ascii_uppercase(),
            "Password must contain at least one uppercase letter",
        ),
        (
            |c| c.is_ascii_digit(),
            "Password must contain at least one number",
        ),
        (
            |c| PASSWORD_SPECIALS.contains(c),
            "Password must contain at least one special character",
        ),
    ];
    for (accepts, message) in rules {
        if !value.chars().any(accepts) {
            return Err(PosError::validation(field_name, message));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

impl Validate for OrderDraft {
    fn validate(&self) -> Result<()> {
        if self.items.is_empty() {
            return Err(PosError::validation("items", "Items must be at least 1"));
        }
        for (index, item) in self.items.iter().enumerate() {
            if !has_at_most_two_decimals(item.price) {
                return Err(PosError::validation(
                    format!("items[{}].price", index),
                    "Price must be a number",
                ));
            }
            match item.quantity.trim().parse::<i64>() {
                Ok(q) if q >= 1 => {}
                _ => {
                    return Err(PosError::validation(
                        format!("items[{}].quantity", index),
                        "Quantity must be a positive whole number",
                    ))
                }
            }
        }
        Ok(())
    }
}

impl Validate for CustomerDraft {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name, "Name is required")?;
        validate_non_empty_string("email", &self.email, "Email is required")?;
        validate_non_empty_string("address", &self.address, "Address is required")?;
        validate_non_empty_string("city", &self.city, "City is required")?;
        validate_non_empty_string("country", &self.country, "Country is required")
    }
}

impl Validate for BranchDraft {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name, "Name is required")?;
        validate_non_empty_string("address", &self.address, "Address is required")?;
        validate_non_empty_string("phone", &self.phone, "Phone is required")?;
        validate_email("email", &self.email)?;
        validate_non_empty_string("city", &self.city, "City is required")?;
        validate_non_empty_string("province", &self.province, "Province is required")
    }
}

impl Validate for UserDraft {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name, "Name is not empty")?;
        validate_email("email", &self.email)?;
        validate_password("password", &self.password)?;
        validate_non_empty_string("role_id", &self.role_id, "Role is not empty")
    }
}

impl Validate for ProfileDraft {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("address", &self.address, "Address is not empty")?;
        validate_non_empty_string("phone", &self.phone, "Phone is not empty")
    }
}

impl Validate for ProductDraft {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name_product", &self.name_product, "Name is required")?;
        validate_non_empty_string("category_id", &self.category_id, "Category is required")?;
        validate_non_empty_string("description", &self.description, "Description is required")?;
        validate_non_empty_string("thumbnail", &self.thumbnail, "Thumbnail is required")
    }
}

impl Validate for VariantDraft {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name_variant", &self.name_variant, "Name variant is required")?;
        if !self.price.is_finite() {
            return Err(PosError::validation("price", "Price must be a number"));
        }
        if self.price < 0.0 {
            return Err(PosError::validation("price", "Price cannot be negative"));
        }
        Ok(())
    }
}

impl Validate for StockDraft {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("branchId", &self.branch_id, "Branch is required")?;
        validate_non_empty_string("productId", &self.product_id, "Product is required")?;
        if self.stock < 0 {
            return Err(PosError::validation("stock", "stock cannot be negative"));
        }
        if self.min_stock < 0 {
            return Err(PosError::validation("minStock", "minStock cannot be negative"));
        }
        Ok(())
    }
}
