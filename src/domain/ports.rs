use crate::domain::model::{
    Category, CreatedOrder, Customer, CustomerDraft, Order, OrderDraft, OrderUpdate, Payment,
    PaymentDraft, Product, Variant,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn auth_token(&self) -> Option<&str>;
    fn branch_id(&self) -> Option<&str>;
    fn request_timeout(&self) -> Duration;
    fn fallback_tax_rate_bps(&self) -> u32;
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn list_products(&self, branch_id: Option<&str>) -> Result<Vec<Product>>;
    async fn list_variants(&self, branch_id: Option<&str>) -> Result<Vec<Variant>>;
    async fn list_categories(&self) -> Result<Vec<Category>>;
}

#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn list_orders(&self, branch_id: Option<&str>) -> Result<Vec<Order>>;
    async fn create_order(&self, draft: &OrderDraft) -> Result<CreatedOrder>;
    async fn update_order(&self, order_id: &str, update: &OrderUpdate) -> Result<()>;
    async fn update_item_quantity(&self, order_id: &str, item_id: &str, quantity: i64)
        -> Result<()>;
    async fn delete_order_item(&self, order_id: &str, item_id: &str) -> Result<()>;
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment(&self, draft: &PaymentDraft) -> Result<Payment>;
    /// Any 2xx counts as verified; the body is not read.
    async fn verify_payment(&self, payment_id: &str) -> Result<()>;
}

#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn list_customers(&self) -> Result<Vec<Customer>>;
    async fn create_customer(&self, draft: &CustomerDraft) -> Result<Customer>;
}

/// Everything the cashier session needs from the backend.
pub trait PosBackend: CatalogSource + OrderGateway + PaymentGateway + CustomerDirectory {}

impl<T> PosBackend for T where T: CatalogSource + OrderGateway + PaymentGateway + CustomerDirectory {}
