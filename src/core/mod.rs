pub mod catalog;
pub mod checkout;
pub mod order_selector;
pub mod session;

pub use crate::domain::ports::{ConfigProvider, PosBackend};
pub use crate::utils::error::Result;
pub use catalog::{CatalogCache, CategoryFilter, ItemDisplay};
pub use checkout::{CheckoutReceipt, CheckoutSequencer, CheckoutStage};
pub use order_selector::{OrderSelector, OrderTotals, DEFAULT_TAX_RATE_BPS};
pub use session::{PosSession, Selection};
