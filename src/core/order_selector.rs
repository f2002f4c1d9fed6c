use crate::domain::model::Order;
use crate::domain::money::Money;
use chrono::{DateTime, NaiveDateTime};

pub const DEFAULT_TAX_RATE_BPS: u32 = 500;

/// Tracks which pending order is the cashier's "current" one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSelector {
    selected: Option<String>,
}

impl OrderSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, order_id: impl Into<String>) {
        self.selected = Some(order_id.into());
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Narrows `orders` to pending ones, newest first, and fixes up the
    /// selection: kept if still pending, otherwise moved to the newest order,
    /// cleared when nothing is pending.
    pub fn reconcile(&mut self, orders: &[Order]) -> Vec<Order> {
        let mut pending: Vec<Order> = orders.iter().filter(|o| o.is_pending()).cloned().collect();
        // Stable: orders with equal timestamps keep server order.
        pending.sort_by_key(|o| std::cmp::Reverse(activity_millis(o)));

        let Some(newest) = pending.first() else {
            if let Some(previous) = self.selected.take() {
                tracing::info!("No pending orders left; cleared selection {}", previous);
            }
            return pending;
        };

        let still_pending = self
            .selected
            .as_deref()
            .is_some_and(|id| pending.iter().any(|o| o.id == id));
        if !still_pending {
            tracing::info!("Current order is now {}", newest.id);
            self.selected = Some(newest.id.clone());
        }

        pending
    }

    pub fn current<'a>(&self, pending: &'a [Order]) -> Option<&'a Order> {
        let id = self.selected.as_deref()?;
        pending.iter().find(|o| o.id == id)
    }
}

/// `updated_at`, else `created_at`, else the epoch.
fn activity_millis(order: &Order) -> i64 {
    order
        .updated_at
        .as_deref()
        .and_then(parse_timestamp)
        .or_else(|| order.created_at.as_deref().and_then(parse_timestamp))
        .unwrap_or(0)
}

fn parse_timestamp(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.timestamp_millis());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// Order money as shown on the cart. Server figures always win; the
/// fallbacks only fill fields the server left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub discount: Money,
    pub total: Money,
}

impl OrderTotals {
    pub fn derive(order: &Order, fallback_tax_rate_bps: u32) -> Self {
        let subtotal = order.subtotal.unwrap_or_else(|| {
            order
                .items
                .iter()
                .map(|item| item.subtotal.unwrap_or_default())
                .sum()
        });
        let tax = order
            .tax_amount
            .unwrap_or_else(|| subtotal.apply_rate(fallback_tax_rate_bps));
        let discount = order.discount_amount.unwrap_or_default();
        let total = order.total_amount.unwrap_or(subtotal + tax - discount);

        Self {
            subtotal,
            tax,
            discount,
            total,
        }
    }
}
