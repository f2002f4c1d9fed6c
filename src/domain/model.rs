use crate::domain::money::Money;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Every backend response is wrapped as `{ "message": ..., "data": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

fn money_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<Money, D::Error> {
    Ok(Option::<Money>::deserialize(d)?.unwrap_or_default())
}

fn int_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(d)? {
        Some(Raw::Int(v)) => Ok(v),
        // Whole floats such as `2.0` are accepted; the cast is exact below 2^53.
        Some(Raw::Float(v)) if v.fract() == 0.0 && v.abs() < 9_007_199_254_740_992.0 => {
            Ok(v as i64)
        }
        Some(Raw::Float(v)) => Err(D::Error::custom(format!(
            "expected a whole number, got {}",
            v
        ))),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(0),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("expected a whole number, got {:?}", s))),
        None => Ok(0),
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub name_product: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default, deserialize_with = "money_or_zero")]
    pub price: Money,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub product_stock: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: String,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub name_variant: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "money_or_zero")]
    pub price: Money,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStock {
    pub id: String,
    #[serde(default)]
    pub variant_id: Option<String>,
    pub branch_id: String,
    #[serde(default, deserialize_with = "int_or_zero")]
    pub stock: i64,
    #[serde(default, deserialize_with = "int_or_zero")]
    pub min_stock: i64,
}

// ---------------------------------------------------------------------------
// People and places
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, alias = "loyalPoints", deserialize_with = "int_or_zero")]
    pub loyal_points: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub province: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
}

/// `role` is a bare name on `/users/me` and a nested record on listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleRef {
    Name(String),
    Record(Role),
}

impl RoleRef {
    pub fn name(&self) -> &str {
        match self {
            RoleRef::Name(name) => name,
            RoleRef::Record(role) => &role.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<RoleRef>,
    #[serde(default)]
    pub branch_id: Option<String>,
}

/// Contact details attached to a user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default, alias = "userId")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

// ---------------------------------------------------------------------------
// Orders and payments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Paid,
    Completed,
    Cancelled,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub variant_id: Option<String>,
    #[serde(default, deserialize_with = "int_or_zero")]
    pub qty: i64,
    #[serde(default, deserialize_with = "money_or_zero")]
    pub price: Money,
    #[serde(default)]
    pub subtotal: Option<Money>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub branch_id: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub subtotal: Option<Money>,
    #[serde(default)]
    pub tax_amount: Option<Money>,
    #[serde(default)]
    pub discount_amount: Option<Money>,
    #[serde(default)]
    pub total_amount: Option<Money>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Order {
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    pub fn item(&self, item_id: &str) -> Option<&OrderItem> {
        self.items.iter().find(|item| item.id == item_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => f.write_str("cash"),
            PaymentMethod::CreditCard => f.write_str("credit_card"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "credit_card" | "credit-card" | "card" => Ok(PaymentMethod::CreditCard),
            other => Err(format!("unknown payment method: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    #[serde(default, alias = "orderId")]
    pub order_id: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub amount: Option<Money>,
}

/// What `/orders/create` tells us about the order it wrote to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatedOrder {
    pub order_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    pub quantity: String,
    pub price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<OrderLineDraft>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDraft {
    pub order_id: String,
    pub method: PaymentMethod,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub address: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchDraft {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub province: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub address: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name_product: String,
    pub category_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub description: String,
    pub thumbnail: String,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantDraft {
    pub product_id: String,
    pub name_variant: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDraft {
    pub branch_id: String,
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    pub stock: i64,
    pub min_stock: i64,
}

/// Filters for the sales report endpoints. Blank values are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

impl ReportQuery {
    pub fn normalized(&self) -> ReportQuery {
        fn keep(v: &Option<String>) -> Option<String> {
            v.as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        }

        ReportQuery {
            start_date: keep(&self.start_date),
            end_date: keep(&self.end_date),
            branch_id: keep(&self.branch_id),
            payment_method: keep(&self.payment_method),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_parses_string_amounts_and_unknown_status() {
        let order: Order = serde_json::from_value(json!({
            "id": "o1",
            "status": "on_hold",
            "items": [
                {"id": "i1", "product_id": "p1", "qty": "2", "price": "2.25", "subtotal": "4.50"}
            ],
            "subtotal": null,
            "tax_amount": 0.45
        }))
        .unwrap();

        assert_eq!(order.status, OrderStatus::Other);
        assert_eq!(order.items[0].qty, 2);
        assert_eq!(order.items[0].subtotal, Some(Money::from_cents(450)));
        assert_eq!(order.subtotal, None);
        assert_eq!(order.tax_amount, Some(Money::from_cents(45)));
    }

    #[test]
    fn test_item_quantity_must_be_whole() {
        let item = |qty: serde_json::Value| {
            serde_json::from_value::<OrderItem>(json!({"id": "i1", "qty": qty}))
        };

        assert_eq!(item(json!(2.0)).unwrap().qty, 2);
        assert_eq!(item(json!(" 3 ")).unwrap().qty, 3);
        assert_eq!(item(json!(null)).unwrap().qty, 0);
        assert!(item(json!(2.7)).is_err());
        assert!(item(json!("abc")).is_err());
        assert!(item(json!("1.5")).is_err());
    }

    #[test]
    fn test_order_draft_wire_shape() {
        let draft = OrderDraft {
            order_id: None,
            branch_id: Some("b1".to_string()),
            items: vec![OrderLineDraft {
                product_id: Some("p1".to_string()),
                variant_id: None,
                quantity: "1".to_string(),
                price: 3.5,
            }],
            ..Default::default()
        };

        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            value,
            json!({
                "branch_id": "b1",
                "items": [{"productId": "p1", "quantity": "1", "price": 3.5}]
            })
        );
    }

    #[test]
    fn test_role_ref_accepts_name_or_record() {
        let user: User = serde_json::from_value(json!({
            "id": "u1", "name": "Ana", "role": "cashier"
        }))
        .unwrap();
        assert_eq!(user.role.unwrap().name(), "cashier");

        let user: User = serde_json::from_value(json!({
            "id": "u2", "name": "Budi", "role": {"id": "r1", "name": "admin"}
        }))
        .unwrap();
        assert_eq!(user.role.unwrap().name(), "admin");
    }

    #[test]
    fn test_report_query_drops_blank_values() {
        let query = ReportQuery {
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("  ".to_string()),
            ..Default::default()
        }
        .normalized();

        assert_eq!(query.end_date, None);
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"startDate": "2024-01-01"})
        );
    }
}
