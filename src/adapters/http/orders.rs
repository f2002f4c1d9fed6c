use super::{id_at, ApiClient};
use crate::domain::model::{CreatedOrder, Order, OrderDraft, OrderUpdate};
use crate::domain::ports::OrderGateway;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

impl ApiClient {
    pub async fn orders(&self, branch_id: Option<&str>) -> Result<Vec<Order>> {
        self.data(self.branch_scoped("/orders/find-all", branch_id))
            .await
    }

    /// Creates an order, or appends the draft's items when `order_id` names an
    /// existing pending order.
    pub async fn submit_order(&self, draft: &OrderDraft) -> Result<CreatedOrder> {
        draft.validate()?;
        tracing::debug!("Submitting order draft: {:?}", draft);
        let body = self
            .json(self.request(Method::POST, "/orders/create").json(draft))
            .await?;

        // Seen in the wild: `{data: {id}}`, `{data: {order: {id}}}` and `{order: {id}}`.
        let order_id = id_at(&body, "/data/id")
            .or_else(|| id_at(&body, "/data/order/id"))
            .or_else(|| id_at(&body, "/order/id"));
        if order_id.is_none() {
            tracing::warn!("Order created but the response carried no order id");
        }
        Ok(CreatedOrder { order_id })
    }

    pub async fn patch_order(&self, order_id: &str, update: &OrderUpdate) -> Result<()> {
        self.send(
            self.request(Method::PUT, &format!("/orders/{}", order_id))
                .json(update),
        )
        .await
    }

    pub async fn set_item_quantity(
        &self,
        order_id: &str,
        item_id: &str,
        quantity: i64,
    ) -> Result<()> {
        self.send(
            self.request(
                Method::PUT,
                &format!("/orders/{}/items/{}/quantity", order_id, item_id),
            )
            .json(&json!({ "quantity": quantity })),
        )
        .await
    }

    pub async fn remove_item(&self, order_id: &str, item_id: &str) -> Result<()> {
        self.send(self.request(
            Method::DELETE,
            &format!("/orders/{}/items/{}", order_id, item_id),
        ))
        .await
    }
}

#[async_trait]
impl OrderGateway for ApiClient {
    async fn list_orders(&self, branch_id: Option<&str>) -> Result<Vec<Order>> {
        self.orders(branch_id).await
    }

    async fn create_order(&self, draft: &OrderDraft) -> Result<CreatedOrder> {
        self.submit_order(draft).await
    }

    async fn update_order(&self, order_id: &str, update: &OrderUpdate) -> Result<()> {
        self.patch_order(order_id, update).await
    }

    async fn update_item_quantity(
        &self,
        order_id: &str,
        item_id: &str,
        quantity: i64,
    ) -> Result<()> {
        self.set_item_quantity(order_id, item_id, quantity).await
    }

    async fn delete_order_item(&self, order_id: &str, item_id: &str) -> Result<()> {
        self.remove_item(order_id, item_id).await
    }
}
