use super::ApiClient;
use crate::domain::model::{Payment, PaymentDraft};
use crate::domain::ports::PaymentGateway;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Method;

impl ApiClient {
    pub async fn payments(&self, branch_id: Option<&str>) -> Result<Vec<Payment>> {
        self.data(self.branch_scoped("/payments/find-all", branch_id))
            .await
    }
}

#[async_trait]
impl PaymentGateway for ApiClient {
    async fn create_payment(&self, draft: &PaymentDraft) -> Result<Payment> {
        self.data(self.request(Method::POST, "/payments/create").json(draft))
            .await
    }

    async fn verify_payment(&self, payment_id: &str) -> Result<()> {
        self.send(self.request(
            Method::PUT,
            &format!("/payments/verify-payment/{}", payment_id),
        ))
        .await
    }
}
