use super::ApiClient;
use crate::domain::model::{Customer, CustomerDraft};
use crate::domain::ports::CustomerDirectory;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use async_trait::async_trait;
use reqwest::Method;

impl ApiClient {
    pub async fn customers(&self) -> Result<Vec<Customer>> {
        self.data(self.request(Method::GET, "/customers/find-all"))
            .await
    }

    pub async fn customer(&self, id: &str) -> Result<Customer> {
        self.data(self.request(Method::GET, &format!("/customers/{}", id)))
            .await
    }

    pub async fn add_customer(&self, draft: &CustomerDraft) -> Result<Customer> {
        draft.validate()?;
        self.data(self.request(Method::POST, "/customers/create").json(draft))
            .await
    }

    pub async fn update_customer(&self, id: &str, draft: &CustomerDraft) -> Result<Customer> {
        draft.validate()?;
        self.data(
            self.request(Method::PUT, &format!("/customers/{}", id))
                .json(draft),
        )
        .await
    }

    pub async fn delete_customer(&self, id: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, &format!("/customers/{}", id)))
            .await
    }
}

#[async_trait]
impl CustomerDirectory for ApiClient {
    async fn list_customers(&self) -> Result<Vec<Customer>> {
        self.customers().await
    }

    async fn create_customer(&self, draft: &CustomerDraft) -> Result<Customer> {
        self.add_customer(draft).await
    }
}
