use super::ApiClient;
use crate::domain::model::{Branch, BranchDraft};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use reqwest::Method;

impl ApiClient {
    pub async fn branches(&self) -> Result<Vec<Branch>> {
        self.data(self.request(Method::GET, "/branches/find-all"))
            .await
    }

    pub async fn branch(&self, id: &str) -> Result<Branch> {
        self.data(self.request(Method::GET, &format!("/branches/{}", id)))
            .await
    }

    pub async fn create_branch(&self, draft: &BranchDraft) -> Result<Branch> {
        draft.validate()?;
        self.data(self.request(Method::POST, "/branches/create").json(draft))
            .await
    }

    pub async fn update_branch(&self, id: &str, draft: &BranchDraft) -> Result<Branch> {
        draft.validate()?;
        self.data(
            self.request(Method::PUT, &format!("/branches/update/{}", id))
                .json(draft),
        )
        .await
    }

    pub async fn delete_branch(&self, id: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, &format!("/branches/delete/{}", id)))
            .await
    }
}
