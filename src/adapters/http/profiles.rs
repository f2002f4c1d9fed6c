use super::ApiClient;
use crate::domain::model::{Profile, ProfileDraft};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use reqwest::Method;

impl ApiClient {
    pub async fn create_profile(&self, draft: &ProfileDraft) -> Result<Profile> {
        draft.validate()?;
        self.data(self.request(Method::POST, "/profiles/create").json(draft))
            .await
    }

    /// The backend takes profile updates as POST, not PUT.
    pub async fn update_profile(&self, id: &str, draft: &ProfileDraft) -> Result<Profile> {
        draft.validate()?;
        self.data(
            self.request(Method::POST, &format!("/profiles/update/{}", id))
                .json(draft),
        )
        .await
    }

    pub async fn my_profile(&self) -> Result<Profile> {
        self.data(self.request(Method::GET, "/profiles/me")).await
    }

    pub async fn profile_for_user(&self, user_id: &str) -> Result<Profile> {
        self.data(self.request(Method::GET, &format!("/profiles/user/{}", user_id)))
            .await
    }
}
