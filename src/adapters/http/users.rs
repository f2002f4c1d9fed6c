use super::ApiClient;
use crate::domain::model::{Role, User, UserDraft, UserUpdate};
use crate::utils::error::Result;
use crate::utils::validation::{validate_email, Validate};
use reqwest::Method;

impl ApiClient {
    pub async fn users(&self) -> Result<Vec<User>> {
        self.data(self.request(Method::GET, "/users/find-all"))
            .await
    }

    pub async fn user(&self, id: &str) -> Result<User> {
        self.data(self.request(Method::GET, &format!("/users/{}", id)))
            .await
    }

    /// The user the configured token belongs to.
    pub async fn me(&self) -> Result<User> {
        self.data(self.request(Method::GET, "/users/me")).await
    }

    pub async fn create_user(&self, draft: &UserDraft) -> Result<User> {
        draft.validate()?;
        self.data(self.request(Method::POST, "/users/create").json(draft))
            .await
    }

    pub async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<User> {
        if let Some(email) = &update.email {
            validate_email("email", email)?;
        }
        self.data(
            self.request(Method::PUT, &format!("/users/update/{}", id))
                .json(update),
        )
        .await
    }

    pub async fn delete_user(&self, id: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, &format!("/users/delete/{}", id)))
            .await
    }

    pub async fn roles(&self) -> Result<Vec<Role>> {
        self.data(self.request(Method::GET, "/roles/find-all"))
            .await
    }
}
