use super::ApiClient;
use crate::domain::model::{
    Category, CategoryDraft, Product, ProductDraft, ProductStock, StockDraft, Variant,
    VariantDraft,
};
use crate::domain::ports::CatalogSource;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use async_trait::async_trait;
use reqwest::Method;

impl ApiClient {
    pub async fn products(&self, branch_id: Option<&str>) -> Result<Vec<Product>> {
        self.data(self.branch_scoped("/products/find-all", branch_id))
            .await
    }

    pub async fn product(&self, id: &str, branch_id: Option<&str>) -> Result<Product> {
        self.data(self.branch_scoped(&format!("/products/{}", id), branch_id))
            .await
    }

    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product> {
        draft.validate()?;
        self.data(self.request(Method::POST, "/products/create").json(draft))
            .await
    }

    pub async fn update_product(&self, id: &str, draft: &ProductDraft) -> Result<Product> {
        draft.validate()?;
        self.data(
            self.request(Method::PUT, &format!("/products/update/{}", id))
                .json(draft),
        )
        .await
    }

    pub async fn delete_product(&self, id: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, &format!("/products/delete/{}", id)))
            .await
    }

    pub async fn variants(&self, branch_id: Option<&str>) -> Result<Vec<Variant>> {
        self.data(self.branch_scoped("/variants/find-all", branch_id))
            .await
    }

    pub async fn variant(&self, id: &str) -> Result<Variant> {
        self.data(self.request(Method::GET, &format!("/variants/get/{}", id)))
            .await
    }

    pub async fn create_variant(&self, draft: &VariantDraft) -> Result<Variant> {
        draft.validate()?;
        self.data(self.request(Method::POST, "/variants/create").json(draft))
            .await
    }

    // The backend exposes variant update and delete as POST.
    pub async fn update_variant(&self, id: &str, draft: &VariantDraft) -> Result<Variant> {
        draft.validate()?;
        self.data(
            self.request(Method::POST, &format!("/variants/update/{}", id))
                .json(draft),
        )
        .await
    }

    pub async fn delete_variant(&self, id: &str) -> Result<()> {
        self.send(self.request(Method::POST, &format!("/variants/delete/{}", id)))
            .await
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.data(self.request(Method::POST, "/categories/find-all"))
            .await
    }

    pub async fn create_category(&self, draft: &CategoryDraft) -> Result<Category> {
        crate::utils::validation::validate_non_empty_string(
            "name",
            &draft.name,
            "Name is required",
        )?;
        self.data(self.request(Method::POST, "/categories/create").json(draft))
            .await
    }

    pub async fn create_stock(&self, draft: &StockDraft) -> Result<ProductStock> {
        draft.validate()?;
        self.data(
            self.request(Method::POST, "/product-stocks/create")
                .json(draft),
        )
        .await
    }

    pub async fn stocks(&self, branch_id: Option<&str>) -> Result<Vec<ProductStock>> {
        self.data(self.branch_scoped("/product-stocks/find-all", branch_id))
            .await
    }
}

#[async_trait]
impl CatalogSource for ApiClient {
    async fn list_products(&self, branch_id: Option<&str>) -> Result<Vec<Product>> {
        self.products(branch_id).await
    }

    async fn list_variants(&self, branch_id: Option<&str>) -> Result<Vec<Variant>> {
        self.variants(branch_id).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.categories().await
    }
}
