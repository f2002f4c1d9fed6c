//! Client-side indices over the product and variant listings.
//!
//! The cache is rebuilt from scratch every time the listings are fetched; it
//! never patches itself, so it can't drift from what the server last said.

use crate::domain::model::{OrderItem, Product, Variant};
use std::collections::HashMap;

pub const PLACEHOLDER_IMAGE: &str = "/placeholder-image.jpg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Id(String),
}

impl CategoryFilter {
    /// `"all"` and blank both mean no filter.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some("all") => CategoryFilter::All,
            Some(id) => CategoryFilter::Id(id.to_string()),
        }
    }
}

/// What a cart line shows: a name and an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDisplay {
    pub name: String,
    pub image: String,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogCache {
    products: Vec<Product>,
    variants: Vec<Variant>,
    products_by_id: HashMap<String, usize>,
    variants_by_id: HashMap<String, usize>,
    variants_by_product: HashMap<String, Vec<usize>>,
}

impl CatalogCache {
    pub fn build(products: Vec<Product>, variants: Vec<Variant>) -> Self {
        let products_by_id = products
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        let variants_by_id = variants
            .iter()
            .enumerate()
            .map(|(i, v)| (v.id.clone(), i))
            .collect();

        let mut variants_by_product: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, variant) in variants.iter().enumerate() {
            if let Some(product_id) = variant.product_id.as_deref().filter(|id| !id.is_empty()) {
                variants_by_product
                    .entry(product_id.to_string())
                    .or_default()
                    .push(i);
            }
        }

        tracing::debug!(
            "Catalog rebuilt: {} products, {} variants",
            products.len(),
            variants.len()
        );

        Self {
            products,
            variants,
            products_by_id,
            variants_by_id,
            variants_by_product,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products_by_id.get(id).map(|&i| &self.products[i])
    }

    pub fn variant(&self, id: &str) -> Option<&Variant> {
        self.variants_by_id.get(id).map(|&i| &self.variants[i])
    }

    /// Variants of a product in the order the server listed them.
    pub fn variants_of(&self, product_id: &str) -> Vec<&Variant> {
        self.variants_by_product
            .get(product_id)
            .map(|indices| indices.iter().map(|&i| &self.variants[i]).collect())
            .unwrap_or_default()
    }

    pub fn has_variants(&self, product_id: &str) -> bool {
        self.variants_by_product
            .get(product_id)
            .is_some_and(|v| !v.is_empty())
    }

    /// Products in `category` whose name, SKU or category name contains `query`.
    pub fn filter(&self, category: &CategoryFilter, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| match category {
                CategoryFilter::All => true,
                CategoryFilter::Id(id) => p.category_id.as_deref() == Some(id.as_str()),
            })
            .filter(|p| {
                if needle.is_empty() {
                    return true;
                }
                let contains = |field: Option<&str>| {
                    field.is_some_and(|f| f.to_lowercase().contains(&needle))
                };
                contains(Some(p.name_product.as_str()))
                    || contains(p.sku.as_deref())
                    || contains(p.category_name.as_deref())
            })
            .collect()
    }

    pub fn describe_item(&self, item: &OrderItem) -> ItemDisplay {
        let variant = item.variant_id.as_deref().and_then(|id| self.variant(id));
        let product = match item.product_id.as_deref() {
            Some(id) => self.product(id),
            None => variant
                .and_then(|v| v.product_id.as_deref())
                .and_then(|id| self.product(id)),
        };

        let name = variant
            .map(|v| v.name_variant.as_str())
            .filter(|n| !n.is_empty())
            .or_else(|| {
                product
                    .map(|p| p.name_product.as_str())
                    .filter(|n| !n.is_empty())
            })
            .unwrap_or("Item")
            .to_string();

        let image = item
            .image
            .as_deref()
            .or_else(|| variant.and_then(|v| v.thumbnail.as_deref()))
            .or_else(|| product.and_then(|p| p.thumbnail.as_deref()))
            .or_else(|| product.and_then(|p| p.images.first().map(String::as_str)))
            .filter(|s| !s.is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE)
            .to_string();

        ItemDisplay { name, image }
    }
}
