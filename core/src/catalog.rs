//! Bundled product showcase data.
//!
//! The catalog is placeholder content shipped with the crate; it never talks
//! to the backend.

use std::collections::HashSet;

use crate::error::ApiError;
use crate::types::{ProductWithScenes, Scene};

const BUNDLED: &str = include_str!("../data/products.json");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<ProductWithScenes>,
}

impl Catalog {
    pub fn new(products: Vec<ProductWithScenes>) -> Self {
        Self { products }
    }

    /// The sample catalog embedded at build time.
    pub fn bundled() -> Result<Self, ApiError> {
        Self::from_json(BUNDLED)
    }

    pub fn from_json(json: &str) -> Result<Self, ApiError> {
        let products =
            serde_json::from_str(json).map_err(|e| ApiError::Deserialization(e.to_string()))?;
        Ok(Self::new(products))
    }

    pub fn products(&self) -> &[ProductWithScenes] {
        &self.products
    }

    pub fn product(&self, id: &str) -> Option<&ProductWithScenes> {
        self.products.iter().find(|p| p.product.id == id)
    }

    /// Every scene in the catalog showing `product_id`, first occurrence wins.
    pub fn scenes_featuring(&self, product_id: &str) -> Vec<&Scene> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .flat_map(|p| &p.scenes)
            .filter(|scene| scene.associated_products.iter().any(|a| a.id == product_id))
            .filter(|scene| seen.insert(scene.id.as_str()))
            .collect()
    }
}
