//! Catalog product listing items.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// Placeholder shown when a product has no description.
pub const NO_DESCRIPTION: &str = "No description available";

/// A product as returned by the public and admin listing endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-side id; the admin listing includes it, the public one may not.
    #[serde(default)]
    pub id: Option<ProductId>,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub current_unit_price: Price,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_enabled: Option<bool>,
}

impl Product {
    /// Key used for the product's cart line.
    ///
    /// The storefront keys cart lines by SKU, which is present on every
    /// listing item.
    #[must_use]
    pub fn key(&self) -> ProductId {
        ProductId::new(self.sku.as_str())
    }

    /// Description, or a placeholder when absent or blank.
    #[must_use]
    pub fn description_or_placeholder(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(NO_DESCRIPTION)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_listing_json() {
        let raw = r#"{
            "sku": "MUG-01",
            "name": "Mug",
            "currentUnitPrice": 12.5,
            "isEnabled": true
        }"#;
        let product: Product = serde_json::from_str(raw).unwrap();
        assert_eq!(product.key(), ProductId::new("MUG-01"));
        assert_eq!(product.current_unit_price, Price::from_cents(1250));
        assert_eq!(product.description_or_placeholder(), NO_DESCRIPTION);
        assert_eq!(product.is_enabled, Some(true));
    }

    #[test]
    fn test_numeric_id_accepted() {
        let raw = r#"{"id": 7, "sku": "S", "name": "N", "currentUnitPrice": "1.00"}"#;
        let product: Product = serde_json::from_str(raw).unwrap();
        assert_eq!(product.id, Some(ProductId::new("7")));
    }
}
