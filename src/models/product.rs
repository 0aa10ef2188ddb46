//! Catalog domain models (products and reviews)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Menu category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Eastern,
    Western,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Eastern => "eastern",
            ProductCategory::Western => "western",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eastern" => Ok(ProductCategory::Eastern),
            "western" => Ok(ProductCategory::Western),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

impl TryFrom<String> for ProductCategory {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Photo credit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAttribution {
    pub photographer: String,
    pub source: String,
    pub url: String,
}

/// Customer review attached to a product
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    #[serde(skip)]
    pub product_id: i64,
    pub user_name: String,
    pub rating: i64,
    pub comment: String,
    pub date: String,
}

/// Product row as stored
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub category: ProductCategory,
    pub image: Option<String>,
    pub image_attribution: Option<String>,
    pub detailed_description: Option<String>,
    pub stock_quantity: i64,
    pub low_stock_threshold: i64,
}

/// Product (menu item) as exposed by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub category: ProductCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_attribution: Option<ImageAttribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<Review>,
    pub stock_quantity: i64,
    pub low_stock_threshold: i64,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.low_stock_threshold
    }

    pub fn from_row(row: ProductRow, reviews: Vec<Review>) -> Self {
        let image_attribution = row.image_attribution.as_deref().and_then(|raw| {
            serde_json::from_str::<Option<ImageAttribution>>(raw)
                .map_err(|e| {
                    tracing::warn!(product_id = row.id, "Ignoring unreadable image attribution: {}", e);
                })
                .ok()
                .flatten()
        });

        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            description: row.description,
            category: row.category,
            image: row.image,
            image_attribution,
            detailed_description: row.detailed_description,
            reviews,
            stock_quantity: row.stock_quantity,
            low_stock_threshold: row.low_stock_threshold,
        }
    }
}

fn default_low_stock_threshold() -> i64 {
    10
}

/// Create / replace product request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,
    #[serde(default)]
    pub description: String,
    pub category: ProductCategory,
    pub image: Option<String>,
    pub image_attribution: Option<ImageAttribution>,
    pub detailed_description: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock quantity must not be negative"))]
    pub stock_quantity: i64,
    #[serde(default = "default_low_stock_threshold")]
    #[validate(range(min = 0, message = "Low stock threshold must not be negative"))]
    pub low_stock_threshold: i64,
}

/// Restock request
#[derive(Debug, Deserialize, Validate)]
pub struct SupplyRequest {
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i64,
}
