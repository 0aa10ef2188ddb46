//! Admin dashboard and sales report shapes

use super::product::{Product, ProductCategory};
use serde::{Deserialize, Serialize};

/// Sales for a single day (`YYYY-MM-DD`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyStat {
    pub date: String,
    pub total_orders: i64,
    pub total_revenue: f64,
}

/// Sales for a calendar month (`YYYY-MM`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStat {
    pub month: String,
    pub total_orders: i64,
    pub total_revenue: f64,
}

/// Best seller by quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TopItem {
    pub product_id: i64,
    pub product_name: String,
    #[sqlx(try_from = "String")]
    pub category: ProductCategory,
    pub quantity_sold: i64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_orders: i64,
    pub total_revenue: f64,
    pub low_stock_items: Vec<Product>,
    pub inventory: Vec<Product>,
    pub daily_stats: Vec<DailyStat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub daily_sales: Vec<DailyStat>,
    pub monthly_sales: Vec<MonthlyStat>,
    pub top_items: Vec<TopItem>,
}
