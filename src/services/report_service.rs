//! 管理端报表：仪表盘与销售报表

use crate::{
    error::AppError,
    models::report::{DashboardStats, SalesReport},
    repository::{product_repo::ProductRepository, report_repo::ReportRepository},
};
use chrono::Utc;
use sqlx::SqlitePool;

const DASHBOARD_DAYS: i64 = 7;
const REPORT_DAYS: i64 = 30;
const REPORT_MONTHS: i32 = 12;
const TOP_ITEMS_LIMIT: i64 = 10;

pub struct ReportService {
    db: SqlitePool,
}

impl ReportService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, AppError> {
        let report_repo = ReportRepository::new(self.db.clone());
        let product_repo = ProductRepository::new(self.db.clone());

        let (total_orders, total_revenue) = report_repo.order_totals().await?;
        let inventory = product_repo.list().await?;
        let low_stock_items = inventory
            .iter()
            .filter(|p| p.is_low_stock())
            .cloned()
            .collect();
        let daily_stats = report_repo.daily_sales(Utc::now(), DASHBOARD_DAYS).await?;

        Ok(DashboardStats {
            total_orders,
            total_revenue,
            low_stock_items,
            inventory,
            daily_stats,
        })
    }

    pub async fn sales_report(&self) -> Result<SalesReport, AppError> {
        let report_repo = ReportRepository::new(self.db.clone());
        let now = Utc::now();

        Ok(SalesReport {
            daily_sales: report_repo.daily_sales(now, REPORT_DAYS).await?,
            monthly_sales: report_repo.monthly_sales(now, REPORT_MONTHS).await?,
            top_items: report_repo.top_items(TOP_ITEMS_LIMIT).await?,
        })
    }
}
