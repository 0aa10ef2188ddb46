//! 销售统计查询
//!
//! `created_at` 以 RFC3339 文本存储，按日 / 按月分组直接取前缀。
//! 已取消的订单不计入任何统计。

use crate::{
    error::AppError,
    models::report::{DailyStat, MonthlyStat, TopItem},
};
use chrono::{DateTime, Datelike, Duration, Utc};
use sqlx::SqlitePool;

pub struct ReportRepository {
    db: SqlitePool,
}

impl ReportRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// 订单数与总收入
    pub async fn order_totals(&self) -> Result<(i64, f64), AppError> {
        let totals = sqlx::query_as::<_, (i64, f64)>(
            r#"
            SELECT COUNT(*), COALESCE(SUM(total_price), 0.0)
            FROM orders
            WHERE status != 'cancelled'
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(totals)
    }

    /// 最近 `days` 天（含今天）的每日销售
    pub async fn daily_sales(
        &self,
        now: DateTime<Utc>,
        days: i64,
    ) -> Result<Vec<DailyStat>, AppError> {
        let stats = sqlx::query_as::<_, DailyStat>(
            r#"
            SELECT substr(created_at, 1, 10) AS date,
                   COUNT(*) AS total_orders,
                   COALESCE(SUM(total_price), 0.0) AS total_revenue
            FROM orders
            WHERE status != 'cancelled' AND created_at >= ?
            GROUP BY date
            ORDER BY date
            "#,
        )
        .bind(day_cutoff(now, days))
        .fetch_all(&self.db)
        .await?;

        Ok(stats)
    }

    /// 最近 `months` 个自然月（含本月）的每月销售
    pub async fn monthly_sales(
        &self,
        now: DateTime<Utc>,
        months: i32,
    ) -> Result<Vec<MonthlyStat>, AppError> {
        let stats = sqlx::query_as::<_, MonthlyStat>(
            r#"
            SELECT substr(created_at, 1, 7) AS month,
                   COUNT(*) AS total_orders,
                   COALESCE(SUM(total_price), 0.0) AS total_revenue
            FROM orders
            WHERE status != 'cancelled' AND created_at >= ?
            GROUP BY month
            ORDER BY month
            "#,
        )
        .bind(month_cutoff(now, months))
        .fetch_all(&self.db)
        .await?;

        Ok(stats)
    }

    /// 按销量排序的畅销商品，收入按当前目录价格计算
    pub async fn top_items(&self, limit: i64) -> Result<Vec<TopItem>, AppError> {
        let items = sqlx::query_as::<_, TopItem>(
            r#"
            SELECT p.id AS product_id,
                   p.name AS product_name,
                   p.category AS category,
                   SUM(oi.quantity) AS quantity_sold,
                   COALESCE(SUM(oi.quantity * p.price), 0.0) AS total_revenue
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN products p ON p.id = oi.product_id
            WHERE o.status != 'cancelled'
            GROUP BY p.id, p.name, p.category
            ORDER BY quantity_sold DESC, p.id
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }
}

/// 统计窗口第一天，格式 `YYYY-MM-DD`
fn day_cutoff(now: DateTime<Utc>, days: i64) -> String {
    (now - Duration::days(days.max(1) - 1))
        .format("%Y-%m-%d")
        .to_string()
}

/// 统计窗口第一个月，格式 `YYYY-MM`
fn month_cutoff(now: DateTime<Utc>, months: i32) -> String {
    let index = now.year() * 12 + now.month0() as i32 - (months.max(1) - 1);
    format!("{:04}-{:02}", index.div_euclid(12), index.rem_euclid(12) + 1)
}
