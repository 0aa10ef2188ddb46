//! 订单数据访问层
//!
//! 订单头与全部明细在同一个事务内写入：要么全部可见，要么全部不存在。

use crate::{
    error::AppError,
    models::order::{NewOrder, Order, OrderItem, OrderItemRow, OrderRow},
};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, error};

pub struct OrderRepository {
    db: SqlitePool,
}

impl OrderRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// 原子写入订单
    ///
    /// 任何一步失败都会显式回滚，然后把原始错误返回给调用方。
    pub async fn insert_order(&self, order: &NewOrder) -> Result<Order, AppError> {
        let mut tx = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to begin transaction");
            AppError::Database(e)
        })?;

        match write_order(&mut tx, order).await {
            Ok(written) => {
                tx.commit().await.map_err(|e| {
                    error!(error = %e, "Failed to commit order");
                    AppError::Database(e)
                })?;

                debug!(order_id = written.id, items = written.items.len(), "Order committed");
                Ok(written)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    error!(error = %rollback_err, "Failed to roll back order");
                }
                Err(e)
            }
        }
    }

    /// 用户的全部订单，最新的在前
    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<Order>, AppError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, user_id, total_price, status, created_at
            FROM orders
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.find_items(row.id).await?;
            orders.push(Order::from_rows(row, items));
        }

        Ok(orders)
    }

    async fn find_items(&self, order_id: i64) -> Result<Vec<OrderItem>, AppError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT order_id, product_id, quantity, portion_size, customizations
            FROM order_items
            WHERE order_id = ?
            ORDER BY position
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(decode_item).collect()
    }
}

async fn write_order(
    tx: &mut Transaction<'_, Sqlite>,
    order: &NewOrder,
) -> Result<Order, AppError> {
    let header = sqlx::query_as::<_, OrderRow>(
        r#"
        INSERT INTO orders (user_id, total_price, status, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, user_id, total_price, status, created_at
        "#,
    )
    .bind(order.user_id)
    .bind(order.total_price)
    .bind(order.status.as_str())
    .bind(order.created_at)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to insert order header");
        AppError::Database(e)
    })?;

    for (position, item) in order.items.iter().enumerate() {
        // 商品存在性在同一事务内检查
        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE id = ?)")
                .bind(item.product_id)
                .fetch_one(&mut **tx)
                .await?;

        if exists == 0 {
            return Err(AppError::BadRequest(format!(
                "Unknown product: {}",
                item.product_id
            )));
        }

        let customizations = serde_json::to_string(&item.customizations)
            .map_err(|e| AppError::internal(format!("Failed to encode customizations: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO order_items (order_id, position, product_id, quantity, portion_size, customizations)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(header.id)
        .bind(position as i64)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(&item.portion_size)
        .bind(customizations)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            error!(error = %e, order_id = header.id, position, "Failed to insert order item");
            AppError::Database(e)
        })?;
    }

    Ok(Order::from_rows(header, order.items.clone()))
}

fn decode_item(row: OrderItemRow) -> Result<OrderItem, AppError> {
    let customizations = serde_json::from_str(&row.customizations).map_err(|e| {
        AppError::internal(format!(
            "Corrupt customizations on order {}: {}",
            row.order_id, e
        ))
    })?;

    Ok(OrderItem {
        product_id: row.product_id,
        quantity: row.quantity,
        portion_size: row.portion_size,
        customizations,
    })
}
