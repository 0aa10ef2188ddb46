//! 订单服务：下单与订单查询

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    models::order::{NewOrder, Order, OrderStatus, PlaceOrderRequest},
    repository::order_repo::OrderRepository,
};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};
use validator::Validate;

pub struct OrderService {
    db: SqlitePool,
}

impl OrderService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// 下单
    ///
    /// 订单归属取自已验证的身份；总价沿用客户端提交的值。
    pub async fn place(&self, ctx: &AuthContext, req: PlaceOrderRequest) -> Result<Order, AppError> {
        req.validate()?;

        let new_order = NewOrder {
            user_id: ctx.user_id,
            items: req.items,
            total_price: req.total_price,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };

        let order_repo = OrderRepository::new(self.db.clone());
        let order = order_repo.insert_order(&new_order).await?;

        info!(
            order_id = order.id,
            user_id = ctx.user_id,
            items = order.items.len(),
            total_price = order.total_price,
            "Order placed"
        );

        Ok(order)
    }

    /// 查询用户订单：仅本人或管理员
    pub async fn list_for_user(&self, ctx: &AuthContext, user_id: i64) -> Result<Vec<Order>, AppError> {
        if ctx.user_id != user_id && !ctx.is_admin() {
            warn!(
                user_id = ctx.user_id,
                target_user_id = user_id,
                "Order listing denied"
            );
            return Err(AppError::Forbidden);
        }

        let order_repo = OrderRepository::new(self.db.clone());
        order_repo.find_by_user(user_id).await
    }
}
