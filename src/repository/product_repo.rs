//! 菜品与评价数据访问层

use crate::{
    error::AppError,
    models::product::{Product, ProductCategory, ProductInput, ProductRow, Review},
};
use sqlx::SqlitePool;
use std::collections::HashMap;

const PRODUCT_COLUMNS: &str = "id, name, price, description, category, image, image_attribution, \
     detailed_description, stock_quantity, low_stock_threshold";

pub struct ProductRepository {
    db: SqlitePool,
}

impl ProductRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// 全部商品（含评价）
    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products ORDER BY id",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        self.attach_reviews(rows).await
    }

    /// 按分类列出商品
    pub async fn list_by_category(
        &self,
        category: ProductCategory,
    ) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE category = ? ORDER BY id",
            PRODUCT_COLUMNS
        ))
        .bind(category.as_str())
        .fetch_all(&self.db)
        .await?;

        self.attach_reviews(rows).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE id = ?",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some(row) => {
                let reviews = self.reviews_for(id).await?;
                Ok(Some(Product::from_row(row, reviews)))
            }
            None => Ok(None),
        }
    }

    pub async fn create(&self, input: &ProductInput) -> Result<Product, AppError> {
        let attribution = encode_attribution(input)?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products (name, price, description, category, image, image_attribution,
                                  detailed_description, stock_quantity, low_stock_threshold)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.description)
        .bind(input.category.as_str())
        .bind(&input.image)
        .bind(attribution)
        .bind(&input.detailed_description)
        .bind(input.stock_quantity)
        .bind(input.low_stock_threshold)
        .fetch_one(&self.db)
        .await?;

        Ok(Product::from_row(row, vec![]))
    }

    /// 整体替换商品字段
    pub async fn update(&self, id: i64, input: &ProductInput) -> Result<Option<Product>, AppError> {
        let attribution = encode_attribution(input)?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            UPDATE products
            SET name = ?, price = ?, description = ?, category = ?, image = ?,
                image_attribution = ?, detailed_description = ?,
                stock_quantity = ?, low_stock_threshold = ?
            WHERE id = ?
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.description)
        .bind(input.category.as_str())
        .bind(&input.image)
        .bind(attribution)
        .bind(&input.detailed_description)
        .bind(input.stock_quantity)
        .bind(input.low_stock_threshold)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some(row) => {
                let reviews = self.reviews_for(id).await?;
                Ok(Some(Product::from_row(row, reviews)))
            }
            None => Ok(None),
        }
    }

    /// 删除商品，评价随之级联删除；已被订单引用的商品不可删除
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await;

        match result {
            Ok(done) => Ok(done.rows_affected() > 0),
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => Err(
                AppError::Conflict("Product is referenced by existing orders".to_string()),
            ),
            Err(e) => Err(e.into()),
        }
    }

    /// 补货
    pub async fn add_stock(&self, id: i64, quantity: i64) -> Result<Option<Product>, AppError> {
        let updated = sqlx::query(
            "UPDATE products SET stock_quantity = stock_quantity + ? WHERE id = ?",
        )
        .bind(quantity)
        .bind(id)
        .execute(&self.db)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    async fn reviews_for(&self, product_id: i64) -> Result<Vec<Review>, AppError> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT id, product_id, user_name, rating, comment, date FROM reviews WHERE product_id = ? ORDER BY id",
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(reviews)
    }

    async fn attach_reviews(&self, rows: Vec<ProductRow>) -> Result<Vec<Product>, AppError> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT id, product_id, user_name, rating, comment, date FROM reviews ORDER BY id",
        )
        .fetch_all(&self.db)
        .await?;

        let mut by_product: HashMap<i64, Vec<Review>> = HashMap::new();
        for review in reviews {
            by_product.entry(review.product_id).or_default().push(review);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let reviews = by_product.remove(&row.id).unwrap_or_default();
                Product::from_row(row, reviews)
            })
            .collect())
    }
}

fn encode_attribution(input: &ProductInput) -> Result<Option<String>, AppError> {
    input
        .image_attribution
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| AppError::internal(format!("Failed to encode image attribution: {}", e)))
}
