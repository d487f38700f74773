//! 产品目录 PostgreSQL 实现

use std::time::Duration;

use async_trait::async_trait;
use ims_adapter_postgres::{TransactionManager, TransactionOptions, map_sqlx_error};
use ims_common::ProductId;
use ims_errors::AppResult;
use tracing::info;

use crate::domain::{NewProduct, Product, ProductCatalog, ProductDetails};

use super::rows::ProductRow;

#[derive(Debug, Clone)]
pub struct PostgresProductCatalog {
    transactions: TransactionManager,
    deadline: Duration,
}

impl PostgresProductCatalog {
    pub fn new(transactions: TransactionManager, deadline: Duration) -> Self {
        Self {
            transactions,
            deadline,
        }
    }

    /// 返回使用另一截止时间的句柄
    pub fn with_deadline(&self, deadline: Duration) -> Self {
        Self {
            transactions: self.transactions.clone(),
            deadline,
        }
    }

    fn options(&self) -> TransactionOptions {
        TransactionOptions::new().with_timeout(self.deadline)
    }
}

#[async_trait]
impl ProductCatalog for PostgresProductCatalog {
    async fn create(&self, product: NewProduct) -> AppResult<Product> {
        product.validate()?;

        let created = self
            .transactions
            .run("product_create", &self.options(), move |conn| {
                Box::pin(async move {
                    let details = &product.details;
                    let row = sqlx::query_as::<_, ProductRow>(
                        r#"
                        INSERT INTO products (
                            name, sku, description, price,
                            reorder_level, reorder_quantity, stock_quantity
                        ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                        RETURNING id, name, sku, description, price,
                                  reorder_level, reorder_quantity, stock_quantity, created_at
                        "#,
                    )
                    .bind(&details.name)
                    .bind(&details.sku)
                    .bind(&details.description)
                    .bind(details.price)
                    .bind(details.reorder_level)
                    .bind(details.reorder_quantity)
                    .bind(product.initial_quantity)
                    .fetch_one(&mut *conn)
                    .await
                    .map_err(map_sqlx_error)?;

                    Ok(Product::from(row))
                })
            })
            .await?;

        info!(product_id = %created.id, name = %created.name, "Product created");
        Ok(created)
    }

    async fn get(&self, id: ProductId) -> AppResult<Option<Product>> {
        let options = self.options().read_only();

        self.transactions
            .run("product_get", &options, move |conn| {
                Box::pin(async move {
                    let row = sqlx::query_as::<_, ProductRow>(
                        r#"
                        SELECT id, name, sku, description, price,
                               reorder_level, reorder_quantity, stock_quantity, created_at
                        FROM products
                        WHERE id = $1
                        "#,
                    )
                    .bind(id.0)
                    .fetch_optional(&mut *conn)
                    .await
                    .map_err(map_sqlx_error)?;

                    Ok(row.map(Product::from))
                })
            })
            .await
    }

    async fn list(&self, ids: Vec<ProductId>) -> AppResult<Vec<Product>> {
        let ids: Vec<i64> = ids.into_iter().map(|id| id.0).collect();
        let options = self.options().read_only();

        self.transactions
            .run("product_list", &options, move |conn| {
                Box::pin(async move {
                    let rows = sqlx::query_as::<_, ProductRow>(
                        r#"
                        SELECT id, name, sku, description, price,
                               reorder_level, reorder_quantity, stock_quantity, created_at
                        FROM products
                        WHERE cardinality($1::BIGINT[]) = 0 OR id = ANY($1)
                        ORDER BY id ASC
                        "#,
                    )
                    .bind(&ids)
                    .fetch_all(&mut *conn)
                    .await
                    .map_err(map_sqlx_error)?;

                    Ok(rows.into_iter().map(Product::from).collect())
                })
            })
            .await
    }

    async fn update(&self, id: ProductId, details: ProductDetails) -> AppResult<Option<Product>> {
        details.validate()?;

        let updated = self
            .transactions
            .run("product_update", &self.options(), move |conn| {
                Box::pin(async move {
                    let row = sqlx::query_as::<_, ProductRow>(
                        r#"
                        UPDATE products
                        SET name = $2, sku = $3, description = $4, price = $5,
                            reorder_level = $6, reorder_quantity = $7
                        WHERE id = $1
                        RETURNING id, name, sku, description, price,
                                  reorder_level, reorder_quantity, stock_quantity, created_at
                        "#,
                    )
                    .bind(id.0)
                    .bind(&details.name)
                    .bind(&details.sku)
                    .bind(&details.description)
                    .bind(details.price)
                    .bind(details.reorder_level)
                    .bind(details.reorder_quantity)
                    .fetch_optional(&mut *conn)
                    .await
                    .map_err(map_sqlx_error)?;

                    Ok(row.map(Product::from))
                })
            })
            .await?;

        if let Some(product) = &updated {
            info!(product_id = %product.id, "Product updated");
        }
        Ok(updated)
    }

    async fn delete(&self, id: ProductId) -> AppResult<bool> {
        let deleted = self
            .transactions
            .run("product_delete", &self.options(), move |conn| {
                Box::pin(async move {
                    let result = sqlx::query("DELETE FROM products WHERE id = $1")
                        .bind(id.0)
                        .execute(&mut *conn)
                        .await
                        .map_err(map_sqlx_error)?;

                    Ok(result.rows_affected() > 0)
                })
            })
            .await?;

        if deleted {
            info!(product_id = %id, "Product deleted");
        }
        Ok(deleted)
    }
}
