//! 数据库 schema 迁移
//!
//! SQL 文件位于工作区根目录的 `migrations/`，编译期嵌入。

use ims_adapter_postgres::Migration;

/// 按版本排列的全部迁移
pub fn migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "products",
            include_str!("../../migrations/0001_products.sql"),
        ),
        Migration::new(
            2,
            "stock_movements",
            include_str!("../../migrations/0002_stock_movements.sql"),
        ),
        Migration::new(
            3,
            "orders",
            include_str!("../../migrations/0003_orders.sql"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered_and_unique() {
        let migrations = migrations();
        let versions: Vec<i64> = migrations.iter().map(|m| m.version).collect();
        assert_eq!(versions, vec![1, 2, 3]);
    }

    #[test]
    fn test_migrations_create_expected_tables() {
        let sql: String = migrations().into_iter().map(|m| m.up_sql).collect();
        for table in ["products", "stock_movements", "orders", "order_items"] {
            assert!(
                sql.contains(&format!("CREATE TABLE IF NOT EXISTS {} ", table)),
                "missing table {}",
                table
            );
        }
        assert!(sql.contains("ON DELETE CASCADE"));
    }
}
