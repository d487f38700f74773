//! 订单聚合的数据库集成测试
//!
//! 需要 DATABASE_URL 指向可用的 PostgreSQL：`cargo test -- --ignored`

use std::time::Duration;

use ims_adapter_postgres::TransactionManager;
use ims_common::{OrderId, Pagination, ProductId};
use ims_errors::AppError;
use ims_orders::{NewOrder, OrderItem, OrderStatus, OrderStore, PostgresOrderStore};
use sqlx::PgPool;

fn store(pool: &PgPool) -> PostgresOrderStore {
    PostgresOrderStore::new(TransactionManager::new(pool.clone()), Duration::from_secs(5))
}

async fn insert_product(pool: &PgPool, name: &str) -> ProductId {
    let id: i64 = sqlx::query_scalar("INSERT INTO products (name, price) VALUES ($1, 9.99) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap();
    ProductId(id)
}

fn new_order(payment_reference: &str, items: Vec<OrderItem>) -> NewOrder {
    NewOrder {
        items,
        payment_reference: payment_reference.to_string(),
        customer_name: "Ada Lovelace".to_string(),
        customer_contact: "ada@example.com".to_string(),
    }
}

fn item(product_id: ProductId, quantity: i64) -> OrderItem {
    OrderItem {
        product_id,
        quantity,
    }
}

async fn count(pool: &PgPool, sql: &str) -> i64 {
    sqlx::query_scalar(sql).fetch_one(pool).await.unwrap()
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_create_order_returns_full_aggregate(pool: PgPool) {
    let store = store(&pool);
    let a = insert_product(&pool, "A").await;
    let b = insert_product(&pool, "B").await;

    let order = store
        .create(new_order("PAY-1", vec![item(b, 2), item(a, 1)]))
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_reference, "PAY-1");
    assert_eq!(order.items, vec![item(b, 2), item(a, 1)]);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_create_order_with_unknown_product_leaves_no_header(pool: PgPool) {
    let store = store(&pool);
    let a = insert_product(&pool, "A").await;

    let err = store
        .create(new_order("PAY-ATOMIC", vec![item(a, 1), item(ProductId(9_999), 1)]))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));

    let headers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE payment_reference = $1")
        .bind("PAY-ATOMIC")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(headers, 0);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM order_items").await, 0);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_get_order_is_idempotent(pool: PgPool) {
    let store = store(&pool);
    let a = insert_product(&pool, "A").await;
    let created = store
        .create(new_order("PAY-2", vec![item(a, 4)]))
        .await
        .unwrap();

    let first = store.get(created.id).await.unwrap().unwrap();
    let second = store.get(created.id).await.unwrap().unwrap();

    assert_eq!(first, second);
    assert_eq!(first, created);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_get_unknown_order_is_none(pool: PgPool) {
    let store = store(&pool);
    assert!(store.get(OrderId(12_345)).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_list_orders_pagination(pool: PgPool) {
    let store = store(&pool);
    let a = insert_product(&pool, "A").await;

    let mut created = Vec::new();
    for n in 1..=12 {
        let order = store
            .create(new_order(&format!("PAY-{}", n), vec![item(a, n)]))
            .await
            .unwrap();
        created.push(order.id);
    }

    let page = store.list(Pagination::new(2, 5).unwrap()).await.unwrap();

    assert_eq!(page.total, 12);
    assert_eq!(page.page, 2);
    assert_eq!(page.items.len(), 5);

    // 最新的排在最前：第 6~10 名对应第 7 个到第 3 个创建的订单
    let expected: Vec<OrderId> = created.iter().rev().skip(5).take(5).copied().collect();
    let actual: Vec<OrderId> = page.items.iter().map(|o| o.id).collect();
    assert_eq!(actual, expected);
    assert!(page.items.iter().all(|o| o.items.len() == 1));

    let last = store.list(Pagination::new(3, 5).unwrap()).await.unwrap();
    assert_eq!(last.items.len(), 2);
    let beyond = store.list(Pagination::new(4, 5).unwrap()).await.unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total, 12);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_list_orders_far_page_is_empty(pool: PgPool) {
    let store = store(&pool);
    let a = insert_product(&pool, "A").await;
    store.create(new_order("PAY-FAR", vec![item(a, 1)])).await.unwrap();

    let page = store
        .list(Pagination::new(u32::MAX, u32::MAX).unwrap())
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.total, 1);
    assert_eq!(page.page, u32::MAX);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_change_status_any_to_any(pool: PgPool) {
    let store = store(&pool);
    let a = insert_product(&pool, "A").await;
    let order = store.create(new_order("PAY-3", vec![item(a, 1)])).await.unwrap();

    let cancelled = store
        .change_status(order.id, OrderStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.items, order.items);

    // 没有状态机约束：已取消的订单可以回到 pending
    let reopened = store
        .change_status(order.id, OrderStatus::Pending)
        .await
        .unwrap();
    assert_eq!(reopened.status, OrderStatus::Pending);

    let err = store
        .change_status(OrderId(9_999), OrderStatus::Completed)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_delete_order_cascades_items(pool: PgPool) {
    let store = store(&pool);
    let a = insert_product(&pool, "A").await;
    let order = store
        .create(new_order("PAY-4", vec![item(a, 1), item(a, 2)]))
        .await
        .unwrap();

    assert!(store.delete(order.id).await.unwrap());
    assert!(!store.delete(order.id).await.unwrap());
    assert!(store.get(order.id).await.unwrap().is_none());
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM order_items").await, 0);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn test_deleting_product_cascades_order_items(pool: PgPool) {
    let store = store(&pool);
    let a = insert_product(&pool, "A").await;
    let b = insert_product(&pool, "B").await;
    let order = store
        .create(new_order("PAY-5", vec![item(a, 1), item(b, 2)]))
        .await
        .unwrap();

    sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(a.0)
        .execute(&pool)
        .await
        .unwrap();

    let reloaded = store.get(order.id).await.unwrap().unwrap();
    assert_eq!(reloaded.items, vec![item(b, 2)]);
}
