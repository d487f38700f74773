//! API 路由

use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{health, inventory, orders, products};
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(product_routes())
        .merge(inventory_routes())
        .merge(order_routes())
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/metrics", get(health::metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            post(products::create_product).get(products::list_products),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
}

fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/inventory/purchase/{id}", post(inventory::purchase))
        .route("/inventory/supply/{id}", post(inventory::supply))
        .route("/inventory/correct/{id}", post(inventory::correct))
        .route("/inventory/movements", get(inventory::list_movements))
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(orders::create_order).get(orders::list_orders))
        .route(
            "/orders/{id}",
            get(orders::get_order).delete(orders::delete_order),
        )
        .route("/orders/{id}/status", patch(orders::change_status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use ims_adapter_postgres::{PostgresConfig, TransactionManager, create_lazy_pool};
    use ims_bootstrap::HealthChecker;
    use ims_inventory::{InventoryService, PostgresProductCatalog, PostgresStockLedger};
    use ims_orders::{OrderService, PostgresOrderStore};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    /// 连接池惰性建立：校验失败的请求不会触达数据库
    fn test_app() -> Router {
        let pool = create_lazy_pool(&PostgresConfig::new("postgres://localhost/ims")).unwrap();
        let transactions = TransactionManager::new(pool.clone());
        let deadline = Duration::from_secs(1);

        let state = AppState {
            inventory: InventoryService::new(
                Arc::new(PostgresProductCatalog::new(transactions.clone(), deadline)),
                Arc::new(PostgresStockLedger::new(transactions.clone(), deadline)),
            ),
            orders: OrderService::new(Arc::new(PostgresOrderStore::new(transactions, deadline))),
            health: HealthChecker::new(pool),
            metrics: PrometheusBuilder::new().build_recorder().handle(),
        };
        app(state)
    }

    fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(request: Request<Body>) -> StatusCode {
        test_app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_health_is_ok_without_database() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        assert_eq!(send(request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_adjustment_rejects_zero_quantity() {
        for path in ["purchase", "supply", "correct"] {
            let request = json_request(
                Method::POST,
                &format!("/inventory/{}/1", path),
                r#"{"quantity":0}"#,
            );
            assert_eq!(send(request).await, StatusCode::BAD_REQUEST, "{}", path);
        }
    }

    #[tokio::test]
    async fn test_adjustment_rejects_non_numeric_id() {
        let request = json_request(Method::POST, "/inventory/supply/abc", r#"{"quantity":1}"#);
        assert_eq!(send(request).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_order_rejects_empty_items() {
        let request = json_request(
            Method::POST,
            "/orders",
            r#"{"items":[],"paymentReference":"PAY-1","customerName":"Ada","customerContact":"ada@example.com"}"#,
        );
        assert_eq!(send(request).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_order_rejects_malformed_json() {
        let request = json_request(Method::POST, "/orders", r#"{"items":"#);
        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/problem+json"
        );
    }

    #[tokio::test]
    async fn test_list_orders_rejects_page_zero() {
        let request = Request::builder()
            .uri("/orders?page=0&page_size=5")
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(request).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_change_status_rejects_unknown_status() {
        let request = json_request(Method::PATCH, "/orders/1/status", r#"{"status":"shipped"}"#);
        assert_eq!(send(request).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_product_rejects_zero_price() {
        let request = json_request(Method::POST, "/products", r#"{"name":"Widget","price":0}"#);
        assert_eq!(send(request).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let request = Request::builder().uri("/customers").body(Body::empty()).unwrap();
        assert_eq!(send(request).await, StatusCode::NOT_FOUND);
    }
}
