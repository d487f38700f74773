//! 订单

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use ims_common::{OrderId, PagedResult};
use ims_orders::Order;

use crate::dto::{ChangeStatusRequest, CreateOrderRequest, ListOrdersQuery};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create_order(
    State(state): State<AppState>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let Json(request) = body?;
    let order = state.orders.create_order(request.into_new_order()?).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn list_orders(
    State(state): State<AppState>,
    query: Result<Query<ListOrdersQuery>, QueryRejection>,
) -> ApiResult<Json<PagedResult<Order>>> {
    let Query(query) = query?;
    query.validate()?;
    let page = state
        .orders
        .list_orders(query.page(), query.page_size())
        .await?;
    Ok(Json(page))
}

pub async fn get_order(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Order>> {
    let Path(id) = id?;
    Ok(Json(state.orders.get_order(OrderId(id)).await?))
}

pub async fn change_status(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<ChangeStatusRequest>, JsonRejection>,
) -> ApiResult<Json<Order>> {
    let Path(id) = id?;
    let Json(request) = body?;
    let status = request.status()?;
    Ok(Json(state.orders.change_status(OrderId(id), status).await?))
}

pub async fn delete_order(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    state.orders.delete_order(OrderId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
