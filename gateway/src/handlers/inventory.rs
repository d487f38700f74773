//! 库存流水

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use ims_common::ProductId;
use ims_inventory::{MovementType, StockMovement};

use crate::dto::{MovementsQuery, StockAdjustmentRequest};
use crate::error::ApiResult;
use crate::state::AppState;

async fn adjust(
    state: AppState,
    movement_type: MovementType,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<StockAdjustmentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<StockMovement>)> {
    let Path(id) = id?;
    let Json(request) = body?;
    request.validate()?;

    let product_id = ProductId(id);
    let inventory = &state.inventory;
    let movement = match movement_type {
        MovementType::Purchase => {
            inventory
                .purchase(product_id, request.quantity, request.reference, request.note)
                .await?
        }
        MovementType::Supply => {
            inventory
                .supply(product_id, request.quantity, request.reference, request.note)
                .await?
        }
        MovementType::Correction => {
            inventory
                .correct(product_id, request.quantity, request.reference, request.note)
                .await?
        }
    };
    Ok((StatusCode::CREATED, Json(movement)))
}

pub async fn purchase(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<StockAdjustmentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<StockMovement>)> {
    adjust(state, MovementType::Purchase, id, body).await
}

pub async fn supply(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<StockAdjustmentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<StockMovement>)> {
    adjust(state, MovementType::Supply, id, body).await
}

pub async fn correct(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<StockAdjustmentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<StockMovement>)> {
    adjust(state, MovementType::Correction, id, body).await
}

pub async fn list_movements(
    State(state): State<AppState>,
    query: Result<Query<MovementsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<StockMovement>>> {
    let Query(query) = query?;
    let movements = state
        .inventory
        .list_movements(query.product_id.map(ProductId))
        .await?;
    Ok(Json(movements))
}
