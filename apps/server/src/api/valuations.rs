use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use valuation_core::{
    pagination::Page,
    valuation::{
        NewValuationSnapshot, SnapshotFilter, SnapshotStatus, SnapshotUpdate, ValuationSnapshot,
    },
};

use super::shared::{non_empty, page_request, parse_date_optional, today, ApiJson};
use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotsQuery {
    portfolio: Option<String>,
    status: Option<String>,
    snapshot_date: Option<String>,
    page: Option<i64>,
    rows: Option<i64>,
}

fn default_recalculate() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewSnapshotBody {
    portfolio_id: String,
    /// Defaults to today.
    snapshot_date: Option<String>,
    status: Option<String>,
    notes: Option<String>,
    #[serde(default = "default_recalculate")]
    recalculate: bool,
}

#[derive(Deserialize)]
struct SnapshotUpdateBody {
    status: Option<String>,
    notes: Option<String>,
}

#[derive(Deserialize)]
struct StatusBody {
    status: String,
}

async fn search_snapshots(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SnapshotsQuery>,
) -> ApiResult<Json<Page<ValuationSnapshot>>> {
    let status = non_empty(&q.status)
        .map(SnapshotStatus::from_str)
        .transpose()?;
    let filter = SnapshotFilter {
        portfolio_id: non_empty(&q.portfolio).map(str::to_string),
        status,
        snapshot_date: parse_date_optional(q.snapshot_date.as_deref())?,
    };
    let page = page_request(q.page, q.rows)?;
    let snapshots = state.valuation_service.search_snapshots(filter, page)?;
    Ok(Json(snapshots))
}

async fn create_snapshot(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<NewSnapshotBody>,
) -> ApiResult<(StatusCode, Json<ValuationSnapshot>)> {
    let snapshot_date = parse_date_optional(body.snapshot_date.as_deref())?.unwrap_or_else(today);
    let snapshot = state
        .valuation_service
        .create_valuation_snapshot(NewValuationSnapshot {
            portfolio_id: body.portfolio_id,
            snapshot_date,
            status: body.status,
            notes: body.notes,
            recalculate: body.recalculate,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

async fn get_snapshot(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ValuationSnapshot>> {
    let snapshot = state.valuation_service.get_snapshot(&id)?;
    Ok(Json(snapshot))
}

async fn update_snapshot(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<SnapshotUpdateBody>,
) -> ApiResult<Json<ValuationSnapshot>> {
    let snapshot = state
        .valuation_service
        .update_snapshot(SnapshotUpdate {
            id,
            status: body.status,
            notes: body.notes,
        })
        .await?;
    Ok(Json(snapshot))
}

async fn delete_snapshot(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.valuation_service.delete_snapshot(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn recalculate_snapshot(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ValuationSnapshot>> {
    let snapshot = state.valuation_service.recalculate_snapshot_aum(&id).await?;
    Ok(Json(snapshot))
}

async fn update_snapshot_status(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<StatusBody>,
) -> ApiResult<Json<ValuationSnapshot>> {
    let snapshot = state
        .valuation_service
        .update_snapshot_status(&id, &body.status)
        .await?;
    Ok(Json(snapshot))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/valuations", get(search_snapshots).post(create_snapshot))
        .route(
            "/valuations/{id}",
            get(get_snapshot)
                .put(update_snapshot)
                .delete(delete_snapshot),
        )
        .route(
            "/valuations/{id}/recalculate",
            post(recalculate_snapshot),
        )
        .route("/valuations/{id}/status", patch(update_snapshot_status))
}
