use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use valuation_core::{
    pagination::Page,
    portfolios::{NewPortfolio, Portfolio, PortfolioDetail, PortfolioUpdate},
    statistics::PortfolioStatistics,
};

use super::shared::{non_empty, page_request, parse_date_optional, today, ApiJson};
use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
struct SearchQuery {
    search: Option<String>,
    page: Option<i64>,
    rows: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PortfolioUpdateBody {
    name: Option<String>,
    client_name: Option<String>,
    client_email: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct AumQuery {
    date: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AumResponse {
    portfolio_id: String,
    valuation_date: NaiveDate,
    total_aum: Decimal,
}

async fn search_portfolios(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> ApiResult<Json<Page<Portfolio>>> {
    let page = page_request(q.page, q.rows)?;
    let portfolios = state
        .portfolio_service
        .search_portfolios(non_empty(&q.search), page)?;
    Ok(Json(portfolios))
}

async fn create_portfolio(
    State(state): State<Arc<AppState>>,
    ApiJson(new_portfolio): ApiJson<NewPortfolio>,
) -> ApiResult<(StatusCode, Json<Portfolio>)> {
    let created = state
        .portfolio_service
        .create_portfolio(new_portfolio)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_portfolio(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PortfolioDetail>> {
    let detail = state.portfolio_service.get_portfolio_detail(&id)?;
    Ok(Json(detail))
}

async fn update_portfolio(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<PortfolioUpdateBody>,
) -> ApiResult<Json<Portfolio>> {
    let updated = state
        .portfolio_service
        .update_portfolio(PortfolioUpdate {
            id,
            name: body.name,
            client_name: body.client_name,
            client_email: body.client_email,
            description: body.description,
        })
        .await?;
    Ok(Json(updated))
}

async fn delete_portfolio(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.portfolio_service.delete_portfolio(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_portfolio_statistics(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PortfolioStatistics>> {
    let stats = state.statistics_service.get_portfolio_statistics(&id)?;
    Ok(Json(stats))
}

async fn calculate_portfolio_aum(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(q): Query<AumQuery>,
) -> ApiResult<Json<AumResponse>> {
    let valuation_date = parse_date_optional(q.date.as_deref())?.unwrap_or_else(today);
    let total_aum = state
        .valuation_service
        .calculate_portfolio_aum(&id, valuation_date)?;
    Ok(Json(AumResponse {
        portfolio_id: id,
        valuation_date,
        total_aum,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/portfolios",
            get(search_portfolios).post(create_portfolio),
        )
        .route(
            "/portfolios/{id}",
            get(get_portfolio)
                .put(update_portfolio)
                .delete(delete_portfolio),
        )
        .route(
            "/portfolios/{id}/statistics",
            get(get_portfolio_statistics),
        )
        .route("/portfolios/{id}/aum", get(calculate_portfolio_aum))
}
