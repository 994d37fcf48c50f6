use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use valuation_core::{
    constants::AUM_DECIMAL_PLACES,
    holdings::{AssetType, Holding, HoldingFilter, HoldingUpdate, NewHolding},
    pagination::Page,
};

use super::shared::{
    non_empty, page_request, parse_date, parse_date_optional, ApiJson, DecimalInput,
};
use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HoldingsQuery {
    portfolio: Option<String>,
    valuation_date: Option<String>,
    page: Option<i64>,
    rows: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewHoldingBody {
    portfolio_id: String,
    asset_name: String,
    asset_type: String,
    quantity: DecimalInput,
    unit_price: DecimalInput,
    valuation_date: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HoldingUpdateBody {
    portfolio_id: Option<String>,
    asset_name: Option<String>,
    asset_type: Option<String>,
    quantity: Option<DecimalInput>,
    unit_price: Option<DecimalInput>,
    valuation_date: Option<String>,
}

/// A holding as returned over HTTP, with its line value rounded to cents.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HoldingResponse {
    #[serde(flatten)]
    holding: Holding,
    total_value: Decimal,
}

impl From<Holding> for HoldingResponse {
    fn from(holding: Holding) -> Self {
        let total_value = holding
            .total_value()
            .round_dp_with_strategy(AUM_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
        Self {
            holding,
            total_value,
        }
    }
}

fn parse_asset_type(raw: &str) -> ApiResult<AssetType> {
    Ok(AssetType::from_str(raw.trim())?)
}

async fn search_holdings(
    State(state): State<Arc<AppState>>,
    Query(q): Query<HoldingsQuery>,
) -> ApiResult<Json<Page<HoldingResponse>>> {
    let filter = HoldingFilter {
        portfolio_id: non_empty(&q.portfolio).map(str::to_string),
        valuation_date: parse_date_optional(q.valuation_date.as_deref())?,
    };
    let page = page_request(q.page, q.rows)?;
    let holdings = state.holding_service.search_holdings(filter, page)?;
    Ok(Json(holdings.map(HoldingResponse::from)))
}

async fn create_holding(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<NewHoldingBody>,
) -> ApiResult<(StatusCode, Json<HoldingResponse>)> {
    let new_holding = NewHolding {
        id: None,
        portfolio_id: body.portfolio_id,
        asset_name: body.asset_name,
        asset_type: parse_asset_type(&body.asset_type)?,
        quantity: body.quantity.parse()?,
        unit_price: body.unit_price.parse()?,
        valuation_date: parse_date(&body.valuation_date)?,
    };
    let created = state.holding_service.create_holding(new_holding).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

async fn get_holding(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<HoldingResponse>> {
    let holding = state.holding_service.get_holding(&id)?;
    Ok(Json(holding.into()))
}

async fn update_holding(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<HoldingUpdateBody>,
) -> ApiResult<Json<HoldingResponse>> {
    let update = HoldingUpdate {
        id,
        portfolio_id: body.portfolio_id,
        asset_name: body.asset_name,
        asset_type: body.asset_type.as_deref().map(parse_asset_type).transpose()?,
        quantity: body.quantity.as_ref().map(DecimalInput::parse).transpose()?,
        unit_price: body.unit_price.as_ref().map(DecimalInput::parse).transpose()?,
        valuation_date: body.valuation_date.as_deref().map(parse_date).transpose()?,
    };
    let updated = state.holding_service.update_holding(update).await?;
    Ok(Json(updated.into()))
}

async fn delete_holding(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.holding_service.delete_holding(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/holdings", get(search_holdings).post(create_holding))
        .route(
            "/holdings/{id}",
            get(get_holding).put(update_holding).delete(delete_holding),
        )
}
