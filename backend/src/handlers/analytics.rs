//! HTTP handlers for inventory analytics

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::{AbcItem, ConsumptionPoint, ConsumptionTrend, MaterialCategory};
use crate::services::analytics::MaterialRecommendation;
use crate::services::InventoryAnalyticsService;
use crate::AppState;

#[derive(Deserialize)]
pub struct RecommendationQuery {
    pub months_back: Option<u32>,
}

#[derive(Deserialize)]
pub struct TrendInput {
    pub history: Vec<ConsumptionPoint>,
}

fn analytics_service(state: &AppState) -> AppResult<InventoryAnalyticsService<crate::db::PgStore>> {
    let params = state.config.analytics.params();
    shared::validate_analysis_params(&params).map_err(|msg| AppError::Configuration(msg.to_string()))?;
    Ok(InventoryAnalyticsService::new(state.store(), params))
}

/// ABC classification of current stock value
pub async fn get_abc_classification(State(state): State<AppState>) -> AppResult<Json<Vec<AbcItem>>> {
    let service = analytics_service(&state)?;
    let classes = service.abc_classification().await?;
    Ok(Json(classes))
}

/// Replenishment recommendation for a raw or packaging material
pub async fn get_material_recommendation(
    State(state): State<AppState>,
    Path((category, code)): Path<(String, String)>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<MaterialRecommendation>> {
    let category: MaterialCategory = category
        .parse()
        .map_err(|e: String| AppError::validation("category", &e))?;
    shared::validate_material_code(&code).map_err(|msg| AppError::validation("code", msg))?;

    let reporting = &state.config.reporting;
    let months_back = query.months_back.unwrap_or(reporting.default_months_back);
    shared::validate_months_back(months_back, reporting.max_months_back)
        .map_err(|msg| AppError::validation("months_back", msg))?;

    let service = analytics_service(&state)?;
    let recommendation = service
        .material_recommendation(category, code.trim(), months_back, Utc::now().date_naive())
        .await?;
    Ok(Json(recommendation))
}

/// Trend of a caller-supplied consumption history
pub async fn analyze_trend(Json(input): Json<TrendInput>) -> Json<ConsumptionTrend> {
    Json(shared::analyze_consumption_trend(&input.history))
}
