// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of VoltCast.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! JSON and CSV endpoints of the dashboard.

use crate::config::DashboardSettings;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info};
use voltcast_core::export::{ExportError, export_csv};
use voltcast_core::{
    ComparisonView, ForecastSource, ForecastStore, LoadState, LoadedForecast, Normalize,
    NormalizedDay,
};
use voltcast_types::{DataSource, ForecastPeriod, PeriodError};

/// Message shown when the forecast backend fails and no fallback applies
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load forecast data";

/// Application state for web handlers
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn ForecastSource>,
    pub store: Arc<ForecastStore>,
    pub defaults: DashboardSettings,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("source", &self.source.name())
            .field("store", &self.store)
            .field("defaults", &self.defaults)
            .finish()
    }
}

impl AppState {
    pub fn new(source: Arc<dyn ForecastSource>, defaults: DashboardSettings) -> Self {
        Self {
            source,
            store: Arc::new(ForecastStore::new()),
            defaults,
        }
    }

    /// Fetches and normalizes a forecast, publishing it as the current state
    /// unless a newer request started meanwhile
    async fn load(&self, period: ForecastPeriod) -> Result<Arc<LoadedForecast>, ApiError> {
        let ticket = self.store.begin(period);
        match self.source.fetch(period).await {
            Ok(batch) => {
                let loaded = Arc::new(LoadedForecast::from_batch(&batch));
                if !self.store.complete(ticket, Arc::clone(&loaded)) {
                    debug!(%period, "Response superseded by a newer request");
                }
                Ok(loaded)
            }
            Err(err) => {
                self.store.fail(ticket, LOAD_FAILED_MESSAGE);
                error!(error = %err, %period, source = self.source.name(), "Forecast load failed");
                Err(ApiError::Upstream(err))
            }
        }
    }
}

/// A derived view together with the load it was derived from
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse<V> {
    pub period: ForecastPeriod,
    pub period_days: u32,
    pub source: DataSource,
    pub loaded_at: DateTime<Utc>,
    /// Periods offered by the period selector
    pub presets: Vec<ForecastPeriod>,
    pub view: V,
}

impl<V> ForecastResponse<V> {
    pub fn new(loaded: &LoadedForecast, view: V) -> Self {
        Self {
            period: loaded.period,
            period_days: loaded.period.forecast_days(),
            source: loaded.source,
            loaded_at: loaded.loaded_at,
            presets: loaded.period.presets_like(),
            view,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    InvalidPeriod(PeriodError),
    InvalidDate(String),
    Upstream(anyhow::Error),
    Export(ExportError),
}

impl From<PeriodError> for ApiError {
    fn from(err: PeriodError) -> Self {
        Self::InvalidPeriod(err)
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        Self::Export(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::InvalidPeriod(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::InvalidDate(date) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid date '{date}', expected YYYY-MM-DD"),
            ),
            Self::Upstream(_) => (StatusCode::BAD_GATEWAY, LOAD_FAILED_MESSAGE.to_owned()),
            Self::Export(err) => {
                error!("Failed to encode export: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Export failed".to_owned())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct MonthsQuery {
    pub months: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DaysQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub days: Option<u32>,
    pub months: Option<u32>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/dashboard", get(dashboard_handler))
        .route("/api/dashboard/current", get(current_handler))
        .route("/api/comparison", get(comparison_handler))
        .route("/api/export", get(export_handler))
        .route("/api/predict", get(predict_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Sector dashboard for `?months=n`
async fn dashboard_handler(
    State(state): State<AppState>,
    Query(query): Query<MonthsQuery>,
) -> Result<Response, ApiError> {
    let period = ForecastPeriod::months(query.months.unwrap_or(state.defaults.default_months))?;
    let loaded = state.load(period).await?;
    let view = state.store.view_of(&loaded);

    Ok(Json(ForecastResponse::new(&loaded, view.as_ref())).into_response())
}

/// Model comparison for `?days=n`
async fn comparison_handler(
    State(state): State<AppState>,
    Query(query): Query<DaysQuery>,
) -> Result<Response, ApiError> {
    let period = ForecastPeriod::days(query.days.unwrap_or(state.defaults.default_days))?;
    let loaded = state.load(period).await?;
    let view = ComparisonView::derive(&loaded.models);

    Ok(Json(ForecastResponse::new(&loaded, view)).into_response())
}

/// Latest state as seen by the dashboard, without fetching
async fn current_handler(State(state): State<AppState>) -> impl IntoResponse {
    let current = state.store.state();
    let body = match &current {
        LoadState::Idle => json!({ "status": current.status() }),
        LoadState::Loading { period } => json!({ "status": current.status(), "period": period }),
        LoadState::Failed { period, message } => json!({
            "status": current.status(),
            "period": period,
            "error": message,
        }),
        LoadState::Loaded(loaded) => {
            let dashboard = (!loaded.sectors.is_empty()).then(|| state.store.view_of(loaded));
            let comparison =
                (!loaded.models.is_empty()).then(|| ComparisonView::derive(&loaded.models));
            json!({
                "status": current.status(),
                "period": loaded.period,
                "source": loaded.source,
                "loadedAt": loaded.loaded_at,
                "dashboard": dashboard.as_deref(),
                "comparison": comparison,
            })
        }
    };
    Json(body)
}

/// CSV download of `?days=n` (model comparison) or `?months=n` (sector forecast)
async fn export_handler(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let period = match (query.months, query.days) {
        (Some(months), _) => ForecastPeriod::months(months)?,
        (None, days) => ForecastPeriod::days(days.unwrap_or(state.defaults.default_days))?,
    };
    let loaded = state.load(period).await?;
    let days = period.forecast_days();

    let export = match period {
        ForecastPeriod::Months(_) => export_csv(&loaded.sectors, days)?,
        ForecastPeriod::Days(_) => export_csv(&loaded.models, days)?,
    };
    let Some(export) = export else {
        info!(%period, "Nothing to export");
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(export.mime_type),
    );
    if let Ok(disposition) =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", export.filename))
    {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }

    info!(filename = %export.filename, bytes = export.content.len(), "Serving CSV export");
    Ok((headers, export.content).into_response())
}

/// Normalized single-day prediction for `?date=YYYY-MM-DD`, today when omitted.
///
/// Does not touch the dashboard state.
async fn predict_handler(
    State(state): State<AppState>,
    Query(query): Query<PredictQuery>,
) -> Result<Response, ApiError> {
    let date = match query.date {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| ApiError::InvalidDate(raw))?,
        None => Local::now().date_naive(),
    };

    let raw = state.source.predict(date).await.map_err(|err| {
        error!(error = %err, %date, source = state.source.name(), "Prediction failed");
        ApiError::Upstream(err)
    })?;
    debug!(%date, "Serving single-day prediction");

    Ok(match raw.normalize() {
        NormalizedDay::Sector(record) => Json(record).into_response(),
        NormalizedDay::ModelComparison(record) => Json(record).into_response(),
    })
}

/// Health check endpoint
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.source.health_check().await {
        Ok(true) => (StatusCode::OK, "OK"),
        Ok(false) => (StatusCode::SERVICE_UNAVAILABLE, "DEGRADED"),
        Err(err) => {
            debug!(error = %err, "Forecast source health check failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "ERROR")
        }
    }
}
