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

use crate::errors::{ForecastError, ForecastResult};
use chrono::NaiveDate;
use reqwest::{Client, Response};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, error};
use voltcast_types::{ForecastEnvelope, ForecastPeriod, RawForecastDay};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Forecast backend REST client
#[derive(Debug, Clone)]
pub struct ForecastClient {
    base_url: String,
    client: Client,
}

impl ForecastClient {
    pub fn new(base_url: impl Into<String>) -> ForecastResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ForecastResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            return Err(ForecastError::ConfigError(
                "Forecast API base URL is empty".to_owned(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ForecastError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch raw forecast records for a period.
    ///
    /// Month periods are posted as `{"months": n}`, day periods are requested
    /// with a `days` query parameter. Both response layouts are accepted.
    pub async fn fetch(&self, period: ForecastPeriod) -> ForecastResult<Vec<RawForecastDay>> {
        let url = format!("{}/forecast", self.base_url);
        debug!("🔍 [FORECAST] Requesting {} from {}", period, url);

        let request = match period {
            ForecastPeriod::Months(months) => {
                self.client.post(&url).json(&json!({ "months": months }))
            }
            ForecastPeriod::Days(days) => self.client.get(&url).query(&[("days", days)]),
        };
        let response = request.send().await.map_err(ForecastError::from_request)?;
        let body = Self::success_body(response).await?;

        let envelope: ForecastEnvelope = serde_json::from_str(&body)?;
        let days = envelope.into_days();
        debug!("✅ [FORECAST] Received {} records for {}", days.len(), period);
        Ok(days)
    }

    /// Single-day prediction for `date`
    pub async fn predict(&self, date: NaiveDate) -> ForecastResult<RawForecastDay> {
        let url = format!("{}/predict", self.base_url);
        let date = date.format("%Y-%m-%d").to_string();
        debug!("🔍 [FORECAST] Predicting {}", date);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "date": date }))
            .send()
            .await
            .map_err(ForecastError::from_request)?;
        let body = Self::success_body(response).await?;

        let value: Value = serde_json::from_str(&body)?;
        if !value.is_object() {
            return Err(ForecastError::InvalidResponse(format!(
                "Expected a prediction object, got: {value}"
            )));
        }
        Ok(RawForecastDay::from(value))
    }

    /// True when the backend answers `{"status": "ok"}`
    pub async fn health(&self) -> ForecastResult<bool> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ForecastError::from_request)?;

        if !response.status().is_success() {
            debug!("Forecast API health check returned {}", response.status());
            return Ok(false);
        }

        let body: Value = response.json().await.map_err(ForecastError::from_request)?;
        Ok(body.get("status").and_then(Value::as_str) == Some("ok"))
    }

    async fn success_body(response: Response) -> ForecastResult<String> {
        let status = response.status();
        if status.is_success() {
            return response.text().await.map_err(ForecastError::from_request);
        }

        let message = response.text().await.unwrap_or_default();
        error!("❌ [FORECAST ERROR] Status {}: {}", status, message);
        Err(ForecastError::ApiError {
            status: status.as_u16(),
            message,
        })
    }
}
