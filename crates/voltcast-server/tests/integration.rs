#![allow(clippy::float_cmp)]
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

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Value, json};

use voltcast_core::ForecastSource;
use voltcast_server::api::{self, AppState};
use voltcast_server::config::DashboardSettings;
use voltcast_types::{DataSource, ForecastBatch, ForecastPeriod, RawForecastDay};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

#[derive(Default)]
struct StubSource {
    fail: bool,
    empty: bool,
    unhealthy: bool,
    slow_period: Option<ForecastPeriod>,
}

fn sector_day(date: &str, generation: f64, hostels: f64, chiller: f64) -> RawForecastDay {
    RawForecastDay::from(json!({
        "date": date,
        "prediction": {
            "power_generation_by_solar_panels": generation,
            "consumption_Hostels": hostels,
            "consumption_Chiller plant": chiller
        }
    }))
}

fn model_day(date: &str, ann: f64, lstm: Option<f64>, hybrid: f64) -> RawForecastDay {
    RawForecastDay::from(json!({"date": date, "ANN": ann, "LSTM": lstm, "Hybrid": hybrid}))
}

#[async_trait]
impl ForecastSource for StubSource {
    async fn fetch(&self, period: ForecastPeriod) -> anyhow::Result<ForecastBatch> {
        if self.slow_period == Some(period) {
            tokio::time::sleep(Duration::from_millis(400)).await;
        }
        if self.fail {
            anyhow::bail!("connection refused");
        }

        let days = if self.empty {
            Vec::new()
        } else {
            match period {
                ForecastPeriod::Months(months) => {
                    let generation = f64::from(months) * 100.0;
                    vec![
                        sector_day("2024-01-01", generation, 300.0, 100.0),
                        sector_day("2024-01-02", generation, 300.0, 100.0),
                    ]
                }
                ForecastPeriod::Days(_) => vec![
                    model_day("2024-01-01", 100.0, Some(101.0), 99.5),
                    model_day("2024-01-02", 102.25, None, 100.0),
                ],
            }
        };

        Ok(ForecastBatch {
            period,
            source: DataSource::Remote,
            days,
        })
    }

    async fn predict(&self, date: NaiveDate) -> anyhow::Result<RawForecastDay> {
        if self.fail {
            anyhow::bail!("connection refused");
        }
        let date = date.format("%Y-%m-%d").to_string();
        Ok(sector_day(&date, 500.0, 200.0, 50.0))
    }

    async fn health_check(&self) -> anyhow::Result<bool> {
        Ok(!self.unhealthy)
    }

    fn name(&self) -> &str {
        "stub"
    }
}

struct TestServer {
    port: u16,
    client: reqwest::Client,
}

impl TestServer {
    async fn start(source: StubSource) -> Self {
        let state = AppState::new(Arc::new(source), DashboardSettings::default());
        let app = api::router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let port = listener.local_addr().expect("No local addr").port();

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            port,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request")
    }

    async fn get_json(&self, path: &str) -> (u16, Value) {
        let response = self.get(path).await;
        let status = response.status().as_u16();
        let body = response.json().await.expect("Response is not JSON");
        (status, body)
    }
}

// ---------------------------------------------------------------------------
// Sector dashboard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dashboard_returns_aggregated_view() {
    let server = TestServer::start(StubSource::default()).await;
    let (status, body) = server.get_json("/api/dashboard?months=1").await;

    assert_eq!(status, 200);
    assert_eq!(body["period"], json!({"months": 1}));
    assert_eq!(body["periodDays"], 30);
    assert_eq!(body["source"], "remote");
    assert!(body["loadedAt"].is_string());
    assert_eq!(
        body["presets"],
        json!([{"months": 1}, {"months": 3}, {"months": 6}])
    );

    let view = &body["view"];
    assert_eq!(view["recordCount"], 2);
    assert_eq!(view["totalGeneration"].as_f64(), Some(200.0));
    assert_eq!(view["totalConsumption"].as_f64(), Some(800.0));
    assert_eq!(view["efficiencyRate"].as_f64(), Some(25.0));

    let sectors = view["sectors"]["sectors"].as_array().unwrap();
    assert_eq!(sectors.len(), 5);
    assert_eq!(sectors[2]["sector"], "Hostels");
    assert_eq!(sectors[2]["percentage"].as_f64(), Some(75.0));
    assert_eq!(sectors[3]["label"], "Chiller\nPlants");
    assert_eq!(view["ticks"]["labels"], json!(["1/1"]));
}

#[tokio::test]
async fn dashboard_defaults_to_configured_period() {
    let server = TestServer::start(StubSource::default()).await;
    let (status, body) = server.get_json("/api/dashboard").await;

    assert_eq!(status, 200);
    assert_eq!(body["period"], json!({"months": 1}));
}

#[tokio::test]
async fn dashboard_rejects_invalid_period() {
    let server = TestServer::start(StubSource::default()).await;
    let (status, body) = server.get_json("/api/dashboard?months=9").await;

    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("between 1 and 6 months"));
}

#[tokio::test]
async fn dashboard_failure_is_reported_generically() {
    let server = TestServer::start(StubSource {
        fail: true,
        ..StubSource::default()
    })
    .await;

    let (status, body) = server.get_json("/api/dashboard?months=3").await;
    assert_eq!(status, 502);
    assert_eq!(body["error"], "Failed to load forecast data");

    let (_, current) = server.get_json("/api/dashboard/current").await;
    assert_eq!(current["status"], "failed");
    assert_eq!(current["period"], json!({"months": 3}));
}

// ---------------------------------------------------------------------------
// Current state
// ---------------------------------------------------------------------------

#[tokio::test]
async fn current_state_starts_idle() {
    let server = TestServer::start(StubSource::default()).await;
    let (status, body) = server.get_json("/api/dashboard/current").await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"status": "idle"}));
}

#[tokio::test]
async fn current_state_reflects_last_load() {
    let server = TestServer::start(StubSource::default()).await;
    server.get_json("/api/dashboard?months=3").await;

    let (_, current) = server.get_json("/api/dashboard/current").await;
    assert_eq!(current["status"], "loaded");
    assert_eq!(current["dashboard"]["totalGeneration"].as_f64(), Some(600.0));
    assert!(current["comparison"].is_null());
}

#[tokio::test]
async fn late_response_does_not_override_newer_selection() {
    let server = Arc::new(
        TestServer::start(StubSource {
            slow_period: Some(ForecastPeriod::Months(1)),
            ..StubSource::default()
        })
        .await,
    );

    let slow = {
        let server = Arc::clone(&server);
        tokio::spawn(async move { server.get_json("/api/dashboard?months=1").await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    let (status, _) = server.get_json("/api/dashboard?months=6").await;
    assert_eq!(status, 200);

    // the slow request still answers its caller
    let (slow_status, slow_body) = slow.await.unwrap();
    assert_eq!(slow_status, 200);
    assert_eq!(slow_body["period"], json!({"months": 1}));

    let (_, current) = server.get_json("/api/dashboard/current").await;
    assert_eq!(current["status"], "loaded");
    assert_eq!(current["period"], json!({"months": 6}));
}

// ---------------------------------------------------------------------------
// Model comparison
// ---------------------------------------------------------------------------

#[tokio::test]
async fn comparison_returns_latest_stats() {
    let server = TestServer::start(StubSource::default()).await;
    let (status, body) = server.get_json("/api/comparison?days=30").await;

    assert_eq!(status, 200);
    assert_eq!(body["period"], json!({"days": 30}));
    assert_eq!(
        body["presets"],
        json!([{"days": 30}, {"days": 90}, {"days": 180}])
    );

    let view = &body["view"];
    assert_eq!(view["pointCount"], 2);
    assert_eq!(view["latest"]["date"], "2024-01-02");
    assert_eq!(view["latest"]["ANN"].as_f64(), Some(102.25));
    assert!(view["latest"]["LSTM"].is_null());
}

#[tokio::test]
async fn comparison_rejects_too_many_days() {
    let server = TestServer::start(StubSource::default()).await;
    let (status, _) = server.get_json("/api/comparison?days=365").await;
    assert_eq!(status, 400);
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn export_serves_csv_download() {
    let server = TestServer::start(StubSource::default()).await;
    let response = server.get("/api/export?days=30").await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/csv"
    );
    assert_eq!(
        response.headers()["content-disposition"].to_str().unwrap(),
        "attachment; filename=\"forecast_30days.csv\""
    );

    let body = response.text().await.unwrap();
    assert_eq!(
        body,
        "date,ANN,LSTM,Hybrid\n\"2024-01-01\",100,101,99.5\n\"2024-01-02\",102.25,\"\",100"
    );
}

#[tokio::test]
async fn export_of_sector_forecast() {
    let server = TestServer::start(StubSource::default()).await;
    let response = server.get("/api/export?months=3").await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()["content-disposition"].to_str().unwrap(),
        "attachment; filename=\"forecast_90days.csv\""
    );
    let body = response.text().await.unwrap();
    assert_eq!(
        body.lines().next(),
        Some("date,generation,Staff Quarters,Academic Blocks,Hostels,Chiller Plants,STP")
    );
    assert_eq!(body.lines().count(), 3);
}

#[tokio::test]
async fn export_of_empty_dataset_is_no_content() {
    let server = TestServer::start(StubSource {
        empty: true,
        ..StubSource::default()
    })
    .await;
    let response = server.get("/api/export?days=90").await;

    assert_eq!(response.status().as_u16(), 204);
    assert!(response.headers().get("content-disposition").is_none());
}

// ---------------------------------------------------------------------------
// Single-day prediction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn predict_returns_normalized_day() {
    let server = TestServer::start(StubSource::default()).await;
    let (status, body) = server.get_json("/api/predict?date=2024-05-01").await;

    assert_eq!(status, 200);
    assert_eq!(body["date"], "2024-05-01");
    assert_eq!(body["generation"].as_f64(), Some(500.0));
    assert_eq!(body["consumptionBySector"]["Hostels"].as_f64(), Some(200.0));
    assert_eq!(body["consumptionBySector"]["STP"].as_f64(), Some(0.0));

    // predictions leave the dashboard state alone
    let (_, current) = server.get_json("/api/dashboard/current").await;
    assert_eq!(current["status"], "idle");
}

#[tokio::test]
async fn predict_rejects_malformed_date() {
    let server = TestServer::start(StubSource::default()).await;
    let (status, body) = server.get_json("/api/predict?date=01/05/2024").await;

    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("YYYY-MM-DD"));
}

#[tokio::test]
async fn predict_failure_is_bad_gateway() {
    let server = TestServer::start(StubSource {
        fail: true,
        ..StubSource::default()
    })
    .await;
    let (status, body) = server.get_json("/api/predict?date=2024-05-01").await;

    assert_eq!(status, 502);
    assert_eq!(body["error"], "Failed to load forecast data");
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_source_state() {
    let server = TestServer::start(StubSource::default()).await;
    let response = server.get("/health").await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");

    let degraded = TestServer::start(StubSource {
        unhealthy: true,
        ..StubSource::default()
    })
    .await;
    let response = degraded.get("/health").await;
    assert_eq!(response.status().as_u16(), 503);
    assert_eq!(response.text().await.unwrap(), "DEGRADED");
}
