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

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};
use voltcast_core::MockSeries;
use voltcast_forecast::{FailurePolicy, ForecastClient, ForecastService};
use voltcast_types::ForecastPeriod;

/// Environment variable that overrides `forecast.base_url`
pub const API_URL_ENV: &str = "VOLTCAST_API_URL";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VoltcastConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub forecast: ForecastSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForecastSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Applies to every period when set; otherwise day periods fall back to
    /// mock data and month periods report the failure
    #[serde(default)]
    pub failure_policy: Option<FailurePolicy>,
    /// Fixed seed for reproducible mock data
    #[serde(default)]
    pub mock_seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardSettings {
    #[serde(default = "default_months")]
    pub default_months: u32,
    #[serde(default = "default_days")]
    pub default_days: u32,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    3000
}

fn default_base_url() -> String {
    voltcast_forecast::client::DEFAULT_BASE_URL.to_owned()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_months() -> u32 {
    1
}

fn default_days() -> u32 {
    30
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            failure_policy: None,
            mock_seed: None,
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            default_months: default_months(),
            default_days: default_days(),
        }
    }
}

impl DashboardSettings {
    pub fn default_sector_period(&self) -> Result<ForecastPeriod> {
        Ok(ForecastPeriod::months(self.default_months)?)
    }

    pub fn default_comparison_period(&self) -> Result<ForecastPeriod> {
        Ok(ForecastPeriod::days(self.default_days)?)
    }
}

impl VoltcastConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: Self =
            toml::from_str(&content).with_context(|| "Failed to parse config TOML")?;
        let config = config.with_api_url_override(std::env::var(API_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Like [`Self::from_file`], but a missing file yields the defaults
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            return Self::from_file(path);
        }

        warn!(path, "Config file not found, using defaults");
        let config = Self::default().with_api_url_override(std::env::var(API_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_api_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(base_url) = base_url.filter(|url| !url.trim().is_empty()) {
            info!(base_url = %base_url, "Forecast API URL overridden from environment");
            self.forecast.base_url = base_url;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.forecast.base_url.trim().is_empty() {
            bail!("forecast.base_url must be set");
        }
        if self.forecast.timeout_secs == 0 {
            bail!("forecast.timeout_secs must be greater than 0");
        }
        self.dashboard
            .default_sector_period()
            .context("dashboard.default_months is invalid")?;
        self.dashboard
            .default_comparison_period()
            .context("dashboard.default_days is invalid")?;
        Ok(())
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }

    /// Forecast source for this configuration
    pub fn build_service(&self) -> Result<ForecastService> {
        let client = ForecastClient::with_timeout(
            &self.forecast.base_url,
            Duration::from_secs(self.forecast.timeout_secs),
        )?;
        let mut service = ForecastService::new(client)
            .with_mock_series(MockSeries::with_seed(self.forecast.mock_seed));
        if let Some(policy) = self.forecast.failure_policy {
            service = service.with_policy(policy);
        }
        Ok(service)
    }
}
