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

use crate::client::ForecastClient;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use voltcast_core::{ForecastSource, MockSeries};
use voltcast_types::{DataSource, ForecastBatch, ForecastPeriod, RawForecastDay};

/// What to do when the backend cannot deliver a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Substitute a mock series and keep going
    MockFallback,
    /// Return the error to the caller
    Surface,
}

impl FailurePolicy {
    /// Model comparison falls back to mock data, the sector dashboard
    /// reports the failure
    pub fn default_for(period: ForecastPeriod) -> Self {
        match period {
            ForecastPeriod::Days(_) => Self::MockFallback,
            ForecastPeriod::Months(_) => Self::Surface,
        }
    }
}

/// Forecast source backed by the REST API
#[derive(Debug, Clone)]
pub struct ForecastService {
    client: ForecastClient,
    policy: Option<FailurePolicy>,
    mock: MockSeries,
}

impl ForecastService {
    pub fn new(client: ForecastClient) -> Self {
        Self {
            client,
            policy: None,
            mock: MockSeries::new(),
        }
    }

    /// Use one policy for every period instead of the per-period default
    #[must_use]
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    #[must_use]
    pub fn with_mock_series(mut self, mock: MockSeries) -> Self {
        self.mock = mock;
        self
    }

    pub fn policy_for(&self, period: ForecastPeriod) -> FailurePolicy {
        self.policy
            .unwrap_or_else(|| FailurePolicy::default_for(period))
    }

    pub fn client(&self) -> &ForecastClient {
        &self.client
    }
}

#[async_trait]
impl ForecastSource for ForecastService {
    async fn fetch(&self, period: ForecastPeriod) -> Result<ForecastBatch> {
        match self.client.fetch(period).await {
            Ok(days) => Ok(ForecastBatch {
                period,
                source: DataSource::Remote,
                days,
            }),
            Err(err) => match self.policy_for(period) {
                FailurePolicy::MockFallback => {
                    warn!(
                        error = %err,
                        %period,
                        "Forecast API unavailable, using mock data"
                    );
                    Ok(ForecastBatch {
                        period,
                        source: DataSource::Mock,
                        days: self.mock.for_period(period, Local::now().date_naive()),
                    })
                }
                FailurePolicy::Surface => {
                    error!(error = %err, %period, "Failed to load forecast data");
                    Err(err.into())
                }
            },
        }
    }

    async fn predict(&self, date: NaiveDate) -> Result<RawForecastDay> {
        Ok(self.client.predict(date).await?)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.client.health().await?)
    }

    fn name(&self) -> &str {
        "forecast-api"
    }
}
