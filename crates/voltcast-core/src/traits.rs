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

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use voltcast_types::{ForecastBatch, ForecastPeriod, RawForecastDay};

/// Generic source of forecast records
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Fetch the raw forecast for a period
    async fn fetch(&self, period: ForecastPeriod) -> Result<ForecastBatch>;

    /// Fetch the single-day prediction for `date`
    async fn predict(&self, date: NaiveDate) -> Result<RawForecastDay>;

    /// Check if the source is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get source name for logging
    fn name(&self) -> &str;
}
