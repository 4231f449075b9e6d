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

//! Synthetic forecast series used when the backend is unreachable.
//!
//! The shape is deterministic (a sinusoidal base per day) with pseudo-random
//! jitter on top. A fixed seed makes the whole series reproducible.

use crate::normalize::GENERATION_KEY;
use crate::traits::ForecastSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};
use std::f64::consts::PI;
use tracing::debug;
use voltcast_types::{
    DataSource, ForecastBatch, ForecastPeriod, ModelComparisonRaw, RawForecastDay, Sector,
    SectorForecastRaw,
};

const BASE_GENERATION: f64 = 1200.0;

fn base_consumption(sector: Sector) -> f64 {
    match sector {
        Sector::StaffQuarters => 800.0,
        Sector::AcademicBlocks => 1500.0,
        Sector::Hostels => 2200.0,
        Sector::ChillerPlants => 1800.0,
        Sector::Stp => 600.0,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn day_label(start: NaiveDate, offset: u32) -> String {
    (start + Duration::days(i64::from(offset)))
        .format("%Y-%m-%d")
        .to_string()
}

/// Mock series generator
#[derive(Debug, Clone, Copy, Default)]
pub struct MockSeries {
    seed: Option<u64>,
}

impl MockSeries {
    /// Unseeded generator, different jitter on every call
    pub fn new() -> Self {
        Self { seed: None }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn with_seed(seed: Option<u64>) -> Self {
        Self { seed }
    }

    fn rng(self) -> StdRng {
        self.seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
    }

    /// Series matching the request shape of `period`, starting at `start`
    pub fn for_period(self, period: ForecastPeriod, start: NaiveDate) -> Vec<RawForecastDay> {
        match period {
            ForecastPeriod::Months(_) => self.sector_forecast(period.forecast_days(), start),
            ForecastPeriod::Days(days) => self.model_comparison(days, start),
        }
    }

    /// Daily ANN/LSTM/Hybrid predictions around a slow sine wave
    pub fn model_comparison(self, days: u32, start: NaiveDate) -> Vec<RawForecastDay> {
        let mut rng = self.rng();
        (0..days)
            .map(|i| {
                let base = 100.0 + (f64::from(i) * 0.1).sin() * 20.0;
                RawForecastDay::ModelComparison(ModelComparisonRaw {
                    date: day_label(start, i),
                    ann: Some(Value::from(round2(base + rng.gen_range(-5.0..5.0)))),
                    lstm: Some(Value::from(round2(base + rng.gen_range(-4.0..4.0)))),
                    hybrid: Some(Value::from(round2(base + rng.gen_range(-3.0..3.0)))),
                })
            })
            .collect()
    }

    /// Daily generation and per-sector consumption over one seasonal cycle.
    ///
    /// Chiller load runs in antiphase to the other sectors.
    pub fn sector_forecast(self, days: u32, start: NaiveDate) -> Vec<RawForecastDay> {
        let mut rng = self.rng();
        let cycle = f64::from(days.max(1));
        (0..days)
            .map(|i| {
                let phase = f64::from(i) / cycle * 2.0 * PI;
                let mut prediction = Map::new();

                let generation =
                    BASE_GENERATION * (1.0 + 0.3 * phase.sin()) * rng.gen_range(0.8..1.2);
                prediction.insert(GENERATION_KEY.to_owned(), Value::from(generation.round()));

                for sector in Sector::all() {
                    let seasonal = match sector {
                        Sector::ChillerPlants => 1.0 + 0.4 * (phase + PI).sin(),
                        Sector::StaffQuarters
                        | Sector::AcademicBlocks
                        | Sector::Hostels
                        | Sector::Stp => 1.0 + 0.2 * phase.sin(),
                    };
                    let value = base_consumption(*sector) * seasonal * rng.gen_range(0.85..1.15);
                    prediction.insert(sector.raw_key().to_owned(), Value::from(value.round()));
                }

                RawForecastDay::Sector(SectorForecastRaw {
                    date: day_label(start, i),
                    prediction: Some(prediction),
                })
            })
            .collect()
    }
}

/// Forecast source that never touches the network
#[derive(Debug, Clone, Default)]
pub struct MockForecastSource {
    series: MockSeries,
}

impl MockForecastSource {
    pub fn new(series: MockSeries) -> Self {
        Self { series }
    }
}

#[async_trait]
impl ForecastSource for MockForecastSource {
    async fn fetch(&self, period: ForecastPeriod) -> Result<ForecastBatch> {
        let start = Local::now().date_naive();
        debug!(%period, %start, "Generating mock forecast");
        Ok(ForecastBatch {
            period,
            source: DataSource::Mock,
            days: self.series.for_period(period, start),
        })
    }

    async fn predict(&self, date: NaiveDate) -> Result<RawForecastDay> {
        self.series
            .sector_forecast(1, date)
            .into_iter()
            .next()
            .context("Mock series produced no record")
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "mock"
    }
}
