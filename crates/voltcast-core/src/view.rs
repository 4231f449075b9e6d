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

//! View-models derived from normalized records.

use crate::aggregate::{SectorBreakdown, aggregate_sectors, total_generation};
use crate::efficiency::efficiency_rate;
use crate::ticks::AxisTicks;
use serde::Serialize;
use voltcast_types::{ForecastDayNormalized, ModelComparisonDay};

/// One point of the solar generation chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarPoint {
    pub date: String,
    pub generation: f64,
}

/// Everything the sector dashboard renders for one loaded forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub record_count: usize,
    pub solar_series: Vec<SolarPoint>,
    pub daily_consumption: Vec<ForecastDayNormalized>,
    pub sectors: SectorBreakdown,
    pub total_generation: f64,
    pub total_consumption: f64,
    /// Generation over consumption in percent, one decimal place
    pub efficiency_rate: f64,
    pub ticks: AxisTicks,
}

impl DashboardView {
    pub fn derive(records: &[ForecastDayNormalized]) -> Self {
        let sectors = aggregate_sectors(records);
        let total_generation = total_generation(records);
        let total_consumption = sectors.grand_total;

        Self {
            record_count: records.len(),
            solar_series: records
                .iter()
                .map(|day| SolarPoint {
                    date: day.date.clone(),
                    generation: day.generation,
                })
                .collect(),
            daily_consumption: records.to_vec(),
            efficiency_rate: efficiency_rate(total_generation, total_consumption),
            total_generation,
            total_consumption,
            sectors,
            ticks: AxisTicks::for_series(records),
        }
    }
}

/// Latest value of each model, `None` renders as "N/A"
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LatestModelStats {
    pub date: Option<String>,
    #[serde(rename = "ANN")]
    pub ann: Option<f64>,
    #[serde(rename = "LSTM")]
    pub lstm: Option<f64>,
    #[serde(rename = "Hybrid")]
    pub hybrid: Option<f64>,
}

impl LatestModelStats {
    pub fn from_series(records: &[ModelComparisonDay]) -> Self {
        records.last().map_or_else(Self::default, |latest| Self {
            date: Some(latest.date.clone()),
            ann: latest.ann,
            lstm: latest.lstm,
            hybrid: latest.hybrid,
        })
    }

    /// `(model, rendered value)` pairs for stat cards
    pub fn cards(&self) -> [(&'static str, String); 3] {
        [
            ("ANN", format_stat(self.ann)),
            ("LSTM", format_stat(self.lstm)),
            ("Hybrid", format_stat(self.hybrid)),
        ]
    }
}

/// Two decimals, or "N/A" when the model delivered nothing
pub fn format_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_owned(), |v| format!("{v:.2}"))
}

/// Everything the model comparison page renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonView {
    pub point_count: usize,
    pub records: Vec<ModelComparisonDay>,
    pub latest: LatestModelStats,
    pub ticks: AxisTicks,
}

impl ComparisonView {
    pub fn derive(records: &[ModelComparisonDay]) -> Self {
        Self {
            point_count: records.len(),
            records: records.to_vec(),
            latest: LatestModelStats::from_series(records),
            ticks: AxisTicks::for_series(records),
        }
    }
}
