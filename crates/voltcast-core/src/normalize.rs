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

//! Turning backend records into canonical per-day records.
//!
//! Missing or `null` numbers become 0 without noise. Values that are present
//! but not numeric also become 0 and are logged, so a backend regression shows
//! up in the logs instead of as a silently flat chart.

use serde_json::Value;
use tracing::warn;
use voltcast_types::{
    ForecastDayNormalized, ModelComparisonDay, ModelComparisonRaw, RawForecastDay,
    SectorForecastRaw, SectorValues,
};

/// Key of the solar generation value inside a `prediction` object
pub const GENERATION_KEY: &str = "power_generation_by_solar_panels";

/// Conversion into a canonical record.
///
/// Implemented for the raw shapes and for the canonical records themselves,
/// so normalizing an already normalized record returns it unchanged.
pub trait Normalize {
    type Output;

    fn normalize(&self) -> Self::Output;
}

/// A normalized record of either deployment
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedDay {
    Sector(ForecastDayNormalized),
    ModelComparison(ModelComparisonDay),
}

/// A normalized batch, split by record kind with input order kept
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedForecast {
    pub sectors: Vec<ForecastDayNormalized>,
    pub models: Vec<ModelComparisonDay>,
}

pub fn normalize_forecast(days: &[RawForecastDay]) -> NormalizedForecast {
    let mut normalized = NormalizedForecast::default();
    for day in days {
        match day.normalize() {
            NormalizedDay::Sector(record) => normalized.sectors.push(record),
            NormalizedDay::ModelComparison(record) => normalized.models.push(record),
        }
    }
    normalized
}

/// Reads a JSON scalar as a finite number.
///
/// `None` for missing and `null`; malformed values are logged and also `None`.
fn coerce_number(value: Option<&Value>, field: &str, date: &str) -> Option<f64> {
    let raw = value?;
    let parsed = match raw {
        Value::Null => return None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    };

    match parsed {
        Some(number) if number.is_finite() => Some(number),
        _ => {
            warn!(field, date, value = %raw, "Non-numeric forecast value, using 0");
            None
        }
    }
}

fn non_negative(value: f64, field: &str, date: &str) -> f64 {
    if !value.is_finite() {
        warn!(field, date, "Non-finite forecast value, using 0");
        return 0.0;
    }
    if value < 0.0 {
        warn!(field, date, value, "Negative forecast value clamped to 0");
        return 0.0;
    }
    value
}

fn sector_field(value: Option<&Value>, field: &str, date: &str) -> f64 {
    coerce_number(value, field, date).map_or(0.0, |v| non_negative(v, field, date))
}

impl Normalize for SectorForecastRaw {
    type Output = ForecastDayNormalized;

    fn normalize(&self) -> ForecastDayNormalized {
        let prediction = self.prediction.as_ref();
        let lookup = |key: &str| prediction.and_then(|p| p.get(key));

        ForecastDayNormalized {
            date: self.date.clone(),
            generation: sector_field(lookup(GENERATION_KEY), GENERATION_KEY, &self.date),
            consumption_by_sector: SectorValues::from_fn(|sector| {
                sector_field(lookup(sector.raw_key()), sector.raw_key(), &self.date)
            }),
        }
    }
}

impl Normalize for ForecastDayNormalized {
    type Output = ForecastDayNormalized;

    fn normalize(&self) -> ForecastDayNormalized {
        ForecastDayNormalized {
            date: self.date.clone(),
            generation: non_negative(self.generation, GENERATION_KEY, &self.date),
            consumption_by_sector: SectorValues::from_fn(|sector| {
                non_negative(
                    self.consumption_by_sector.get(sector),
                    sector.raw_key(),
                    &self.date,
                )
            }),
        }
    }
}

impl Normalize for ModelComparisonRaw {
    type Output = ModelComparisonDay;

    fn normalize(&self) -> ModelComparisonDay {
        ModelComparisonDay {
            date: self.date.clone(),
            ann: coerce_number(self.ann.as_ref(), "ANN", &self.date),
            lstm: coerce_number(self.lstm.as_ref(), "LSTM", &self.date),
            hybrid: coerce_number(self.hybrid.as_ref(), "Hybrid", &self.date),
        }
    }
}

impl Normalize for ModelComparisonDay {
    type Output = ModelComparisonDay;

    fn normalize(&self) -> ModelComparisonDay {
        let finite = |value: Option<f64>| value.filter(|v| v.is_finite());
        ModelComparisonDay {
            date: self.date.clone(),
            ann: finite(self.ann),
            lstm: finite(self.lstm),
            hybrid: finite(self.hybrid),
        }
    }
}

impl Normalize for RawForecastDay {
    type Output = NormalizedDay;

    fn normalize(&self) -> NormalizedDay {
        match self {
            Self::Sector(raw) => NormalizedDay::Sector(raw.normalize()),
            Self::ModelComparison(raw) => NormalizedDay::ModelComparison(raw.normalize()),
        }
    }
}
