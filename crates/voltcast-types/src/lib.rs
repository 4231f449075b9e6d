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

//! Shared data model for the VoltCast forecast dashboard.
//!
//! Everything here is plain data: the closed set of campus sectors, the two
//! inbound record shapes the forecast backend can return, the normalized
//! records the pipeline works on, and the forecast period selection.

pub mod forecast;
pub mod period;
pub mod sector;

pub use forecast::{
    DataSource, ForecastBatch, ForecastDayNormalized, ForecastEnvelope, ModelComparisonDay,
    ModelComparisonRaw, RawForecastDay, SectorForecastRaw,
};
pub use period::{DAY_PRESETS, ForecastPeriod, MAX_FORECAST_DAYS, MONTH_PRESETS, PeriodError};
pub use sector::{SECTOR_COUNT, Sector, SectorValues, UnknownSector};
