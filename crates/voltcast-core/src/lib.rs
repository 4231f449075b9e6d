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

//! Forecast pipeline: normalization, sector aggregation, efficiency, axis
//! ticks, CSV export, mock data, and the shared forecast state.

pub mod aggregate;
pub mod efficiency;
pub mod export;
pub mod mock;
pub mod normalize;
pub mod store;
pub mod ticks;
pub mod traits;
pub mod view;

pub use aggregate::{SectorBreakdown, SectorTotal, aggregate_sectors, total_generation};
pub use efficiency::efficiency_rate;
pub use export::{CsvExport, ExportError, ExportRecord, ToExportRecord, encode_csv, export_csv};
pub use mock::{MockForecastSource, MockSeries};
pub use normalize::{Normalize, NormalizedDay, NormalizedForecast, normalize_forecast};
pub use store::{FetchSequencer, FetchTicket, ForecastStore, LoadState, LoadedForecast};
pub use ticks::{AxisTicks, LabelFormat, select_tick_indices};
pub use traits::ForecastSource;
pub use view::{ComparisonView, DashboardView, LatestModelStats};
