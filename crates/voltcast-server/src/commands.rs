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

//! Implementations of the CLI subcommands.

use crate::api::{self, AppState};
use crate::cli::PeriodArgs;
use crate::config::VoltcastConfig;
use crate::summary::{format_comparison, format_dashboard};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use voltcast_core::export::{CsvExport, export_csv};
use voltcast_core::{ComparisonView, DashboardView, ForecastSource, LoadedForecast};
use voltcast_types::ForecastPeriod;

impl PeriodArgs {
    /// Requested period, falling back to the configured sector default
    pub fn resolve(self, config: &VoltcastConfig) -> Result<ForecastPeriod> {
        match (self.months, self.days) {
            (Some(months), _) => Ok(ForecastPeriod::months(months)?),
            (None, Some(days)) => Ok(ForecastPeriod::days(days)?),
            (None, None) => config.dashboard.default_sector_period(),
        }
    }
}

async fn load(source: &dyn ForecastSource, period: ForecastPeriod) -> Result<LoadedForecast> {
    let batch = source
        .fetch(period)
        .await
        .with_context(|| format!("Failed to load forecast data for {period}"))?;
    Ok(LoadedForecast::from_batch(&batch))
}

pub async fn serve(config: &VoltcastConfig, source: Arc<dyn ForecastSource>) -> Result<()> {
    let state = AppState::new(source, config.dashboard.clone());
    let app = api::router(state);

    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("🌐 VoltCast listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Rendered summary of one forecast
pub async fn summary(source: &dyn ForecastSource, period: ForecastPeriod) -> Result<String> {
    let loaded = load(source, period).await?;
    Ok(match period {
        ForecastPeriod::Months(_) => {
            format_dashboard(period, loaded.source, &DashboardView::derive(&loaded.sectors))
        }
        ForecastPeriod::Days(_) => {
            format_comparison(period, loaded.source, &ComparisonView::derive(&loaded.models))
        }
    })
}

/// Writes the export into `dir`; `None` when there was nothing to export
pub async fn export(
    source: &dyn ForecastSource,
    period: ForecastPeriod,
    dir: &Path,
) -> Result<Option<PathBuf>> {
    let loaded = load(source, period).await?;
    let days = period.forecast_days();
    let export = match period {
        ForecastPeriod::Months(_) => export_csv(&loaded.sectors, days)?,
        ForecastPeriod::Days(_) => export_csv(&loaded.models, days)?,
    };

    export.map(|export| write_export(&export, dir)).transpose()
}

pub fn write_export(export: &CsvExport, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    let path = dir.join(&export.filename);
    std::fs::write(&path, &export.content)
        .with_context(|| format!("Failed to write export: {}", path.display()))?;
    info!(path = %path.display(), "Forecast exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use voltcast_core::{MockForecastSource, MockSeries};

    fn source() -> MockForecastSource {
        MockForecastSource::new(MockSeries::seeded(9))
    }

    #[test]
    fn test_resolve_period() {
        let config = VoltcastConfig::default();
        let none = PeriodArgs {
            months: None,
            days: None,
        };
        assert_eq!(none.resolve(&config).unwrap(), ForecastPeriod::Months(1));

        let days = PeriodArgs {
            months: None,
            days: Some(90),
        };
        assert_eq!(days.resolve(&config).unwrap(), ForecastPeriod::Days(90));

        let invalid = PeriodArgs {
            months: Some(12),
            days: None,
        };
        assert!(invalid.resolve(&config).is_err());
    }

    #[tokio::test]
    async fn test_summary_of_mock_sector_forecast() {
        let output = summary(&source(), ForecastPeriod::Months(1)).await.unwrap();
        assert!(output.contains("Forecast: 1 month (30 days)"));
        assert!(output.contains("Efficiency rate:"));
        assert!(output.contains("Staff Quarters"));
    }

    #[tokio::test]
    async fn test_export_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = export(&source(), ForecastPeriod::Days(30), dir.path())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(path.file_name().unwrap(), "forecast_30days.csv");
        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("date,ANN,LSTM,Hybrid"));
        assert_eq!(content.lines().count(), 31);
        assert!(!content.ends_with('\n'));
    }

    #[test]
    fn test_write_export_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("exports").join("daily");
        let export = CsvExport {
            filename: "forecast_90days.csv".to_owned(),
            mime_type: "text/csv",
            content: "a,b\n1,2".to_owned(),
        };
        let path = write_export(&export, &nested).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "a,b\n1,2");
    }
}
