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

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Longest forecast horizon the backend will produce, in days
pub const MAX_FORECAST_DAYS: u32 = 180;

pub const MONTH_PRESETS: [u32; 3] = [1, 3, 6];
pub const DAY_PRESETS: [u32; 3] = [30, 90, 180];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("Forecast period must be between 1 and 6 months, got {0}")]
    MonthsOutOfRange(u32),

    #[error("Forecast period must be between 1 and 180 days, got {0}")]
    DaysOutOfRange(u32),
}

/// Forecast horizon selected by the user.
///
/// The sector deployment asks for whole months, the model comparison
/// deployment asks for days. The variant also decides the request shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastPeriod {
    Months(u32),
    Days(u32),
}

impl ForecastPeriod {
    pub fn months(months: u32) -> Result<Self, PeriodError> {
        if (1..=6).contains(&months) {
            Ok(Self::Months(months))
        } else {
            Err(PeriodError::MonthsOutOfRange(months))
        }
    }

    pub fn days(days: u32) -> Result<Self, PeriodError> {
        if (1..=MAX_FORECAST_DAYS).contains(&days) {
            Ok(Self::Days(days))
        } else {
            Err(PeriodError::DaysOutOfRange(days))
        }
    }

    /// Number of daily records this period covers
    pub fn forecast_days(&self) -> u32 {
        match self {
            Self::Months(months) => months.saturating_mul(30).min(MAX_FORECAST_DAYS),
            Self::Days(days) => *days,
        }
    }

    /// Periods offered in the period selector
    pub fn presets_like(&self) -> Vec<Self> {
        match self {
            Self::Months(_) => MONTH_PRESETS.iter().map(|m| Self::Months(*m)).collect(),
            Self::Days(_) => DAY_PRESETS.iter().map(|d| Self::Days(*d)).collect(),
        }
    }
}

impl fmt::Display for ForecastPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Months(1) => write!(f, "1 month"),
            Self::Months(months) => write!(f, "{months} months"),
            Self::Days(days) => write!(f, "{days} days"),
        }
    }
}
