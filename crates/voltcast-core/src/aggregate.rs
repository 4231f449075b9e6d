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

use crate::efficiency::round_to_tenth;
use serde::Serialize;
use tracing::warn;
use voltcast_types::{ForecastDayNormalized, Sector, SectorValues};

/// Consumption of one sector summed over the period
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorTotal {
    pub sector: Sector,
    /// Bar chart label, may contain a line break
    pub label: String,
    pub color: &'static str,
    pub total: f64,
    /// Share of the grand total, one decimal place
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorBreakdown {
    /// One entry per sector, in display order
    pub sectors: Vec<SectorTotal>,
    pub grand_total: f64,
}

impl SectorBreakdown {
    pub fn total_for(&self, sector: Sector) -> f64 {
        self.sectors
            .iter()
            .find(|total| total.sector == sector)
            .map_or(0.0, |total| total.total)
    }
}

/// Share of `part` in `whole` as a percentage, 0 when `whole` is 0 or the
/// share cannot be represented
pub fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 || !whole.is_finite() {
        return 0.0;
    }
    let share = round_to_tenth(part / whole * 100.0);
    if share.is_finite() { share } else { 0.0 }
}

/// Sum of non-negative values, clamped to the largest finite `f64`
fn saturating_add(total: f64, value: f64) -> f64 {
    (total + value).min(f64::MAX)
}

/// Sums each sector over all days and computes its share of the grand total.
///
/// Totals saturate at `f64::MAX`. Percentages are then taken relative to the
/// largest sector, which keeps them summing to 100 even when the grand total
/// saturated.
pub fn aggregate_sectors(days: &[ForecastDayNormalized]) -> SectorBreakdown {
    let mut totals = SectorValues::default();
    for day in days {
        for (sector, value) in day.consumption_by_sector.iter() {
            totals.set(sector, saturating_add(totals.get(sector), value));
        }
    }

    let exact_total = totals.total();
    let (grand_total, scale) = if exact_total.is_finite() {
        (exact_total, 1.0)
    } else {
        warn!(
            records = days.len(),
            "Sector consumption overflows, saturating the grand total"
        );
        let largest = totals.iter().map(|(_, total)| total).fold(0.0, f64::max);
        (f64::MAX, largest)
    };
    let scaled_total: f64 = totals.iter().map(|(_, total)| total / scale).sum();

    let sectors = totals
        .iter()
        .map(|(sector, total)| SectorTotal {
            sector,
            label: sector.bar_label(),
            color: sector.color(),
            total,
            percentage: percentage_of(total / scale, scaled_total),
        })
        .collect();

    SectorBreakdown {
        sectors,
        grand_total,
    }
}

/// Generation summed over all days, clamped to the largest finite `f64`
pub fn total_generation(days: &[ForecastDayNormalized]) -> f64 {
    days.iter()
        .fold(0.0, |total, day| saturating_add(total, day.generation))
}
