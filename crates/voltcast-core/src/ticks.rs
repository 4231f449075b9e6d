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

//! X-axis tick selection for daily series.
//!
//! The density rule depends only on the series length N:
//! - N <= 31: every second point
//! - N <= 90: the first point plus every 1st and 15th of a month
//! - otherwise: six evenly spaced points including both ends

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use voltcast_types::{ForecastDayNormalized, ModelComparisonDay, RawForecastDay};

/// Longest series that still gets day/month labels and alternate ticks
pub const DAY_LABEL_MAX_POINTS: usize = 31;

/// Longest series that gets month anchor ticks
pub const MONTH_ANCHOR_MAX_POINTS: usize = 90;

pub const SPARSE_TICK_COUNT: usize = 6;

/// A point on a date axis
pub trait Dated {
    fn date(&self) -> &str;
}

impl Dated for ForecastDayNormalized {
    fn date(&self) -> &str {
        &self.date
    }
}

impl Dated for ModelComparisonDay {
    fn date(&self) -> &str {
        &self.date
    }
}

impl Dated for RawForecastDay {
    fn date(&self) -> &str {
        RawForecastDay::date(self)
    }
}

impl Dated for String {
    fn date(&self) -> &str {
        self
    }
}

/// Calendar day of an ISO date; a trailing time part is ignored
pub fn parse_day(date: &str) -> Option<NaiveDate> {
    let day = date.get(..10).unwrap_or(date);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Indices of the series points that get an axis label, ascending and unique
pub fn select_tick_indices<T: Dated>(series: &[T]) -> Vec<usize> {
    let len = series.len();
    if len == 0 {
        return Vec::new();
    }

    if len <= DAY_LABEL_MAX_POINTS {
        return (0..len).step_by(2).collect();
    }

    if len <= MONTH_ANCHOR_MAX_POINTS {
        return series
            .iter()
            .enumerate()
            .filter(|(index, point)| *index == 0 || is_month_anchor(point.date()))
            .map(|(index, _)| index)
            .collect();
    }

    evenly_spaced(len, SPARSE_TICK_COUNT.min(len))
}

fn is_month_anchor(date: &str) -> bool {
    parse_day(date).is_some_and(|day| day.day() == 1 || day.day() == 15)
}

#[expect(
    clippy::integer_division,
    reason = "tick positions are floored on purpose"
)]
fn evenly_spaced(len: usize, count: usize) -> Vec<usize> {
    if count <= 1 {
        return vec![0];
    }
    let mut indices: Vec<usize> = (0..count).map(|i| i * (len - 1) / (count - 1)).collect();
    indices.dedup();
    indices
}

/// How an axis label renders its date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelFormat {
    /// `day/month` without zero padding, e.g. `5/1`
    DayMonth,
    /// Abbreviated English month, e.g. `Jan`
    MonthName,
}

impl LabelFormat {
    pub fn for_len(len: usize) -> Self {
        if len == 0 || len > DAY_LABEL_MAX_POINTS {
            Self::MonthName
        } else {
            Self::DayMonth
        }
    }

    /// Unparseable dates are shown as-is
    pub fn format(self, date: &str) -> String {
        let Some(day) = parse_day(date) else {
            return date.to_owned();
        };
        match self {
            Self::DayMonth => format!("{}/{}", day.day(), day.month()),
            Self::MonthName => day.format("%b").to_string(),
        }
    }
}

/// Selected ticks of one series together with their labels
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisTicks {
    pub indices: Vec<usize>,
    pub labels: Vec<String>,
    pub format: LabelFormat,
}

impl AxisTicks {
    pub fn for_series<T: Dated>(series: &[T]) -> Self {
        let format = LabelFormat::for_len(series.len());
        let indices = select_tick_indices(series);
        let labels = indices
            .iter()
            .filter_map(|index| series.get(*index))
            .map(|point| format.format(point.date()))
            .collect();
        Self {
            indices,
            labels,
            format,
        }
    }
}
