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

//! Terminal rendering of forecast views.

use comfy_table::{Attribute, Cell, CellAlignment, Table, presets::UTF8_FULL};
use std::fmt::Write;
use voltcast_core::view::format_stat;
use voltcast_core::{ComparisonView, DashboardView};
use voltcast_types::{DataSource, ForecastPeriod};

fn source_note(source: DataSource) -> &'static str {
    match source {
        DataSource::Remote => "forecast API",
        DataSource::Mock => "mock data (forecast API unavailable)",
    }
}

fn number_cell(value: String) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

pub fn sector_table(view: &DashboardView) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Sector").add_attribute(Attribute::Bold),
        Cell::new("Consumption\n(kWh)").add_attribute(Attribute::Bold),
        Cell::new("Share\n(%)").add_attribute(Attribute::Bold),
    ]);

    for total in &view.sectors.sectors {
        table.add_row(vec![
            Cell::new(total.sector.display_name()),
            number_cell(format!("{:.0}", total.total)),
            number_cell(format!("{:.1}", total.percentage)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        number_cell(format!("{:.0}", view.sectors.grand_total)),
        number_cell(if view.sectors.grand_total > 0.0 {
            "100.0".to_owned()
        } else {
            "0.0".to_owned()
        }),
    ]);
    table
}

/// Totals, efficiency and sector table of a dashboard view
pub fn format_dashboard(period: ForecastPeriod, source: DataSource, view: &DashboardView) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Forecast: {period} ({} days)", view.record_count);
    let _ = writeln!(output, "Source: {}", source_note(source));
    let _ = writeln!(
        output,
        "Solar generation: {:.0} kWh",
        view.total_generation
    );
    let _ = writeln!(
        output,
        "Total consumption: {:.0} kWh",
        view.total_consumption
    );
    let _ = writeln!(output, "Efficiency rate: {:.1}%", view.efficiency_rate);
    let _ = writeln!(output);
    let _ = write!(output, "{}", sector_table(view));
    output
}

/// Latest model values and the last few comparison rows
pub fn format_comparison(
    period: ForecastPeriod,
    source: DataSource,
    view: &ComparisonView,
) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Forecast: {period} ({} points)", view.point_count);
    let _ = writeln!(output, "Source: {}", source_note(source));
    if let Some(date) = &view.latest.date {
        let _ = writeln!(output, "Latest ({date}):");
    }
    for (model, value) in view.latest.cards() {
        let _ = writeln!(output, "  {model}: {value}");
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Date").add_attribute(Attribute::Bold),
        Cell::new("ANN").add_attribute(Attribute::Bold),
        Cell::new("LSTM").add_attribute(Attribute::Bold),
        Cell::new("Hybrid").add_attribute(Attribute::Bold),
    ]);
    let skip = view.records.len().saturating_sub(7);
    for day in view.records.iter().skip(skip) {
        table.add_row(vec![
            Cell::new(&day.date),
            number_cell(format_stat(day.ann)),
            number_cell(format_stat(day.lstm)),
            number_cell(format_stat(day.hybrid)),
        ]);
    }

    let _ = writeln!(output);
    let _ = write!(output, "{table}");
    output
}
