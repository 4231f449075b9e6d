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

//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "voltcast")]
#[command(author, version, about = "VoltCast solar forecast dashboard")]
#[command(
    long_about = "Serves the solar generation and campus consumption dashboard API, and\n\
    prints or exports forecasts from the command line.\n\
    \nExamples:\n  \
    voltcast serve                          # Run the dashboard API\n  \
    voltcast summary --months 3             # Sector totals for three months\n  \
    voltcast export --days 90 --output-dir ./out"
)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short, global = true, default_value = "voltcast.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the dashboard HTTP API
    Serve(ServeArgs),

    /// Print a forecast summary to the terminal
    Summary(PeriodArgs),

    /// Write a forecast as CSV
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on, overrides the configuration
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Copy, Args)]
pub struct PeriodArgs {
    /// Forecast horizon in months (sector forecast, 1-6)
    #[arg(long, conflicts_with = "days")]
    pub months: Option<u32>,

    /// Forecast horizon in days (model comparison, 1-180)
    #[arg(long)]
    pub days: Option<u32>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Directory the CSV file is written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}
