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

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use voltcast_server::cli::{Cli, Commands};
use voltcast_server::commands;
use voltcast_server::config::VoltcastConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("voltcast=info,voltcast_server=info,voltcast_core=info")
            }),
        )
        .init();

    let cli = Cli::parse();
    info!(path = %cli.config, "Loading configuration");
    let mut config = VoltcastConfig::load_or_default(&cli.config)?;

    let service = config.build_service()?;
    info!(base_url = %service.client().base_url(), "Forecast API configured");

    match cli.command {
        Commands::Serve(args) => {
            if let Some(port) = args.port {
                config.server.port = port;
            }
            commands::serve(&config, Arc::new(service)).await?;
        }
        Commands::Summary(args) => {
            let period = args.resolve(&config)?;
            println!("{}", commands::summary(&service, period).await?);
        }
        Commands::Export(args) => {
            let period = args.period.resolve(&config)?;
            match commands::export(&service, period, &args.output_dir).await? {
                Some(path) => println!("Exported {period} forecast to {}", path.display()),
                None => println!("No forecast data to export for {period}"),
            }
        }
    }

    Ok(())
}
