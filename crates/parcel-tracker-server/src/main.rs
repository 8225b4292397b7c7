// Copyright 2026 Parcel Tracker Contributors
// SPDX-License-Identifier: Apache-2.0

//! Parcel Tracker entry point.

use std::sync::Arc;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use parcel_tracker::{supports_realtime, CarrierId, Orchestrator, TrackRequest, TrackingResult};
use parcel_tracker_server::config::{resolve_addr, resolve_engine_config};
use parcel_tracker_server::logging::init_tracing;
use parcel_tracker_server::rest;

#[derive(Parser)]
#[command(
    name = "parcel-tracker",
    about = "Track parcels across Korean carriers with deadline-bounded fallback",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Global lookup deadline in milliseconds.
    /// Also reads PARCEL_TRACKER_DEADLINE_MS.
    #[arg(long, global = true)]
    deadline_ms: Option<u64>,

    /// Seed for synthetic fallback data.
    /// Also reads PARCEL_TRACKER_SEED.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the REST API (default).
    Serve {
        /// Listen address (host:port). Also reads PARCEL_TRACKER_ADDR.
        #[arg(long)]
        addr: Option<String>,
    },

    /// Look up one tracking number and print the result.
    Track {
        /// Carrier id, e.g. cjkoreaexpress or koreapost.
        carrier: String,

        /// Tracking number.
        number: String,

        /// Print the raw JSON result.
        #[arg(long)]
        json: bool,
    },

    /// List supported carriers.
    Carriers,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   parcel-tracker completions bash > ~/.local/share/bash-completion/completions/parcel-tracker
    ///   parcel-tracker completions zsh > ~/.zfunc/_parcel-tracker
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json);

    let config = resolve_engine_config(cli.deadline_ms, cli.seed);

    match cli.command.unwrap_or(Commands::Serve { addr: None }) {
        Commands::Serve { addr } => {
            let addr = resolve_addr(addr.as_deref());
            let orchestrator = Arc::new(Orchestrator::new(config));
            rest::serve(&addr, orchestrator)
                .await
                .with_context(|| format!("REST API on {addr} failed"))?;
        }

        Commands::Track {
            carrier,
            number,
            json,
        } => {
            let id = match TrackRequest::new(carrier, number).validate() {
                Ok(id) => id,
                Err(e) => {
                    eprintln!("Error: {}", e.user_message());
                    std::process::exit(2);
                }
            };

            let result = Orchestrator::new(config).track(&id).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&id.tracking_number, &result);
            }
        }

        Commands::Carriers => {
            for carrier in CarrierId::ALL {
                let mode = if supports_realtime(carrier) {
                    "realtime"
                } else {
                    "estimated"
                };
                println!("{:<16} {:<10} {}", carrier.as_str(), mode, carrier.display_name());
            }
        }

        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "parcel-tracker",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

fn print_result(number: &str, result: &TrackingResult) {
    let kst = parcel_tracker::kst();

    println!("{} {}", result.carrier.display_name(), number);
    println!(
        "  status:   {} ({})",
        result.current_status.label(),
        result.current_status.as_str()
    );
    if let Some(location) = &result.current_location {
        println!("  location: {location}");
    }
    if let Some(at) = result.delivered_at {
        println!("  delivered {}", at.with_timezone(&kst).format("%Y-%m-%d %H:%M"));
    } else if let Some(eta) = result.estimated_delivery {
        println!("  eta:      {}", eta.with_timezone(&kst).format("%Y-%m-%d %H:%M"));
    }
    if let Some(error) = &result.error {
        println!("  note:     {error}");
    }

    println!();
    for event in &result.events {
        println!(
            "  {}  {:<8} {:<20} {}",
            event.time.with_timezone(&kst).format("%m-%d %H:%M"),
            event.status.label(),
            event.location.as_deref().unwrap_or("-"),
            event.description
        );
    }
}
