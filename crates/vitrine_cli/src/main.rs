//! Vitrine CLI
//!
//! Bundle source snapshots, serve the source query, and open the code panel
//! from a terminal.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vitrine_core::{RuntimeMode, SnapshotBuilder, SourceId, SourceResolver, SourceSnapshot};
use vitrine_demos::{find_demo, source_ids, TravelInputs, CATALOG};
use vitrine_panel::{
    Clipboard, CopyOutcome, MemoryClipboard, Osc52Clipboard, PanelDriver, ProviderFetch,
    SourceFetch,
};
use vitrine_server::{HttpSourceClient, SourceServer};

mod config;

use config::VitrineConfig;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Animation gallery source tooling", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory containing vitrine.toml
    #[arg(short = 'C', long, global = true, default_value = ".")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Snapshot demo sources for production serving
    Bundle {
        /// Snapshot output path (defaults to source.snapshot)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Identifiers to bundle (defaults to every demo source)
        ids: Vec<String>,
    },

    /// Serve the source query over HTTP
    Serve {
        /// Port to listen on (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Runtime mode (development, production)
        #[arg(short, long)]
        mode: Option<String>,
    },

    /// Open the code panel for a demo route or source identifier
    Show {
        /// Demo route (e.g. /dropdown) or source identifier
        target: String,

        /// Query a running server instead of resolving locally
        #[arg(long)]
        remote: Option<SocketAddr>,

        /// Copy the source to the terminal clipboard (OSC 52)
        #[arg(long)]
        copy: bool,

        /// Runtime mode for local resolution
        #[arg(short, long)]
        mode: Option<String>,
    },

    /// List gallery pages
    Demos,

    /// Evaluate the travel-time calculator
    Travel {
        /// Distance in km
        #[arg(short, long)]
        distance: Option<f64>,

        /// Speed in kph
        #[arg(short, long)]
        speed: Option<f64>,

        /// Traffic factor
        #[arg(short = 'f', long)]
        factor: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Bundle { out, ids } => cmd_bundle(&cli.dir, out, ids),

        Commands::Serve { port, mode } => cmd_serve(&cli.dir, port, mode.as_deref()),

        Commands::Show {
            target,
            remote,
            copy,
            mode,
        } => cmd_show(&cli.dir, &target, remote, copy, mode.as_deref()),

        Commands::Demos => cmd_demos(),

        Commands::Travel {
            distance,
            speed,
            factor,
        } => cmd_travel(distance, speed, factor),
    }
}

/// Config with `VITRINE_MODE` and then the `--mode` flag applied
fn load_config(dir: &Path, mode: Option<&str>) -> Result<VitrineConfig> {
    let mut config = VitrineConfig::load_from_dir(dir)?;
    config.apply_env()?;
    if let Some(mode) = mode {
        config.apply_mode_override(mode)?;
    }
    Ok(config)
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

fn resolver_for(config: &VitrineConfig) -> Result<SourceResolver> {
    let snapshot = match config.source.mode {
        RuntimeMode::Production => SourceSnapshot::load(&config.source.snapshot)
            .with_context(|| {
                format!(
                    "Failed to load snapshot {} (run `vitrine bundle` first)",
                    config.source.snapshot.display()
                )
            })?,
        RuntimeMode::Development => match SourceSnapshot::load(&config.source.snapshot) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                debug!("No usable snapshot, reading everything live: {}", e);
                SourceSnapshot::empty()
            }
        },
    };

    info!(
        "Resolving sources in {} mode ({} bundled)",
        config.source.mode,
        snapshot.len()
    );
    Ok(SourceResolver::new(
        Arc::new(snapshot),
        config.source.mode,
        &config.source.root,
    ))
}

fn cmd_bundle(dir: &Path, out: Option<PathBuf>, ids: Vec<String>) -> Result<()> {
    let config = VitrineConfig::load_from_dir(dir)?;

    let ids: Vec<SourceId> = if ids.is_empty() {
        let mut all = source_ids();
        for extra in &config.source.extra {
            all.push(SourceId::new(extra.as_str())?);
        }
        all
    } else {
        ids.into_iter()
            .map(SourceId::try_from)
            .collect::<Result<_, _>>()?
    };

    info!(
        "Bundling {} sources from {}",
        ids.len(),
        config.source.root.display()
    );

    let report = SnapshotBuilder::new(&config.source.root)
        .with_sources(ids)
        .build();

    for (id, err) in &report.skipped {
        warn!("Skipped {}: {}", id, err);
    }

    let out = out.unwrap_or_else(|| config.source.snapshot.clone());
    report
        .snapshot
        .save(&out)
        .with_context(|| format!("Failed to write {}", out.display()))?;

    info!(
        "Wrote {} sources to {}",
        report.snapshot.len(),
        out.display()
    );
    Ok(())
}

fn cmd_serve(dir: &Path, port: Option<u16>, mode: Option<&str>) -> Result<()> {
    let mut config = load_config(dir, mode)?;
    if let Some(port) = port {
        config.server = config.server.with_port(port);
    }
    let resolver = resolver_for(&config)?;

    runtime()?.block_on(async move {
        let handle = SourceServer::new(config.server, Arc::new(resolver))
            .start()
            .await
            .context("Failed to bind source server")?;

        println!(
            "Serving sources at http://{}{}",
            handle.local_addr(),
            handle.route()
        );

        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for shutdown signal")?;
        info!("Shutting down");
        handle.shutdown().await;
        Ok(())
    })
}

fn cmd_show(
    dir: &Path,
    target: &str,
    remote: Option<SocketAddr>,
    copy: bool,
    mode: Option<&str>,
) -> Result<()> {
    let id = match find_demo(target) {
        Some(demo) => match demo.source_id() {
            Some(id) => id?,
            None => anyhow::bail!("Page '{}' has no code panel", demo.route),
        },
        None => SourceId::new(target)?,
    };

    let config = load_config(dir, mode)?;
    let rt = runtime()?;

    match remote {
        Some(addr) => {
            let client = HttpSourceClient::new(addr, &config.server.route)?;
            rt.block_on(show_panel(id, client, copy))
        }
        None => {
            let fetch = ProviderFetch::new(Arc::new(resolver_for(&config)?));
            rt.block_on(show_panel(id, fetch, copy))
        }
    }
}

async fn show_panel<F: SourceFetch>(id: SourceId, fetch: F, copy: bool) -> Result<()> {
    if copy {
        let clipboard = Osc52Clipboard::new(std::io::stdout());
        drive_panel(id, fetch, clipboard, true).await
    } else {
        drive_panel(id, fetch, MemoryClipboard::new(), false).await
    }
}

async fn drive_panel<F: SourceFetch, C: Clipboard>(
    id: SourceId,
    fetch: F,
    clipboard: C,
    copy: bool,
) -> Result<()> {
    let mut driver = PanelDriver::new(id.clone(), fetch, clipboard);
    driver.open();
    driver.settle().await;

    let panel = driver.panel();
    println!("── {} ──", id);
    println!("{}", panel.content().display_text());

    if copy {
        match driver.copy() {
            CopyOutcome::Copied => println!("Copied!"),
            CopyOutcome::Unavailable => warn!("Nothing to copy"),
            CopyOutcome::Failed => warn!("Clipboard refused the source"),
        }
    }
    Ok(())
}

fn cmd_demos() -> Result<()> {
    for demo in CATALOG {
        match demo.source {
            Some(source) => println!("{:<18} {:<24} {}", demo.route, demo.title, source),
            None => println!("{:<18} {}", demo.route, demo.title),
        }
    }
    Ok(())
}

fn cmd_travel(distance: Option<f64>, speed: Option<f64>, factor: Option<f64>) -> Result<()> {
    let defaults = TravelInputs::default();
    let inputs = TravelInputs::new(
        distance.unwrap_or(defaults.distance_km),
        speed.unwrap_or(defaults.speed_kph),
        factor.unwrap_or(defaults.traffic_factor),
    )?;

    println!("Distance:       {} km", inputs.distance_km);
    println!("Speed:          {} kph", inputs.speed_kph);
    println!("Traffic factor: {:.1}x", inputs.traffic_factor);
    println!("Travel time:    {}", inputs.travel_time());
    Ok(())
}
