use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tranzit_cli::output::{
    render_json, render_nearest_basic, render_nearest_text, render_route_basic,
    render_route_text, OutputFormat,
};
use tranzit_cli::terminal::ColorPalette;
use tranzit_lib::{
    find_nearest_stop, open_source, plan_direct_route, Coordinates, DirectRouteFinder,
    DirectRouteRequest, TransitConfig, TransitSource,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Direct transit route planning")]
struct Cli {
    /// Read transit data from a JSON snapshot instead of the live API.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Agency to query (defaults to TRANZY_AGENCY_ID or 1).
    #[arg(long, global = true)]
    agency: Option<String>,

    /// Stop-to-shape proximity threshold in meters.
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find a single trip that serves both stops in travel order.
    Route {
        /// Boarding stop id.
        #[arg(long = "from")]
        from: String,
        /// Alighting stop id.
        #[arg(long = "to")]
        to: String,
    },
    /// Find the stop closest to a coordinate.
    Nearest {
        /// Latitude in decimal degrees.
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in decimal degrees.
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    fn config(&self) -> TransitConfig {
        let mut config = TransitConfig::from_env();
        if let Some(path) = &self.snapshot {
            config = config.with_snapshot(path.clone());
        }
        if let Some(agency) = &self.agency {
            config = config.with_agency(agency.clone());
        }
        if let Some(threshold) = self.threshold {
            config = config.with_proximity_meters(threshold);
        }
        config
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.config();

    let source = open_transit_source(&config)?;

    match &cli.command {
        Command::Route { from, to } => handle_route(source.as_ref(), &config, cli.format, from, to),
        Command::Nearest { lat, lon } => {
            handle_nearest(source.as_ref(), &config, cli.format, *lat, *lon)
        }
    }
}

fn open_transit_source(config: &TransitConfig) -> Result<Box<dyn TransitSource>> {
    match &config.snapshot_path {
        Some(path) => open_source(config)
            .with_context(|| format!("failed to load snapshot from {}", path.display())),
        None => open_source(config)
            .context("failed to create the transit API client (set TRANZY_API_KEY or pass --snapshot)"),
    }
}

fn handle_route(
    source: &dyn TransitSource,
    config: &TransitConfig,
    format: OutputFormat,
    from: &str,
    to: &str,
) -> Result<()> {
    let finder = DirectRouteFinder::new(config.proximity_meters)
        .context("invalid --threshold value")?;
    let request = DirectRouteRequest::new(from, to, &config.agency_id);
    let plan = plan_direct_route(source, &request, &finder)
        .with_context(|| format!("failed to plan a direct route from {} to {}", from, to))?;

    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Text => {
            render_route_text(&mut stdout, &plan, from, to, ColorPalette::detect())?
        }
        OutputFormat::Basic => render_route_basic(&mut stdout, &plan)?,
        OutputFormat::Json => render_json(&mut stdout, &plan)?,
    }
    stdout.flush()?;
    Ok(())
}

fn handle_nearest(
    source: &dyn TransitSource,
    config: &TransitConfig,
    format: OutputFormat,
    lat: f64,
    lon: f64,
) -> Result<()> {
    let nearest = find_nearest_stop(source, &config.agency_id, Coordinates::new(lat, lon))
        .with_context(|| format!("failed to find the stop nearest to {}, {}", lat, lon))?;

    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Text => render_nearest_text(&mut stdout, &nearest, ColorPalette::detect())?,
        OutputFormat::Basic => render_nearest_basic(&mut stdout, &nearest)?,
        OutputFormat::Json => render_json(&mut stdout, &nearest)?,
    }
    stdout.flush()?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
