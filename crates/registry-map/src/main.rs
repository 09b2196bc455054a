//! Registry Map CLI
//!
//! Builds a choropleth-ready GeoJSON layer from a company-registry dataset.
//!
//! Usage:
//!   registry-map openness --url http://registries.opencorporates.com/
//!   registry-map ownership --data countries_with_open_registries.csv \
//!                --geometry data/world-administrative-boundaries.geojson \
//!                --config config/world-boundaries.toml

use anyhow::Result;
use clap::{Parser, Subcommand};
use registry_map::export::{self, ExportMetadata};
use registry_map::sources::{opencorporates, openownership, Dataset};
use registry_map::{geometry, reconcile, MapConfig};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "registry-map",
    about = "Map company-registry datasets onto world country polygons"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Country polygons as a GeoJSON FeatureCollection
    #[arg(
        short,
        long,
        global = true,
        default_value = "data/ne_10m_admin_0_map_units.geojson"
    )]
    geometry: PathBuf,

    /// TOML file with schema keys, tolerance buckets, colours and extra overrides
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output GeoJSON file (defaults per dataset)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// OpenCorporates registry openness ratings
    Openness {
        /// Registries index to scrape
        #[arg(long, default_value = opencorporates::DEFAULT_URL, conflicts_with = "html")]
        url: String,

        /// Read a saved copy of the index instead of fetching it
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Open Ownership beneficial ownership register survey
    Ownership {
        /// CSV export of the survey spreadsheet
        #[arg(short, long)]
        data: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &args.config {
        Some(path) => MapConfig::from_toml_file(path)?,
        None => MapConfig::default(),
    };
    let resolver = config.resolver()?;

    let (dataset, records) = match &args.command {
        Command::Openness { url, html } => {
            let page = match html {
                Some(path) => {
                    info!("Reading registry ratings from {:?}", path);
                    std::fs::read_to_string(path)?
                }
                None => opencorporates::fetch_page(url).await?,
            };
            let records = opencorporates::parse_registry_page(&page, url, &resolver);
            (Dataset::Openness, records)
        }
        Command::Ownership { data } => {
            let records = openownership::load_registers(data, &resolver, &config.colors)?;
            (Dataset::Ownership, records)
        }
    };

    info!("{}", "=".repeat(60));
    info!("{}", dataset.title());
    info!("{}", "=".repeat(60));

    if records.is_empty() {
        warn!("No country data found. Exiting.");
        return Ok(());
    }

    let polygons = geometry::load_polygons(&args.geometry, &config)?;
    let result = reconcile(&polygons, &records, &dataset.defaults(&config));

    let metadata = ExportMetadata::new(dataset, records.len(), &result);
    let collection = export::to_feature_collection(&result.rows, &metadata, &config.schema)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(dataset.default_output()));
    export::write_feature_collection(&output, &collection)?;

    // Summary
    info!("{}", "=".repeat(60));
    info!("SUMMARY");
    info!("{}", "=".repeat(60));
    info!("Records:  {}", metadata.record_count);
    info!("Polygons: {}", metadata.polygon_count);
    info!("Matched:  {}", metadata.matched_count);
    if !metadata.missing_countries.is_empty() {
        info!("Missing:  {}", metadata.missing_countries.join(", "));
    }
    info!("Map layer has been saved to {:?}", output);

    Ok(())
}
