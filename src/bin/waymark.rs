//! Waymark demo shell
//!
//! Wires the engine against either the bundled sample providers or
//! live HTTP endpoints, runs a discovery pass, then replays a filter
//! selection and a marker click against the headless surface.
//!
//! Usage:
//!   waymark [--config path] [--filter "Donuts"]
//!   waymark --places-url URL --places-key KEY [image/geocode flags]

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use waymark::config::{ConfigError, EngineConfig};
use waymark::map::{HeadlessSurface, MapSurface};
use waymark::pipeline::{AcquisitionPipeline, EnrichmentOutcome, EnrichmentPipeline, SearchArea};
use waymark::provider::{
    hit, Geocoder, HttpGeocoder, HttpImageClient, HttpPlacesClient, ImageProvider, PlacesProvider,
    StaticGeocoder, StaticImages, StaticPlaces,
};
use waymark::view::{MarkerSynchronizer, PlaceList, SelectionController, SharedProjection};
use waymark::{Category, Filter, LocationRegistry};

#[derive(Parser)]
#[command(
    name = "waymark",
    version,
    about = "Filter-driven neighborhood map engine"
)]
struct Cli {
    /// Path to a TOML config file (defaults to the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Filter applied after discovery, e.g. "Donuts"
    #[arg(long, default_value = Filter::ALL_LABEL)]
    filter: String,

    /// Nearby-search endpoint for live place discovery
    #[arg(long, requires = "places_key")]
    places_url: Option<String>,
    /// API key for the nearby-search endpoint
    #[arg(long)]
    places_key: Option<String>,

    /// Venue-API base URL for live photo enrichment
    #[arg(long, requires = "image_id", requires = "image_secret")]
    image_url: Option<String>,
    /// Client id for the venue API
    #[arg(long)]
    image_id: Option<String>,
    /// Client secret for the venue API
    #[arg(long)]
    image_secret: Option<String>,

    /// Geocoding endpoint for recentering on the base address
    #[arg(long, requires = "geocode_key")]
    geocode_url: Option<String>,
    /// API key for the geocoding endpoint
    #[arg(long)]
    geocode_key: Option<String>,
}

/// Default config location (~/.config/waymark/waymark.toml)
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("waymark").join("waymark.toml"))
}

fn load_config(cli: &Cli) -> Result<EngineConfig, ConfigError> {
    if let Some(path) = &cli.config {
        return EngineConfig::load(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => EngineConfig::load(&path),
        _ => Ok(EngineConfig::default()),
    }
}

fn parse_filter(label: &str) -> Option<Filter> {
    if label == Filter::ALL_LABEL {
        return Some(Filter::All);
    }
    Category::ALL
        .iter()
        .find(|c| c.label() == label)
        .map(|c| Filter::Only(*c))
}

/// Canned neighborhood data for running without provider credentials.
fn sample_places() -> StaticPlaces {
    StaticPlaces::new()
        .with_hits(
            "Golf Courses",
            vec![
                hit("Whitney Oaks Golf Club", 38.826, -121.266),
                hit("Sunset Whitney Recreation Area", 38.783, -121.262),
            ],
        )
        .with_hits(
            "Donuts",
            vec![
                hit("Baker's Donuts", 38.790, -121.243),
                hit("Donut Time", 38.801, -121.222),
            ],
        )
        .with_hits(
            "Breweries",
            vec![
                hit("Knee Deep Brewing", 38.809, -121.207),
                hit("Moksa Brewing", 38.795, -121.253),
            ],
        )
        .with_hits(
            "Mexican Restaurants",
            vec![
                hit("La Villa Hacienda", 38.788, -121.236),
                hit("Casa Ramos", 38.802, -121.268),
            ],
        )
        .with_hits(
            "Parks",
            vec![
                hit("Johnson-Springview Park", 38.794, -121.226),
                hit("Quarry Park Adventures", 38.790, -121.237),
            ],
        )
}

fn sample_images() -> StaticImages {
    StaticImages::new()
        .with_venue("Knee Deep Brewing", "venue-knee-deep")
        .with_photo(
            "venue-knee-deep",
            "https://img.example/original/knee-deep.jpg",
        )
        .with_venue("Johnson-Springview Park", "venue-johnson")
        .with_photo("venue-johnson", "https://img.example/original/johnson.jpg")
}

fn build_places(cli: &Cli) -> Result<Arc<dyn PlacesProvider>, String> {
    match (&cli.places_url, &cli.places_key) {
        (Some(url), Some(key)) => Ok(Arc::new(
            HttpPlacesClient::new(url.clone(), key.clone()).map_err(|e| e.to_string())?,
        )),
        _ => Ok(Arc::new(sample_places())),
    }
}

fn build_images(cli: &Cli) -> Result<Arc<dyn ImageProvider>, String> {
    match (&cli.image_url, &cli.image_id, &cli.image_secret) {
        (Some(url), Some(id), Some(secret)) => Ok(Arc::new(
            HttpImageClient::new(url.clone(), id.clone(), secret.clone())
                .map_err(|e| e.to_string())?,
        )),
        _ => Ok(Arc::new(sample_images())),
    }
}

fn build_geocoder(cli: &Cli, config: &EngineConfig) -> Result<Arc<dyn Geocoder>, String> {
    match (&cli.geocode_url, &cli.geocode_key) {
        (Some(url), Some(key)) => Ok(Arc::new(
            HttpGeocoder::new(url.clone(), key.clone()).map_err(|e| e.to_string())?,
        )),
        _ => Ok(Arc::new(
            StaticGeocoder::new().with_answer(config.base_address.clone(), config.base_center),
        )),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let Some(filter) = parse_filter(&cli.filter) else {
        eprintln!("error: unknown filter '{}'", cli.filter);
        std::process::exit(2);
    };

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let (places, images, geocoder) = match (
        build_places(&cli),
        build_images(&cli),
        build_geocoder(&cli, &config),
    ) {
        (Ok(p), Ok(i), Ok(g)) => (p, i, g),
        (p, i, g) => {
            for err in [p.err(), i.err(), g.err()].into_iter().flatten() {
                eprintln!("Error: {}", err);
            }
            std::process::exit(1);
        }
    };

    let surface = Arc::new(HeadlessSurface::new());
    let registry = Arc::new(LocationRegistry::new());

    let projection = SharedProjection::for_registry(registry.clone());
    projection.subscribe(Box::new(MarkerSynchronizer::new(
        registry.clone(),
        surface.clone(),
    )));
    let list = PlaceList::new();
    projection.subscribe(Box::new(list.clone()));

    // Recenter on the base address; a failure keeps the default center.
    surface.set_center(config.base_center);
    match geocoder.geocode(&config.base_address).await {
        Ok(center) => surface.set_center(center),
        Err(e) => warn!(error = %e, "geocoding failed, keeping default center"),
    }

    let enrichment = Arc::new(EnrichmentPipeline::new(registry.clone(), images));
    let pipeline = Arc::new(AcquisitionPipeline::new(
        registry.clone(),
        places,
        surface.clone() as Arc<dyn MapSurface>,
        enrichment,
        SearchArea {
            center: config.base_center,
            radius_m: config.radius_m,
        },
        config.result_cap,
    ));

    let report = pipeline.run().await;
    println!("{:<22}  {:>9}  {:>10}  FAILURE", "CATEGORY", "INSERTED", "DUPLICATES");
    println!("{}", "-".repeat(60));
    for category in &report.categories {
        println!(
            "{:<22}  {:>9}  {:>10}  {}",
            category.category.label(),
            category.inserted,
            category.duplicates,
            category.failure.as_deref().unwrap_or("-")
        );
    }

    let outcomes = report.drain_enrichment().await;
    let enriched = outcomes
        .iter()
        .filter(|o| **o == EnrichmentOutcome::Enriched)
        .count();
    println!(
        "\n{} locations registered, {} picked up a photo",
        registry.len(),
        enriched
    );

    projection.set_filter(filter);
    println!("\nVisible under '{}':", filter);
    for entry in list.entries() {
        println!("  {:<32}  {}", entry.name, entry.category);
    }

    // Walk the popup flow for the first visible place.
    let mut controller = SelectionController::new(registry.clone(), surface.clone())
        .with_bounce(config.bounce());
    let entries = list.entries();
    if let Some(entry) = entries.first() {
        controller.place_selected(&entry.name);
        if let Some(popup) = surface.popup() {
            println!("\nPopup on '{}':\n  {}", entry.name, popup.content);
        }
    }
}
