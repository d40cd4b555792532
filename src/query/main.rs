//! Query server for region lookups.
//!
//! Loads the configured region sets once at startup and answers
//! point-in-region and classification queries over HTTP.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use geoctx::config::{Config, RegionConfig};
use geoctx::pip::{Classification, Evaluation, RegionContext, RegionStats};
use geoctx::Element;

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Region membership query server")]
struct Args {
    /// TOML config listing the region files
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extra region set as NAME=PATH (repeatable)
    #[arg(short, long, value_parser = parse_region)]
    region: Vec<RegionConfig>,

    /// Listen address (overrides the config file)
    #[arg(short, long)]
    listen: Option<String>,
}

fn parse_region(s: &str) -> Result<RegionConfig, String> {
    let (name, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PATH, got '{}'", s))?;
    if name.is_empty() || path.is_empty() {
        return Err(format!("expected NAME=PATH, got '{}'", s));
    }
    Ok(RegionConfig {
        name: name.to_string(),
        path: PathBuf::from(path),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Geoctx Query Server");

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    config.regions.extend(args.region);
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }

    let context = Arc::new(config.build_context());
    for name in context.regions() {
        if let Some(stats) = context.stats(name) {
            info!("  {}: {} polygons", name, stats.polygons);
        }
    }

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/regions", get(regions_handler))
        .route("/v1/contains", get(contains_handler))
        .route("/v1/classify", get(classify_handler))
        .route("/v1/classify/element", post(classify_element_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(context);

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_handler(State(ctx): State<Arc<RegionContext>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        regions: ctx.len(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    regions: usize,
}

/// Loaded region sets with their index statistics
async fn regions_handler(
    State(ctx): State<Arc<RegionContext>>,
) -> Json<BTreeMap<String, RegionStats>> {
    Json(
        ctx.regions()
            .into_iter()
            .filter_map(|name| ctx.stats(name).map(|s| (name.to_string(), s)))
            .collect(),
    )
}

/// Single region membership test
async fn contains_handler(
    State(ctx): State<Arc<RegionContext>>,
    Query(params): Query<ContainsQueryParams>,
) -> Json<ContainsResponse> {
    let evaluation = ctx.evaluate(params.lon, params.lat, &params.region);

    Json(ContainsResponse {
        inside: evaluation.is_inside(),
        known: evaluation != Evaluation::UnknownRegion,
        region: params.region,
        lon: params.lon,
        lat: params.lat,
    })
}

/// All region flags for a point
async fn classify_handler(
    State(ctx): State<Arc<RegionContext>>,
    Query(params): Query<PointQueryParams>,
) -> Json<Classification> {
    Json(ctx.classify(params.lon, params.lat))
}

/// All region flags for an element, located by point or centroid
async fn classify_element_handler(
    State(ctx): State<Arc<RegionContext>>,
    Json(element): Json<Element>,
) -> Json<Classification> {
    Json(ctx.classify_element(&element))
}

#[derive(Deserialize)]
struct ContainsQueryParams {
    /// Region set name
    region: String,
    /// Longitude in decimal degrees
    lon: f64,
    /// Latitude in decimal degrees
    lat: f64,
}

#[derive(Deserialize)]
struct PointQueryParams {
    lon: f64,
    lat: f64,
}

#[derive(Serialize)]
struct ContainsResponse {
    region: String,
    lon: f64,
    lat: f64,
    inside: bool,
    /// False when no region set with that name is loaded
    known: bool,
}
