use std::path::{Path, PathBuf};

use catalog::InMemoryCatalogStore;
use clap::{Parser, Subcommand};
use dashboard::{
    Dashboard, DashboardConfig, DashboardError, HttpRecordSource, LoggingCamera, LoggingEngine,
};
use formats::Feature;
use serde_json::{Map, Value};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

type HeadlessDashboard = Dashboard<HttpRecordSource, LoggingEngine, LoggingCamera>;

#[derive(Parser, Debug)]
#[command(name = "dashboard", about = "Headless geospatial dashboard")]
struct Args {
    /// Overrides DASHBOARD_API_BASE.
    #[arg(long)]
    api_base: Option<String>,

    /// Overrides DASHBOARD_CATALOG.
    #[arg(long)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the gallery grouped by category.
    Gallery,
    /// Activate datasets and print the resulting overlays.
    Load {
        /// Comma-separated dataset ids; defaults to DASHBOARD_DATASETS.
        #[arg(value_delimiter = ',')]
        datasets: Vec<String>,
    },
    /// Build the time-series chart for one station.
    Station {
        code: String,
        #[arg(long)]
        city: Option<String>,
    },
    /// Fetch a single record from a dataset.
    Record { dataset: String, id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = DashboardConfig::from_env()?;
    if let Some(api_base) = args.api_base {
        config.endpoints.api_base = api_base;
    }
    if args.catalog.is_some() {
        config.catalog_path = args.catalog;
    }

    let store = load_catalog(config.catalog_path.as_deref()).await?;
    let source = HttpRecordSource::new(reqwest::Client::new());
    let mut dash: HeadlessDashboard = Dashboard::new(
        source,
        LoggingEngine::default(),
        LoggingCamera::default(),
        store,
        &config,
    );
    for status in dash.plugin_status() {
        info!("{status}");
    }

    match args.command {
        Some(Command::Gallery) => {
            let categories = dash.gallery().categories()?;
            println!("{}", serde_json::to_string_pretty(&categories)?);
        }
        Some(Command::Load { datasets }) if !datasets.is_empty() => {
            load_datasets(&mut dash, &datasets).await?;
        }
        Some(Command::Load { .. }) | None => {
            let datasets = config.datasets.clone();
            if datasets.is_empty() {
                info!("no datasets configured; set DASHBOARD_DATASETS or pass ids to `load`");
            }
            load_datasets(&mut dash, &datasets).await?;
        }
        Some(Command::Station { code, city }) => {
            let mut properties = Map::new();
            properties.insert("station_code".to_string(), Value::String(code));
            if let Some(city) = city {
                properties.insert("city".to_string(), Value::String(city));
            }
            let feature = Feature {
                properties: Some(properties),
                ..Feature::default()
            };
            dash.show_station(&feature).await;
            println!("{}", serde_json::to_string_pretty(dash.chart())?);
        }
        Some(Command::Record { dataset, id }) => match dash.load_record(&dataset, &id).await {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record.body)?),
            None => error!(dataset = %dataset, id = %id, "record not available"),
        },
    }
    Ok(())
}

async fn load_catalog(path: Option<&Path>) -> Result<InMemoryCatalogStore, DashboardError> {
    match path {
        Some(path) => {
            let payload = tokio::fs::read_to_string(path).await?;
            let store = InMemoryCatalogStore::from_json_str(&payload)?;
            info!(path = %path.display(), "loaded catalog");
            Ok(store)
        }
        None => Ok(InMemoryCatalogStore::builtin()),
    }
}

/// Selects each dataset in turn, then plays the engine's part: every newly
/// registered overlay is reported ready, and point clouds get their manifest
/// loaded.
async fn load_datasets(
    dash: &mut HeadlessDashboard,
    datasets: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    for id in datasets {
        match dash.select_dataset(id).await {
            Ok(outcome) => info!(dataset_id = %id, ?outcome, "load finished"),
            Err(err) => error!(dataset_id = %id, error = %err, "selection failed"),
        }
        let fresh = dash.manager_mut().engine_mut().take_new_ids();
        for overlay_id in fresh {
            dash.overlay_ready(&overlay_id);
            dash.tileset_ready(&overlay_id).await;
        }
    }
    if let Some(last) = &dash.manager().camera().last {
        info!(camera = %last, "final camera");
    }
    println!("{}", serde_json::to_string_pretty(&dash.manager().flatten())?);
    Ok(())
}
