use chrono::Local;
use clap::Parser;
use sensor_forecast::telemetry::init_tracing;
use sensor_forecast::{
    evaluate_forecast, DataLoader, ForecastConfig, MockProvider, ModelRegistry, RoomData,
};
use serde_json::json;
use std::path::PathBuf;

/// Hours of synthetic history generated when no CSV is given
const MOCK_HOURS: f64 = 7.0 * 24.0;

#[derive(Parser, Debug)]
#[command(version, about = "Forecast a sensor parameter from recorded or synthetic readings")]
struct Args {
    /// JSON configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Multisensor CSV export; synthetic readings are used when omitted
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Parameter key to forecast
    #[arg(short, long, default_value = "co2")]
    parameter: String,

    /// Registered model name
    #[arg(short, long, default_value = "Linear Trend")]
    model: String,

    /// Forecast horizon in hours
    #[arg(long)]
    hours: Option<f64>,

    /// Number of forecast points
    #[arg(long)]
    points: Option<usize>,

    /// Cutoff position through the series, from 0 to 1
    #[arg(long, default_value_t = 0.8)]
    position: f64,

    /// Seed for synthetic readings
    #[arg(long)]
    seed: Option<u64>,

    /// List registered models and exit
    #[arg(long)]
    list_models: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ForecastConfig::from_file(path)?,
        None => ForecastConfig::default(),
    };
    init_tracing(&config.logging);

    let registry = ModelRegistry::with_defaults(&config)?;
    if args.list_models {
        println!("{}", serde_json::to_string_pretty(&registry.list_names())?);
        return Ok(());
    }

    let room = load_room(&args, &config)?;
    let series = room.series(&args.parameter)?;
    let cutoff = series.cutoff_at_position(args.position)?;
    let horizon_hours = args.hours.unwrap_or(config.forecast.default_horizon_hours);
    let num_points = args.points.unwrap_or(config.forecast.num_points);

    let forecast = registry.predict(&args.model, &series, cutoff, horizon_hours, num_points)?;

    let split = series.split_at(cutoff);
    let accuracy = evaluate_forecast(&forecast, &split.validation).ok();

    let report = json!({
        "room": room.room(),
        "parameter": series.parameter(),
        "model": args.model,
        "cutoff": cutoff,
        "horizon_hours": horizon_hours,
        "window": series.summary(cutoff),
        "forecast": forecast,
        "accuracy": accuracy,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn load_room(args: &Args, config: &ForecastConfig) -> sensor_forecast::Result<RoomData> {
    if let Some(path) = &args.csv {
        return DataLoader::from_csv(path, &config.catalog);
    }

    let mut provider = match args.seed {
        Some(seed) => MockProvider::seeded(config.catalog.clone(), seed)?,
        None => MockProvider::new(config.catalog.clone())?,
    };
    let end = Local::now().naive_local();
    provider.recent("Mock Room", end, MOCK_HOURS)
}
