use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

/// Route guide catalog CLI tool
#[derive(Parser)]
#[command(name = "routeguide")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON feature database
    #[arg(short, long, env = "ROUTEGUIDE_DB_PATH", global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the feature at a single point
    Feature {
        /// Latitude in degrees × 10^7
        #[arg(long, allow_hyphen_values = true)]
        lat: i32,

        /// Longitude in degrees × 10^7
        #[arg(long, allow_hyphen_values = true)]
        lon: i32,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List the features inside a rectangle
    List {
        /// Latitude of the first corner
        #[arg(long, allow_hyphen_values = true)]
        lo_lat: i32,

        /// Longitude of the first corner
        #[arg(long, allow_hyphen_values = true)]
        lo_lon: i32,

        /// Latitude of the opposite corner
        #[arg(long, allow_hyphen_values = true)]
        hi_lat: i32,

        /// Longitude of the opposite corner
        #[arg(long, allow_hyphen_values = true)]
        hi_lon: i32,

        /// Output a GeoJSON FeatureCollection
        #[arg(short, long)]
        geojson: bool,
    },

    /// Summarize a route read from a file
    Route {
        /// Input file (CSV or GeoJSON)
        input: PathBuf,

        /// Column name for latitude (CSV only)
        #[arg(long, default_value = "latitude")]
        lat_col: String,

        /// Column name for longitude (CSV only)
        #[arg(long, default_value = "longitude")]
        lon_col: String,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Display information about the feature database
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Feature { lat, lon, json } => {
            commands::feature::run(cli.db_path, lat, lon, json)
        }
        Commands::List {
            lo_lat,
            lo_lon,
            hi_lat,
            hi_lon,
            geojson,
        } => commands::list::run(cli.db_path, lo_lat, lo_lon, hi_lat, hi_lon, geojson),
        Commands::Route {
            input,
            lat_col,
            lon_col,
            json,
        } => commands::route::run(cli.db_path, input, lat_col, lon_col, json),
        Commands::Info => commands::info::run(cli.db_path),
    }
}
