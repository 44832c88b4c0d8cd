pub mod feature;
pub mod info;
pub mod list;
pub mod route;

use anyhow::{Context, Result};
use routeguide::{RouteGuideService, RouteGuideServiceBuilder};
use std::path::PathBuf;

/// Load the feature database named on the command line or in the environment.
pub fn load_service(db_path: Option<PathBuf>) -> Result<RouteGuideService> {
    let builder = match db_path {
        Some(path) => RouteGuideServiceBuilder::new(path),
        None => RouteGuideServiceBuilder::from_env().context(
            "ROUTEGUIDE_DB_PATH environment variable not set. Use --db-path or set ROUTEGUIDE_DB_PATH",
        )?,
    };

    let path = builder.path().display().to_string();
    builder
        .build()
        .with_context(|| format!("Failed to load feature database {}", path))
}
