//! Error types for the route guide library.
//!
//! The four route guide operations never fail on their own; these errors only
//! come from loading the feature catalog and reading configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while setting up a route guide.
#[derive(Error, Debug)]
pub enum RouteGuideError {
    /// IO error when reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The feature database file does not exist.
    #[error("Feature database not found: {path}")]
    CatalogNotFound { path: PathBuf },

    /// The feature database is not a JSON array of features.
    #[error("Invalid feature database: {0}")]
    InvalidCatalog(#[from] serde_json::Error),

    /// A GeoJSON geometry cannot be read as route points.
    #[error("Invalid geometry: {message}")]
    InvalidGeometry { message: String },

    /// A required environment variable is not set.
    #[error("{var} environment variable not set")]
    MissingConfig { var: &'static str },
}

/// Result type alias using [`RouteGuideError`].
pub type Result<T> = std::result::Result<T, RouteGuideError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RouteGuideError::CatalogNotFound {
            path: PathBuf::from("route_guide_db.json"),
        };
        assert!(err.to_string().contains("route_guide_db.json"));

        let err = RouteGuideError::MissingConfig {
            var: "ROUTEGUIDE_DB_PATH",
        };
        assert!(err.to_string().contains("ROUTEGUIDE_DB_PATH"));

        let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = RouteGuideError::from(json_err);
        assert!(err.to_string().starts_with("Invalid feature database"));
    }
}
