//! The read-only feature catalog.
//!
//! A [`Catalog`] is loaded once from a JSON feature database and never
//! changes afterwards, so clones of it can be read from any number of tasks
//! without locking.
//!
//! # Database Format
//!
//! ```json
//! [
//!   {"location": {"latitude": 407838351, "longitude": -746143763},
//!    "name": "Patriots Path, Mendham, NJ 07945, USA"},
//!   {"location": {"latitude": 414653148, "longitude": -740477477},
//!    "name": ""}
//! ]
//! ```
//!
//! Entries with an empty or missing name mark a location without a named
//! feature.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteGuideError};
use crate::geo::{Bounds, Point, Rectangle};

/// A named location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Feature {
    /// Feature name; empty when nothing is known about the location.
    #[serde(default)]
    pub name: String,
    /// Where the feature is.
    pub location: Point,
}

impl Feature {
    /// Create a feature.
    pub fn new(name: impl Into<String>, location: Point) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }

    /// Whether this feature carries a name.
    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Return the name of the first feature located exactly at `point`.
///
/// Returns an empty string when no feature matches. When several features
/// share a location, the earliest one wins.
pub fn find_name<'a>(point: &Point, features: &'a [Feature]) -> &'a str {
    features
        .iter()
        .find(|f| f.location == *point)
        .map_or("", |feature| feature.name.as_str())
}

/// Immutable, ordered collection of features.
///
/// Cloning a `Catalog` shares the underlying storage.
#[derive(Debug, Clone)]
pub struct Catalog {
    features: Arc<[Feature]>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Catalog {
    /// Build a catalog from features in their final order.
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features: features.into(),
        }
    }

    /// Parse a catalog from a JSON feature database string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let features: Vec<Feature> = serde_json::from_str(json)?;
        Ok(Self::new(features))
    }

    /// Parse a catalog from any reader producing a JSON feature database.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let features: Vec<Feature> = serde_json::from_reader(reader)?;
        Ok(Self::new(features))
    }

    /// Load a catalog from a JSON feature database file.
    ///
    /// # Errors
    ///
    /// - [`RouteGuideError::CatalogNotFound`] if the file does not exist
    /// - [`RouteGuideError::InvalidCatalog`] if it is not a feature array
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RouteGuideError::CatalogNotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path)?;
        let catalog = Self::from_reader(BufReader::new(file))?;

        tracing::info!(
            path = %path.display(),
            features = catalog.len(),
            "Feature database loaded"
        );

        Ok(catalog)
    }

    /// Name of the first feature at `point`, or an empty string.
    pub fn find_name(&self, point: &Point) -> &str {
        find_name(point, &self.features)
    }

    /// Lazily iterate over the features inside a rectangle, in catalog order.
    pub fn within(&self, rectangle: &Rectangle) -> ListFeatures {
        ListFeatures {
            features: Arc::clone(&self.features),
            bounds: rectangle.bounds(),
            next: 0,
        }
    }

    /// All features in catalog order.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the catalog has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Number of features with a non-empty name.
    pub fn named_count(&self) -> usize {
        self.features.iter().filter(|f| f.is_named()).count()
    }

    /// Smallest box covering every feature location.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.features.iter().map(|f| &f.location))
    }
}

/// Iterator over the catalog features inside a bounding box.
///
/// Produced by [`Catalog::within`]. It holds its own handle on the catalog,
/// so it can be moved into a response stream. A single pass only.
#[derive(Debug)]
pub struct ListFeatures {
    features: Arc<[Feature]>,
    bounds: Bounds,
    next: usize,
}

impl Iterator for ListFeatures {
    type Item = Feature;

    fn next(&mut self) -> Option<Feature> {
        while let Some(feature) = self.features.get(self.next) {
            self.next += 1;
            if self.bounds.contains(&feature.location) {
                return Some(feature.clone());
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.features.len().saturating_sub(self.next)))
    }
}

impl std::iter::FusedIterator for ListFeatures {}
