//! # Route Guide
//!
//! Route information over an immutable catalog of named locations.
//!
//! ## Features
//!
//! - **Point lookup**: the named feature at an exact coordinate
//! - **Region listing**: every feature inside a bounding box, streamed lazily
//! - **Route summaries**: point, feature and distance totals for a recorded route
//! - **Route notes**: messages left at a location, replayed to later visitors
//!
//! ## Quick Start
//!
//! ```ignore
//! use routeguide::{Point, Rectangle, RouteGuide, RouteGuideServiceBuilder};
//!
//! let service = RouteGuideServiceBuilder::new("route_guide_db.json").build()?;
//!
//! let feature = service.get_feature(Point::new(407838351, -746143763));
//! println!("Found: {}", feature.name);
//!
//! let rect = Rectangle::new(Point::new(400000000, -750000000), Point::new(420000000, -730000000));
//! for feature in service.list_features(rect) {
//!     println!("{} at {:?}", feature.name, feature.location);
//! }
//! ```
//!
//! ## Coordinates
//!
//! Latitude and longitude are stored as integers equal to degrees × 10^7
//! (`407838351` is 40.7838351°). Points compare by exact integer equality.
//! Distances use the haversine formula in single precision with an Earth
//! radius of 6,371 km.

pub mod catalog;
pub mod error;
pub mod geo;
pub mod notes;
pub mod route;
pub mod service;

#[cfg(feature = "geojson")]
pub mod geojson;

// Re-export main types at crate root for convenience
pub use catalog::{Catalog, Feature, ListFeatures};
pub use error::{Result, RouteGuideError};
pub use geo::{Bounds, Point, Rectangle};
pub use notes::{NoteLog, RouteNote};
pub use route::{RouteRecorder, RouteSummary};
pub use service::{RouteGuide, RouteGuideService, RouteGuideServiceBuilder, DB_PATH_ENV};
