//! Coordinates and great-circle distance.
//!
//! Coordinates are fixed-point integers: degrees multiplied by
//! [`COORD_FACTOR`]. All distance math runs in single precision, so results
//! are good to roughly a meter, not to the centimeter.

use serde::{Deserialize, Serialize};

/// Scale between degrees and the integer coordinates stored in a [`Point`].
pub const COORD_FACTOR: f32 = 10_000_000.0;

/// Mean Earth radius in meters used by [`distance`].
pub const EARTH_RADIUS_M: f32 = 6_371_000.0;

/// A location with latitude and longitude in degrees × 10^7.
///
/// Two points are equal only if both integer coordinates match exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Point {
    /// Latitude in degrees × 10^7.
    pub latitude: i32,
    /// Longitude in degrees × 10^7.
    pub longitude: i32,
}

impl Point {
    /// Create a point from scaled integer coordinates.
    pub const fn new(latitude: i32, longitude: i32) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a point from decimal degrees, rounding to the nearest unit.
    ///
    /// # Example
    ///
    /// ```
    /// use routeguide::Point;
    ///
    /// let p = Point::from_degrees(40.7838351, -74.6143763);
    /// assert_eq!(p, Point::new(407838351, -746143763));
    /// ```
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        let factor = COORD_FACTOR as f64;
        Self {
            latitude: (lat * factor).round() as i32,
            longitude: (lon * factor).round() as i32,
        }
    }

    /// Latitude in decimal degrees.
    pub fn latitude_degrees(&self) -> f64 {
        self.latitude as f64 / COORD_FACTOR as f64
    }

    /// Longitude in decimal degrees.
    pub fn longitude_degrees(&self) -> f64 {
        self.longitude as f64 / COORD_FACTOR as f64
    }
}

/// A region given by two opposite corners in any order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Rectangle {
    /// One corner.
    pub lo: Point,
    /// The opposite corner.
    pub hi: Point,
}

impl Rectangle {
    /// Create a rectangle from two corners.
    pub const fn new(lo: Point, hi: Point) -> Self {
        Self { lo, hi }
    }

    /// Normalize the corners into per-axis bounds.
    ///
    /// The result does not depend on which corner is `lo` and which is `hi`.
    pub fn bounds(&self) -> Bounds {
        Bounds {
            left: self.lo.longitude.min(self.hi.longitude),
            right: self.lo.longitude.max(self.hi.longitude),
            top: self.lo.latitude.max(self.hi.latitude),
            bottom: self.lo.latitude.min(self.hi.latitude),
        }
    }
}

/// Normalized bounding box with `left <= right` and `bottom <= top`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Minimum longitude.
    pub left: i32,
    /// Maximum longitude.
    pub right: i32,
    /// Maximum latitude.
    pub top: i32,
    /// Minimum latitude.
    pub bottom: i32,
}

impl Bounds {
    /// Check whether a point lies inside the box. Edges are inclusive.
    pub fn contains(&self, point: &Point) -> bool {
        point.longitude >= self.left
            && point.longitude <= self.right
            && point.latitude >= self.bottom
            && point.latitude <= self.top
    }

    /// Smallest box containing every point, or `None` for no points.
    pub fn enclosing<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Bounds {
                    left: p.longitude,
                    right: p.longitude,
                    top: p.latitude,
                    bottom: p.latitude,
                },
                Some(b) => Bounds {
                    left: b.left.min(p.longitude),
                    right: b.right.max(p.longitude),
                    top: b.top.max(p.latitude),
                    bottom: b.bottom.min(p.latitude),
                },
            })
        })
    }
}

/// Convert degrees to radians.
pub fn to_radians(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

/// Great-circle distance in meters between two points (haversine formula).
///
/// # Example
///
/// ```
/// use routeguide::{geo::distance, Point};
///
/// let p = Point::new(407838351, -746143763);
/// assert_eq!(distance(p, p), 0.0);
/// ```
pub fn distance(start: Point, end: Point) -> f32 {
    let lat_1 = start.latitude as f32 / COORD_FACTOR;
    let lat_2 = end.latitude as f32 / COORD_FACTOR;
    let lon_1 = start.longitude as f32 / COORD_FACTOR;
    let lon_2 = end.longitude as f32 / COORD_FACTOR;

    let phi_1 = to_radians(lat_1);
    let phi_2 = to_radians(lat_2);
    let delta_phi = to_radians(lat_2 - lat_1);
    let delta_lambda = to_radians(lon_2 - lon_1);

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi_1.cos() * phi_2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}
