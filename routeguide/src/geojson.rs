//! GeoJSON conversion for features and routes.
//!
//! Enable the `geojson` feature to use this module.
//!
//! # Example
//!
//! ```ignore
//! use routeguide::geojson::features_to_collection;
//! use routeguide::{Point, Rectangle, RouteGuide};
//!
//! let rect = Rectangle::new(Point::new(400000000, -750000000), Point::new(420000000, -730000000));
//! let collection = features_to_collection(service.list_features(rect));
//! println!("{}", collection);
//! ```
//!
//! GeoJSON positions are `[longitude, latitude]` in decimal degrees, the
//! reverse of the field order in [`Point`].

use geojson::{FeatureCollection, Geometry, JsonObject, Value as GeoJsonValue};

use crate::catalog::Feature;
use crate::error::{Result, RouteGuideError};
use crate::geo::Point;

/// Convert a point to a GeoJSON position `[lon, lat]`.
pub fn point_to_position(point: &Point) -> Vec<f64> {
    vec![point.longitude_degrees(), point.latitude_degrees()]
}

/// Convert a GeoJSON position `[lon, lat, ...]` to a point.
///
/// # Errors
///
/// Returns an error if the position has fewer than 2 elements.
pub fn position_to_point(position: &[f64]) -> Result<Point> {
    match position {
        [lon, lat, ..] => Ok(Point::from_degrees(*lat, *lon)),
        _ => Err(RouteGuideError::InvalidGeometry {
            message: "Position must have at least 2 elements (lon, lat)".to_string(),
        }),
    }
}

/// Convert a catalog feature to a GeoJSON point feature.
///
/// The name goes into the `name` property; the scaled coordinates are kept
/// in `latitude`/`longitude` properties so they survive the round trip
/// through floating point.
pub fn feature_to_geojson(feature: &Feature) -> geojson::Feature {
    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), feature.name.clone().into());
    properties.insert("latitude".to_string(), feature.location.latitude.into());
    properties.insert("longitude".to_string(), feature.location.longitude.into());

    geojson::Feature {
        bbox: None,
        geometry: Some(Geometry::new(GeoJsonValue::Point(point_to_position(
            &feature.location,
        )))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Collect catalog features into a GeoJSON feature collection.
pub fn features_to_collection<I>(features: I) -> FeatureCollection
where
    I: IntoIterator,
    I::Item: std::borrow::Borrow<Feature>,
{
    use std::borrow::Borrow;

    FeatureCollection {
        bbox: None,
        features: features
            .into_iter()
            .map(|f| feature_to_geojson(f.borrow()))
            .collect(),
        foreign_members: None,
    }
}

/// Extract the route points from a GeoJSON geometry.
///
/// Supported geometry types:
/// - Point
/// - MultiPoint
/// - LineString
///
/// # Errors
///
/// Returns an error for other geometry types or malformed positions.
pub fn geometry_to_points(geometry: &Geometry) -> Result<Vec<Point>> {
    match &geometry.value {
        GeoJsonValue::Point(position) => Ok(vec![position_to_point(position)?]),
        GeoJsonValue::MultiPoint(positions) | GeoJsonValue::LineString(positions) => positions
            .iter()
            .map(|p| position_to_point(p))
            .collect(),
        _ => Err(RouteGuideError::InvalidGeometry {
            message: "Route geometry must be a Point, MultiPoint or LineString".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_round_trip() {
        let point = Point::new(407838351, -746143763);
        let position = point_to_position(&point);
        assert_eq!(position.len(), 2);
        assert!((position[0] - -74.6143763).abs() < 1e-9);
        assert!((position[1] - 40.7838351).abs() < 1e-9);
        assert_eq!(position_to_point(&position).unwrap(), point);
    }

    #[test]
    fn test_position_with_altitude() {
        let point = position_to_point(&[2.0, 1.0, 350.0]).unwrap();
        assert_eq!(point, Point::new(10_000_000, 20_000_000));
    }

    #[test]
    fn test_position_too_short() {
        assert!(position_to_point(&[1.0]).is_err());
        assert!(position_to_point(&[]).is_err());
    }

    #[test]
    fn test_feature_to_geojson() {
        let feature = Feature::new("Patriots Path", Point::new(407838351, -746143763));
        let geo = feature_to_geojson(&feature);

        let properties = geo.properties.unwrap();
        assert_eq!(properties["name"], "Patriots Path");
        assert_eq!(properties["latitude"], 407838351);
        assert_eq!(properties["longitude"], -746143763);

        match geo.geometry.unwrap().value {
            GeoJsonValue::Point(position) => assert_eq!(position.len(), 2),
            other => panic!("unexpected geometry: {:?}", other),
        }
    }

    #[test]
    fn test_features_to_collection() {
        let features = vec![
            Feature::new("a", Point::new(1, 1)),
            Feature::new("", Point::new(2, 2)),
        ];

        let by_ref = features_to_collection(&features);
        let by_value = features_to_collection(features.clone());
        assert_eq!(by_ref.features.len(), 2);
        assert_eq!(by_ref, by_value);

        let json = serde_json::to_value(&by_ref).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
    }

    #[test]
    fn test_geometry_to_points() {
        let line = Geometry::new(GeoJsonValue::LineString(vec![
            vec![-74.6143763, 40.7838351],
            vec![-74.3999179, 40.8122808],
        ]));
        let points = geometry_to_points(&line).unwrap();
        assert_eq!(
            points,
            vec![
                Point::new(407838351, -746143763),
                Point::new(408122808, -743999179)
            ]
        );

        let single = Geometry::new(GeoJsonValue::Point(vec![0.0, 0.0]));
        assert_eq!(geometry_to_points(&single).unwrap(), vec![Point::new(0, 0)]);
    }

    #[test]
    fn test_geometry_to_points_unsupported() {
        let polygon = Geometry::new(GeoJsonValue::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.0, 0.0],
        ]]));
        assert!(matches!(
            geometry_to_points(&polygon),
            Err(RouteGuideError::InvalidGeometry { .. })
        ));
    }
}
