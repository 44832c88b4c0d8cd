//! Route recording: turns a sequence of visited points into a summary.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::geo::{distance, Point};

/// Totals for one recorded route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RouteSummary {
    /// Number of points received.
    pub point_count: u32,
    /// Number of points that matched a named feature.
    pub feature_count: u32,
    /// Distance covered in whole meters.
    pub distance: u32,
    /// Whole seconds between the first point and the end of the route.
    pub elapsed_time: u32,
}

/// Accumulates points for a single route.
///
/// Feed points with [`record`](Self::record) as they arrive and call
/// [`finish`](Self::finish) once the input ends. Nothing is reported before
/// that.
///
/// # Example
///
/// ```
/// use routeguide::{Catalog, Point, RouteRecorder};
///
/// let mut recorder = RouteRecorder::new(Catalog::default());
/// recorder.record(Point::new(0, 0));
/// recorder.record(Point::new(10_000_000, 0));
///
/// let summary = recorder.finish();
/// assert_eq!(summary.point_count, 2);
/// assert!(summary.distance > 111_000);
/// ```
#[derive(Debug)]
pub struct RouteRecorder {
    catalog: Catalog,
    point_count: u32,
    feature_count: u32,
    distance: f32,
    previous: Option<Point>,
    started: Option<Instant>,
}

impl RouteRecorder {
    /// Start a new route against a catalog.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            point_count: 0,
            feature_count: 0,
            distance: 0.0,
            previous: None,
            started: None,
        }
    }

    /// Add the next point of the route.
    pub fn record(&mut self, point: Point) {
        self.record_at(point, Instant::now());
    }

    /// Add the next point, received at `now`.
    pub fn record_at(&mut self, point: Point, now: Instant) {
        self.started.get_or_insert(now);
        self.point_count = self.point_count.saturating_add(1);

        if !self.catalog.find_name(&point).is_empty() {
            self.feature_count = self.feature_count.saturating_add(1);
        }

        if let Some(previous) = self.previous {
            self.distance += distance(previous, point);
        }
        self.previous = Some(point);
    }

    /// Number of points recorded so far.
    pub fn point_count(&self) -> u32 {
        self.point_count
    }

    /// Close the route and produce its summary.
    pub fn finish(self) -> RouteSummary {
        self.finish_at(Instant::now())
    }

    /// Close the route at `now` and produce its summary.
    pub fn finish_at(self, now: Instant) -> RouteSummary {
        let elapsed = self
            .started
            .map(|started| now.saturating_duration_since(started))
            .unwrap_or(Duration::ZERO);

        let summary = RouteSummary {
            point_count: self.point_count,
            feature_count: self.feature_count,
            distance: self.distance as u32,
            elapsed_time: u32::try_from(elapsed.as_secs()).unwrap_or(u32::MAX),
        };

        tracing::debug!(
            point_count = summary.point_count,
            feature_count = summary.feature_count,
            distance = summary.distance,
            elapsed_time = summary.elapsed_time,
            "Route recorded"
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Feature;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Feature::new("Patriots Path", Point::new(407838351, -746143763)),
            Feature::new("", Point::new(414653148, -740477477)),
        ])
    }

    #[test]
    fn test_empty_route() {
        let summary = RouteRecorder::new(catalog()).finish();
        assert_eq!(summary, RouteSummary::default());
    }

    #[test]
    fn test_single_point() {
        let mut recorder = RouteRecorder::new(catalog());
        recorder.record(Point::new(407838351, -746143763));
        let summary = recorder.finish();

        assert_eq!(summary.point_count, 1);
        assert_eq!(summary.feature_count, 1);
        assert_eq!(summary.distance, 0);
    }

    #[test]
    fn test_distance_is_sum_of_legs() {
        let p1 = Point::new(407838351, -746143763);
        let p2 = Point::new(408122808, -743999179);
        let p3 = Point::new(413628156, -749015468);

        let mut recorder = RouteRecorder::new(catalog());
        for p in [p1, p2, p3] {
            recorder.record(p);
        }
        assert_eq!(recorder.point_count(), 3);
        let summary = recorder.finish();

        let expected = distance(p1, p2) + distance(p2, p3);
        assert_eq!(summary.point_count, 3);
        assert!((summary.distance as f32 - expected).abs() <= 1.0);
        assert_eq!(summary.feature_count, 1);
    }

    #[test]
    fn test_unnamed_feature_not_counted() {
        let mut recorder = RouteRecorder::new(catalog());
        recorder.record(Point::new(414653148, -740477477));
        recorder.record(Point::new(0, 0));
        assert_eq!(recorder.finish().feature_count, 0);
    }

    #[test]
    fn test_repeated_point_counts_each_visit() {
        let p = Point::new(407838351, -746143763);
        let mut recorder = RouteRecorder::new(catalog());
        recorder.record(p);
        recorder.record(p);
        let summary = recorder.finish();

        assert_eq!(summary.point_count, 2);
        assert_eq!(summary.feature_count, 2);
        assert_eq!(summary.distance, 0);
    }

    #[test]
    fn test_elapsed_time_from_first_point() {
        let start = Instant::now();
        let mut recorder = RouteRecorder::new(catalog());
        recorder.record_at(Point::new(0, 0), start);
        recorder.record_at(Point::new(1, 1), start + Duration::from_millis(1500));

        let summary = recorder.finish_at(start + Duration::from_millis(2999));
        assert_eq!(summary.elapsed_time, 2);
    }

    #[test]
    fn test_summary_json_shape() {
        let summary = RouteSummary {
            point_count: 3,
            feature_count: 1,
            distance: 42,
            elapsed_time: 7,
        };
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["point_count"], 3);
        assert_eq!(json["feature_count"], 1);
        assert_eq!(json["distance"], 42);
        assert_eq!(json["elapsed_time"], 7);
    }
}
