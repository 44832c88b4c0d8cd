//! The route guide service.
//!
//! This module provides the [`RouteGuide`] trait, the set of operations a
//! transport exposes to clients, and [`RouteGuideService`], its
//! implementation over a [`Catalog`] and a shared [`NoteLog`].
//!
//! ```ignore
//! use routeguide::{Point, RouteGuide, RouteGuideServiceBuilder};
//!
//! let service = RouteGuideServiceBuilder::new("route_guide_db.json").build()?;
//!
//! let feature = service.get_feature(Point::new(407838351, -746143763));
//! println!("{}", feature.name);
//! ```
//!
//! # Streaming Calls
//!
//! `record_route` and `route_chat` take the caller's inbound messages as a
//! [`Stream`] of `Result`s. An `Err` item means the transport failed to
//! deliver a message; it is passed back to the caller unchanged.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::{self, Stream, StreamExt, TryStreamExt};

use crate::catalog::{Catalog, Feature, ListFeatures};
use crate::error::{Result, RouteGuideError};
use crate::geo::{Point, Rectangle};
use crate::notes::{NoteLog, RouteNote};
use crate::route::{RouteRecorder, RouteSummary};

/// Environment variable naming the feature database file.
pub const DB_PATH_ENV: &str = "ROUTEGUIDE_DB_PATH";

/// The four route guide operations.
///
/// Every operation succeeds for any well-formed input: unknown points,
/// empty regions and empty routes all produce empty results rather than
/// errors. Implementations must be safe to call from many tasks at once.
pub trait RouteGuide: Send + Sync {
    /// Look up the feature at a point.
    ///
    /// Always returns a feature located at `point`; its name is empty when
    /// the catalog has nothing there.
    fn get_feature(&self, point: Point) -> Feature;

    /// Lazily list the features inside a rectangle, in catalog order.
    fn list_features(&self, rectangle: Rectangle) -> ListFeatures;

    /// Consume a route and summarize it once the stream ends.
    fn record_route<S, E>(
        &self,
        points: S,
    ) -> impl Future<Output = std::result::Result<RouteSummary, E>> + Send
    where
        S: Stream<Item = std::result::Result<Point, E>> + Send,
        E: Send;

    /// Exchange notes: each inbound note is answered with the notes
    /// previously left at the same location, then stored.
    fn route_chat<S, E>(
        &self,
        notes: S,
    ) -> impl Stream<Item = std::result::Result<RouteNote, E>> + Send + 'static
    where
        S: Stream<Item = std::result::Result<RouteNote, E>> + Send + 'static,
        E: Send + 'static;
}

/// Route guide over an immutable feature catalog.
///
/// Cloning the service is cheap; clones share the catalog and the note log.
///
/// # Example
///
/// ```
/// use routeguide::{Catalog, Feature, Point, RouteGuide, RouteGuideService};
///
/// let catalog = Catalog::new(vec![Feature::new(
///     "Patriots Path",
///     Point::new(407838351, -746143763),
/// )]);
/// let service = RouteGuideService::new(catalog);
///
/// let found = service.get_feature(Point::new(407838351, -746143763));
/// assert_eq!(found.name, "Patriots Path");
///
/// let missing = service.get_feature(Point::new(0, 0));
/// assert_eq!(missing.name, "");
/// assert_eq!(missing.location, Point::new(0, 0));
/// ```
#[derive(Debug, Clone)]
pub struct RouteGuideService {
    /// Features loaded at startup.
    catalog: Catalog,
    /// Notes from every chat session, shared with each running chat.
    notes: Arc<NoteLog>,
}

impl RouteGuideService {
    /// Create a service with an empty note log.
    pub fn new(catalog: Catalog) -> Self {
        Self::with_note_log(catalog, Arc::new(NoteLog::new()))
    }

    /// Create a service that stores chat notes in an existing log.
    pub fn with_note_log(catalog: Catalog, notes: Arc<NoteLog>) -> Self {
        Self { catalog, notes }
    }

    /// Create a builder for more configuration options.
    pub fn builder<P: AsRef<Path>>(db_path: P) -> RouteGuideServiceBuilder {
        RouteGuideServiceBuilder::new(db_path)
    }

    /// The feature catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The shared chat history.
    pub fn note_log(&self) -> &Arc<NoteLog> {
        &self.notes
    }
}

impl RouteGuide for RouteGuideService {
    fn get_feature(&self, point: Point) -> Feature {
        tracing::debug!(
            latitude = point.latitude,
            longitude = point.longitude,
            "Feature lookup"
        );
        Feature::new(self.catalog.find_name(&point), point)
    }

    fn list_features(&self, rectangle: Rectangle) -> ListFeatures {
        self.catalog.within(&rectangle)
    }

    fn record_route<S, E>(
        &self,
        points: S,
    ) -> impl Future<Output = std::result::Result<RouteSummary, E>> + Send
    where
        S: Stream<Item = std::result::Result<Point, E>> + Send,
        E: Send,
    {
        let mut recorder = RouteRecorder::new(self.catalog.clone());
        async move {
            let mut points = std::pin::pin!(points);
            while let Some(point) = points.try_next().await? {
                recorder.record(point);
            }
            Ok(recorder.finish())
        }
    }

    fn route_chat<S, E>(
        &self,
        notes: S,
    ) -> impl Stream<Item = std::result::Result<RouteNote, E>> + Send + 'static
    where
        S: Stream<Item = std::result::Result<RouteNote, E>> + Send + 'static,
        E: Send + 'static,
    {
        let log = Arc::clone(&self.notes);
        notes
            .map_ok(move |note| {
                let location = note.location;
                let replay = log.replay_and_append(note);
                tracing::debug!(
                    latitude = location.latitude,
                    longitude = location.longitude,
                    replayed = replay.len(),
                    "Route note stored"
                );
                stream::iter(replay).map(Ok::<RouteNote, E>)
            })
            .try_flatten()
    }
}

/// Builder for creating [`RouteGuideService`] from a feature database.
///
/// # Example
///
/// ```ignore
/// use routeguide::RouteGuideServiceBuilder;
///
/// let service = RouteGuideServiceBuilder::from_env()?.build()?;
/// ```
#[derive(Debug, Clone)]
pub struct RouteGuideServiceBuilder {
    db_path: PathBuf,
    catalog: Option<Catalog>,
    notes: Option<Arc<NoteLog>>,
}

impl RouteGuideServiceBuilder {
    /// Create a new builder reading the given feature database.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            catalog: None,
            notes: None,
        }
    }

    /// Create a builder configured from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `ROUTEGUIDE_DB_PATH` | Feature database JSON file | Required |
    ///
    /// # Errors
    ///
    /// Returns an error if `ROUTEGUIDE_DB_PATH` is not set.
    pub fn from_env() -> Result<Self> {
        let db_path = std::env::var(DB_PATH_ENV)
            .map_err(|_| RouteGuideError::MissingConfig { var: DB_PATH_ENV })?;
        Ok(Self::new(db_path))
    }

    /// Set the feature database path.
    ///
    /// Overrides the path set in the constructor or from environment.
    pub fn db_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.db_path = path.as_ref().to_path_buf();
        self
    }

    /// Use an already loaded catalog instead of reading the database file.
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Share an existing note log instead of starting an empty one.
    pub fn note_log(mut self, notes: Arc<NoteLog>) -> Self {
        self.notes = Some(notes);
        self
    }

    /// The configured feature database path.
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Build the [`RouteGuideService`].
    ///
    /// # Errors
    ///
    /// Returns an error if the feature database cannot be read or parsed.
    pub fn build(self) -> Result<RouteGuideService> {
        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => Catalog::from_file(&self.db_path)?,
        };
        let notes = self.notes.unwrap_or_default();
        Ok(RouteGuideService::with_note_log(catalog, notes))
    }
}
