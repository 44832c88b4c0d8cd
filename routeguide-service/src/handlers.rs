//! HTTP request handlers for the route guide service.
//!
//! Streaming calls use newline-delimited JSON (one message per line) over
//! plain HTTP, and JSON text frames over a WebSocket for the note exchange.

use std::io;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::header,
    response::IntoResponse,
    Json,
};
use futures::{
    future,
    sink::SinkExt,
    stream::{self, Stream, StreamExt, TryStreamExt},
};
use routeguide::{Feature, Point, Rectangle, RouteGuide, RouteNote, RouteSummary};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio_util::{
    codec::{FramedRead, LinesCodec},
    io::StreamReader,
};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::AppState;

/// Content type of streamed responses and request bodies.
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Longest accepted line in a streamed request body.
const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Query parameters naming a single point.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PointQuery {
    /// Latitude in degrees × 10^7.
    pub latitude: i32,
    /// Longitude in degrees × 10^7.
    pub longitude: i32,
}

impl From<PointQuery> for Point {
    fn from(query: PointQuery) -> Self {
        Point::new(query.latitude, query.longitude)
    }
}

/// Query parameters naming two opposite corners of a region.
///
/// The corners may be given in any order.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RectangleQuery {
    /// Latitude of the first corner.
    pub lo_latitude: i32,
    /// Longitude of the first corner.
    pub lo_longitude: i32,
    /// Latitude of the opposite corner.
    pub hi_latitude: i32,
    /// Longitude of the opposite corner.
    pub hi_longitude: i32,
}

impl From<RectangleQuery> for Rectangle {
    fn from(query: RectangleQuery) -> Self {
        Rectangle::new(
            Point::new(query.lo_latitude, query.lo_longitude),
            Point::new(query.hi_latitude, query.hi_longitude),
        )
    }
}

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Catalog and chat statistics.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    /// Number of features in the catalog.
    pub features: usize,
    /// Number of features with a name.
    pub named_features: usize,
    /// Number of route notes stored so far.
    pub notes: usize,
}

/// Get the feature at a point.
///
/// Always succeeds: when nothing is known at the point, the response carries
/// an empty name and the requested location.
#[utoipa::path(
    get,
    path = "/feature",
    tag = "features",
    params(PointQuery),
    responses(
        (status = 200, description = "Feature at the point (empty name if none)", body = Feature),
        (status = 400, description = "Missing or malformed coordinates")
    )
)]
pub async fn get_feature(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PointQuery>,
) -> Json<Feature> {
    let point = Point::from(query);
    let feature = state.route_guide.get_feature(point);

    tracing::info!(
        latitude = point.latitude,
        longitude = point.longitude,
        name = %feature.name,
        "Feature lookup"
    );

    Json(feature)
}

/// Stream every feature inside a rectangle.
///
/// The response body is newline-delimited JSON, one feature per line, in
/// catalog order.
#[utoipa::path(
    get,
    path = "/features",
    tag = "features",
    params(RectangleQuery),
    responses(
        (status = 200, description = "Features inside the rectangle, one JSON object per line",
         body = [Feature], content_type = "application/x-ndjson"),
        (status = 400, description = "Missing or malformed corners")
    )
)]
pub async fn list_features(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RectangleQuery>,
) -> impl IntoResponse {
    let rectangle = Rectangle::from(query);
    let bounds = rectangle.bounds();

    tracing::debug!(
        left = bounds.left,
        right = bounds.right,
        top = bounds.top,
        bottom = bounds.bottom,
        "Listing features"
    );

    let features = state.route_guide.list_features(rectangle);
    let lines = stream::iter(features).map(|feature| to_ndjson_line(&feature));

    (
        [(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)],
        Body::from_stream(lines),
    )
}

/// Record a route and return its summary.
///
/// The request body is newline-delimited JSON points. The summary is sent
/// once the body ends.
#[utoipa::path(
    post,
    path = "/route",
    tag = "routes",
    request_body(content = String, content_type = "application/x-ndjson",
        description = "One point per line, e.g. {\"latitude\":407838351,\"longitude\":-746143763}"),
    responses(
        (status = 200, description = "Summary of the recorded route", body = RouteSummary),
        (status = 400, description = "A line was not a valid point", body = ErrorResponse)
    )
)]
pub async fn record_route(
    State(state): State<Arc<AppState>>,
    body: Body,
) -> Result<Json<RouteSummary>, ApiError> {
    let summary = state
        .route_guide
        .record_route(ndjson_stream::<Point>(body))
        .await?;

    tracing::info!(
        point_count = summary.point_count,
        feature_count = summary.feature_count,
        distance = summary.distance,
        elapsed_time = summary.elapsed_time,
        "Route recorded"
    );

    Ok(Json(summary))
}

/// Open a note exchange over a WebSocket.
///
/// Each text frame from the client is a JSON route note. For every note the
/// server sends back, as separate frames, the notes previously left at the
/// same location.
pub async fn route_chat(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_chat(socket, state))
}

async fn handle_chat(socket: WebSocket, state: Arc<AppState>) {
    tracing::info!("Chat session started");

    let (mut sender, receiver) = socket.split();
    let inbound = receiver
        .map_err(ApiError::from)
        .try_take_while(|message| {
            let open = !matches!(message, Message::Close(_));
            future::ready(Ok::<bool, ApiError>(open))
        })
        .try_filter_map(|message| future::ready(decode_note(message)));

    let replies = state.route_guide.route_chat(inbound);
    let mut replies = std::pin::pin!(replies);

    let outcome: Result<usize, ApiError> = async {
        let mut sent = 0;
        while let Some(note) = replies.try_next().await? {
            sender.send(encode_note(&note)?).await?;
            sent += 1;
        }
        Ok(sent)
    }
    .await;

    match outcome {
        Ok(sent) => tracing::info!(replayed = sent, "Chat session ended"),
        Err(ApiError::Json(e)) => {
            tracing::warn!(error = %e, "Chat session closed on invalid note");
            let frame = CloseFrame {
                code: close_code::INVALID,
                reason: "invalid route note".into(),
            };
            if let Err(e) = sender.send(Message::Close(Some(frame))).await {
                tracing::debug!(error = %e, "Failed to send close frame");
            }
        }
        Err(e) => tracing::warn!(error = %e, "Chat session aborted"),
    }
}

/// Decode a route note from a WebSocket frame.
///
/// Control frames carry no note and yield `None`.
pub fn decode_note(message: Message) -> Result<Option<RouteNote>, ApiError> {
    match message {
        Message::Text(text) => Ok(Some(serde_json::from_str(&text)?)),
        Message::Binary(data) => Ok(Some(serde_json::from_slice(&data)?)),
        Message::Ping(_) | Message::Pong(_) | Message::Close(_) => Ok(None),
    }
}

/// Encode a route note as a WebSocket text frame.
pub fn encode_note(note: &RouteNote) -> Result<Message, ApiError> {
    Ok(Message::Text(serde_json::to_string(note)?))
}

/// Decode a newline-delimited JSON body into a stream of messages.
///
/// Blank lines are skipped. A line that fails to parse ends the stream with
/// an error.
pub fn ndjson_stream<T>(body: Body) -> impl Stream<Item = Result<T, ApiError>> + Send
where
    T: DeserializeOwned + Send,
{
    let bytes = body
        .into_data_stream()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e));

    FramedRead::new(
        StreamReader::new(bytes),
        LinesCodec::new_with_max_length(MAX_LINE_LENGTH),
    )
    .map_err(ApiError::from)
    .try_filter(|line| future::ready(!line.trim().is_empty()))
    .and_then(|line| future::ready(serde_json::from_str::<T>(&line).map_err(ApiError::from)))
}

fn to_ndjson_line<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut line = serde_json::to_string(value)?;
    line.push('\n');
    Ok(line)
}

/// Health check endpoint.
///
/// Returns service status and version.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Service is running", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Get catalog and chat statistics.
#[utoipa::path(
    get,
    path = "/stats",
    tag = "system",
    responses((status = 200, description = "Catalog and chat statistics", body = StatsResponse))
)]
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let catalog = state.route_guide.catalog();

    Json(StatsResponse {
        features: catalog.len(),
        named_features: catalog.named_count(),
        notes: state.route_guide.note_log().len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_query_deserialize() {
        let json = r#"{"lo_latitude": 1, "lo_longitude": 2, "hi_latitude": 3, "hi_longitude": 4}"#;
        let query: RectangleQuery = serde_json::from_str(json).unwrap();
        let rect = Rectangle::from(query);
        assert_eq!(rect.lo, Point::new(1, 2));
        assert_eq!(rect.hi, Point::new(3, 4));
    }

    #[test]
    fn test_decode_note_text() {
        let message =
            Message::Text(r#"{"location":{"latitude":1,"longitude":2},"message":"hi"}"#.into());
        let note = decode_note(message).unwrap().unwrap();
        assert_eq!(note, RouteNote::new(Point::new(1, 2), "hi"));
    }

    #[test]
    fn test_decode_note_binary() {
        let message =
            Message::Binary(br#"{"location":{"latitude":3,"longitude":4},"message":""}"#.to_vec());
        let note = decode_note(message).unwrap().unwrap();
        assert_eq!(note.location, Point::new(3, 4));
    }

    #[test]
    fn test_decode_note_control_frames() {
        assert!(decode_note(Message::Ping(vec![1])).unwrap().is_none());
        assert!(decode_note(Message::Pong(Vec::new())).unwrap().is_none());
    }

    #[test]
    fn test_decode_note_invalid() {
        let result = decode_note(Message::Text("not json".into()));
        assert!(matches!(result, Err(ApiError::Json(_))));
    }

    #[test]
    fn test_encode_note() {
        let note = RouteNote::new(Point::new(5, 6), "hello");
        match encode_note(&note).unwrap() {
            Message::Text(text) => {
                let decoded: RouteNote = serde_json::from_str(&text).unwrap();
                assert_eq!(decoded, note);
            }
            other => panic!("unexpected frame: {:?}", other),
        }
    }

    #[test]
    fn test_ndjson_line() {
        let line = to_ndjson_line(&Point::new(1, 2)).unwrap();
        assert_eq!(line, "{\"latitude\":1,\"longitude\":2}\n");
    }

    #[tokio::test]
    async fn test_ndjson_stream_skips_blank_lines() {
        let body = Body::from("{\"latitude\":1,\"longitude\":2}\n\n  \n{\"latitude\":3,\"longitude\":4}");
        let points: Vec<Point> = ndjson_stream::<Point>(body).try_collect().await.unwrap();
        assert_eq!(points, vec![Point::new(1, 2), Point::new(3, 4)]);
    }

    #[tokio::test]
    async fn test_ndjson_stream_invalid_line() {
        let body = Body::from("{\"latitude\":1,\"longitude\":2}\n{oops}\n");
        let result: Result<Vec<Point>, ApiError> = ndjson_stream::<Point>(body).try_collect().await;
        assert!(matches!(result, Err(ApiError::Json(_))));
    }
}
