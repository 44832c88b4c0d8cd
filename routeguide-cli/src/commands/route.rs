use anyhow::{bail, Context, Result};
use geojson::GeoJson;
use indicatif::{ProgressBar, ProgressStyle};
use routeguide::{geojson::geometry_to_points, Point, RouteRecorder, RouteSummary};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

pub fn run(
    db_path: Option<PathBuf>,
    input: PathBuf,
    lat_col: String,
    lon_col: String,
    json: bool,
) -> Result<()> {
    let service = super::load_service(db_path)?;

    // Detect file format
    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let file = File::open(&input).context("Failed to open input file")?;
    let reader = BufReader::new(file);

    let points = match extension.as_str() {
        "csv" => read_csv_points(reader, &lat_col, &lon_col)?,
        "geojson" | "json" => read_geojson_points(reader)?,
        _ => bail!(
            "Unsupported file format: {}. Use .csv or .geojson",
            extension
        ),
    };

    let pb = ProgressBar::new(points.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let mut recorder = RouteRecorder::new(service.catalog().clone());
    for point in points {
        recorder.record(point);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let summary = recorder.finish();

    if json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        print!("{}", format_summary(&summary));
    }

    Ok(())
}

/// Plain-text summary of a route read from a file.
///
/// Elapsed time is left out: the points arrive all at once.
fn format_summary(summary: &RouteSummary) -> String {
    format!(
        "Points: {}\nFeatures visited: {}\nDistance: {} m\n",
        summary.point_count, summary.feature_count, summary.distance
    )
}

/// Read route points from a CSV file with scaled integer coordinates.
fn read_csv_points<R: Read>(reader: R, lat_col: &str, lon_col: &str) -> Result<Vec<Point>> {
    let mut reader = csv::Reader::from_reader(reader);

    // Find column indices
    let headers = reader.headers()?.clone();
    let lat_idx = headers
        .iter()
        .position(|h| h == lat_col)
        .with_context(|| format!("Column '{}' not found in CSV", lat_col))?;
    let lon_idx = headers
        .iter()
        .position(|h| h == lon_col)
        .with_context(|| format!("Column '{}' not found in CSV", lon_col))?;

    let mut points = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let lat: i32 = record
            .get(lat_idx)
            .context("Missing latitude")?
            .trim()
            .parse()
            .with_context(|| format!("Invalid latitude on row {}", row + 1))?;
        let lon: i32 = record
            .get(lon_idx)
            .context("Missing longitude")?
            .trim()
            .parse()
            .with_context(|| format!("Invalid longitude on row {}", row + 1))?;
        points.push(Point::new(lat, lon));
    }

    Ok(points)
}

/// Read route points from GeoJSON, joining every geometry in document order.
fn read_geojson_points<R: Read>(reader: R) -> Result<Vec<Point>> {
    let geojson: GeoJson = serde_json::from_reader(reader).context("Failed to parse GeoJSON")?;

    let geometries = match geojson {
        GeoJson::Geometry(geometry) => vec![geometry],
        GeoJson::Feature(feature) => feature.geometry.into_iter().collect(),
        GeoJson::FeatureCollection(fc) => fc
            .features
            .into_iter()
            .filter_map(|feature| feature.geometry)
            .collect(),
    };

    let mut points = Vec::new();
    for geometry in &geometries {
        points.extend(geometry_to_points(geometry)?);
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_summary() {
        let summary = RouteSummary {
            point_count: 3,
            feature_count: 1,
            distance: 4213,
            elapsed_time: 0,
        };
        let text = format_summary(&summary);
        assert_eq!(text, "Points: 3\nFeatures visited: 1\nDistance: 4213 m\n");
        assert!(!text.contains("Elapsed"));
    }

    #[test]
    fn test_read_csv_points() {
        let data = "name,latitude,longitude\nstart,407838351,-746143763\nend, 408122808 ,-743999179\n";
        let points = read_csv_points(data.as_bytes(), "latitude", "longitude").unwrap();
        assert_eq!(
            points,
            vec![
                Point::new(407838351, -746143763),
                Point::new(408122808, -743999179)
            ]
        );
    }

    #[test]
    fn test_read_csv_custom_columns() {
        let data = "lat,lon\n1,2\n";
        let points = read_csv_points(data.as_bytes(), "lat", "lon").unwrap();
        assert_eq!(points, vec![Point::new(1, 2)]);
    }

    #[test]
    fn test_read_csv_missing_column() {
        let data = "lat,lon\n1,2\n";
        let err = read_csv_points(data.as_bytes(), "latitude", "longitude").unwrap_err();
        assert!(err.to_string().contains("latitude"));
    }

    #[test]
    fn test_read_csv_invalid_value() {
        let data = "latitude,longitude\n40.5,-74.1\n";
        assert!(read_csv_points(data.as_bytes(), "latitude", "longitude").is_err());
    }

    #[test]
    fn test_read_geojson_line_string() {
        let data = r#"{"type":"LineString","coordinates":[[-74.6143763,40.7838351],[-74.3999179,40.8122808]]}"#;
        let points = read_geojson_points(data.as_bytes()).unwrap();
        assert_eq!(
            points,
            vec![
                Point::new(407838351, -746143763),
                Point::new(408122808, -743999179)
            ]
        );
    }

    #[test]
    fn test_read_geojson_feature_collection_file() {
        let data = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}},
                {"type": "Feature", "properties": {}, "geometry": null},
                {"type": "Feature", "properties": {}, "geometry": {"type": "MultiPoint", "coordinates": [[1.0, 1.0], [2.0, 2.0]]}}
            ]
        }"#;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(data.as_bytes()).unwrap();

        let reader = BufReader::new(File::open(file.path()).unwrap());
        let points = read_geojson_points(reader).unwrap();
        assert_eq!(
            points,
            vec![
                Point::new(0, 0),
                Point::new(10_000_000, 10_000_000),
                Point::new(20_000_000, 20_000_000)
            ]
        );
    }

    #[test]
    fn test_read_geojson_unsupported_geometry() {
        let data = r#"{"type":"Polygon","coordinates":[[[0.0,0.0],[1.0,0.0],[0.0,1.0],[0.0,0.0]]]}"#;
        assert!(read_geojson_points(data.as_bytes()).is_err());
    }
}
