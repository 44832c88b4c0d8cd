use anyhow::Result;
use routeguide::{geojson::features_to_collection, Feature, Point, Rectangle, RouteGuide};
use std::path::PathBuf;

pub fn run(
    db_path: Option<PathBuf>,
    lo_lat: i32,
    lo_lon: i32,
    hi_lat: i32,
    hi_lon: i32,
    geojson: bool,
) -> Result<()> {
    let service = super::load_service(db_path)?;
    let rectangle = Rectangle::new(Point::new(lo_lat, lo_lon), Point::new(hi_lat, hi_lon));
    let features = service.list_features(rectangle);

    if geojson {
        let collection = features_to_collection(features);
        println!("{}", serde_json::to_string_pretty(&collection)?);
        return Ok(());
    }

    println!("{:>13} {:>13}  {}", "LATITUDE", "LONGITUDE", "NAME");
    println!("{}", "-".repeat(60));

    let mut count = 0;
    for feature in features {
        println!("{}", format_row(&feature));
        count += 1;
    }

    println!();
    println!("Features: {}", count);

    Ok(())
}

fn format_row(feature: &Feature) -> String {
    let name = if feature.is_named() {
        feature.name.as_str()
    } else {
        "(unnamed)"
    };
    format!(
        "{:>13.7} {:>13.7}  {}",
        feature.location.latitude_degrees(),
        feature.location.longitude_degrees(),
        name
    )
}
