use anyhow::Result;
use routeguide::{Point, RouteGuide};
use std::path::PathBuf;

use super::load_service;

pub fn run(db_path: Option<PathBuf>, lat: i32, lon: i32, json: bool) -> Result<()> {
    let service = load_service(db_path)?;
    let feature = service.get_feature(Point::new(lat, lon));

    if json {
        println!("{}", serde_json::to_string(&feature)?);
    } else if feature.is_named() {
        println!("{}", feature.name);
    } else {
        println!(
            "No feature at {:.7}, {:.7}",
            feature.location.latitude_degrees(),
            feature.location.longitude_degrees()
        );
    }

    Ok(())
}
