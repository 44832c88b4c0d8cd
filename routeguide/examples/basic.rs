//! Basic example demonstrating routeguide library usage.
//!
//! Run with: cargo run --example basic -- /path/to/route_guide_db.json

use futures::executor::block_on;
use futures::stream::{self, StreamExt};
use routeguide::{
    Point, Rectangle, RouteGuide, RouteGuideError, RouteGuideServiceBuilder, RouteNote,
};
use std::convert::Infallible;
use std::env;

fn main() -> Result<(), RouteGuideError> {
    // Get database path from command line
    let db_path = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example basic -- /path/to/route_guide_db.json");
        std::process::exit(1);
    });

    let service = RouteGuideServiceBuilder::new(&db_path).build()?;

    println!("Feature lookups:");
    println!("{:-<50}", "");

    for point in [Point::new(409146138, -746188906), Point::new(0, 0)] {
        let feature = service.get_feature(point);
        if feature.name.is_empty() {
            println!("{:?}: no feature", point);
        } else {
            println!("{:?}: {}", point, feature.name);
        }
    }

    let rect = Rectangle::new(
        Point::new(400000000, -750000000),
        Point::new(420000000, -730000000),
    );
    println!("\nFeatures in {:?}:", rect);
    for feature in service.list_features(rect).filter(|f| f.is_named()) {
        println!("  {}", feature.name);
    }

    let route: Vec<Point> = service
        .catalog()
        .features()
        .iter()
        .take(10)
        .map(|f| f.location)
        .collect();
    let points = stream::iter(route.into_iter().map(Ok::<_, Infallible>));
    let summary = block_on(service.record_route(points)).unwrap_or_default();
    println!("\nRoute summary:");
    println!("  Points: {}", summary.point_count);
    println!("  Features: {}", summary.feature_count);
    println!("  Distance: {}m", summary.distance);

    let notes = vec![
        RouteNote::new(Point::new(0, 1), "First message"),
        RouteNote::new(Point::new(0, 2), "Second message"),
        RouteNote::new(Point::new(0, 1), "Third message"),
    ];
    let replies = stream::iter(notes.into_iter().map(Ok::<_, Infallible>));
    println!("\nChat replies:");
    block_on(service.route_chat(replies).for_each(|reply| {
        if let Ok(note) = reply {
            println!("  {:?}: {}", note.location, note.message);
        }
        futures::future::ready(())
    }));

    Ok(())
}
