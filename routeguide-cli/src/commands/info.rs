use anyhow::Result;
use routeguide::Point;
use std::path::PathBuf;

pub fn run(db_path: Option<PathBuf>) -> Result<()> {
    let service = super::load_service(db_path)?;
    let catalog = service.catalog();

    let total = catalog.len();
    let named = catalog.named_count();

    println!("Features: {}", total);
    println!("Named: {}", named);
    println!("Unnamed: {}", total - named);
    println!();

    match catalog.bounds() {
        Some(bounds) => {
            let south_west = Point::new(bounds.bottom, bounds.left);
            let north_east = Point::new(bounds.top, bounds.right);
            println!(
                "Latitude: {:.7} to {:.7}",
                south_west.latitude_degrees(),
                north_east.latitude_degrees()
            );
            println!(
                "Longitude: {:.7} to {:.7}",
                south_west.longitude_degrees(),
                north_east.longitude_degrees()
            );
        }
        None => println!("Coverage: empty database"),
    }

    Ok(())
}
