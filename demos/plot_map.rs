//! Renders near-surface air temperature for January 2018 on a -60 °C..50 °C
//! `RdYlBu_r` scale and writes it to `map.html`.

use cdsfetch::{Cds, CdsError};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), CdsError> {
    let client = Cds::new().await?;

    let map = client.map().year(2018).month(1).call().await?;

    let summary = map.field().summary()?;
    println!(
        "{}: {} points, min {:?}, max {:?}",
        map.title(),
        summary.valid_points,
        summary.min,
        summary.max
    );

    map.write_html(Path::new("map.html"))?;
    Ok(())
}
