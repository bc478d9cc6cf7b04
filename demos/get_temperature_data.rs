//! Downloads the 2018 monthly means of 2 m temperature on a 2° grid to
//! `temperature-data.nc` in the working directory.

use cdsfetch::{Cds, CdsError, Grid};

#[tokio::main]
async fn main() -> Result<(), CdsError> {
    let client = Cds::new().await?;

    let file = client
        .temperature()
        .year(2018)
        .grid(Grid(2.0, 2.0))
        .call()
        .await?;

    println!(
        "Job {} finished, wrote {} bytes to {}",
        file.job_id,
        file.bytes,
        file.path.display()
    );
    Ok(())
}
