//! Downloads the station CSV once and writes the offline JSON artifacts.
//!
//! Usage: `convert_csv_to_json [output-dir]` (defaults to `public/data`).

use std::path::PathBuf;
use weather_dashboard::{write_offline_artifacts, DashboardError, DataService, MemoryStore};

#[tokio::main]
async fn main() -> Result<(), DashboardError> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("public").join("data"));

    let service = DataService::builder().store(MemoryStore::new()).build();
    let published = service.load(true).await?;
    let loaded = published.latest();

    let metadata =
        write_offline_artifacts(&out_dir, &loaded.dataset, &loaded.classification).await?;
    println!(
        "Wrote {} rows with {} columns to {}",
        metadata.total_rows,
        metadata.columns.len(),
        out_dir.display()
    );
    Ok(())
}
