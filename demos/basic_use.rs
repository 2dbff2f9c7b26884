use weather_dashboard::{
    bucket_by_day, describe_correlation, display_label, field_unit, pearson, summarize_numeric,
    DashboardError, DataService,
};

#[tokio::main]
async fn main() -> Result<(), DashboardError> {
    let service = DataService::with_default_cache().await?;

    let published = match service.load(false).await {
        Ok(published) => published,
        Err(e) => {
            eprintln!("Could not load station data ({e}), using sample data");
            service.load_sample().await
        }
    };
    let loaded = published.latest();
    println!(
        "Loaded {} rows from {:?}",
        loaded.dataset.len(),
        loaded.origin
    );

    for summary in summarize_numeric(&loaded.dataset, &loaded.classification, 4) {
        println!(
            "{:<24} avg {:>9.2} {:<5} min {:>9.2} max {:>9.2} ({:?} {:.1}%)",
            display_label(&summary.column),
            summary.mean,
            field_unit(&summary.column).unwrap_or(""),
            summary.min,
            summary.max,
            summary.trend,
            summary.change_percent.abs()
        );
    }

    let numeric = loaded.classification.numeric_columns();
    if let [x, y, ..] = numeric.as_slice() {
        let r = pearson(&loaded.dataset, x, y);
        println!("{x} vs {y}: r = {r:.4} ({})", describe_correlation(r));
    }

    if let (Some(time), Some(value)) = (loaded.classification.time_column(), numeric.first()) {
        for bucket in bucket_by_day(&loaded.dataset, time, value) {
            println!("{} {:>10.2} over {} rows", bucket.day, bucket.total, bucket.rows);
        }
    }

    Ok(())
}
