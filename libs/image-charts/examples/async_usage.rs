//! Async usage example for the Image-Charts client library
//!
//! Renders a few charts and prints their URLs and data URIs.
//!
//! To run this example:
//! ```bash
//! export IMAGE_CHARTS_ID="your-account-id"      # Optional, enables signing
//! export IMAGE_CHARTS_SECRET="your-secret-key"  # Optional, enables signing
//! cargo run --example async_usage
//! ```

use image_charts::{ChartOptions, ImageCharts};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Settings file first, then IMAGE_CHARTS_ID / IMAGE_CHARTS_SECRET
    let client = ImageCharts::from_env()?;

    println!("=== Example 1: Pie Chart URL ===\n");

    let pie = client.pie(
        ChartOptions::new()
            .with("data", json!([60, 40]))
            .with("labels", json!(["60%", "40%"]))
            .with("seriesColors", json!(["#ff0000", "#00ff00"]))
            .with("size", json!([700, 700])),
    );
    println!("URL: {}\n", pie.url()?);

    println!("=== Example 2: Stacked Bar Chart as Data URI ===\n");

    let bar = client.bar(
        ChartOptions::new()
            .with("data", json!([[10, 20, 30], [15, 25, 35]]))
            .with("stacked", true)
            .with("axisLabels", json!([["Jan", "Feb", "Mar"]]))
            .with("size", json!([600, 300])),
    );
    let uri = bar.data_uri().await?;
    println!("Data URI ({} chars): {}...\n", uri.len(), &uri[..uri.len().min(64)]);

    println!("=== Example 3: Error Classification ===\n");

    // No size: the service rejects the request
    let invalid = client.line(ChartOptions::new().with("data", json!([1, 2, 3])));
    match invalid.buffer().await {
        Ok(bytes) => println!("Unexpected success: {} bytes", bytes.len()),
        Err(err) => println!("{err}: {}\n", err.raw().unwrap_or("no detail")),
    }

    println!("=== All examples completed successfully! ===");

    Ok(())
}
