//! Blocking (sync) usage example for the Image-Charts client library
//!
//! Suitable for build scripts and other contexts without an async runtime.
//!
//! To run this example:
//! ```bash
//! cargo run --example blocking_usage -- chart.png
//! ```

use image_charts::{ChartKind, ChartOptions, ImageCharts};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args().nth(1).unwrap_or_else(|| "chart.png".to_owned());

    let client = ImageCharts::from_env()?;

    let kind: ChartKind = "doughnut".parse()?;
    let chart = client.chart(
        kind,
        ChartOptions::from(json!({
            "data": [30, 50, 20],
            "labels": ["Rust", "Go", "Zig"],
            "size": [400, 400],
        })),
    );

    println!("Fetching {}", chart.url()?);

    // Blocking call - no tokio runtime needed!
    let bytes = chart.buffer_blocking()?;
    std::fs::write(&output, &bytes)?;

    println!("Wrote {} bytes ({}) to {output}", bytes.len(), chart.mime_type());

    Ok(())
}
