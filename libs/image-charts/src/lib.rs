//! Image-Charts client library
//!
//! Turns chart descriptions into Image-Charts request URLs and fetches the
//! rendered image:
//!
//! - Map friendly option names (`data`, `size`, `labels`, ...) to the
//!   provider's short query keys
//! - Sign requests with HMAC-SHA256 when an account and secret are configured
//! - Fetch the image as bytes or as a data URI, async or blocking
//! - Classify every failure by HTTP status
//!
//! # Examples
//!
//! ## Async Usage
//!
//! ```no_run
//! use image_charts::{ChartOptions, ClientConfig, ImageCharts};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ImageCharts::new(ClientConfig::builder().build()?)?;
//!
//! let chart = client.pie(
//!     ChartOptions::new()
//!         .with("data", json!([60, 40]))
//!         .with("labels", json!(["60%", "40%"]))
//!         .with("size", json!([700, 700])),
//! );
//!
//! println!("{}", chart.url()?);
//! let png = chart.buffer().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Blocking Usage (Build Scripts)
//!
//! ```no_run
//! use image_charts::{ChartKind, ChartOptions, ImageCharts};
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ImageCharts::from_env()?;
//!
//! let chart = client.chart(
//!     ChartKind::Line,
//!     ChartOptions::from(json!({"data": [[1, 2, 3], [3, 2, 1]], "hideAxis": true})),
//! );
//! let uri = chart.data_uri_blocking()?;
//! # Ok(())
//! # }
//! ```

mod chart;
mod client;
mod config;
mod error;
mod kind;
mod options;
mod query;
mod signer;

// Re-export public API
pub use chart::{Chart, DataUriEncoding};
pub use client::ImageCharts;
pub use config::{
    ClientConfig, ClientConfigBuilder, DEFAULT_API_VERSION, DEFAULT_HOST, DEFAULT_PATH,
    DEFAULT_PROTOCOL, DEFAULT_TIMEOUT, ENV_ACCOUNT, ENV_SECRET, ENV_SETTINGS_PATH, Secret,
    Settings, UserAgent,
};
pub use error::{ChartError, ConfigError, ErrorKind};
pub use kind::{ChartKind, UnknownChartKind};
pub use options::ChartOptions;
pub use query::{
    DATA_FORMATS, INVERTED_DELIMITER_KEYS, NormalizedQuery, QUERY_MAP, map_options, short_key,
};
pub use signer::{ACCOUNT_KEY, SIGNATURE_KEY, build_url, serialize_query, sign_query};

// Re-export commonly used types from dependencies
pub use bytes::Bytes;
pub use url::Url;
