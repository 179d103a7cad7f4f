use std::sync::Arc;

use crate::chart::Chart;
use crate::config::ClientConfig;
use crate::error::ConfigError;
use crate::kind::ChartKind;
use crate::options::ChartOptions;

/// Entry point for building charts against one configured endpoint.
///
/// Cloning is cheap: clones share the configuration and the connection pool.
#[derive(Debug, Clone)]
pub struct ImageCharts {
    config: Arc<ClientConfig>,
    http: reqwest::Client,
}

/// HTTP client carrying the configured timeout and JSON user agent.
///
/// # Errors
/// Returns [`ConfigError`] if the user agent cannot be serialized or the
/// client cannot be constructed.
pub fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client, ConfigError> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent().to_header()?)
        .build()?;
    Ok(client)
}

impl ImageCharts {
    /// Create a client from explicit configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let http = build_http_client(&config)?;
        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    /// Create a client from the settings file and environment.
    ///
    /// Reads `IMAGE_CHARTS_AUTH` (or `~/.image_charts.json`), then
    /// `IMAGE_CHARTS_ID` and `IMAGE_CHARTS_SECRET`.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the settings file is unreadable or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(ClientConfig::from_env()?)
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create a chart of any kind.
    #[must_use]
    pub fn chart(&self, kind: ChartKind, options: ChartOptions) -> Chart {
        Chart::new(Arc::clone(&self.config), self.http.clone(), kind, options)
    }

    /// Vertical bars, grouped or `stacked`.
    #[must_use]
    pub fn bar(&self, options: ChartOptions) -> Chart {
        self.chart(ChartKind::Bar, options)
    }

    /// Horizontal bars, grouped or `stacked`.
    #[must_use]
    pub fn bar_horizontal(&self, options: ChartOptions) -> Chart {
        self.chart(ChartKind::BarHorizontal, options)
    }

    /// Line chart; `hideAxis` drops the axes.
    #[must_use]
    pub fn line(&self, options: ChartOptions) -> Chart {
        self.chart(ChartKind::Line, options)
    }

    /// Pie chart; nested data series render as a concentric pie.
    #[must_use]
    pub fn pie(&self, options: ChartOptions) -> Chart {
        self.chart(ChartKind::Pie, options)
    }

    #[must_use]
    pub fn doughnut(&self, options: ChartOptions) -> Chart {
        self.chart(ChartKind::Doughnut, options)
    }

    #[must_use]
    pub fn polar(&self, options: ChartOptions) -> Chart {
        self.chart(ChartKind::Polar, options)
    }

    #[must_use]
    pub fn bubble(&self, options: ChartOptions) -> Chart {
        self.chart(ChartKind::Bubble, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client() -> ImageCharts {
        let config = ClientConfig::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        ImageCharts::new(config).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = client();
        assert_eq!(client.config().timeout(), Duration::from_secs(5));
        assert_eq!(client.config().host(), "image-charts.com");
    }

    #[test]
    fn test_shortcuts_pick_kind() {
        let client = client();
        let options = ChartOptions::new;
        assert_eq!(client.bar(options()).kind(), ChartKind::Bar);
        assert_eq!(
            client.bar_horizontal(options()).kind(),
            ChartKind::BarHorizontal
        );
        assert_eq!(client.line(options()).kind(), ChartKind::Line);
        assert_eq!(client.pie(options()).kind(), ChartKind::Pie);
        assert_eq!(client.doughnut(options()).kind(), ChartKind::Doughnut);
        assert_eq!(client.polar(options()).kind(), ChartKind::Polar);
        assert_eq!(client.bubble(options()).kind(), ChartKind::Bubble);
    }

    #[test]
    fn test_clones_share_config() {
        let client = client();
        let clone = client.clone();
        assert!(Arc::ptr_eq(&client.config, &clone.config));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ImageCharts>();
        assert_send_sync::<Chart>();
    }
}
