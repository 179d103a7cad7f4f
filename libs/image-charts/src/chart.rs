use std::fmt;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use http::StatusCode;
use url::Url;

use crate::client::build_http_client;
use crate::config::ClientConfig;
use crate::error::ChartError;
use crate::kind::ChartKind;
use crate::options::ChartOptions;
use crate::query::{NormalizedQuery, map_options, short_key};
use crate::signer::build_url;

/// Payload encoding of a data URI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DataUriEncoding {
    #[default]
    Base64,
    Hex,
}

impl DataUriEncoding {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Base64 => "base64",
            Self::Hex => "hex",
        }
    }

    fn encode(self, bytes: &[u8]) -> String {
        match self {
            Self::Base64 => STANDARD.encode(bytes),
            Self::Hex => hex::encode(bytes),
        }
    }
}

impl fmt::Display for DataUriEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One chart request, ready to be fetched.
///
/// The options are mapped to the provider query when the chart is created;
/// each fetch is a single GET with no retries.
pub struct Chart {
    kind: ChartKind,
    config: Arc<ClientConfig>,
    http: reqwest::Client,
    query: NormalizedQuery,
}

impl fmt::Debug for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chart")
            .field("kind", &self.kind)
            .field("config", &self.config)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

impl Chart {
    pub(crate) fn new(
        config: Arc<ClientConfig>,
        http: reqwest::Client,
        kind: ChartKind,
        options: ChartOptions,
    ) -> Self {
        let query = map_options(&kind.decorate(options));
        Self {
            kind,
            config,
            http,
            query,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    /// The provider query, before the account id and signature are added.
    #[must_use]
    pub fn query(&self) -> &NormalizedQuery {
        &self.query
    }

    /// `image/gif` for animated charts, `image/png` otherwise.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        let animated = short_key("animation").is_some_and(|key| self.query.contains_key(key));
        let gif_output = short_key("format")
            .and_then(|key| self.query.get(key))
            .is_some_and(|format| format.eq_ignore_ascii_case(".gif"));
        if animated || gif_output {
            "image/gif"
        } else {
            "image/png"
        }
    }

    /// The signed request URL, e.g. for embedding in an `<img>` tag.
    ///
    /// # Errors
    /// Returns a 400-classified [`ChartError`] if the request cannot be signed.
    pub fn url(&self) -> Result<Url, ChartError> {
        Ok(build_url(&self.config, &self.query)?)
    }

    /// Fetch the rendered image.
    ///
    /// # Errors
    /// - non-2xx response: classified by its status, body attached as raw detail
    /// - empty 2xx response: classified as 404
    /// - transport failure: 504 on timeout, otherwise the failure's status or 500
    pub async fn buffer(&self) -> Result<Bytes, ChartError> {
        self.fetch(&self.http).await
    }

    /// Fetch the image as a base64 data URI.
    ///
    /// # Errors
    /// Same as [`Chart::buffer`].
    pub async fn data_uri(&self) -> Result<String, ChartError> {
        self.data_uri_with(DataUriEncoding::Base64).await
    }

    /// Fetch the image as a data URI with the given payload encoding.
    ///
    /// # Errors
    /// Same as [`Chart::buffer`].
    pub async fn data_uri_with(&self, encoding: DataUriEncoding) -> Result<String, ChartError> {
        let bytes = self.buffer().await?;
        Ok(self.to_data_uri(&bytes, encoding))
    }

    /// Blocking version of [`Chart::buffer`] for sync contexts (e.g. build scripts).
    ///
    /// The request runs on a temporary runtime with its own connection.
    ///
    /// # Errors
    /// Same as [`Chart::buffer`]; a runtime that fails to start classifies as 500.
    ///
    /// # Panics
    /// Panics if called from within an async runtime.
    pub fn buffer_blocking(&self) -> Result<Bytes, ChartError> {
        block_on(async {
            let http = build_http_client(&self.config)?;
            self.fetch(&http).await
        })
    }

    /// Blocking version of [`Chart::data_uri`].
    ///
    /// # Errors
    /// Same as [`Chart::buffer_blocking`].
    ///
    /// # Panics
    /// Panics if called from within an async runtime.
    pub fn data_uri_blocking(&self) -> Result<String, ChartError> {
        let bytes = self.buffer_blocking()?;
        Ok(self.to_data_uri(&bytes, DataUriEncoding::Base64))
    }

    fn to_data_uri(&self, bytes: &[u8], encoding: DataUriEncoding) -> String {
        format!(
            "data:{};{},{}",
            self.mime_type(),
            encoding.name(),
            encoding.encode(bytes)
        )
    }

    async fn fetch(&self, http: &reqwest::Client) -> Result<Bytes, ChartError> {
        let url = self.url()?;

        let response = http
            .get(url)
            .send()
            .await
            .map_err(|e| self.failed(ChartError::from_transport(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok().filter(|body| !body.is_empty());
            return Err(self.failed(ChartError::classify(status.as_u16(), body)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.failed(ChartError::from_transport(&e)))?;
        if bytes.is_empty() {
            return Err(self.failed(ChartError::classify(StatusCode::NOT_FOUND.as_u16(), None)));
        }
        Ok(bytes)
    }

    fn failed(&self, err: ChartError) -> ChartError {
        tracing::warn!(
            chart = %self.kind,
            status = err.status(),
            kind = %err.kind(),
            "chart request failed"
        );
        err
    }
}

fn block_on<T>(future: impl Future<Output = Result<T, ChartError>>) -> Result<T, ChartError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(future)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chart(kind: ChartKind, options: serde_json::Value) -> Chart {
        let config = Arc::new(ClientConfig::builder().build().unwrap());
        let http = build_http_client(&config).unwrap();
        Chart::new(config, http, kind, ChartOptions::from(options))
    }

    #[test]
    fn test_query_is_mapped_on_creation() {
        let chart = chart(
            ChartKind::Bar,
            json!({"data": [60, 40], "size": [100, 100], "stacked": true}),
        );
        assert_eq!(chart.query().get("cht"), Some("bvs"));
        assert_eq!(chart.query().get("chd"), Some("a:60,40"));
        assert_eq!(chart.query().get("chs"), Some("100x100"));
        assert!(!chart.query().contains_key("stacked"));
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(chart(ChartKind::Pie, json!({})).mime_type(), "image/png");
        let animated = chart(ChartKind::Bar, json!({"animation": ["1200", "easeOutBack"]}));
        assert_eq!(animated.mime_type(), "image/gif");
        let gif = chart(ChartKind::Line, json!({"format": ".gif"}));
        assert_eq!(gif.mime_type(), "image/gif");
    }

    #[test]
    fn test_data_uri_formatting() {
        let chart = chart(ChartKind::Pie, json!({}));
        let bytes = [0x89, 0x50, 0x4e, 0x47];
        assert_eq!(
            chart.to_data_uri(&bytes, DataUriEncoding::Base64),
            "data:image/png;base64,iVBORw=="
        );
        assert_eq!(
            chart.to_data_uri(&bytes, DataUriEncoding::Hex),
            "data:image/png;hex,89504e47"
        );
    }

    #[test]
    fn test_url_matches_query() {
        let chart = chart(ChartKind::Pie, json!({"data": [60, 40], "size": [700, 700]}));
        assert_eq!(
            chart.url().unwrap().as_str(),
            "https://image-charts.com/chart?chd=a%3A60%2C40&chs=700x700&cht=p"
        );
    }
}
