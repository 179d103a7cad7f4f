use std::time::Duration;

use httpmock::prelude::*;
use image_charts::{
    ChartKind, ChartOptions, ClientConfig, DataUriEncoding, ErrorKind, ImageCharts, sign_query,
};
use serde_json::json;

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Client pointed at the mock server instead of image-charts.com
fn client_for(server: &MockServer) -> ImageCharts {
    let config = ClientConfig::builder()
        .protocol("http")
        .host("127.0.0.1")
        .port(server.port())
        .path("chart")
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    ImageCharts::new(config).unwrap()
}

fn pie_options() -> ChartOptions {
    ChartOptions::new()
        .with("data", json!([60, 40]))
        .with("size", json!([100, 100]))
}

#[tokio::test]
async fn test_buffer_returns_image_bytes() {
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/chart")
            .query_param("cht", "p")
            .query_param("chd", "a:60,40")
            .query_param("chs", "100x100");
        then.status(200)
            .header("Content-Type", "image/png")
            .body(PNG_BYTES);
    });

    let client = client_for(&server);
    let bytes = client.pie(pie_options()).buffer().await.unwrap();

    assert_eq!(bytes.as_ref(), PNG_BYTES);
    mock.assert();
}

#[tokio::test]
async fn test_data_uri_png() {
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(GET).path("/chart").query_param("cht", "bvg");
        then.status(200).body(PNG_BYTES);
    });

    let client = client_for(&server);
    let uri = client.bar(pie_options()).data_uri().await.unwrap();

    assert_eq!(uri, "data:image/png;base64,iVBORw0KGgo=");
    mock.assert();
}

#[tokio::test]
async fn test_data_uri_gif_for_animated_chart() {
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/chart")
            .query_param("chan", "1200,easeOutBack");
        then.status(200).body("GIF89a");
    });

    let client = client_for(&server);
    let chart = client.bar(pie_options().with("animation", json!(["1200", "easeOutBack"])));
    let uri = chart.data_uri_with(DataUriEncoding::Hex).await.unwrap();

    assert_eq!(uri, "data:image/gif;hex,474946383961");
    mock.assert();
}

#[tokio::test]
async fn test_bad_request_is_classified() {
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/chart")
            .query_param("cht", "p")
            .query_param("chd", "a:60,40")
            .query_param("chs", "100x100");
        then.status(400).body("chs is required");
    });

    let client = client_for(&server);
    let err = client.pie(pie_options()).buffer().await.unwrap_err();

    assert_eq!(err.status(), 400);
    assert_eq!(err.kind(), ErrorKind::BadRequest);
    assert_eq!(err.kind().label(), "Bad Request");
    assert_eq!(err.raw(), Some("chs is required"));
    mock.assert();
}

#[tokio::test]
async fn test_service_unavailable_is_classified() {
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(GET).path("/chart");
        then.status(503);
    });

    let client = client_for(&server);
    let err = client.line(pie_options()).buffer().await.unwrap_err();

    assert_eq!(err.status(), 503);
    assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
    assert_eq!(err.raw(), None);
    mock.assert();
}

#[tokio::test]
async fn test_empty_body_is_not_found() {
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(GET).path("/chart");
        then.status(200);
    });

    let client = client_for(&server);
    let err = client.doughnut(pie_options()).buffer().await.unwrap_err();

    assert_eq!(err.status(), 404);
    assert_eq!(err.kind(), ErrorKind::NotFound);
    mock.assert();
}

#[tokio::test]
async fn test_timeout_is_gateway_timeout() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/chart");
        then.status(200)
            .delay(Duration::from_secs(2))
            .body(PNG_BYTES);
    });

    let config = ClientConfig::builder()
        .protocol("http")
        .host("127.0.0.1")
        .port(server.port())
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let client = ImageCharts::new(config).unwrap();

    let err = client.polar(pie_options()).buffer().await.unwrap_err();

    assert_eq!(err.status(), 504);
    assert_eq!(err.kind(), ErrorKind::GatewayTimeout);
}

#[tokio::test]
async fn test_connection_refused_is_server_error() {
    let config = ClientConfig::builder()
        .protocol("http")
        .host("127.0.0.1")
        .port(1)
        .build()
        .unwrap();
    let client = ImageCharts::new(config).unwrap();

    let err = client.bubble(pie_options()).buffer().await.unwrap_err();

    assert_eq!(err.status(), 500);
    assert_eq!(err.kind(), ErrorKind::InternalServerError);
    assert!(err.raw().is_some());
}

#[tokio::test]
async fn test_user_agent_header() {
    let server = MockServer::start();
    let client = client_for(&server);

    let user_agent = client.config().user_agent().to_header().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&user_agent).unwrap();
    assert_eq!(parsed["lang"], "rust");
    assert_eq!(parsed["publisher"], "ImageCharts");

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/chart")
            .header("User-Agent", user_agent.as_str());
        then.status(200).body(PNG_BYTES);
    });

    client.pie(pie_options()).buffer().await.unwrap();

    mock.assert();
}

#[tokio::test]
async fn test_signed_request() {
    let server = MockServer::start();
    let secret = "!!super$ecret!!";

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/chart")
            .query_param("icac", "1234567890")
            .query_param_exists("ichm");
        then.status(200).body(PNG_BYTES);
    });

    let config = ClientConfig::builder()
        .protocol("http")
        .host("127.0.0.1")
        .port(server.port())
        .account("1234567890")
        .secret(secret)
        .build()
        .unwrap();
    let client = ImageCharts::new(config).unwrap();
    let chart = client.chart(ChartKind::Pie, pie_options());

    let url = chart.url().unwrap();
    let (unsigned, signature) = url.query().unwrap().rsplit_once("&ichm=").unwrap();
    assert_eq!(signature, sign_query(secret, unsigned).unwrap());

    chart.buffer().await.unwrap();
    mock.assert();
}

#[test]
fn test_blocking_buffer() {
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(GET).path("/chart").query_param("cht", "bhs");
        then.status(200).body(PNG_BYTES);
    });

    let client = client_for(&server);
    let chart = client.bar_horizontal(pie_options().with("stacked", true));

    let bytes = chart.buffer_blocking().unwrap();
    assert_eq!(bytes.as_ref(), PNG_BYTES);

    let uri = chart.data_uri_blocking().unwrap();
    assert!(uri.starts_with("data:image/png;base64,"));

    mock.assert_hits(2);
}

#[test]
fn test_blocking_error_is_classified() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/chart");
        then.status(429);
    });

    let client = client_for(&server);
    let err = client.pie(pie_options()).buffer_blocking().unwrap_err();

    assert_eq!(err.status(), 429);
    assert_eq!(err.kind(), ErrorKind::TooManyRequests);
}
