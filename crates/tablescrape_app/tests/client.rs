use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use tablescrape_app::client::{render_records, ClientError, ScrapeClient};
use tablescrape_app::server;
use tablescrape_engine::{FetchSettings, ScrapeService};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn client_posts_url_and_parses_records() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .and(body_json(json!({"url": "https://example.com/t"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"A": "1"}])))
        .expect(1)
        .mount(&api)
        .await;

    let client = ScrapeClient::new(format!("{}/scrape", api.uri()));
    let records = client.scrape("https://example.com/t").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("A"), Some("1"));
    assert!(render_records(&records).contains("\"A\": \"1\""));
}

#[tokio::test]
async fn client_surfaces_api_error_message() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "kind": "fetch_failure",
            "message": "Request failed: http status 404: 404 Not Found"
        })))
        .mount(&api)
        .await;

    let client = ScrapeClient::new(format!("{}/scrape", api.uri()));
    match client.scrape("https://example.com/missing").await.unwrap_err() {
        ClientError::Api { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("404"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn client_reports_non_json_success_body() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&api)
        .await;

    let client = ScrapeClient::new(format!("{}/scrape", api.uri()));
    let err = client.scrape("https://example.com/").await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidJson(_)));
}

#[tokio::test]
async fn client_and_endpoint_interoperate_over_tcp() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<table><tr><th>City</th><th>Beds</th></tr><tr><td>Oslo</td><td>12</td></tr></table>",
            "text/html",
        ))
        .mount(&upstream)
        .await;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = server::router(Arc::new(ScrapeService::with_settings(FetchSettings::default())));
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let host = tokio::spawn(server::serve(listener, app, async move {
        let _ = stop_rx.await;
    }));

    let client = ScrapeClient::new(format!("http://{addr}/scrape"));
    let records = client
        .scrape(&format!("{}/page", upstream.uri()))
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_value(&records).unwrap(),
        json!([{"City": "Oslo", "Beds": "12"}])
    );

    let err = client.scrape("").await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 400, .. }));

    drop(client);
    let _ = stop_tx.send(());
    host.await.unwrap().unwrap();
}
