//! End-to-end tests against a local fake of the venue's REST API.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{Path, State},
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use fiatbridge_server::{app_router, build_state, ServerConfig};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

struct Venue {
    markets: Vec<&'static str>,
    tickers: HashMap<&'static str, &'static str>,
    ticker_status: StatusCode,
}

async fn markets(State(venue): State<Arc<Venue>>) -> Json<Value> {
    let markets: Vec<Value> = venue.markets.iter().map(|id| json!({ "id": id })).collect();
    Json(json!({ "markets": markets }))
}

async fn ticker(State(venue): State<Arc<Venue>>, Path(id): Path<String>) -> Response {
    if venue.ticker_status != StatusCode::OK {
        return venue.ticker_status.into_response();
    }

    match venue.tickers.get(id.as_str()) {
        Some(price) => Json(json!({ "ticker": { "last_price": [price, "CLP"] } })).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serve the fake venue on an ephemeral port and return its API root.
async fn spawn_venue(venue: Venue) -> String {
    let app = Router::new()
        .route("/markets", get(markets))
        .route("/markets/{id}/ticker", get(ticker))
        .with_state(Arc::new(venue));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn venue(ticker_status: StatusCode) -> Venue {
    Venue {
        markets: vec!["BTC-CLP", "BTC-PEN", "ETH-CLP", "ETH-PEN", "BTC-USDC", "USDC-CLP"],
        tickers: HashMap::from([
            ("btc-clp", "10000000.0"),
            ("btc-pen", "30000.0"),
            ("eth-clp", "1000000.0"),
            ("eth-pen", "2900.0"),
        ]),
        ticker_status,
    }
}

async fn convert(base_url: String, body: Value) -> (StatusCode, Value) {
    let config = ServerConfig {
        market_api_url: base_url,
        ..ServerConfig::default()
    };
    let app = app_router(build_state(&config).unwrap(), &config);

    let request = Request::builder()
        .method("POST")
        .uri("/api/convert")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_converts_through_live_venue_prices() {
    let base_url = spawn_venue(venue(StatusCode::OK)).await;

    let (status, body) = convert(
        base_url,
        json!({ "from_currency": "CLP", "to_currency": "PEN", "amount": 10000 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "converted_amount": 30.0, "intermediate_currency": "BTC" })
    );
}

#[tokio::test]
async fn test_venue_errors_mean_no_path() {
    let base_url = spawn_venue(venue(StatusCode::INTERNAL_SERVER_ERROR)).await;

    let (status, body) = convert(
        base_url,
        json!({ "from_currency": "CLP", "to_currency": "PEN", "amount": 10000 }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "No conversion path found" }));
}

#[tokio::test]
async fn test_unreachable_venue_means_no_path() {
    let (status, body) = convert(
        "http://127.0.0.1:1".to_string(),
        json!({ "from_currency": "CLP", "to_currency": "COP", "amount": 10 }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No conversion path found");
}
