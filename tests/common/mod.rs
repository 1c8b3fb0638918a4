#![allow(dead_code)]

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tripcast::config::TripcastConfig;

/// One request seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Option<String>,
    pub user_agent: Option<String>,
    pub accept: Option<String>,
}

#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<RecordedRequest>>>);

impl Recorder {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.0.lock().unwrap().clone()
    }

    pub fn count_with_prefix(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.path.starts_with(prefix))
            .count()
    }

    pub fn last(&self) -> RecordedRequest {
        self.requests().last().cloned().expect("no request recorded")
    }
}

/// In-process stand-in for every upstream API, bound to 127.0.0.1:0.
pub struct MockUpstream {
    pub base_url: String,
    pub recorder: Recorder,
}

impl MockUpstream {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let recorder = Recorder::default();

        let app = Router::new()
            .route("/alerts/active/area/{state}", get(alerts))
            .route("/points/{coords}", get(points))
            .route("/gridpoints/{office}/{grid}/forecast", get(forecast))
            .route("/random/", get(random))
            .route("/joke", get(joke))
            .route("/joke-garbled", get(joke_garbled))
            .route("/joke-invalid-utf8", get(joke_invalid_utf8))
            .route("/slow", get(slow))
            .route("/location/nearby_search/", get(location_list))
            .route("/location/search/", get(location_list))
            .route("/location/{id}/details/", get(location_details))
            .route("/location/{id}/reviews/", get(location_reviews))
            .with_state(base_url.clone())
            .layer(middleware::from_fn_with_state(recorder.clone(), record));

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, recorder }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Config with every upstream pointed at this mock.
    pub fn config(&self) -> TripcastConfig {
        let mut config = TripcastConfig::default();
        config.timeout_secs = 5;
        config.trip.base_url = self.url("/location");
        config.trip.api_key = "TESTKEY".into();
        config.weather.nws_base_url = self.base_url.clone();
        config.weather.random_base_url = self.url("/random");
        config.weather.joke_base_url = self.url("/joke");
        config
    }
}

async fn record(State(recorder): State<Recorder>, req: Request, next: Next) -> Response {
    let entry = describe(&req);
    recorder.0.lock().unwrap().push(entry);
    next.run(req).await
}

fn describe(req: &Request) -> RecordedRequest {
    let header_text = |name: header::HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    RecordedRequest {
        path: req.uri().path().to_string(),
        query: req.uri().query().map(str::to_string),
        user_agent: header_text(header::USER_AGENT),
        accept: header_text(header::ACCEPT),
    }
}

// ---------------------------------------------------------------------------
// NWS
// ---------------------------------------------------------------------------

pub fn full_alert(event: &str) -> Value {
    json!({
        "properties": {
            "event": event,
            "areaDesc": "Kings County",
            "severity": "Severe",
            "description": "Heavy rain.",
            "instruction": "Move to higher ground."
        }
    })
}

async fn alerts(Path(state): Path<String>) -> Response {
    match state.as_str() {
        "ZZ" => Json(json!({"type": "FeatureCollection", "features": []})).into_response(),
        "CA" => Json(json!({"features": [{"properties": {"event": "Flood Warning"}}]})).into_response(),
        "NY" => Json(json!({
            "features": [full_alert("Flood Warning"), full_alert("Wind Advisory")]
        }))
        .into_response(),
        "NOFEATURES" => Json(json!({"type": "FeatureCollection"})).into_response(),
        "NULLFEATURES" => Json(json!({"features": null})).into_response(),
        "GARBLED" => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn points(State(base_url): State<String>, Path(coords): Path<String>) -> Response {
    match coords.as_str() {
        "39.7456,-97.0892" => Json(json!({
            "properties": {"forecast": format!("{}/gridpoints/TOP/31,80/forecast", base_url)}
        }))
        .into_response(),
        "40.0,-100.0" => Json(json!({
            "properties": {"forecast": format!("{}/gridpoints/FAIL/1,1/forecast", base_url)}
        }))
        .into_response(),
        "41.0,-101.0" => Json(json!({"properties": {}})).into_response(),
        "42.0,-102.0" => Json(json!({
            "properties": {"forecast": format!("{}/gridpoints/NOPERIODS/1,1/forecast", base_url)}
        }))
        .into_response(),
        "43.0,-103.0" => Json(json!({
            "properties": {"forecast": format!("{}/gridpoints/EMPTY/1,1/forecast", base_url)}
        }))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

pub fn period(i: usize) -> Value {
    json!({
        "number": i + 1,
        "name": format!("Period {}", i + 1),
        "temperature": 60 + i,
        "temperatureUnit": "F",
        "windSpeed": "10 mph",
        "windDirection": "S",
        "detailedForecast": format!("Forecast text {}", i + 1)
    })
}

async fn forecast(Path((office, _grid)): Path<(String, String)>) -> Response {
    match office.as_str() {
        "FAIL" => return StatusCode::SERVICE_UNAVAILABLE.into_response(),
        "NOPERIODS" => return Json(json!({"properties": {}})).into_response(),
        "EMPTY" => return Json(json!({"properties": {"periods": []}})).into_response(),
        _ => {}
    }
    let periods: Vec<Value> = (0..10).map(period).collect();
    Json(json!({"properties": {"periods": periods}})).into_response()
}

// ---------------------------------------------------------------------------
// Novelty
// ---------------------------------------------------------------------------

async fn random() -> Json<Value> {
    Json(json!([1, 4, 6]))
}

pub const JOKE_BODY: &str =
    r#"{"type":"general","setup":"Why did the scarecrow win?","punchline":"He was outstanding in his field.","id":1}"#;

async fn joke() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], JOKE_BODY)
}

async fn joke_garbled() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], "knock knock")
}

async fn joke_invalid_utf8() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        b"{\"a\":\"\xff\"}".to_vec(),
    )
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!({}))
}

// ---------------------------------------------------------------------------
// Tripadvisor
// ---------------------------------------------------------------------------

async fn location_list() -> Json<Value> {
    Json(json!({"data": [{"location_id": "60745", "name": "Fenway Park"}]}))
}

async fn location_details(Path(id): Path<String>) -> Response {
    if id == "0" {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!({"location_id": id, "name": "Fenway Park", "rating": "4.5"})).into_response()
}

async fn location_reviews(Path(id): Path<String>) -> Json<Value> {
    Json(json!({"data": [{"id": 1, "location_id": id, "title": "Great game"}]}))
}
