//! Route handlers.

use axum::extract::multipart::Multipart;
use axum::extract::rejection::QueryRejection;
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pairscope_analytics::{AnalyticsRequest, DEFAULT_WINDOW};
use pairscope_format::{CsvFormatter, Formatter, export_file_name};
use pairscope_store::ingest_csv;
use pairscope_types::{Interval, PairscopeError, RegressionType};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::{ApiError, AppState, ServerConfig};

const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

// ── Query params ─────────────────────────────────────────────────────────

/// Parameters shared by `/analyze` and `/export_csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeQuery {
    /// First symbol.
    pub s1: String,
    /// Second symbol.
    pub s2: String,
    /// Bucketing interval, e.g. `1T` or `5min`.
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    /// Rolling window length.
    #[serde(default = "default_window")]
    pub window: usize,
    /// `OLS_I` or `OLS_NOI`.
    #[serde(default)]
    pub regression_type: Option<String>,
    /// Whether to run the stationarity test.
    #[serde(default)]
    pub run_adf: bool,
}

fn default_timeframe() -> String {
    "1T".to_string()
}

const fn default_window() -> usize {
    DEFAULT_WINDOW
}

impl AnalyzeQuery {
    /// Converts the parameters into a pipeline request.
    ///
    /// # Errors
    ///
    /// An unparseable timeframe is an internal (resampling) failure; an
    /// unknown regression type is a bad request.
    pub fn to_request(&self) -> Result<AnalyticsRequest, ApiError> {
        let interval: Interval = self
            .timeframe
            .parse()
            .map_err(|e| ApiError::from(PairscopeError::from(e)))?;
        let regression = match self.regression_type.as_deref() {
            Some(value) => value
                .parse::<RegressionType>()
                .map_err(|e| ApiError::bad_request(e.to_string()))?,
            None => RegressionType::WithIntercept,
        };

        Ok(AnalyticsRequest::new(self.s1.trim(), self.s2.trim())
            .with_interval(interval)
            .with_window(self.window)
            .with_regression(regression)
            .with_stationarity(self.run_adf))
    }
}

fn query_params(
    query: Result<Query<AnalyzeQuery>, QueryRejection>,
) -> Result<AnalyzeQuery, ApiError> {
    query
        .map(|Query(q)| q)
        .map_err(|e| ApiError::bad_request(e.body_text()))
}

// ── Route definitions ────────────────────────────────────────────────────

/// Builds the router with CORS and request tracing applied.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/symbols", get(symbols))
        .route("/analyze", get(analyze))
        .route("/export_csv", get(export_csv))
        .route(
            "/upload_ohlc",
            post(upload_ohlc).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        AllowOrigin::list(origins)
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn symbols(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let symbols = state.symbols().await?;
    Ok(Json(json!({ "symbols": symbols })))
}

async fn analyze(
    State(state): State<AppState>,
    query: Result<Query<AnalyzeQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let params = query_params(query)?;
    let report = state.analyze(params.to_request()?).await?;
    debug!(
        s1 = %params.s1,
        s2 = %params.s2,
        rows = report.rows.len(),
        "Served analytics"
    );
    Ok(Json(report.response()).into_response())
}

async fn export_csv(
    State(state): State<AppState>,
    query: Result<Query<AnalyzeQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let params = query_params(query)?;
    let request = params.to_request()?.with_stationarity(true);
    let report = state.analyze(request).await?;
    if report.is_empty() {
        return Err(ApiError::not_found("No data to export"));
    }

    let formatter = CsvFormatter::new();
    let mut body = Vec::new();
    formatter.write_report(&report, &mut body)?;

    let file_name = export_file_name(
        &params.s1,
        &params.s2,
        &params.timeframe,
        formatter.extension(),
    );
    debug!(file = %file_name, bytes = body.len(), "Served CSV export");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={file_name}"),
            ),
        ],
        body,
    )
        .into_response())
}

async fn upload_ohlc(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        let summary = ingest_csv(Arc::clone(state.store()), &file_name, data.as_ref()).await?;
        return Ok(Json(json!({
            "message": summary.message(),
            "accepted": summary.accepted,
            "dropped": summary.dropped,
            "symbols": summary.symbols,
        })));
    }

    Err(ApiError::bad_request("Missing multipart field 'file'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use chrono::{TimeDelta, TimeZone, Utc};
    use pairscope_store::{MemoryTickStore, TickSink};
    use pairscope_types::Tick;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn pair_store() -> Arc<MemoryTickStore> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let store = MemoryTickStore::new();
        let ticks: Vec<Tick> = [(100.0, 50.0), (101.0, 50.0), (100.0, 51.0)]
            .iter()
            .enumerate()
            .flat_map(|(i, &(a, b))| {
                let ts = base + TimeDelta::minutes(i as i64) + TimeDelta::seconds(10);
                [Tick::new("AAA", ts, a, 1.0), Tick::new("BBB", ts, b, 2.0)]
            })
            .collect();
        store.append(&ticks).unwrap();
        Arc::new(store)
    }

    fn app(store: Arc<MemoryTickStore>) -> Router {
        router(AppState::new(store, 5000), &ServerConfig::default())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn multipart_request(file_name: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--BOUNDARY\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: text/csv\r\n\r\n\
             {content}\r\n\
             --BOUNDARY--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/upload_ohlc")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=BOUNDARY")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app(Arc::new(MemoryTickStore::new())), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_symbols() {
        let (_, body) = get_json(app(Arc::new(MemoryTickStore::new())), "/symbols").await;
        assert_eq!(body, json!({ "symbols": [] }));

        let (status, body) = get_json(app(pair_store()), "/symbols").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "symbols": ["AAA", "BBB"] }));
    }

    #[tokio::test]
    async fn test_analyze() {
        let (status, body) = get_json(app(pair_store()), "/analyze?s1=AAA&s2=BBB&window=2").await;
        assert_eq!(status, StatusCode::OK);

        let chart = body["chart_data"].as_array().unwrap();
        assert_eq!(chart.len(), 3);
        assert_eq!(chart[0]["AAA"], json!(100.0));
        assert_eq!(chart[0]["BBB_volume"], json!(2.0));
        assert_eq!(chart[1]["spread"], json!(51.0));
        assert_eq!(chart[0]["zscore"], Value::Null);
        assert!(chart[2]["zscore"].as_f64().unwrap() < 0.0);

        let metrics = &body["metrics"];
        assert_eq!(metrics["data_points"], json!(3));
        assert_eq!(metrics["hedge_points"], json!(3));
        assert_eq!(metrics["latest_spread"], json!("49.0000"));
        assert_eq!(metrics["hedge_ratio"], json!("N/A"));
        assert_eq!(metrics["adf_p_value"], json!("N/A"));
    }

    #[tokio::test]
    async fn test_analyze_errors() {
        let (status, body) =
            get_json(app(Arc::new(MemoryTickStore::new())), "/analyze?s1=AAA&s2=BBB").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], json!("No data available in the database."));

        let (status, body) = get_json(app(pair_store()), "/analyze?s1=AAA&s2=ZZZ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], json!("Selected symbol 'ZZZ' not in resampled data."));

        let (status, _) = get_json(app(pair_store()), "/analyze?s1=AAA&s2=BBB&timeframe=fortnight").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, body) =
            get_json(app(pair_store()), "/analyze?s1=AAA&s2=BBB&timeframe=999999999d").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("too wide"));

        let (status, _) =
            get_json(app(pair_store()), "/analyze?s1=AAA&s2=BBB&regression_type=RIDGE").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get_json(app(pair_store()), "/analyze?s1=AAA").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());

        let (status, _) = get_json(app(pair_store()), "/analyze?s1=AAA&s2=BBB&window=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_export_csv() {
        let response = app(pair_store())
            .oneshot(
                Request::builder()
                    .uri("/export_csv?s1=AAA&s2=BBB&timeframe=1T&window=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=analytics_export_AAABBB1T.csv"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().ends_with("ADF p-value"));
        assert_eq!(lines.count(), 3);
    }

    #[tokio::test]
    async fn test_export_without_rows_is_not_found() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let store = MemoryTickStore::new();
        store
            .append(&[Tick::new("AAA", base, 1.0, 1.0), Tick::new("BBB", base, 2.0, 1.0)])
            .unwrap();

        let (status, body) = get_json(app(Arc::new(store)), "/export_csv?s1=AAA&s2=BBB").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], json!("No data to export"));
    }

    #[tokio::test]
    async fn test_upload() {
        let store = Arc::new(MemoryTickStore::new());
        let csv = "timestamp,symbol,price,qty\n2024-01-01 00:00:00,AAA,1.5,2\n2024-01-01 00:00:01,BBB,3.0,1";

        let response = app(Arc::clone(&store))
            .oneshot(multipart_request("ticks.csv", csv))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value =
            serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap())
                .unwrap();
        assert_eq!(body["accepted"], json!(2));
        assert_eq!(
            body["message"],
            json!("Successfully ingested 2 records for symbols: ['AAA', 'BBB']")
        );
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_upload_rejected() {
        let store = Arc::new(MemoryTickStore::new());

        let response = app(Arc::clone(&store))
            .oneshot(multipart_request("ticks.csv", "a,b,c\n1,2,3"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app(Arc::clone(&store))
            .oneshot(multipart_request("ticks.txt", "timestamp,symbol,price,qty"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.is_empty());
    }
}
