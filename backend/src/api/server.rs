//! HTTP server for the order cleaner.
//!
//! # API Endpoints
//!
//! | Method | Path          | Description                                |
//! |--------|---------------|--------------------------------------------|
//! | GET    | `/health`     | Health check                               |
//! | POST   | `/api/clean`  | Upload an order workbook, download the cleaned copy |
//! | GET    | `/api/logs`   | SSE stream for real-time logs              |
//!
//! `POST /api/clean` takes multipart form data:
//!
//! - `order` (file, required) - the order workbook
//! - `template` (file, optional) - removal template override; the bundled
//!   template is used when absent
//! - `protected_supplier` (text, optional)
//! - `west_prefix` (text, optional)
//!
//! Success responses are the cleaned workbook bytes with the fixed download
//! filename and xlsx MIME type; the run summary also rides along in the
//! `x-clean-summary` header and the log stream. An empty removal template
//! yields a 422 warning without running the transform.

use axum::{
    extract::Multipart,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_info, log_warning, publish_summary, RUN_EVENTS};
use super::types::{download_disposition, error_response, warning_response, XLSX_MIME};
use crate::models::RemovalSpec;
use crate::template::{default_template_path, load_template_from_bytes, load_template_from_file};
use crate::transform::cleaner::CleanOptions;
use crate::transform::pipeline::clean_order_bytes;

/// Start the HTTP server.
pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    let app = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/clean", post(clean_order))
        .route("/api/logs", get(sse_logs))
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("Order cleaner server running on http://localhost:{}", port);
    println!("   POST /api/clean - Upload order workbook");
    println!("   GET  /api/logs  - SSE log stream");
    println!("   GET  /health    - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "ordercleaner",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "clean": "POST /api/clean",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming.
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = RUN_EVENTS.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Fields collected from the multipart upload.
#[derive(Default)]
struct CleanRequest {
    order: Option<Vec<u8>>,
    order_name: Option<String>,
    template: Option<Vec<u8>>,
    protected_supplier: Option<String>,
    west_prefix: Option<String>,
}

type ApiError = (StatusCode, Json<Value>);

fn bad_request(msg: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(error_response(msg)))
}

async fn read_multipart(mut multipart: Multipart) -> Result<CleanRequest, ApiError> {
    let mut request = CleanRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(&format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "order" => {
                request.order_name = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(&format!("Read error: {}", e)))?;
                request.order = Some(bytes.to_vec());
            }
            "template" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(&format!("Read error: {}", e)))?;
                request.template = Some(bytes.to_vec());
            }
            "protected_supplier" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| bad_request(&format!("Read error: {}", e)))?;
                request.protected_supplier = Some(text);
            }
            "west_prefix" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| bad_request(&format!("Read error: {}", e)))?;
                request.west_prefix = Some(text);
            }
            _ => {}
        }
    }

    Ok(request)
}

/// Clean an uploaded order workbook.
async fn clean_order(multipart: Multipart) -> Result<impl IntoResponse, ApiError> {
    let request = read_multipart(multipart).await?;

    let order_bytes = request
        .order
        .ok_or_else(|| bad_request("No order file provided"))?;

    log_info(format!(
        "New upload: {} ({} bytes)",
        request.order_name.as_deref().unwrap_or("unknown"),
        order_bytes.len()
    ));

    // Template: uploaded override, or the bundled file.
    let spec: RemovalSpec = match request.template {
        Some(ref bytes) => {
            log_info("Using uploaded removal template");
            load_template_from_bytes(bytes)
                .map_err(|e| bad_request(&e.to_string()))?
        }
        None => {
            let path = default_template_path();
            log_info(format!("Using template from {}", path.display()));
            load_template_from_file(&path)
                .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response(&e.to_string()))))?
        }
    };

    if spec.is_empty() {
        log_warning("Template has no shop_code or nickname values, nothing to clear");
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(warning_response(
                "Template does not contain any shop_code or nickname values. Nothing to clear.",
            )),
        ));
    }

    let mut options = CleanOptions::default();
    if let Some(supplier) = request.protected_supplier {
        options.protected_supplier = supplier;
    }
    if let Some(prefix) = request.west_prefix {
        options.west_prefix = prefix;
    }

    let (cleaned_bytes, summary) = clean_order_bytes(&order_bytes, &spec, &options)
        .map_err(|e| {
            log_warning(format!("Transform failed: {}", e));
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response(&e.to_string())))
        })?;

    publish_summary(summary.clone());

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(XLSX_MIME));
    if let Ok(disposition) = HeaderValue::from_str(&download_disposition()) {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }
    // The summary is informational; skip the header if it will not fit.
    if let Ok(value) = serde_json::to_string(&summary)
        .map_err(|_| ())
        .and_then(|s| HeaderValue::from_str(&s).map_err(|_| ()))
    {
        headers.insert("x-clean-summary", value);
    }

    Ok((headers, cleaned_bytes))
}
