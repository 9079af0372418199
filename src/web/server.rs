use axum::{
    extract::{multipart::Field, DefaultBodyLimit, Multipart},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use crate::analysis::{run_analysis, AnalysisError, AnalysisRequest};
use crate::cli::ServeArgs;
use crate::core::source::FastaSource;
use crate::signatures::EngineError;
use crate::utils::validation::{validate_upload, ValidatedUpload, ValidationError};

/// Security configuration constants to prevent `DoS` attacks
pub const MAX_MULTIPART_FIELDS: usize = 64;
pub const MAX_FILE_FIELD_SIZE: usize = 64 * 1024 * 1024; // 64MB
pub const MAX_TEXT_FIELD_SIZE: usize = 1024; // 1KB
pub const MAX_REQUEST_BODY_SIZE: usize = 256 * 1024 * 1024; // 256MB
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
pub const MAX_CONCURRENT_REQUESTS: usize = 16;

pub const WELCOME_MESSAGE: &str = "Welcome to the iSignify API!";

/// Enhanced error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

/// Fields collected from an analyze form
#[derive(Debug)]
struct AnalyzeForm {
    kmer_size: Option<String>,
    run_preprocessor: bool,
    target: Option<ValidatedUpload>,
    backgrounds: Vec<ValidatedUpload>,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None,
    }
}

fn error_response(
    status: StatusCode,
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> Response {
    (
        status,
        Json(create_safe_error_response(
            error_type,
            user_message,
            internal_error,
        )),
    )
        .into_response()
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args).await })
}

/// Routes and middleware without per-IP rate limiting.
///
/// Rate limiting needs the peer address, which only exists when served over a
/// socket; [`create_router`] adds it on top.
pub fn build_routes() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/v1/", get(welcome_handler))
        .route("/api/v1/analyze/", post(analyze_handler))
        .route("/api/v1/analyze", post(analyze_handler))
        .layer(
            ServiceBuilder::new()
                // Security headers for browser protection
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-xss-protection"),
                    HeaderValue::from_static("1; mode=block"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("strict-transport-security"),
                    HeaderValue::from_static("max-age=31536000; includeSubDomains"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                // The upload frontend may be served from another origin
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    REQUEST_TIMEOUT,
                ))
                .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
                .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_SIZE)),
        )
}

/// Create the application router with all routes and middleware configured.
///
/// # Errors
///
/// Returns an error if the rate limiter configuration is rejected.
pub fn create_router() -> anyhow::Result<Router> {
    // Configure IP-based rate limiting
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(20)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?;

    Ok(build_routes().layer(GovernorLayer {
        config: Arc::new(governor_conf),
    }))
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let app = create_router()?;

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting isignify web server at http://{addr}");

    if args.open {
        let _ = open::that(format!("http://{addr}"));
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Main page handler
async fn index_handler() -> Html<&'static str> {
    Html(include_str!("templates/index.html"))
}

async fn welcome_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": WELCOME_MESSAGE }))
}

/// API endpoint for signature analysis
async fn analyze_handler(mut multipart: Multipart) -> Response {
    let form = match extract_analyze_form(&mut multipart).await {
        Ok(form) => form,
        Err(error_response) => return error_response,
    };

    let Some(kmer_size) = form
        .kmer_size
        .as_deref()
        .and_then(|text| text.trim().parse::<i64>().ok())
        .filter(|&k| k >= 1)
    else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "invalid_kmer_size",
            "kmer_size must be a positive integer",
            None,
        );
    };

    let Some(target) = form.target else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "missing_input",
            "A target genome file is required",
            None,
        );
    };

    if form.backgrounds.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "missing_input",
            "At least one background genome file is required",
            None,
        );
    }

    info!(
        "Analyzing {} against {} background file(s) with k={kmer_size}",
        target.filename.as_deref().unwrap_or("target"),
        form.backgrounds.len()
    );

    let request = AnalysisRequest {
        normalize: form.run_preprocessor,
        ..AnalysisRequest::new(
            FastaSource::from_text(target.text),
            form.backgrounds
                .into_iter()
                .map(|upload| FastaSource::from_text(upload.text))
                .collect(),
            kmer_size,
        )
    };

    match tokio::task::spawn_blocking(move || run_analysis(&request)).await {
        Ok(Ok(result)) => Json(result).into_response(),
        Ok(Err(AnalysisError::Engine(EngineError::InvalidKmerSize(_)))) => error_response(
            StatusCode::BAD_REQUEST,
            "invalid_kmer_size",
            "kmer_size must be a positive integer",
            None,
        ),
        Ok(Err(AnalysisError::MissingBackground)) => error_response(
            StatusCode::BAD_REQUEST,
            "missing_input",
            "At least one background genome file is required",
            None,
        ),
        Ok(Err(e)) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "analysis_failed",
            "The analysis could not be completed",
            Some(&e.to_string()),
        ),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "The analysis could not be completed",
            Some(&e.to_string()),
        ),
    }
}

/// Extract uploads and options from the multipart form
async fn extract_analyze_form(multipart: &mut Multipart) -> Result<AnalyzeForm, Response> {
    let mut form = AnalyzeForm {
        kmer_size: None,
        run_preprocessor: true,
        target: None,
        backgrounds: Vec::new(),
    };

    let mut fields_received = 0usize;

    loop {
        if fields_received >= MAX_MULTIPART_FIELDS {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                "field_limit_exceeded",
                "Too many form fields",
                None,
            ));
        }

        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(multipart_error_response(e.status(), &e.body_text())),
        };
        fields_received += 1;

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "kmer_size" => form.kmer_size = Some(read_text_field(field).await?),
            "run_preprocessor" => {
                let text = read_text_field(field).await?;
                form.run_preprocessor = parse_flag(&text).ok_or_else(|| {
                    error_response(
                        StatusCode::BAD_REQUEST,
                        "invalid_run_preprocessor",
                        "run_preprocessor must be true or false",
                        None,
                    )
                })?;
            }
            "target_genome" => {
                if form.target.is_some() {
                    return Err(error_response(
                        StatusCode::BAD_REQUEST,
                        "multiple_targets",
                        "Exactly one target genome file is allowed",
                        None,
                    ));
                }
                form.target = Some(read_file_field(field).await?);
            }
            "background_genomes" => form.backgrounds.push(read_file_field(field).await?),
            _ => {} // Ignore unknown fields
        }
    }

    Ok(form)
}

async fn read_text_field(field: Field<'_>) -> Result<String, Response> {
    let text = field
        .text()
        .await
        .map_err(|e| multipart_error_response(e.status(), &e.body_text()))?;

    if text.len() > MAX_TEXT_FIELD_SIZE {
        return Err(error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            "text_too_large",
            "Text field size exceeds limit",
            None,
        ));
    }
    Ok(text)
}

async fn read_file_field(field: Field<'_>) -> Result<ValidatedUpload, Response> {
    let filename = field.file_name().map(std::string::ToString::to_string);

    let bytes = field
        .bytes()
        .await
        .map_err(|e| multipart_error_response(e.status(), &e.body_text()))?;

    if bytes.len() > MAX_FILE_FIELD_SIZE {
        return Err(error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            "file_too_large",
            "File size exceeds limit",
            None,
        ));
    }

    validate_upload(filename.as_deref(), &bytes).map_err(|e| validation_error_response(&e))
}

fn multipart_error_response(status: StatusCode, internal: &str) -> Response {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        error_response(
            status,
            "payload_too_large",
            "Upload exceeds the request size limit",
            None,
        )
    } else {
        error_response(
            StatusCode::BAD_REQUEST,
            "multipart_error",
            "Unable to read the uploaded form",
            Some(internal),
        )
    }
}

fn validation_error_response(error: &ValidationError) -> Response {
    let (status, error_type, message) = match error {
        ValidationError::FilenameTooLong => (
            StatusCode::BAD_REQUEST,
            "filename_too_long",
            "Filename exceeds maximum length limit",
        ),
        ValidationError::InvalidFilename | ValidationError::EmptyFilename => (
            StatusCode::BAD_REQUEST,
            "invalid_filename",
            "Filename contains invalid or dangerous characters",
        ),
        ValidationError::InvalidFileContent => (
            StatusCode::BAD_REQUEST,
            "invalid_content",
            "File content appears malformed or corrupted",
        ),
        ValidationError::DecompressedTooLarge => (
            StatusCode::PAYLOAD_TOO_LARGE,
            "file_too_large",
            "Decompressed file size exceeds limit",
        ),
    };
    error_response(status, error_type, message, Some(&error.to_string()))
}

/// Parse a form checkbox or boolean value
fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
