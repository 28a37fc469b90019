//! REST API for the pack calculation service.
//!
//! Provides the HTTP endpoints used by the web UI and by integrations.
//! Uses Axum as the web framework; the pack size update endpoint is
//! restricted to one origin and a bearer token.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::{
    Router,
    http::{HeaderMap, HeaderValue, Method, StatusCode, Uri, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::{OpenApi, ToSchema};

use crate::auth::authorize_update;
use crate::calculator::Calculation;
use crate::config::{AppConfig, SecurityConfig};
use crate::error::{ApiError, ErrorResponse};
use crate::service::PackingService;

const UPDATE_SUCCESS_MESSAGE: &str = "Pack sizes updated successfully";
const SERVICE_NAME: &str = "sort-my-packages";

#[derive(Clone)]
pub struct ApiState {
    service: PackingService,
    security: SecurityConfig,
}

impl ApiState {
    pub fn new(service: PackingService, security: SecurityConfig) -> Self {
        Self { service, security }
    }
}

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

// SRI hashes verified against https://unpkg.com/swagger-ui-dist@5.17.14/ on 2025-10-29.
const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>sort-my-packages API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-standalone-preset.js"
            integrity="sha384-2YH8WDRaj7V2OqU/trsmzSagmk/E2SutiCsGkdgoQwC9pNUJV1u/141DHB6jgs8t"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                const ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                    presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],
                    layout: "StandaloneLayout",
                });
                window.ui = ui;
            };
        </script>
    </body>
    </html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

/// Embedded Web Assets (HTML, CSS, JS)
#[derive(RustEmbed)]
#[folder = "web/"]
struct WebAssets;

/// Request body for the calculation endpoint.
#[derive(Deserialize, ToSchema)]
#[schema(example = json!({ "quantity": 1200 }))]
pub struct CalculateRequest {
    pub quantity: i64,
}

/// Chosen packs and their total count.
///
/// # Fields
/// * `packs` - Pack size mapped to the number of packs of that size
/// * `total_packs` - Sum of all pack counts
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[schema(example = json!({ "packs": { "250": 1, "1000": 1 }, "total_packs": 2 }))]
pub struct PackResponse {
    pub packs: BTreeMap<u64, u64>,
    pub total_packs: u64,
}

impl From<Calculation> for PackResponse {
    fn from(calculation: Calculation) -> Self {
        Self {
            total_packs: calculation.total_packs,
            packs: calculation.distribution.into_counts(),
        }
    }
}

/// Request body for replacing the pack sizes.
#[derive(Deserialize, ToSchema)]
#[schema(example = json!({ "pack_sizes": [250, 500, 1000, 2000, 5000] }))]
pub struct PackSizesRequest {
    pub pack_sizes: Vec<i64>,
}

/// Current pack sizes, largest first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PackSizesResponse {
    pub pack_sizes: Vec<u64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
}

fn json_rejection(err: JsonRejection) -> ApiError {
    match err {
        JsonRejection::MissingJsonContentType(_) => ApiError::UnsupportedMediaType,
        other => ApiError::BadRequest(other.body_text()),
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handle_calculate_packs,
        handle_set_pack_sizes,
        handle_get_pack_sizes,
        handle_health
    ),
    components(
        schemas(
            CalculateRequest,
            PackResponse,
            PackSizesRequest,
            PackSizesResponse,
            HealthResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "packing", description = "Pack distribution calculation"),
        (name = "configuration", description = "Pack size management")
    )
)]
struct ApiDoc;

fn update_cors_layer(allowed_origin: &str) -> CorsLayer {
    let origin = match HeaderValue::from_str(allowed_origin) {
        Ok(value) => AllowOrigin::exact(value),
        Err(err) => {
            tracing::warn!(
                "Allowed origin '{}' is not a valid header value: {}. Cross-origin updates are disabled.",
                allowed_origin,
                err
            );
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Builds the application router.
///
/// The web UI comes from `static_dir` when given, otherwise from the
/// assets embedded at compile time.
pub fn router(state: ApiState, static_dir: Option<&Path>) -> Router {
    let public_cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let public = Router::new()
        .route("/calculate-packs", post(handle_calculate_packs))
        .route("/pack-sizes", get(handle_get_pack_sizes))
        .route("/health", get(handle_health))
        // API documentation
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        .layer(public_cors);

    // The CORS layer answers every OPTIONS request on this route with 200.
    let admin = Router::new()
        .route("/set-pack-sizes", post(handle_set_pack_sizes))
        .layer(update_cors_layer(state.security.allowed_origin()));

    let app = public.merge(admin);
    let app = match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        // Web-UI (embedded)
        None => app
            .route("/", get(serve_index))
            .route("/{*path}", get(serve_static)),
    };

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Starts the API server and serves until it terminates.
pub async fn start_api_server(config: AppConfig) -> std::io::Result<()> {
    let AppConfig {
        api,
        security,
        calculator,
    } = config;

    let calculator_config = calculator.calculator_config();
    let service = PackingService::new(calculator_config);
    tracing::info!(
        pack_sizes = ?service.pack_sizes().as_slice(),
        max_exact_quantity = calculator_config.max_exact_quantity,
        "Pack size registry initialised"
    );

    let state = ApiState::new(service, security);
    let app = router(state, api.static_dir().map(PathBuf::as_path));

    let addr = api.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .inspect_err(|err| tracing::error!("Could not bind API server to {}: {}", addr, err))?;

    tracing::info!(
        "🚀 Server running on http://{}:{}",
        api.display_host(),
        api.port()
    );
    if api.binds_to_all_interfaces() {
        tracing::info!("💡 Local access: http://localhost:{}", api.port());
    }
    tracing::info!(
        "📦 API endpoints: POST /calculate-packs, POST /set-pack-sizes, GET /pack-sizes, GET /health"
    );
    tracing::info!("📑 Documentation: GET /docs, GET /docs/openapi.json");
    match api.static_dir() {
        Some(dir) => tracing::info!("🌐 Web-UI served from {}", dir.display()),
        None => tracing::info!("🌐 Web-UI served from embedded assets"),
    }

    axum::serve(listener, app).await
}

/// Handler for POST /calculate-packs.
///
/// Calculates the pack distribution for the requested quantity using the
/// pack sizes currently registered.
#[utoipa::path(
    post,
    path = "/calculate-packs",
    request_body = CalculateRequest,
    responses(
        (status = 200, description = "Pack distribution", body = PackResponse),
        (status = BAD_REQUEST, description = "Malformed body or invalid quantity", body = ErrorResponse),
        (status = UNSUPPORTED_MEDIA_TYPE, description = "Body is not JSON", body = ErrorResponse)
    ),
    tag = "packing"
)]
async fn handle_calculate_packs(
    State(state): State<ApiState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Json<PackResponse>, ApiError> {
    let Json(request) = payload.map_err(json_rejection)?;

    let calculation = state.service.calculate_distribution(request.quantity)?;
    tracing::info!(
        quantity = request.quantity,
        total_packs = calculation.total_packs,
        strategy = ?calculation.strategy,
        "📦 Pack request answered"
    );

    Ok(Json(PackResponse::from(calculation)))
}

/// Handler for POST /set-pack-sizes.
///
/// Replaces the registered pack sizes. Requires the allowed origin and a
/// bearer token; sizes are deduplicated and stored largest first.
#[utoipa::path(
    post,
    path = "/set-pack-sizes",
    request_body = PackSizesRequest,
    responses(
        (status = 200, description = "Pack sizes replaced", content_type = "text/plain", body = String),
        (status = BAD_REQUEST, description = "Empty list or non-positive pack size", body = ErrorResponse),
        (status = UNAUTHORIZED, description = "Missing or wrong bearer token", body = ErrorResponse),
        (status = FORBIDDEN, description = "Request from a disallowed origin", body = ErrorResponse),
        (status = UNSUPPORTED_MEDIA_TYPE, description = "Body is not JSON", body = ErrorResponse)
    ),
    tag = "configuration"
)]
async fn handle_set_pack_sizes(
    State(state): State<ApiState>,
    headers: HeaderMap,
    payload: Result<Json<PackSizesRequest>, JsonRejection>,
) -> Result<&'static str, ApiError> {
    if let Err(JsonRejection::MissingJsonContentType(_)) = &payload {
        return Err(ApiError::UnsupportedMediaType);
    }
    authorize_update(&state.security, &headers)?;

    let Json(request) = payload.map_err(json_rejection)?;
    state.service.update_pack_sizes(request.pack_sizes)?;

    Ok(UPDATE_SUCCESS_MESSAGE)
}

/// Handler for GET /pack-sizes.
#[utoipa::path(
    get,
    path = "/pack-sizes",
    responses((status = 200, description = "Current pack sizes", body = PackSizesResponse)),
    tag = "configuration"
)]
async fn handle_get_pack_sizes(State(state): State<ApiState>) -> Json<PackSizesResponse> {
    Json(PackSizesResponse {
        pack_sizes: state.service.pack_sizes().to_vec(),
    })
}

/// Handler for GET /health.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

/// Serves the index.html main page
async fn serve_index() -> Response {
    match WebAssets::get("index.html") {
        Some(content) => Html(content.data).into_response(),
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

/// Serves static assets (JS, CSS, etc.)
async fn serve_static(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    match WebAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

async fn serve_openapi_json() -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}
