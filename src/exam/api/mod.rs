//! 문항 XML 생성 HTTP API (axum).
//!
//! 요청마다 옵션과 ID 공간을 새로 만들기 때문에 공유 상태는 가동 시각뿐이다.

pub mod handlers;

use std::sync::Arc;
use std::time::Instant;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::{Config, SwaggerUi};

use handlers::{
    ErrorDetail, ErrorItem, ErrorResponse, GenerateRequest, GenerateResponse, HealthResponse,
    ValidateResponse,
};

/// OpenAPI 문서 정의
#[derive(OpenApi)]
#[openapi(
    info(
        title = "hwpmaker API",
        version = "0.1.0",
        description = "객관식 문항 JSON을 HWPX 구역 XML로 생성하는 REST API"
    ),
    paths(
        handlers::generate,
        handlers::generate_section,
        handlers::validate,
        handlers::health,
    ),
    components(schemas(
        GenerateRequest,
        GenerateResponse,
        ErrorResponse,
        ErrorDetail,
        ErrorItem,
        ValidateResponse,
        HealthResponse,
    )),
    tags(
        (name = "생성", description = "문항 JSON → 구역 XML 생성"),
        (name = "검증", description = "입력 데이터 유효성 검증"),
        (name = "상태", description = "서버 상태 확인"),
    )
)]
pub struct ApiDoc;

/// API 서버 공유 상태
pub struct AppState {
    pub start_time: Instant,
}

/// API 서버 설정
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_request_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// 환경변수를 읽어 파싱. 없거나 형식이 틀리면 `None`.
fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

impl ServerConfig {
    /// `HOST`, `PORT`, `MAX_REQUEST_SIZE` 환경변수로 기본값을 덮어쓴다
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_parse("PORT").unwrap_or(defaults.port),
            max_request_size: env_parse("MAX_REQUEST_SIZE").unwrap_or(defaults.max_request_size),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// AppState 생성
pub fn build_state() -> Arc<AppState> {
    Arc::new(AppState {
        start_time: Instant::now(),
    })
}

/// axum Router 생성 (Swagger UI 포함)
pub fn create_router(config: &ServerConfig) -> Router {
    create_router_with_state(build_state(), config.max_request_size)
}

/// 주어진 AppState로 Router 생성
pub fn create_router_with_state(state: Arc<AppState>, max_request_size: usize) -> Router {
    let mut openapi = ApiDoc::openapi();
    // utoipa가 Cargo.toml의 license를 자동 삽입하므로 런타임에 제거
    openapi.info.license = None;

    Router::new()
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi)
                .config(Config::default().use_base_layout()),
        )
        .route("/api/v1/generate", post(handlers::generate))
        .route("/api/v1/generate/section", post(handlers::generate_section))
        .route("/api/v1/validate", post(handlers::validate))
        .route("/api/v1/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(max_request_size))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:8080");
        assert_eq!(config.max_request_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_openapi_lists_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/generate"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/generate/section"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/health"));
    }
}
