use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::AppState;
use crate::exam::{self, ExamError, QuestionSet};

// --- 요청/응답 스키마 ---

/// 생성 요청 바디 (OpenAPI 문서용). 문항 배열만 보내도 된다.
#[derive(Deserialize, ToSchema)]
#[schema(example = json!({
    "questions": [
        {
            "prompt": "다음 중 옳은 것은?",
            "statements": ["A는 B보다 크다.", "C는 D와 같다."],
            "choices": ["ㄱ", "ㄴ", "ㄱ, ㄴ"],
            "answer": "③"
        }
    ],
    "options": { "spacersPerQuestion": 1 }
}))]
pub struct GenerateRequest {
    /// 문항 목록
    #[schema(value_type = Vec<Object>)]
    pub questions: Value,
    /// 생성 옵션
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub options: Option<Value>,
}

/// 생성 결과
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// 문항 구역 XML
    pub section_xml: String,
    /// 정답 구역 XML (정답/해설이 없으면 null)
    pub answer_section_xml: Option<String>,
    pub question_count: usize,
}

/// 에러 응답 구조
#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "error": {
        "code": "VALIDATION_ERROR",
        "message": "검증 에러: Question at index 1 is missing a prompt.",
        "details": [{ "path": "questions[1]", "message": "Question at index 1 is missing a prompt." }]
    }
}))]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorDetail {
    /// 에러 코드
    pub code: String,
    /// 에러 메시지
    pub message: String,
    /// 상세 에러 목록
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ErrorItem>,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorItem {
    /// 에러 발생 경로
    pub path: String,
    /// 상세 메시지
    pub message: String,
}

/// validate 응답 구조
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({ "valid": true, "questionCount": 3, "errors": [] }))]
pub struct ValidateResponse {
    /// 유효성 결과
    pub valid: bool,
    /// 문항 수 (유효한 경우)
    pub question_count: usize,
    /// 에러 목록
    pub errors: Vec<String>,
}

/// health 응답 구조
#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "status": "healthy",
    "version": "0.1.0",
    "uptime_seconds": 3600
}))]
pub struct HealthResponse {
    /// 서버 상태
    pub status: String,
    /// 서버 버전
    pub version: String,
    /// 가동 시간 (초)
    pub uptime_seconds: u64,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(e: &ExamError) -> ApiError {
    let status = match e {
        ExamError::Validation(_) | ExamError::Input(_) => StatusCode::BAD_REQUEST,
        ExamError::Io(_) | ExamError::Hwpx(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let details = match e {
        ExamError::Validation(v) => v
            .index()
            .map(|index| ErrorItem {
                path: format!("questions[{}]", index),
                message: v.to_string(),
            })
            .into_iter()
            .collect(),
        _ => Vec::new(),
    };
    let resp = ErrorResponse {
        error: ErrorDetail {
            code: e.error_code().to_string(),
            message: e.to_string(),
            details,
        },
    };
    (status, Json(resp))
}

/// 요청 본문을 문항 세트로 읽는다
fn parse_question_set(body: &str) -> Result<QuestionSet, ExamError> {
    QuestionSet::from_json_str(body)
}

// --- 핸들러 ---

/// 문항 구역 XML 생성
///
/// 문항 JSON을 받아 문항 구역과 정답 구역 XML을 JSON으로 반환합니다.
#[utoipa::path(
    post,
    path = "/api/v1/generate",
    request_body(content = GenerateRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "생성 성공", body = GenerateResponse),
        (status = 400, description = "잘못된 입력", body = ErrorResponse),
        (status = 500, description = "생성 실패", body = ErrorResponse),
    ),
    tag = "생성"
)]
pub async fn generate(body: String) -> Result<Json<GenerateResponse>, ApiError> {
    let set = parse_question_set(&body).map_err(|e| error_response(&e))?;
    let generated = exam::generate(&set).map_err(|e| {
        tracing::error!(error = %e, "구역 XML 생성 실패");
        error_response(&e)
    })?;

    Ok(Json(GenerateResponse {
        section_xml: generated.section_xml,
        answer_section_xml: generated.answer_section_xml,
        question_count: generated.question_count,
    }))
}

/// 문항 구역 XML만 생성
///
/// 생성된 문항 구역 XML 문서를 그대로 반환합니다.
#[utoipa::path(
    post,
    path = "/api/v1/generate/section",
    request_body(content = GenerateRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "생성 성공 (XML)", content_type = "application/xml"),
        (status = 400, description = "잘못된 입력", body = ErrorResponse),
        (status = 500, description = "생성 실패", body = ErrorResponse),
    ),
    tag = "생성"
)]
pub async fn generate_section(body: String) -> Result<impl IntoResponse, ApiError> {
    let set = parse_question_set(&body).map_err(|e| error_response(&e))?;
    let generated = exam::generate(&set).map_err(|e| error_response(&e))?;

    let headers = [
        (header::CONTENT_TYPE, "application/xml; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            "inline; filename=\"section0.xml\"".to_string(),
        ),
    ];
    Ok((headers, generated.section_xml))
}

/// 문항 JSON 유효성 검증
///
/// 문항 구조와 필수 필드를 검증합니다. XML은 생성하지 않습니다.
#[utoipa::path(
    post,
    path = "/api/v1/validate",
    request_body(content = GenerateRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "검증 결과", body = ValidateResponse),
    ),
    tag = "검증"
)]
pub async fn validate(body: String) -> impl IntoResponse {
    let resp = match parse_question_set(&body) {
        Ok(set) => ValidateResponse {
            valid: true,
            question_count: set.questions.len(),
            errors: Vec::new(),
        },
        Err(e) => ValidateResponse {
            valid: false,
            question_count: 0,
            errors: vec![e.to_string()],
        },
    };
    (StatusCode::OK, Json(resp))
}

/// 서버 상태 확인
///
/// 서버의 현재 상태, 버전, 가동 시간을 반환합니다.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "서버 상태", body = HealthResponse),
    ),
    tag = "상태"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().as_secs();
    let resp = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
    };
    Json(resp)
}
