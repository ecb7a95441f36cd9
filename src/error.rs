//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 `{ "error": "..." }` 형태의 HTTP 응답으로 자동 변환
//!
//! 에러 분류:
//! 1. 찾을 수 없음(사이트/모델/콘텐츠) → 404, 구체적인 메시지
//! 2. 잘못된 입력(경로/쿼리/본문) → 400
//! 3. 저장소/인프라 실패 → 500, 내부 내용은 로그에만 남기고 일반 메시지만 반환

use axum::{
    http::StatusCode,                   // HTTP 상태 코드 (200, 404, 500 등)
    response::{IntoResponse, Response}, // Axum의 응답 변환 트레이트
    Json,                               // JSON 응답 래퍼
};
use serde::Serialize;
use serde_json::json; // json! 매크로: JSON 객체를 간편하게 생성
use thiserror::Error; // thiserror: 커스텀 에러 타입을 쉽게 만들어주는 매크로 크레이트

/// 콘텐츠 검증에서 필드 하나가 실패한 이유
///
/// `field`는 필드 id(저장 시 키), `message`는 사람이 읽을 메시지입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 각 에러 variant는 적절한 HTTP 상태 코드와 메시지로 변환됩니다.
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    /// 메시지는 그대로 클라이언트에 전달됩니다. (예: "Model not found in this site")
    #[error("{0}")]
    NotFound(String),

    /// 잘못된 요청 (HTTP 400)
    #[error("{0}")]
    BadRequest(String),

    /// 콘텐츠가 모델 스키마를 통과하지 못함 (HTTP 400)
    /// 필드별 실패 이유 목록을 함께 전달합니다.
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// 리소스 충돌 (HTTP 409)
    /// 예: 같은 사이트에 이미 있는 appId, 콘텐츠가 남아 있는 모델 삭제
    #[error("{0}")]
    Conflict(String),

    /// 서버 내부 오류 (HTTP 500)
    /// 메시지는 이미 일반화된 문구여야 합니다. (예: "Failed to retrieve content")
    /// 세부 원인은 이 에러를 만드는 쪽에서 로그로 남깁니다.
    #[error("{0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx::Error를 AppError로 자동 변환하는 From 트레이트를 구현합니다.
    /// sqlx 함수에서 반환된 에러에 `?` 연산자를 사용하면
    /// 자동으로 AppError::Database로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// 404 에러를 만드는 단축 함수
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    /// 400 에러를 만드는 단축 함수
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    /// 이 에러가 변환될 HTTP 상태 코드
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 응답 본문은 항상 `{ "error": "메시지" }` 형태입니다.
    /// 검증 실패는 `"fields"` 배열을 추가로 포함합니다.
    /// 데이터베이스 에러는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let status = self.status();

        // match: 패턴 매칭. enum의 각 variant에 대해 다른 처리를 합니다.
        // ref: 값을 이동(move)하지 않고 참조만 빌려옵니다.
        let body = match self {
            AppError::Validation(ref errors) => json!({
                "error": self.to_string(),
                "fields": errors,
            }),
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                json!({ "error": "Internal server error" })
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                json!({ "error": msg })
            }
            AppError::NotFound(ref msg)
            | AppError::BadRequest(ref msg)
            | AppError::Conflict(ref msg) => json!({ "error": msg }),
        };

        // (StatusCode, Json<Value>) 튜플은 Axum이 자동으로 HTTP 응답으로 변환합니다.
        (status, Json(body)).into_response()
    }
}
