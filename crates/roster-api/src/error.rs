//! 통합 API 에러 응답 타입.
//!
//! 모든 엔드포인트는 [`RosterError`]를 반환하고, 요청 경계에서
//! 상태 코드와 `ApiErrorResponse` 본문으로 변환됩니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::RosterError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "User not found: a@x.com",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "INVALID_CREDENTIALS", "FORBIDDEN")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }
}

/// 핸들러 에러 래퍼.
#[derive(Debug)]
pub struct ApiError(pub RosterError);

impl From<RosterError> for ApiError {
    fn from(err: RosterError) -> Self {
        Self(err)
    }
}

/// 에러 종류별 HTTP 상태 코드.
pub fn status_for(err: &RosterError) -> StatusCode {
    match err {
        RosterError::Validation(_)
        | RosterError::InvalidRole(_)
        | RosterError::DuplicateIdentity(_) => StatusCode::BAD_REQUEST,
        RosterError::InvalidCredentials | RosterError::Unauthorized => StatusCode::UNAUTHORIZED,
        RosterError::Forbidden => StatusCode::FORBIDDEN,
        RosterError::NotFound(_) => StatusCode::NOT_FOUND,
        RosterError::Configuration(_) | RosterError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);

        let message = if self.0.is_internal() {
            tracing::error!(error = %self.0, "Request failed with internal error");
            "An unexpected error occurred.".to_string()
        } else {
            self.0.to_string()
        };

        let mut response =
            (status, Json(ApiErrorResponse::new(self.0.code(), message))).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }

        response
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;
