//! Axum용 JWT 인증 추출기.
//!
//! 보호된 핸들러는 인자에 추출기를 선언하는 것만으로 토큰 검증과
//! 역할 검사를 거친 뒤 실행됩니다.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;
use roster_core::RosterError;
use tracing::{debug, warn};

use super::jwt::Claims;
use super::policy::{AccessDecision, AccessPolicy};
use crate::error::ApiError;
use crate::metrics::record_access_denied;
use crate::state::AppState;

/// 인증된 사용자 추출기 (Teacher, Student 모두 허용).
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn list_users(Authenticated(claims): Authenticated) -> impl IntoResponse {
///     format!("Authenticated user: {}", claims.sub)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Authenticated(pub Claims);

/// Teacher 전용 추출기.
///
/// 유효한 토큰이지만 역할이 Student이면 403을 반환합니다.
#[derive(Debug, Clone)]
pub struct TeacherAuth(pub Claims);

/// Authorization 헤더를 정책으로 판정합니다.
fn guard(parts: &Parts, state: &AppState, policy: AccessPolicy) -> Result<Claims, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match policy.evaluate(header, &state.verifier, Utc::now()) {
        AccessDecision::Proceed(claims) => Ok(claims),
        AccessDecision::Unauthorized(reason) => {
            debug!(
                policy = policy.name(),
                reason = reason.as_label(),
                path = %parts.uri.path(),
                "Request rejected: unauthenticated"
            );
            record_access_denied(policy.name(), reason.as_label());
            Err(RosterError::Unauthorized.into())
        }
        AccessDecision::Forbidden(claims) => {
            warn!(
                policy = policy.name(),
                subject = %claims.sub,
                role = %claims.role,
                path = %parts.uri.path(),
                "Request rejected: insufficient role"
            );
            record_access_denied(policy.name(), "forbidden");
            Err(RosterError::Forbidden.into())
        }
    }
}

impl FromRequestParts<Arc<AppState>> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        guard(parts, state, AccessPolicy::ANY_AUTHENTICATED).map(Authenticated)
    }
}

impl FromRequestParts<Arc<AppState>> for TeacherAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        guard(parts, state, AccessPolicy::TEACHER_ONLY).map(TeacherAuth)
    }
}
