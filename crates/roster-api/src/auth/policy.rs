//! 역할 기반 접근 정책.
//!
//! 요청 단위 상태 기계:
//!
//! | 상태 | 결과 |
//! |------|------|
//! | 토큰 없음 | Unauthorized |
//! | 토큰 있음, 검증 실패 | Unauthorized |
//! | 검증 성공, 허용되지 않은 역할 | Forbidden |
//! | 검증 성공, 허용된 역할 | Proceed |

use chrono::{DateTime, Utc};
use roster_core::Role;

use super::jwt::{Claims, TokenError, TokenVerifier};

/// Claims의 역할이 허용 집합에 포함되는지 확인.
pub fn authorize(claims: &Claims, allowed_roles: &[Role]) -> bool {
    allowed_roles.contains(&claims.role)
}

/// 인증 실패 사유 (진단용).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Authorization 헤더 없음
    MissingToken,
    /// Bearer 형식이 아님
    InvalidAuthHeader,
    /// 토큰 검증 실패
    InvalidToken(TokenError),
}

impl DenyReason {
    /// 메트릭/로그 라벨.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::InvalidAuthHeader => "invalid_auth_header",
            Self::InvalidToken(e) => e.as_label(),
        }
    }
}

/// 접근 판정 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// 비즈니스 로직 진행
    Proceed(Claims),
    /// 인증 실패 (401)
    Unauthorized(DenyReason),
    /// 권한 부족 (403)
    Forbidden(Claims),
}

/// 엔드포인트별 접근 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    name: &'static str,
    allowed_roles: &'static [Role],
}

impl AccessPolicy {
    /// 인증된 모든 사용자 (목록/조회).
    pub const ANY_AUTHENTICATED: AccessPolicy = AccessPolicy {
        name: "any_authenticated",
        allowed_roles: &[Role::Teacher, Role::Student],
    };

    /// Teacher 전용 (수정/삭제).
    pub const TEACHER_ONLY: AccessPolicy = AccessPolicy {
        name: "teacher_only",
        allowed_roles: &[Role::Teacher],
    };

    /// 정책 이름.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Authorization 헤더 값으로 접근 여부를 판정합니다.
    pub fn evaluate(
        &self,
        authorization: Option<&str>,
        verifier: &TokenVerifier,
        now: DateTime<Utc>,
    ) -> AccessDecision {
        let Some(header) = authorization else {
            return AccessDecision::Unauthorized(DenyReason::MissingToken);
        };

        let Some(token) = bearer_token(header) else {
            return AccessDecision::Unauthorized(DenyReason::InvalidAuthHeader);
        };

        match verifier.verify(token, now) {
            Err(e) => AccessDecision::Unauthorized(DenyReason::InvalidToken(e)),
            Ok(claims) if authorize(&claims, self.allowed_roles) => AccessDecision::Proceed(claims),
            Ok(claims) => AccessDecision::Forbidden(claims),
        }
    }
}

/// `Bearer <token>` 헤더에서 토큰 추출.
///
/// 스킴 이름은 대소문자를 구분하지 않습니다.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
