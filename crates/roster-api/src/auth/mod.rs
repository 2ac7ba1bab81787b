//! 인증 및 권한 부여.
//!
//! JWT 기반 인증 및 역할 기반 접근 제어를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`hash_password`] / [`verify_password`]: Argon2 비밀번호 해싱
//! - [`TokenIssuer`]: 로그인 성공 시 토큰 발급
//! - [`TokenVerifier`]: 서명, issuer, audience, 만료 검증
//! - [`AccessPolicy`]: 엔드포인트별 허용 역할
//! - [`Authenticated`] / [`TeacherAuth`]: Axum 추출기
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn delete_user(TeacherAuth(claims): TeacherAuth) -> impl IntoResponse {
//!     format!("Deleted by {}", claims.sub)
//! }
//! ```

mod jwt;
mod middleware;
mod password;
mod policy;

pub use jwt::{Claims, IssuedToken, TokenError, TokenIssuer, TokenVerifier};
pub use middleware::{Authenticated, TeacherAuth};
pub use password::{
    hash_password, hash_password_blocking, verify_password, verify_password_blocking,
    PasswordError,
};
pub use policy::{authorize, bearer_token, AccessDecision, AccessPolicy, DenyReason};
