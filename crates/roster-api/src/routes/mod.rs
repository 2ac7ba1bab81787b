//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/users` - 회원가입, 로그인, 사용자 관리

pub mod health;
pub mod users;

pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use users::users_router;

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/api/users", users_router())
}
