//! 사용자 관리 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (회원가입, 로그인, 사용자 관리)
//! - JWT 인증과 Teacher/Student 역할 기반 접근 제어
//! - PostgreSQL 및 메모리 사용자 디렉터리
//! - 헬스 체크 엔드포인트
//! - Prometheus 메트릭
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: 비밀번호 해싱, 토큰 발급/검증, 접근 정책
//! - [`service`]: 등록/로그인/관리 비즈니스 로직
//! - [`repository`]: 사용자 디렉터리
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;

pub use auth::{Authenticated, Claims, TeacherAuth, TokenIssuer, TokenVerifier};
pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use repository::{InMemoryUserDirectory, PgUserRepository, UserDirectory};
pub use routes::*;
pub use service::UserService;
pub use state::AppState;
