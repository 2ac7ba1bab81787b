//! # Roster Core
//!
//! 사용자 관리 서비스의 핵심 도메인 모델과 공통 인프라를 제공합니다.
//!
//! 이 크레이트는 HTTP나 SQL에 의존하지 않습니다:
//! - 사용자 신원([`Identity`])과 역할([`Role`])
//! - 에러 분류 체계([`RosterError`])
//! - 설정 로드 및 검증([`AppConfig`])
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
