//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 `Arc`로 래핑되어 여러 요청 간에 공유됩니다.
//! 설정은 시작 시 한 번 읽어 발급기/검증기에 주입되며 이후 변경되지 않습니다.

use std::sync::Arc;

use roster_core::{JwtSettings, RosterResult};

use crate::auth::{TokenIssuer, TokenVerifier};
use crate::repository::UserDirectory;
use crate::service::UserService;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 사용자 관리 서비스
    pub users: Arc<UserService>,

    /// 토큰 검증기 (보호된 라우트의 추출기에서 사용)
    pub verifier: Arc<TokenVerifier>,

    /// 데이터베이스 연결 풀 (메모리 디렉터리 사용 시 None)
    pub db_pool: Option<sqlx::PgPool>,

    /// 서버 시작 시간
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    ///
    /// JWT 설정이 유효하지 않으면 `Configuration` 에러를 반환합니다.
    pub fn new(jwt: &JwtSettings, directory: Arc<dyn UserDirectory>) -> RosterResult<Self> {
        jwt.validate()?;

        let issuer = TokenIssuer::new(jwt)?;
        let verifier = TokenVerifier::new(jwt)?;

        Ok(Self {
            users: Arc::new(UserService::new(directory, issuer)?),
            verifier: Arc::new(verifier),
            db_pool: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// 데이터베이스 연결 풀 설정.
    pub fn with_db_pool(mut self, pool: sqlx::PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// 사용자 디렉터리 백엔드 이름 ("postgres" | "memory").
    pub fn directory_backend(&self) -> &'static str {
        self.users.directory().backend()
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        if let Some(pool) = &self.db_pool {
            sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
        } else {
            false
        }
    }
}

/// 테스트용 JWT 설정.
#[cfg(test)]
pub fn test_jwt_settings() -> JwtSettings {
    JwtSettings::new("unit-test-secret", "UserManagementAPI", "UserManagementAPIUsers", 60)
}

/// 테스트용 AppState 생성 헬퍼.
///
/// 메모리 디렉터리를 사용하므로 DB 연결 없이 동작합니다.
#[cfg(test)]
pub fn create_test_state() -> AppState {
    use crate::repository::InMemoryUserDirectory;

    AppState::new(&test_jwt_settings(), Arc::new(InMemoryUserDirectory::new()))
        .expect("test state")
}
