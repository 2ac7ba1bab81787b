//! 사용자 디렉터리 (저장소 계층).
//!
//! 데이터베이스 접근 로직을 라우트 핸들러에서 분리합니다.
//! 인증 계약은 [`UserDirectory`] 트레이트만 사용하며,
//! 재시도와 연결 수명 주기는 구현체의 책임입니다.

mod memory;
mod users;

pub use memory::InMemoryUserDirectory;
pub use users::{PgUserRepository, UserRow};

use async_trait::async_trait;
use roster_core::{Identity, RosterResult};

/// 사용자 레코드 저장소.
///
/// 모든 조회 키는 정규화된(소문자) 이메일입니다.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// 백엔드 이름 (헬스 체크/로그용).
    fn backend(&self) -> &'static str;

    /// 이메일로 사용자 조회.
    async fn find_by_email(&self, email: &str) -> RosterResult<Option<Identity>>;

    /// 전체 사용자 목록 (이메일 순).
    async fn list(&self) -> RosterResult<Vec<Identity>>;

    /// 사용자 추가. 이메일이 이미 있으면 `DuplicateIdentity`.
    async fn insert(&self, identity: &Identity) -> RosterResult<()>;

    /// 사용자 갱신. 대상이 없으면 `false`.
    async fn update(&self, identity: &Identity) -> RosterResult<bool>;

    /// 사용자 삭제. 대상이 없으면 `false`.
    async fn delete(&self, email: &str) -> RosterResult<bool>;
}
