//! 비밀번호 해싱 유틸리티.
//!
//! Argon2 기반 비밀번호 해싱 및 검증.
//! 기본 파라미터(m=19456, t=2, p=1)로 검증 한 번에 수십 ms가 걸립니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use roster_core::HashedPassword;

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("해싱 작업 스레드 실패")]
    WorkerFailed,
}

/// 비밀번호 해싱.
///
/// Argon2id 알고리즘을 사용하여 비밀번호를 해싱합니다.
/// 솔트는 호출마다 새로 생성되므로 같은 입력도 다른 해시가 됩니다.
/// 빈 비밀번호는 호출 전에 등록 로직에서 거부되어야 합니다.
///
/// # Example
///
/// ```rust,ignore
/// let hash = hash_password("my_secure_password").unwrap();
/// // "$argon2id$v=19$m=19456,t=2,p=1$..."
/// ```
pub fn hash_password(password: &str) -> Result<HashedPassword, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(HashedPassword::new(hash.to_string()))
}

/// 비밀번호 검증.
///
/// 저장된 해시와 입력된 비밀번호를 상수 시간으로 비교합니다.
/// 해시 형식이 잘못된 경우에도 에러 대신 `false`를 반환합니다.
pub fn verify_password(password: &str, hash: &HashedPassword) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash.as_str()) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// 블로킹 스레드 풀에서 비밀번호 해싱.
///
/// 해싱은 CPU 바운드이므로 요청 처리 스레드를 막지 않도록 분리합니다.
pub async fn hash_password_blocking(password: String) -> Result<HashedPassword, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|_| PasswordError::WorkerFailed)?
}

/// 블로킹 스레드 풀에서 비밀번호 검증.
///
/// 작업 스레드가 실패해도 검증 실패(`false`)로 처리합니다.
pub async fn verify_password_blocking(password: String, hash: HashedPassword) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .unwrap_or(false)
}
