//! 사용자 관리 서비스의 에러 타입.
//!
//! 모든 에러는 요청 경계에서 복구되어 상태 코드와 메시지로 변환되며,
//! 프로세스를 중단시키지 않습니다. 예외는 시작 시점의 설정 에러뿐입니다.

use thiserror::Error;

/// 로그인 실패 시 사용하는 고정 메시지.
///
/// 존재하지 않는 이메일과 잘못된 비밀번호 모두 이 메시지를 사용합니다.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password.";

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum RosterError {
    /// 설정 에러 (시작 시 치명적)
    #[error("설정 에러: {0}")]
    Configuration(String),

    /// 잘못된 자격증명 (알 수 없는 이메일 또는 잘못된 비밀번호)
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    /// 이미 등록된 이메일
    #[error("Email is already registered: {0}")]
    DuplicateIdentity(String),

    /// 허용되지 않은 역할
    #[error("Designation must be either 'Teacher' or 'Student' (got '{0}').")]
    InvalidRole(String),

    /// 인증 실패 (토큰 없음/무효/만료)
    #[error("Authentication is required.")]
    Unauthorized,

    /// 권한 부족 (유효한 토큰, 허용되지 않은 역할)
    #[error("You do not have permission to perform this action.")]
    Forbidden,

    /// 대상 사용자 없음
    #[error("User not found: {0}")]
    NotFound(String),

    /// 입력 검증 실패
    #[error("Invalid input: {0}")]
    Validation(String),

    /// 내부 에러 (저장소, 해셔 등)
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// Result 타입 별칭.
pub type RosterResult<T> = Result<T, RosterError>;

impl RosterError {
    /// 에러 코드 (API 응답용).
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::DuplicateIdentity(_) => "DUPLICATE_IDENTITY",
            Self::InvalidRole(_) => "INVALID_ROLE",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 내부 상세를 숨겨야 하는 에러인지 확인합니다.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Internal(_))
    }
}

impl From<config::ConfigError> for RosterError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
