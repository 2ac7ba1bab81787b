//! 저장된 사용자 레코드.
//!
//! 이메일이 유일한 조회 키이며 대소문자를 구분하지 않습니다.
//! 비밀번호 해시는 어떤 응답에도 직렬화되지 않고 로그에도 남지 않습니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Role;

/// 단방향 해시된 비밀번호 (PHC 문자열).
///
/// `Serialize`와 `Display`를 구현하지 않으며, `Debug` 출력은 가려집니다.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// 저장소에서 읽은 해시 문자열을 감쌉니다.
    pub fn new(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// 해시 문자열 (저장 및 검증 용도로만 사용).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HashedPassword([REDACTED])")
    }
}

/// 사용자 신원.
#[derive(Debug, Clone)]
pub struct Identity {
    /// 정규화된 이메일 (소문자)
    pub email: String,
    /// 이름
    pub name: String,
    /// 생년월일
    pub date_of_birth: NaiveDate,
    /// 역할
    pub role: Role,
    /// 비밀번호 해시
    pub password_hash: HashedPassword,
}

impl Identity {
    /// 새 신원 생성. 이메일은 정규화되어 저장됩니다.
    pub fn new(
        email: &str,
        name: impl Into<String>,
        date_of_birth: NaiveDate,
        role: Role,
        password_hash: HashedPassword,
    ) -> Self {
        Self {
            email: normalize_email(email),
            name: name.into(),
            date_of_birth,
            role,
            password_hash,
        }
    }

    /// 외부 공개용 요약으로 변환.
    pub fn summary(&self) -> UserSummary {
        UserSummary::from(self)
    }
}

/// 사용자 공개 정보.
///
/// 비밀번호 해시를 제외한, 호출자에게 반환 가능한 유일한 사용자 표현입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub email: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    /// 역할 ("Teacher" | "Student")
    pub designation: Role,
}

impl From<&Identity> for UserSummary {
    fn from(identity: &Identity) -> Self {
        Self {
            email: identity.email.clone(),
            name: identity.name.clone(),
            date_of_birth: identity.date_of_birth,
            designation: identity.role,
        }
    }
}

/// 이메일 정규화 (앞뒤 공백 제거 + 소문자).
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
