//! 사용자 역할.
//!
//! 역할은 정확히 두 가지(Teacher, Student)로 닫혀 있으며,
//! 그 외의 값은 등록 시점에 거부됩니다.

use serde::{Deserialize, Serialize};

/// 사용자 역할.
///
/// 어떤 엔드포인트를 호출할 수 있는지를 결정합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum Role {
    /// 교사 - 사용자 수정/삭제 가능
    Teacher,
    /// 학생 - 조회만 가능
    Student,
}

impl Role {
    /// 문자열에서 역할 파싱.
    ///
    /// `"Teacher"`, `"Student"` 두 표기만 허용합니다 (대소문자 구분).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Teacher" => Some(Role::Teacher),
            "Student" => Some(Role::Student),
            _ => None,
        }
    }

    /// 역할 문자열 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Teacher => "Teacher",
            Role::Student => "Student",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("Teacher"), Some(Role::Teacher));
        assert_eq!(Role::parse("Student"), Some(Role::Student));
        assert_eq!(Role::parse("Admin"), None);
        assert_eq!(Role::parse("teacher"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Teacher).unwrap();
        assert_eq!(json, "\"Teacher\"");

        let parsed: Role = serde_json::from_str("\"Student\"").unwrap();
        assert_eq!(parsed, Role::Student);

        assert!(serde_json::from_str::<Role>("\"Admin\"").is_err());
    }

    #[test]
    fn test_role_display_matches_parse() {
        for role in [Role::Teacher, Role::Student] {
            assert_eq!(Role::parse(&role.to_string()), Some(role));
        }
    }
}
