//! 사용자 등록, 로그인, 관리 서비스.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use roster_core::{Identity, Role, RosterError, RosterResult, UserSummary};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::auth::{
    hash_password, hash_password_blocking, verify_password_blocking, PasswordError, TokenIssuer,
};
use crate::metrics::{record_login, record_registration};
use crate::repository::UserDirectory;

// 존재하지 않는 이메일로 로그인할 때 검증에 사용하는 해시의 원문.
const TIMING_GUARD_PASSWORD: &str = "roster-timing-guard";

// ================================================================================================
// DTOs
// ================================================================================================

/// 회원가입 요청.
#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// 이름
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters."))]
    pub name: String,
    /// 이메일 (대소문자 구분 없음)
    #[validate(email(message = "Email must be a valid email address."))]
    pub email: String,
    /// 비밀번호 (평문, 저장되지 않음)
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
    /// 생년월일 (YYYY-MM-DD)
    pub date_of_birth: NaiveDate,
    /// 역할 ("Teacher" | "Student")
    #[schema(example = "Student")]
    pub designation: String,
}

/// 로그인 요청.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 로그인 응답.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer 토큰
    pub token: String,
    pub role: Role,
    pub name: String,
    pub email: String,
}

/// 사용자 정보 수정 요청.
///
/// 역할은 수정할 수 없습니다. 비밀번호가 비어 있으면 기존 해시를 유지합니다.
#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// 수정 대상 이메일
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters."))]
    pub name: String,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub password: Option<String>,
}

/// 단순 메시지 응답.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 필드 검증 에러를 하나의 메시지로 합칩니다.
fn validation_error(errors: ValidationErrors) -> RosterError {
    let message = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: invalid value", field))
            })
        })
        .collect::<Vec<_>>()
        .join("; ");
    RosterError::Validation(message)
}

fn password_error(e: PasswordError) -> RosterError {
    RosterError::Internal(e.to_string())
}

// ================================================================================================
// Service
// ================================================================================================

/// 사용자 관리 서비스.
pub struct UserService {
    directory: Arc<dyn UserDirectory>,
    issuer: TokenIssuer,
    timing_guard: roster_core::HashedPassword,
}

impl UserService {
    /// 서비스 생성.
    ///
    /// 미가입 이메일 로그인에도 해시 검증을 한 번 수행하기 위한 더미 해시를 준비합니다.
    pub fn new(directory: Arc<dyn UserDirectory>, issuer: TokenIssuer) -> RosterResult<Self> {
        let timing_guard = hash_password(TIMING_GUARD_PASSWORD).map_err(password_error)?;
        Ok(Self {
            directory,
            issuer,
            timing_guard,
        })
    }

    /// 사용자 디렉터리.
    pub fn directory(&self) -> &Arc<dyn UserDirectory> {
        &self.directory
    }

    /// 회원가입.
    ///
    /// 중복 이메일 검사 다음에 역할 검증을 하며, 둘 다 해싱과 저장보다 먼저 수행됩니다.
    pub async fn register(&self, request: RegisterRequest) -> RosterResult<UserSummary> {
        request.validate().map_err(validation_error)?;

        if self.directory.find_by_email(&request.email).await?.is_some() {
            return Err(RosterError::DuplicateIdentity(roster_core::normalize_email(
                &request.email,
            )));
        }

        let role = Role::parse(&request.designation)
            .ok_or_else(|| RosterError::InvalidRole(request.designation.clone()))?;

        let password_hash = hash_password_blocking(request.password)
            .await
            .map_err(password_error)?;

        let identity = Identity::new(
            &request.email,
            request.name,
            request.date_of_birth,
            role,
            password_hash,
        );

        // 동시 가입 경쟁은 저장소의 유일성 제약이 DuplicateIdentity로 처리
        self.directory.insert(&identity).await?;

        record_registration(role.as_str());
        info!(email = %identity.email, role = %role, "User registered");

        Ok(identity.summary())
    }

    /// 로그인.
    ///
    /// 미가입 이메일과 잘못된 비밀번호는 같은 에러로 응답합니다.
    pub async fn login(
        &self,
        request: LoginRequest,
        now: DateTime<Utc>,
    ) -> RosterResult<LoginResponse> {
        let identity = self.directory.find_by_email(&request.email).await?;

        let hash = identity
            .as_ref()
            .map(|i| i.password_hash.clone())
            .unwrap_or_else(|| self.timing_guard.clone());
        let verified = verify_password_blocking(request.password, hash).await;

        let identity = match identity {
            Some(identity) if verified => identity,
            _ => {
                record_login("invalid_credentials");
                warn!("Login rejected: invalid credentials");
                return Err(RosterError::InvalidCredentials);
            }
        };

        let issued = self.issuer.issue(&identity, now)?;

        record_login("success");
        info!(email = %identity.email, role = %identity.role, "User logged in");

        Ok(LoginResponse {
            token: issued.token,
            role: identity.role,
            name: identity.name,
            email: identity.email,
        })
    }

    /// 전체 사용자 목록 (이메일 순).
    pub async fn list(&self) -> RosterResult<Vec<UserSummary>> {
        let users = self.directory.list().await?;
        debug!(count = users.len(), "Listed users");
        Ok(users.iter().map(Identity::summary).collect())
    }

    /// 단일 사용자 조회.
    pub async fn get(&self, email: &str) -> RosterResult<UserSummary> {
        self.directory
            .find_by_email(email)
            .await?
            .map(|identity| identity.summary())
            .ok_or_else(|| RosterError::NotFound(roster_core::normalize_email(email)))
    }

    /// 사용자 정보 수정.
    pub async fn update(&self, request: UpdateUserRequest) -> RosterResult<UserSummary> {
        request.validate().map_err(validation_error)?;

        let mut identity = self
            .directory
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| RosterError::NotFound(roster_core::normalize_email(&request.email)))?;

        identity.name = request.name;
        identity.date_of_birth = request.date_of_birth;

        if let Some(password) = request.password.filter(|p| !p.is_empty()) {
            identity.password_hash = hash_password_blocking(password)
                .await
                .map_err(password_error)?;
        }

        if !self.directory.update(&identity).await? {
            return Err(RosterError::NotFound(identity.email));
        }

        info!(email = %identity.email, "User updated");
        Ok(identity.summary())
    }

    /// 사용자 삭제.
    pub async fn delete(&self, email: &str) -> RosterResult<()> {
        if !self.directory.delete(email).await? {
            return Err(RosterError::NotFound(roster_core::normalize_email(email)));
        }

        info!(email = %roster_core::normalize_email(email), "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenVerifier;
    use crate::repository::InMemoryUserDirectory;
    use roster_core::JwtSettings;

    fn settings() -> JwtSettings {
        JwtSettings::new("service-test-secret", "UserManagementAPI", "UserManagementAPIUsers", 60)
    }

    fn service() -> (UserService, Arc<InMemoryUserDirectory>) {
        let directory = Arc::new(InMemoryUserDirectory::new());
        let issuer = TokenIssuer::new(&settings()).unwrap();
        let service = UserService::new(directory.clone(), issuer).unwrap();
        (service, directory)
    }

    fn register_request(email: &str, designation: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Alice".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
            designation: designation.to_string(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login_issues_teacher_token() {
        let (service, _) = service();
        service
            .register(register_request("a@x.com", "Teacher", "pw1"))
            .await
            .unwrap();

        let now = Utc::now();
        let response = service.login(login_request("a@x.com", "pw1"), now).await.unwrap();
        assert_eq!(response.role, Role::Teacher);
        assert_eq!(response.email, "a@x.com");
        assert_eq!(response.name, "Alice");

        let claims = TokenVerifier::new(&settings())
            .unwrap()
            .verify(&response.token, now)
            .unwrap();
        assert_eq!(claims.role, Role::Teacher);
        assert_eq!(claims.sub, "a@x.com");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, _) = service();
        service
            .register(register_request("a@x.com", "Teacher", "pw1"))
            .await
            .unwrap();

        let wrong_password = service
            .login(login_request("a@x.com", "wrong"), Utc::now())
            .await
            .unwrap_err();
        let unknown_email = service
            .login(login_request("nobody@x.com", "pw1"), Utc::now())
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, RosterError::InvalidCredentials));
        assert!(matches!(unknown_email, RosterError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_register_invalid_role_stores_nothing() {
        let (service, directory) = service();
        let err = service
            .register(register_request("a@x.com", "Admin", "pw1"))
            .await
            .unwrap_err();

        assert!(matches!(err, RosterError::InvalidRole(ref r) if r == "Admin"));
        assert!(directory.is_empty().await);
    }

    #[tokio::test]
    async fn test_register_role_is_case_sensitive() {
        let (service, _) = service();
        let err = service
            .register(register_request("a@x.com", "teacher", "pw1"))
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::InvalidRole(_)));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_ignores_case() {
        let (service, directory) = service();
        service
            .register(register_request("a@x.com", "Student", "pw1"))
            .await
            .unwrap();

        let err = service
            .register(register_request("A@X.COM", "Teacher", "pw2"))
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::DuplicateIdentity(ref e) if e == "a@x.com"));
        assert_eq!(directory.len().await, 1);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_reported_before_role() {
        let (service, directory) = service();
        service
            .register(register_request("a@x.com", "Student", "pw1"))
            .await
            .unwrap();

        let err = service
            .register(register_request("a@x.com", "Admin", "pw2"))
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::DuplicateIdentity(ref e) if e == "a@x.com"));
        assert_eq!(directory.len().await, 1);
    }

    #[tokio::test]
    async fn test_register_validation() {
        let (service, _) = service();

        let err = service
            .register(register_request("not-an-email", "Student", "pw1"))
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::Validation(_)));

        let err = service
            .register(register_request("a@x.com", "Student", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::Validation(ref m) if m.contains("Password")));
    }

    #[tokio::test]
    async fn test_get_and_list_never_expose_hash() {
        let (service, _) = service();
        service
            .register(register_request("b@x.com", "Student", "pw1"))
            .await
            .unwrap();
        service
            .register(register_request("a@x.com", "Teacher", "pw2"))
            .await
            .unwrap();

        let users = service.list().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].email, "a@x.com");

        let json = serde_json::to_string(&users).unwrap();
        assert!(!json.contains("argon2"));

        let user = service.get("B@x.com").await.unwrap();
        assert_eq!(user.designation, Role::Student);

        assert!(matches!(
            service.get("none@x.com").await.unwrap_err(),
            RosterError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_update_changes_profile_and_password() {
        let (service, _) = service();
        service
            .register(register_request("a@x.com", "Student", "old"))
            .await
            .unwrap();

        let updated = service
            .update(UpdateUserRequest {
                email: "a@x.com".to_string(),
                name: "Alice Kim".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1991, 2, 3).unwrap(),
                password: Some("new".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(updated.name, "Alice Kim");
        assert_eq!(updated.designation, Role::Student);

        assert!(service.login(login_request("a@x.com", "old"), Utc::now()).await.is_err());
        assert!(service.login(login_request("a@x.com", "new"), Utc::now()).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_without_password_keeps_hash() {
        let (service, _) = service();
        service
            .register(register_request("a@x.com", "Student", "pw1"))
            .await
            .unwrap();

        service
            .update(UpdateUserRequest {
                email: "a@x.com".to_string(),
                name: "Renamed".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
                password: Some(String::new()),
            })
            .await
            .unwrap();

        assert!(service.login(login_request("a@x.com", "pw1"), Utc::now()).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_user() {
        let (service, _) = service();

        let err = service
            .update(UpdateUserRequest {
                email: "ghost@x.com".to_string(),
                name: "Ghost".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                password: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::NotFound(_)));

        let err = service.delete("ghost@x.com").await.unwrap_err();
        assert!(matches!(err, RosterError::NotFound(ref e) if e == "ghost@x.com"));
    }

    #[tokio::test]
    async fn test_delete_removes_user() {
        let (service, directory) = service();
        service
            .register(register_request("a@x.com", "Student", "pw1"))
            .await
            .unwrap();

        service.delete("A@x.com").await.unwrap();
        assert!(directory.is_empty().await);
    }
}
