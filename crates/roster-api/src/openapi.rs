//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use roster_core::{Role, UserSummary};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiErrorResponse;
use crate::routes::{ComponentHealth, ComponentStatus, HealthResponse};
use crate::service::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, UpdateUserRequest,
};

/// `Authorization: Bearer <token>` 보안 스키마 등록.
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Roster API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Roster User Management API",
        version = "0.1.0",
        description = r#"
# Roster 사용자 관리 REST API

회원가입, 로그인, 사용자 관리를 위한 REST API입니다.

## 인증

로그인으로 받은 JWT를 `Authorization: Bearer <token>` 헤더에 포함하세요.
토큰은 60분(설정 가능) 후 만료되며 서버 측 폐기 목록은 없습니다.

## 역할

- **Teacher**: 조회, 수정, 삭제
- **Student**: 조회
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5094", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "users", description = "사용자 - 회원가입, 로그인, 관리")
    ),
    modifiers(&BearerSecurity),
    components(
        schemas(
            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Common =====
            ApiErrorResponse,
            MessageResponse,

            // ===== Users =====
            Role,
            UserSummary,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UpdateUserRequest,
        )
    ),
    paths(
        // ===== Health =====
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        // ===== Users =====
        crate::routes::users::register,
        crate::routes::users::login,
        crate::routes::users::list_users,
        crate::routes::users::get_user,
        crate::routes::users::update_user,
        crate::routes::users::delete_user,
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        assert!(json.contains("Roster User Management API"));
        assert!(json.contains("/health/ready"));
        assert!(json.contains("/api/users/register"));
        assert!(json.contains("/api/users/login"));
        assert!(json.contains("/api/users/{email}"));
        assert!(json.contains("bearer_auth"));
    }

    #[test]
    fn test_schemas_registered() {
        let spec = ApiDoc::openapi();
        let schemas = &spec.components.as_ref().unwrap().schemas;

        for name in ["UserSummary", "LoginResponse", "RegisterRequest", "ApiErrorResponse", "Role"] {
            assert!(schemas.contains_key(name), "missing schema {}", name);
        }
    }

    #[test]
    fn test_summary_schema_has_no_password_field() {
        let spec = ApiDoc::openapi();
        let schema = serde_json::to_string(&spec.components.unwrap().schemas["UserSummary"]).unwrap();
        assert!(schema.contains("dateOfBirth"));
        assert!(!schema.to_lowercase().contains("password"));
    }
}
