//! 사용자 관리 endpoint.
//!
//! | Method | Path | 권한 |
//! |--------|------|------|
//! | POST | `/api/users/register` | 공개 |
//! | POST | `/api/users/login` | 공개 |
//! | GET | `/api/users` | Teacher, Student |
//! | GET | `/api/users/{email}` | Teacher, Student |
//! | PUT | `/api/users` | Teacher |
//! | DELETE | `/api/users/{email}` | Teacher |

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use roster_core::UserSummary;

use crate::auth::{Authenticated, TeacherAuth};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::service::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest, UpdateUserRequest};
use crate::state::AppState;

/// 회원가입.
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "가입 성공", body = MessageResponse),
        (status = 400, description = "입력 오류, 중복 이메일, 허용되지 않은 역할", body = ApiErrorResponse)
    ),
    tag = "users"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state.users.register(request).await?;
    Ok(Json(MessageResponse::new("User registration successful.")))
}

/// 로그인.
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = LoginResponse),
        (status = 401, description = "이메일 또는 비밀번호 불일치", body = ApiErrorResponse)
    ),
    tag = "users"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response = state.users.login(request, Utc::now()).await?;
    Ok(Json(response))
}

/// 전체 사용자 목록.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "조회 성공", body = Vec<UserSummary>),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_users(
    Authenticated(_claims): Authenticated,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<UserSummary>>> {
    Ok(Json(state.users.list().await?))
}

/// 단일 사용자 조회.
#[utoipa::path(
    get,
    path = "/api/users/{email}",
    params(("email" = String, Path, description = "사용자 이메일")),
    responses(
        (status = 200, description = "조회 성공", body = UserSummary),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn get_user(
    Authenticated(_claims): Authenticated,
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> ApiResult<Json<UserSummary>> {
    Ok(Json(state.users.get(&email).await?))
}

/// 사용자 정보 수정 (Teacher 전용).
#[utoipa::path(
    put,
    path = "/api/users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "수정 성공", body = MessageResponse),
        (status = 400, description = "입력 오류", body = ApiErrorResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "권한 부족", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_user(
    TeacherAuth(_claims): TeacherAuth,
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state.users.update(request).await?;
    Ok(Json(MessageResponse::new("User updated successfully.")))
}

/// 사용자 삭제 (Teacher 전용).
#[utoipa::path(
    delete,
    path = "/api/users/{email}",
    params(("email" = String, Path, description = "사용자 이메일")),
    responses(
        (status = 200, description = "삭제 성공", body = MessageResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "권한 부족", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn delete_user(
    TeacherAuth(claims): TeacherAuth,
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.users.delete(&email).await?;
    tracing::info!(deleted_by = %claims.sub, "Delete request completed");
    Ok(Json(MessageResponse::new("User deleted successfully.")))
}

/// 사용자 라우터 생성.
pub fn users_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_users).put(update_user))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/{email}", get(get_user).delete(delete_user))
}
