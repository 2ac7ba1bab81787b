//! 비즈니스 로직 계층.
//!
//! 라우트 핸들러는 요청 파싱과 응답 변환만 담당하고,
//! 등록/로그인/관리 흐름은 이 모듈에서 처리합니다.

mod users;

pub use users::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, UpdateUserRequest, UserService,
};
