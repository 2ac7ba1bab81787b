//! 도메인 모델.

mod identity;
mod role;

pub use identity::{normalize_email, HashedPassword, Identity, UserSummary};
pub use role::Role;
