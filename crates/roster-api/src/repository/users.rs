//! Users Repository
//!
//! PostgreSQL `users` 테이블에 대한 데이터베이스 연산을 담당합니다.
//! 이메일은 소문자로 저장되며 UNIQUE 제약으로 중복을 막습니다.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use roster_core::{normalize_email, HashedPassword, Identity, Role, RosterError, RosterResult};
use sqlx::{FromRow, PgPool};

use super::UserDirectory;

// ================================================================================================
// Types
// ================================================================================================

/// 사용자 테이블 레코드
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub designation: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for Identity {
    type Error = RosterError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.designation).ok_or_else(|| {
            RosterError::Internal(format!(
                "unexpected designation '{}' stored for user id {}",
                row.designation, row.id
            ))
        })?;

        Ok(Identity::new(
            &row.email,
            row.name,
            row.date_of_birth,
            role,
            HashedPassword::new(row.password_hash),
        ))
    }
}

fn db_error(e: sqlx::Error) -> RosterError {
    RosterError::Internal(format!("database error: {}", e))
}

// ================================================================================================
// Repository
// ================================================================================================

/// PostgreSQL 사용자 저장소
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// 연결 풀로 저장소 생성.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 스키마 마이그레이션 적용.
    pub async fn migrate(&self) -> RosterResult<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RosterError::Internal(format!("migration failed: {}", e)))
    }
}

#[async_trait]
impl UserDirectory for PgUserRepository {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn find_by_email(&self, email: &str) -> RosterResult<Option<Identity>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, date_of_birth, designation, password_hash,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(Identity::try_from).transpose()
    }

    async fn list(&self) -> RosterResult<Vec<Identity>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, date_of_birth, designation, password_hash,
                   created_at, updated_at
            FROM users
            ORDER BY email
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(Identity::try_from).collect()
    }

    async fn insert(&self, identity: &Identity) -> RosterResult<()> {
        let email = normalize_email(&identity.email);

        sqlx::query(
            r#"
            INSERT INTO users (email, name, date_of_birth, designation, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&email)
        .bind(&identity.name)
        .bind(identity.date_of_birth)
        .bind(identity.role.as_str())
        .bind(identity.password_hash.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                RosterError::DuplicateIdentity(email.clone())
            }
            other => db_error(other),
        })?;

        Ok(())
    }

    async fn update(&self, identity: &Identity) -> RosterResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2,
                date_of_birth = $3,
                designation = $4,
                password_hash = $5,
                updated_at = NOW()
            WHERE email = $1
            "#,
        )
        .bind(normalize_email(&identity.email))
        .bind(&identity.name)
        .bind(identity.date_of_birth)
        .bind(identity.role.as_str())
        .bind(identity.password_hash.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, email: &str) -> RosterResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(normalize_email(email))
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
