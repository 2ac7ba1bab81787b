//! 설정 관리.
//!
//! 설정은 프로세스 시작 시 한 번 로드되어 불변 값으로 주입됩니다.
//! 우선순위: 기본값 → 설정 파일(선택) → `ROSTER__*` 환경 변수.

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use crate::error::{RosterError, RosterResult};
use crate::logging::LogConfig;

/// 환경 변수 접두사.
pub const ENV_PREFIX: &str = "ROSTER";

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 애플리케이션 설정.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    #[serde(default)]
    pub database: DatabaseConfig,
    /// JWT 설정
    pub jwt: JwtSettings,
    /// CORS 설정
    #[serde(default)]
    pub cors: CorsConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LogConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5094,
        }
    }
}

impl ServerConfig {
    /// `host:port` 문자열.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 연결 URL. 없으면 메모리 저장소를 사용합니다.
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 획득 타임아웃 (초)
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout_secs: 10,
        }
    }
}

/// JWT 발급/검증 설정.
///
/// 발급기와 검증기가 같은 값을 공유합니다.
#[derive(Debug, Deserialize)]
pub struct JwtSettings {
    /// HMAC-SHA256 서명 키 (필수, 비어 있으면 안 됨)
    #[serde(deserialize_with = "deserialize_secret")]
    pub secret_key: SecretString,
    /// 발급자 (iss)
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// 대상 (aud)
    #[serde(default = "default_audience")]
    pub audience: String,
    /// 토큰 수명 (분, 양의 정수)
    #[serde(default = "default_expiry_minutes")]
    pub expiry_minutes: u32,
}

impl JwtSettings {
    /// 설정 생성 (테스트 및 임베딩 용도).
    pub fn new(
        secret_key: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        expiry_minutes: u32,
    ) -> Self {
        Self {
            secret_key: SecretString::from(secret_key.into()),
            issuer: issuer.into(),
            audience: audience.into(),
            expiry_minutes,
        }
    }

    /// 설정값 검증.
    pub fn validate(&self) -> RosterResult<()> {
        if self.secret_key.expose_secret().trim().is_empty() {
            return Err(RosterError::Configuration(
                "jwt.secret_key is not configured".to_string(),
            ));
        }
        if self.issuer.trim().is_empty() {
            return Err(RosterError::Configuration(
                "jwt.issuer must not be empty".to_string(),
            ));
        }
        if self.audience.trim().is_empty() {
            return Err(RosterError::Configuration(
                "jwt.audience must not be empty".to_string(),
            ));
        }
        if self.expiry_minutes == 0 {
            return Err(RosterError::Configuration(
                "jwt.expiry_minutes must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_issuer() -> String {
    "UserManagementAPI".to_string()
}

fn default_audience() -> String {
    "UserManagementAPIUsers".to_string()
}

fn default_expiry_minutes() -> u32 {
    60
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

/// CORS 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// 허용 origin 목록
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일은 없어도 됩니다. `DATABASE_URL`이 설정되어 있으면
    /// `database.url`의 기본값으로 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> RosterResult<Self> {
        let mut builder = Self::builder()?;
        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.set_default("database.url", url)?;
        }

        let config = builder
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        Self::finish(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> RosterResult<Self> {
        Self::load(DEFAULT_CONFIG_PATH)
    }

    /// TOML 문자열에서 설정을 로드합니다 (환경 변수 무시).
    pub fn from_toml_str(toml: &str) -> RosterResult<Self> {
        let config = Self::builder()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;

        Self::finish(config)
    }

    /// 전체 설정 검증.
    pub fn validate(&self) -> RosterResult<()> {
        self.jwt.validate()?;
        if self.server.port == 0 {
            return Err(RosterError::Configuration(
                "server.port must not be 0".to_string(),
            ));
        }
        Ok(())
    }

    fn builder() -> RosterResult<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = ServerConfig::default();
        Ok(config::Config::builder()
            .set_default("server.host", defaults.host)?
            .set_default("server.port", i64::from(defaults.port))?)
    }

    fn finish(config: config::Config) -> RosterResult<Self> {
        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }
}
