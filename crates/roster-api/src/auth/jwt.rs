//! JWT 토큰 발급 및 검증.
//!
//! HS256 서명, 발급자/대상 검증, 시계 오차 허용 없는 만료 검사.
//! 토큰은 서버에 저장되지 않으며 만료 시 자연 소멸합니다.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use roster_core::{Identity, JwtSettings, Role, RosterError, RosterResult};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// JWT 페이로드.
///
/// 검증이 끝난 토큰에서 추출한 신원 및 역할 정보입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 이메일
    pub sub: String,
    /// 사용자 이름
    pub name: String,
    /// 사용자 역할
    pub role: Role,
    /// JWT ID - 토큰 고유 식별자 (향후 폐기 목록용)
    pub jti: String,
    /// Issued At (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// 발급자
    pub iss: String,
    /// 대상
    pub aud: String,
}

/// 발급된 토큰.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// 인코딩된 JWT 문자열
    pub token: String,
    /// 토큰에 담긴 Claims
    pub claims: Claims,
}

/// 토큰 검증 실패 사유.
///
/// 호출자에게는 모두 동일하게 인증 실패로 보이지만 진단을 위해 구분합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("서명이 유효하지 않습니다")]
    InvalidSignature,
    #[error("발급자가 일치하지 않습니다")]
    InvalidIssuer,
    #[error("대상이 일치하지 않습니다")]
    InvalidAudience,
    #[error("토큰이 만료되었습니다")]
    Expired,
    #[error("토큰이 아직 유효하지 않습니다")]
    NotYetValid,
    #[error("잘못된 토큰 형식")]
    Malformed,
}

impl TokenError {
    /// 메트릭/로그 라벨.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::InvalidSignature => "invalid_signature",
            Self::InvalidIssuer => "invalid_issuer",
            Self::InvalidAudience => "invalid_audience",
            Self::Expired => "expired",
            Self::NotYetValid => "not_yet_valid",
            Self::Malformed => "malformed",
        }
    }
}

impl From<TokenError> for RosterError {
    fn from(_: TokenError) -> Self {
        RosterError::Unauthorized
    }
}

/// 토큰 발급기.
///
/// 서명 키와 발급자/대상/수명은 생성 시 고정되며 이후 읽기 전용입니다.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenIssuer {
    /// 설정에서 발급기 생성.
    ///
    /// 서명 키가 비어 있거나 수명이 0이면 `Configuration` 에러.
    pub fn new(settings: &JwtSettings) -> RosterResult<Self> {
        settings.validate()?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(settings.secret_key.expose_secret().as_bytes()),
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            ttl: Duration::minutes(i64::from(settings.expiry_minutes)),
        })
    }

    /// 설정된 수명으로 토큰 발급.
    pub fn issue(&self, identity: &Identity, now: DateTime<Utc>) -> RosterResult<IssuedToken> {
        self.issue_with_ttl(identity, now, self.ttl)
    }

    /// 지정한 수명으로 토큰 발급 (UTC 기준).
    pub fn issue_with_ttl(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> RosterResult<IssuedToken> {
        if ttl <= Duration::zero() {
            return Err(RosterError::Configuration(
                "token lifetime must be positive".to_string(),
            ));
        }

        let claims = Claims {
            sub: identity.email.clone(),
            name: identity.name.clone(),
            role: identity.role,
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| RosterError::Internal(format!("토큰 인코딩 실패: {}", e)))?;

        Ok(IssuedToken { token, claims })
    }
}

/// 토큰 검증기.
///
/// 네트워크나 저장소 접근 없이 토큰 문자열, 설정, 현재 시각만으로 판단합니다.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// 설정에서 검증기 생성.
    pub fn new(settings: &JwtSettings) -> RosterResult<Self> {
        settings.validate()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_audience(&[settings.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "aud", "sub"]);
        validation.leeway = 0;
        // 만료는 주입된 `now` 기준으로 직접 검사한다
        validation.validate_exp = false;
        validation.validate_nbf = false;

        Ok(Self {
            decoding_key: DecodingKey::from_secret(settings.secret_key.expose_secret().as_bytes()),
            validation,
        })
    }

    /// 토큰 검증 및 Claims 추출.
    ///
    /// `now`가 `[iat, exp)` 구간에 있어야 합니다.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidIssuer => TokenError::InvalidIssuer,
                ErrorKind::InvalidAudience => TokenError::InvalidAudience,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        let claims = data.claims;
        let now_ts = now.timestamp();

        if now_ts < claims.iat {
            return Err(TokenError::NotYetValid);
        }
        if now_ts >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
