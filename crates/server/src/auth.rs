//! Single-user login with stateless, expiring JWTs (HS256).
//!
//! Nothing about a session is held in memory: any process that shares the
//! signing key accepts the token until it expires.

use std::sync::Arc;

use argon2::{
    password_hash::{Error as PasswordHashError, PasswordHash, PasswordVerifier},
    Argon2,
};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::AppState;

/// What a token asserts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token was issued to
    pub sub: String,
    /// Issued-at, unix seconds
    pub iat: i64,
    /// Expiry, unix seconds
    pub exp: i64,
}

/// A freshly issued token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Checks the configured credentials and issues/validates tokens.
pub struct AuthManager {
    username: String,
    password_hash: Option<String>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl AuthManager {
    /// `password_hash` must be an Argon2 PHC string; without one every login
    /// is refused.
    pub fn new(
        username: impl Into<String>,
        password_hash: Option<String>,
        signing_key: &[u8],
        ttl: Duration,
    ) -> anyhow::Result<Self> {
        if let Some(hash) = &password_hash {
            PasswordHash::new(hash)
                .map_err(|e| anyhow::anyhow!("IT_PASSWORD_HASH is not a PHC string: {e}"))?;
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Ok(Self {
            username: username.into(),
            password_hash,
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
            validation,
            ttl,
        })
    }

    pub fn login(&self, username: &str, password: &str) -> Result<IssuedToken, ApiError> {
        let hash = self
            .password_hash
            .as_deref()
            .ok_or(ApiError::InvalidCredentials)?;
        let parsed = PasswordHash::new(hash)
            .map_err(|e| ApiError::Internal(format!("Invalid password hash configuration: {e}")))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|err| match err {
                PasswordHashError::Password => ApiError::InvalidCredentials,
                other => ApiError::Internal(format!("Password verification failed: {other}")),
            })?;
        if username != self.username {
            return Err(ApiError::InvalidCredentials);
        }

        self.issue(Utc::now())
    }

    pub fn issue(&self, now: DateTime<Utc>) -> Result<IssuedToken, ApiError> {
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: self.username.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Failed to sign token: {e}")))?;
        Ok(IssuedToken { token, expires_at })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                match err.kind() {
                    ErrorKind::ExpiredSignature
                    | ErrorKind::InvalidToken
                    | ErrorKind::InvalidSignature
                    | ErrorKind::MissingRequiredClaim(_) => {
                        tracing::debug!(reason = ?err.kind(), "Rejected token")
                    }
                    other => tracing::warn!(reason = ?other, "Unreadable token"),
                }
                ApiError::Unauthorized
            })?;
        if claims.sub != self.username {
            return Err(ApiError::Unauthorized);
        }
        Ok(claims)
    }
}

/// Middleware guarding every record route. Accepts `Authorization: Bearer <token>`
/// or the bare token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.strip_prefix("Bearer ").unwrap_or(v).trim())
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    state.auth.verify(token)?;
    Ok(next.run(request).await)
}
