use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use argon2::{
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher as _, PasswordVerifier,
        SaltString,
    },
    Argon2,
};
use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use finbook_core::users::{PasswordHasher, User};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::main_lib::AppState;

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Vec<u8>,
    pub access_token_ttl: Duration,
}

/// Issues and validates the bearer tokens handed out at login.
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    code: u16,
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    exp: usize,
    iat: usize,
}

/// The caller identity established by [`require_jwt`].
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
}

impl AuthManager {
    pub fn new(config: &AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(&config.jwt_secret);
        let decoding_key = DecodingKey::from_secret(&config.jwt_secret);
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            encoding_key,
            decoding_key,
            validation,
            token_ttl: config.access_token_ttl,
        }
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthError::Internal("System clock is before UNIX_EPOCH".into()))?;
        let exp = now + self.token_ttl;
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            iat: now.as_secs() as usize,
            exp: exp.as_secs() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthUser, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| AuthUser {
                user_id: data.claims.sub,
                email: data.claims.email,
            })
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature
                | jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::Base64(_)
                | jsonwebtoken::errors::ErrorKind::Json(_)
                | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_) => {
                    AuthError::Unauthorized
                }
                other => AuthError::Internal(format!("Failed to validate token: {other:?}")),
            })
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AuthError::Internal(msg) => {
                tracing::error!("Authentication failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        let body = Json(AuthErrorBody {
            code: status.as_u16(),
            message,
        });
        (status, body).into_response()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::Unauthorized)
    }
}

/// Accepts base64 of 32 bytes, or a raw 32 character ASCII string.
pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("JWT secret cannot be empty");
    }
    match BASE64.decode(trimmed) {
        Ok(bytes) if bytes.len() == 32 => Ok(bytes),
        // A 32 character secret may also parse as base64 of another length.
        _ if trimmed.len() == 32 && trimmed.is_ascii() => Ok(trimmed.as_bytes().to_vec()),
        Ok(_) => anyhow::bail!("JWT secret must decode to exactly 32 bytes"),
        Err(_) => {
            anyhow::bail!("JWT secret must be base64 encoded or a 32-byte ASCII string")
        }
    }
}

pub async fn require_jwt(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;

    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return Err(AuthError::Unauthorized);
    };

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::Unauthorized);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::Unauthorized);
    }

    let user = state.auth.validate_token(token)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Argon2id password hashing with the default parameters.
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> finbook_core::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| finbook_core::Error::Unexpected(format!("Failed to hash password: {e}")))
    }

    fn verify(&self, password: &str, hash: &str) -> finbook_core::Result<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            finbook_core::Error::Unexpected(format!("Stored password hash is invalid: {e}"))
        })?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(other) => Err(finbook_core::Error::Unexpected(format!(
                "Password verification failed: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn manager(ttl: Duration) -> AuthManager {
        AuthManager::new(&AuthConfig {
            jwt_secret: vec![7u8; 32],
            access_token_ttl: ttl,
        })
    }

    fn user() -> User {
        User {
            id: "user-1".to_string(),
            nickname: "Nick".to_string(),
            email: "nick@example.com".to_string(),
            password_hash: String::new(),
            avatar_url: None,
            reset_token: None,
            reset_token_expiration: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_token_round_trip_carries_identity() {
        let auth = manager(Duration::from_secs(60));
        let token = auth.issue_token(&user()).unwrap();
        let caller = auth.validate_token(&token).unwrap();
        assert_eq!(caller.user_id, "user-1");
        assert_eq!(caller.email, "nick@example.com");
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let token = manager(Duration::from_secs(60)).issue_token(&user()).unwrap();
        let other = AuthManager::new(&AuthConfig {
            jwt_secret: vec![9u8; 32],
            access_token_ttl: Duration::from_secs(60),
        });
        assert!(matches!(
            other.validate_token(&token),
            Err(AuthError::Unauthorized)
        ));
        assert!(matches!(
            other.validate_token("not-a-token"),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn test_decode_secret_key_formats() {
        assert_eq!(decode_secret_key(&BASE64.encode([1u8; 32])).unwrap(), vec![1u8; 32]);
        assert_eq!(
            decode_secret_key("my-jwt-secret-with-32-characters").unwrap().len(),
            32
        );
        // Valid base64 of 24 bytes, taken as the raw secret.
        assert_eq!(
            decode_secret_key("abcdefghijklmnopqrstuvwxyz012345").unwrap(),
            b"abcdefghijklmnopqrstuvwxyz012345".to_vec()
        );
        assert!(decode_secret_key("").is_err());
        assert!(decode_secret_key("short").is_err());
        assert!(decode_secret_key(&BASE64.encode([1u8; 16])).is_err());
    }

    #[test]
    fn test_argon2_hasher_verifies() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify("correct horse", &hash).unwrap());
        assert!(!hasher.verify("wrong horse", &hash).unwrap());
    }
}
