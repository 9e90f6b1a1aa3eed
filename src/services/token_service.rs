//! Token codec - signs and verifies the two JWT kinds.
//!
//! Access and refresh tokens use independent secrets and lifetimes.
//! Refresh tokens additionally carry a `jti` claim naming the refresh
//! session they belong to. Any verification failure is surfaced as an
//! authentication error; callers must treat it as unauthenticated.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_MINUTE, TOKEN_TYPE_BEARER};
use crate::domain::UserRole;
use crate::errors::AppResult;

/// Access token claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Uuid,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Refresh token claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: Uuid,
    pub role: String,
    /// Refresh session id; must match a live session row
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Token pair returned after login and refresh
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Short-lived JWT for authenticating API calls
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Longer-lived JWT used to mint new access tokens
    pub refresh_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Access token lifetime in seconds
    #[schema(example = 900)]
    pub expires_in: i64,
}

/// Signs and verifies access and refresh tokens.
#[derive(Clone)]
pub struct TokenCodec {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_minutes: i64,
    refresh_days: i64,
}

impl TokenCodec {
    /// Build a codec from application configuration.
    pub fn new(config: &Config) -> Self {
        Self::from_parts(
            config.access_secret_bytes(),
            config.refresh_secret_bytes(),
            config.access_token_minutes,
            config.refresh_token_days,
        )
    }

    /// Build a codec from raw secrets and lifetimes.
    pub fn from_parts(
        access_secret: &[u8],
        refresh_secret: &[u8],
        access_minutes: i64,
        refresh_days: i64,
    ) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(access_secret),
            access_decoding: DecodingKey::from_secret(access_secret),
            refresh_encoding: EncodingKey::from_secret(refresh_secret),
            refresh_decoding: DecodingKey::from_secret(refresh_secret),
            access_minutes,
            refresh_days,
        }
    }

    /// Lifetime of newly issued refresh tokens, also used for the
    /// session row expiry.
    pub fn refresh_ttl(&self) -> Duration {
        Duration::days(self.refresh_days)
    }

    /// Issue a new access/refresh pair bound to the given session.
    pub fn issue_pair(
        &self,
        user_id: Uuid,
        role: UserRole,
        session_id: Uuid,
    ) -> AppResult<TokenPair> {
        let now = Utc::now();

        let access_claims = AccessClaims {
            sub: user_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.access_minutes)).timestamp(),
        };
        let refresh_claims = RefreshClaims {
            sub: user_id,
            role: role.to_string(),
            jti: session_id,
            iat: now.timestamp(),
            exp: (now + self.refresh_ttl()).timestamp(),
        };

        let access_token = encode(&Header::default(), &access_claims, &self.access_encoding)?;
        let refresh_token = encode(&Header::default(), &refresh_claims, &self.refresh_encoding)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.access_minutes * SECONDS_PER_MINUTE,
        })
    }

    /// Verify an access token and extract its claims.
    pub fn verify_access(&self, token: &str) -> AppResult<AccessClaims> {
        let data = decode::<AccessClaims>(token, &self.access_decoding, &Validation::default())?;
        Ok(data.claims)
    }

    /// Verify a refresh token and extract its claims.
    pub fn verify_refresh(&self, token: &str) -> AppResult<RefreshClaims> {
        let data = decode::<RefreshClaims>(token, &self.refresh_decoding, &Validation::default())?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    fn codec() -> TokenCodec {
        TokenCodec::from_parts(
            b"test-access-secret-with-32-chars!!",
            b"test-refresh-secret-with-32-chars!",
            15,
            7,
        )
    }

    #[test]
    fn test_pair_round_trip() {
        let codec = codec();
        let user_id = Uuid::new_v4();
        let session_id = Uuid::new_v4();

        let pair = codec
            .issue_pair(user_id, UserRole::Admin, session_id)
            .unwrap();
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 15 * 60);

        let access = codec.verify_access(&pair.access_token).unwrap();
        assert_eq!(access.sub, user_id);
        assert_eq!(access.role, "ADMIN");

        let refresh = codec.verify_refresh(&pair.refresh_token).unwrap();
        assert_eq!(refresh.sub, user_id);
        assert_eq!(refresh.jti, session_id);
    }

    #[test]
    fn test_kinds_are_not_interchangeable() {
        let codec = codec();
        let pair = codec
            .issue_pair(Uuid::new_v4(), UserRole::User, Uuid::new_v4())
            .unwrap();

        // Signed with independent secrets, so crossing them fails
        assert!(codec.verify_access(&pair.refresh_token).is_err());
        assert!(codec.verify_refresh(&pair.access_token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Negative lifetime puts exp in the past
        let codec = TokenCodec::from_parts(
            b"test-access-secret-with-32-chars!!",
            b"test-refresh-secret-with-32-chars!",
            -5,
            7,
        );
        let pair = codec
            .issue_pair(Uuid::new_v4(), UserRole::User, Uuid::new_v4())
            .unwrap();

        let result = codec.verify_access(&pair.access_token);
        assert!(matches!(result, Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let codec = codec();
        let other = TokenCodec::from_parts(
            b"another-access-secret-32-chars!!!!",
            b"another-refresh-secret-32-chars!!!",
            15,
            7,
        );
        let pair = codec
            .issue_pair(Uuid::new_v4(), UserRole::User, Uuid::new_v4())
            .unwrap();

        assert!(other.verify_access(&pair.access_token).is_err());
        assert!(other.verify_refresh(&pair.refresh_token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(codec().verify_access("not-a-jwt").is_err());
    }
}
