//! Authentication service - registration, verification, login,
//! refresh rotation and password reset.
//!
//! Unknown email, unverified email and wrong password all surface as
//! the same generic credential error so callers cannot enumerate
//! accounts. Reset requests likewise succeed whether or not the
//! account exists.

use async_trait::async_trait;
use chrono::Utc;
use rand::RngCore;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::ONE_TIME_TOKEN_BYTES;
use crate::domain::{Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{Mailer, SessionRepository, UserRepository};
use crate::services::{AccessClaims, TokenCodec, TokenPair};

/// Response returned after successful login
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    #[schema(example = "USER")]
    pub role: UserRole,
}

impl LoginResponse {
    fn new(pair: TokenPair, role: UserRole) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
            role,
        }
    }
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and email a verification link
    async fn register(&self, email: String, password: String) -> AppResult<User>;

    /// Consume a verification token and mark the email verified
    async fn verify_email(&self, token: &str) -> AppResult<()>;

    /// Login and return a token pair plus the user's role
    async fn login(&self, email: String, password: String) -> AppResult<LoginResponse>;

    /// Rotate a refresh token, invalidating the presented one
    async fn refresh(&self, token: &str) -> AppResult<TokenPair>;

    /// Store a reset token and email a reset link; succeeds for
    /// unknown emails without observable difference
    async fn request_password_reset(&self, email: String) -> AppResult<()>;

    /// Consume a reset token, rehash the password and revoke sessions
    async fn reset_password(&self, token: &str, new_password: String) -> AppResult<()>;

    /// Verify an access token and extract its claims
    fn verify_access_token(&self, token: &str) -> AppResult<AccessClaims>;
}

/// Generate a random one-time token (verification / reset links).
fn one_time_token() -> String {
    let mut bytes = [0u8; ONE_TIME_TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    mailer: Arc<dyn Mailer>,
    codec: TokenCodec,
    app_url: String,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        mailer: Arc<dyn Mailer>,
        codec: TokenCodec,
        app_url: String,
    ) -> Self {
        Self {
            users,
            sessions,
            mailer,
            codec,
            app_url,
        }
    }

    /// Create a session row and issue the matching token pair.
    async fn open_session(&self, user_id: Uuid, role: UserRole) -> AppResult<TokenPair> {
        let session_id = Uuid::new_v4();
        let expires_at = Utc::now() + self.codec.refresh_ttl();

        self.sessions.create(session_id, user_id, expires_at).await?;
        self.codec.issue_pair(user_id, role, session_id)
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, email: String, password: String) -> AppResult<User> {
        // Email format is validated by the handler's ValidatedJson extractor
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&password)?.into_string();
        let verification_token = one_time_token();

        let user = self
            .users
            .create(email, password_hash, verification_token.clone())
            .await?;

        self.mailer
            .send(
                &user.email,
                "Verify your email",
                &format!(
                    "Click {}/verify-email?token={}",
                    self.app_url, verification_token
                ),
            )
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn verify_email(&self, token: &str) -> AppResult<()> {
        if token.is_empty() {
            return Err(AppError::bad_request("Verification token is required"));
        }

        let user = self
            .users
            .find_by_verification_token(token)
            .await?
            .ok_or_else(|| AppError::bad_request("Invalid verification token"))?;

        self.users.mark_email_verified(user.id).await?;
        tracing::info!(user_id = %user.id, "Email verified");
        Ok(())
    }

    async fn login(&self, email: String, password: String) -> AppResult<LoginResponse> {
        let user_result = self.users.find_by_email(&email).await?;

        // SECURITY: Perform password verification even if the user doesn't
        // exist to prevent timing attacks that could enumerate valid emails.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";
        let stored_hash = user_result
            .as_ref()
            .map(|u| u.password_hash.as_str())
            .unwrap_or(dummy_hash);

        let password_valid = Password::from_hash(stored_hash.to_string()).verify(&password);

        match user_result {
            Some(user) if password_valid && user.is_email_verified => {
                let pair = self.open_session(user.id, user.role).await?;
                tracing::info!(user_id = %user.id, "User logged in");
                Ok(LoginResponse::new(pair, user.role))
            }
            // Unknown email, wrong password and unverified email are
            // indistinguishable to the caller
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn refresh(&self, token: &str) -> AppResult<TokenPair> {
        let claims = self.codec.verify_refresh(token).map_err(|e| {
            tracing::debug!("Refresh token verification failed: {:?}", e);
            AppError::Unauthorized
        })?;

        let session = self
            .sessions
            .find_by_id(claims.jti)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if session.user_id != claims.sub || session.is_expired(Utc::now()) {
            return Err(AppError::Unauthorized);
        }

        // Rotation: the presented session dies first. Losing a concurrent
        // refresh race on the same token means the delete finds no row.
        if !self.sessions.delete(session.id).await? {
            return Err(AppError::Unauthorized);
        }

        // Past this point a failure leaves no session for this device:
        // the client must log in again. The old token never stays
        // spendable alongside a replacement.
        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        self.open_session(user.id, user.role).await
    }

    async fn request_password_reset(&self, email: String) -> AppResult<()> {
        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let reset_token = one_time_token();
        self.users.set_reset_token(user.id, reset_token.clone()).await?;

        self.mailer
            .send(
                &user.email,
                "Password reset",
                &format!("Reset: {}/reset-password?token={}", self.app_url, reset_token),
            )
            .await?;

        Ok(())
    }

    async fn reset_password(&self, token: &str, new_password: String) -> AppResult<()> {
        let user = self
            .users
            .find_by_reset_token(token)
            .await?
            .ok_or_else(|| AppError::bad_request("Invalid reset token"))?;

        let password_hash = Password::new(&new_password)?.into_string();
        self.users.update_password(user.id, password_hash).await?;

        // A new password invalidates every outstanding refresh session
        self.sessions.delete_for_user(user.id).await?;

        tracing::info!(user_id = %user.id, "Password reset");
        Ok(())
    }

    fn verify_access_token(&self, token: &str) -> AppResult<AccessClaims> {
        self.codec.verify_access(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RefreshSession;
    use crate::infra::mailer::MockMailer;
    use crate::infra::repositories::{MockSessionRepository, MockUserRepository};
    use chrono::Duration;
    use mockall::predicate::eq;

    const APP_URL: &str = "http://localhost:5173";

    fn codec() -> TokenCodec {
        TokenCodec::from_parts(
            b"test-access-secret-with-32-chars!!",
            b"test-refresh-secret-with-32-chars!",
            15,
            7,
        )
    }

    fn sample_user(password: &str, verified: bool) -> User {
        User {
            id: Uuid::new_v4(),
            email: "demo@example.com".to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            role: UserRole::User,
            is_email_verified: verified,
            verification_token: None,
            reset_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn authenticator(
        users: MockUserRepository,
        sessions: MockSessionRepository,
        mailer: MockMailer,
    ) -> Authenticator {
        Authenticator::new(
            Arc::new(users),
            Arc::new(sessions),
            Arc::new(mailer),
            codec(),
            APP_URL.to_string(),
        )
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .with(eq("demo@example.com"))
            .returning(|_| Ok(Some(sample_user("longpass1", true))));

        let auth = authenticator(users, MockSessionRepository::new(), MockMailer::new());
        let result = auth
            .register("demo@example.com".to_string(), "longpass1".to_string())
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_sends_verification_email() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_create()
            .returning(|email, password_hash, verification_token| {
                let mut user = sample_user("longpass1", false);
                user.email = email;
                user.password_hash = password_hash;
                user.verification_token = Some(verification_token);
                Ok(user)
            });

        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|to, subject, body| {
                to == "new@example.com"
                    && subject == "Verify your email"
                    && body.contains("/verify-email?token=")
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let auth = authenticator(users, MockSessionRepository::new(), mailer);
        let user = auth
            .register("new@example.com".to_string(), "longpass1".to_string())
            .await
            .unwrap();

        assert_eq!(user.email, "new@example.com");
        assert!(!user.is_email_verified);
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let auth = authenticator(users, MockSessionRepository::new(), MockMailer::new());
        let result = auth
            .register("new@example.com".to_string(), "short".to_string())
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_unknown_email_unauthorized() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let auth = authenticator(users, MockSessionRepository::new(), MockMailer::new());
        let result = auth
            .login("ghost@example.com".to_string(), "longpass1".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unverified_email_unauthorized() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(sample_user("longpass1", false))));

        let auth = authenticator(users, MockSessionRepository::new(), MockMailer::new());
        // Correct password, but the email was never verified
        let result = auth
            .login("demo@example.com".to_string(), "longpass1".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_wrong_password_unauthorized() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(sample_user("longpass1", true))));

        let auth = authenticator(users, MockSessionRepository::new(), MockMailer::new());
        let result = auth
            .login("demo@example.com".to_string(), "wrongpass1".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_success_issues_verifiable_pair() {
        let user = sample_user("longpass1", true);
        let user_id = user.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_create()
            .times(1)
            .returning(|id, user_id, expires_at| {
                Ok(RefreshSession {
                    id,
                    user_id,
                    expires_at,
                    created_at: Utc::now(),
                })
            });

        let auth = authenticator(users, sessions, MockMailer::new());
        let response = auth
            .login("demo@example.com".to_string(), "longpass1".to_string())
            .await
            .unwrap();

        assert_eq!(response.role, UserRole::User);
        let claims = auth.verify_access_token(&response.access_token).unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[tokio::test]
    async fn test_refresh_rotates_session() {
        let user = sample_user("longpass1", true);
        let user_id = user.id;
        let session_id = Uuid::new_v4();
        let token = codec()
            .issue_pair(user_id, UserRole::User, session_id)
            .unwrap()
            .refresh_token;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(user_id))
            .returning(move |_| Ok(Some(user.clone())));

        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_find_by_id()
            .with(eq(session_id))
            .returning(move |id| {
                Ok(Some(RefreshSession {
                    id,
                    user_id,
                    expires_at: Utc::now() + Duration::days(7),
                    created_at: Utc::now(),
                }))
            });
        sessions
            .expect_delete()
            .with(eq(session_id))
            .times(1)
            .returning(|_| Ok(true));
        sessions
            .expect_create()
            .times(1)
            .returning(|id, user_id, expires_at| {
                Ok(RefreshSession {
                    id,
                    user_id,
                    expires_at,
                    created_at: Utc::now(),
                })
            });

        let auth = authenticator(users, sessions, MockMailer::new());
        let pair = auth.refresh(&token).await.unwrap();

        // The replacement refresh token names a different session
        let rotated = codec().verify_refresh(&pair.refresh_token).unwrap();
        assert_ne!(rotated.jti, session_id);
        assert_eq!(rotated.sub, user_id);
    }

    #[tokio::test]
    async fn test_refresh_reuse_after_rotation_rejected() {
        let session_id = Uuid::new_v4();
        let token = codec()
            .issue_pair(Uuid::new_v4(), UserRole::User, session_id)
            .unwrap()
            .refresh_token;

        // Rotation already removed the session row
        let mut sessions = MockSessionRepository::new();
        sessions.expect_find_by_id().returning(|_| Ok(None));

        let auth = authenticator(MockUserRepository::new(), sessions, MockMailer::new());
        let result = auth.refresh(&token).await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_refresh_user_gone_after_rotation_rejected() {
        let user_id = Uuid::new_v4();
        let session_id = Uuid::new_v4();
        let token = codec()
            .issue_pair(user_id, UserRole::User, session_id)
            .unwrap()
            .refresh_token;

        // User row vanished between session creation and refresh
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(user_id))
            .returning(|_| Ok(None));

        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_find_by_id()
            .with(eq(session_id))
            .returning(move |id| {
                Ok(Some(RefreshSession {
                    id,
                    user_id,
                    expires_at: Utc::now() + Duration::days(7),
                    created_at: Utc::now(),
                }))
            });
        sessions
            .expect_delete()
            .with(eq(session_id))
            .times(1)
            .returning(|_| Ok(true));
        // No expect_create: the old session must die without a replacement

        let auth = authenticator(users, sessions, MockMailer::new());
        let result = auth.refresh(&token).await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_refresh_garbage_token_rejected() {
        let auth = authenticator(
            MockUserRepository::new(),
            MockSessionRepository::new(),
            MockMailer::new(),
        );
        let result = auth.refresh("not-a-jwt").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_refresh_session_user_mismatch_rejected() {
        let session_id = Uuid::new_v4();
        let token = codec()
            .issue_pair(Uuid::new_v4(), UserRole::User, session_id)
            .unwrap()
            .refresh_token;

        let mut sessions = MockSessionRepository::new();
        sessions.expect_find_by_id().returning(move |id| {
            Ok(Some(RefreshSession {
                id,
                // Session belongs to someone else
                user_id: Uuid::new_v4(),
                expires_at: Utc::now() + Duration::days(7),
                created_at: Utc::now(),
            }))
        });

        let auth = authenticator(MockUserRepository::new(), sessions, MockMailer::new());
        let result = auth.refresh(&token).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_verify_email_unknown_token_bad_request() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_verification_token()
            .returning(|_| Ok(None));

        let auth = authenticator(users, MockSessionRepository::new(), MockMailer::new());
        let result = auth.verify_email("consumed-or-bogus").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_verify_email_consumes_token() {
        let user = sample_user("longpass1", false);
        let user_id = user.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_verification_token()
            .with(eq("valid-token"))
            .returning(move |_| Ok(Some(user.clone())));
        users
            .expect_mark_email_verified()
            .with(eq(user_id))
            .times(1)
            .returning(|_| Ok(()));

        let auth = authenticator(users, MockSessionRepository::new(), MockMailer::new());
        assert!(auth.verify_email("valid-token").await.is_ok());
    }

    #[tokio::test]
    async fn test_verify_email_empty_token_bad_request() {
        let auth = authenticator(
            MockUserRepository::new(),
            MockSessionRepository::new(),
            MockMailer::new(),
        );
        let result = auth.verify_email("").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_reset_request_unknown_email_succeeds_silently() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        // No mailer expectation: sending for an unknown email would panic
        let auth = authenticator(users, MockSessionRepository::new(), MockMailer::new());
        assert!(auth
            .request_password_reset("ghost@example.com".to_string())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_reset_request_known_email_sends_link() {
        let user = sample_user("longpass1", true);
        let user_id = user.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        users
            .expect_set_reset_token()
            .withf(move |id, token| *id == user_id && !token.is_empty())
            .times(1)
            .returning(|_, _| Ok(()));

        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|_, subject, body| {
                subject == "Password reset" && body.contains("/reset-password?token=")
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let auth = authenticator(users, MockSessionRepository::new(), mailer);
        assert!(auth
            .request_password_reset("demo@example.com".to_string())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_reset_password_unknown_token_bad_request() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_reset_token().returning(|_| Ok(None));

        let auth = authenticator(users, MockSessionRepository::new(), MockMailer::new());
        let result = auth
            .reset_password("consumed-or-bogus", "newlongpass1".to_string())
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_reset_password_rehashes_and_revokes_sessions() {
        let user = sample_user("longpass1", true);
        let user_id = user.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_reset_token()
            .with(eq("valid-reset"))
            .returning(move |_| Ok(Some(user.clone())));
        users
            .expect_update_password()
            .withf(move |id, hash| {
                *id == user_id && Password::from_hash(hash.clone()).verify("newlongpass1")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_delete_for_user()
            .with(eq(user_id))
            .times(1)
            .returning(|_| Ok(2));

        let auth = authenticator(users, sessions, MockMailer::new());
        assert!(auth
            .reset_password("valid-reset", "newlongpass1".to_string())
            .await
            .is_ok());
    }
}
