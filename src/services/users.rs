//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::{AuthConfig, BootstrapConfig},
    error::{AppError, AppResult},
    models::user::{RegisterUser, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new reader account
    pub async fn register(&self, request: RegisterUser) -> AppResult<User> {
        let username = request.username.trim().to_string();
        if username.is_empty() || request.password.is_empty() {
            return Err(AppError::Validation(
                "Please provide username and password".to_string(),
            ));
        }
        request.validate()?;

        if self.repository.users.username_exists(&username).await? {
            tracing::warn!("Registration rejected, username '{}' is taken", username);
            return Err(AppError::Conflict(format!("Username '{}' already exists", username)));
        }

        let password_hash = self.hash_password(&request.password)?;
        let user = self.repository.users.create(&username, &password_hash, false).await?;

        tracing::info!("Registered user id={} username={}", user.id, user.username);
        Ok(user)
    }

    /// Authenticate by username and open a session.
    /// Returns the signed token and the user.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !self.verify_password(&user, password)? {
            tracing::warn!("Failed login for username={}", user.username);
            return Err(AppError::InvalidCredentials);
        }

        let purged = self.repository.sessions.purge_expired().await?;
        if purged > 0 {
            tracing::debug!("Purged {} expired sessions", purged);
        }

        let token = self.open_session(&user).await?;
        tracing::info!("User id={} logged in", user.id);
        Ok((token, user))
    }

    /// Create a session row and the token that refers to it
    async fn open_session(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.config.session_hours as i64);
        let sid = Uuid::new_v4().to_string();

        self.repository.sessions.create(&sid, user.id, expires_at).await?;

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            is_admin: user.is_admin,
            sid,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Decode a bearer token and check that its session is still open
    pub async fn resolve_token(&self, token: &str) -> AppResult<UserClaims> {
        let claims = UserClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Unauthenticated(e.to_string()))?;

        let session = self
            .repository
            .sessions
            .get(&claims.sid)
            .await?
            .ok_or_else(|| AppError::Unauthenticated("Session is closed".to_string()))?;

        if session.user_id != claims.user_id || session.expires_at <= Utc::now() {
            return Err(AppError::Unauthenticated("Session has expired".to_string()));
        }

        Ok(claims)
    }

    /// Close the session behind a token
    pub async fn logout(&self, claims: &UserClaims) -> AppResult<()> {
        self.repository.sessions.delete(&claims.sid).await?;
        tracing::info!("User id={} logged out", claims.user_id);
        Ok(())
    }

    /// Create the bootstrap admin account if it does not exist yet
    pub async fn ensure_admin(&self, bootstrap: &BootstrapConfig) -> AppResult<bool> {
        if self
            .repository
            .users
            .username_exists(&bootstrap.admin_username)
            .await?
        {
            tracing::info!("Default admin already exists");
            return Ok(false);
        }

        let password_hash = self.hash_password(&bootstrap.admin_password)?;
        match self
            .repository
            .users
            .create(&bootstrap.admin_username, &password_hash, true)
            .await
        {
            Ok(user) => {
                tracing::info!("Default admin added ({})", user.username);
                Ok(true)
            }
            Err(AppError::Conflict(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Verify user password
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
