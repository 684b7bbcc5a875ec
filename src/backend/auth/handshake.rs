/**
 * Session Handshake
 *
 * Login, logout and refresh on top of the credential store and the token
 * issuer. Each operation either completes and persists, or returns an error
 * with nothing written.
 *
 * # Refresh-token rotation
 *
 * A refresh token is accepted only if it equals the value currently stored in
 * the user's slot. Accepting it replaces the slot with a new token through a
 * compare-and-swap, so a token can be exchanged at most once even when two
 * requests present it concurrently.
 */

use std::sync::Arc;

use bcrypt::verify;
use uuid::Uuid;

use crate::backend::auth::sessions::{TokenIssuer, TokenPair};
use crate::backend::auth::users::{CredentialStore, User, UserProfile};
use crate::backend::error::BackendError;
use crate::shared::validation::{normalize_email, normalize_username};

const INVALID_REFRESH_TOKEN: &str = "Invalid refresh token";
const STALE_REFRESH_TOKEN: &str = "Refresh token is expired or used";
const INVALID_ACCESS_TOKEN: &str = "Invalid access token";

/// Username-or-email identifier for login; at least one is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginIdentifier {
    username: Option<String>,
    email: Option<String>,
}

impl LoginIdentifier {
    /// Build from optional raw values; blank values count as absent.
    ///
    /// Returns `None` when neither a username nor an email was given.
    pub fn new(username: Option<&str>, email: Option<&str>) -> Option<Self> {
        let username = username
            .filter(|u| !u.trim().is_empty())
            .map(normalize_username);
        let email = email.filter(|e| !e.trim().is_empty()).map(normalize_email);

        if username.is_none() && email.is_none() {
            return None;
        }
        Some(Self { username, email })
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    fn describe(&self) -> &str {
        self.username()
            .or_else(|| self.email())
            .unwrap_or_default()
    }
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: UserProfile,
    pub tokens: TokenPair,
}

/// Orchestrates login, logout and refresh
#[derive(Clone)]
pub struct SessionHandshake {
    store: Arc<dyn CredentialStore>,
    issuer: TokenIssuer,
}

impl SessionHandshake {
    pub fn new(store: Arc<dyn CredentialStore>, issuer: TokenIssuer) -> Self {
        Self { store, issuer }
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Check credentials, issue a pair and store its refresh half.
    ///
    /// # Errors
    ///
    /// * `NotFound` - no user with this username or email
    /// * `Unauthorized` - password does not match
    /// * `Internal` - store failure or token generation failure
    pub async fn login(
        &self,
        identifier: &LoginIdentifier,
        password: &str,
    ) -> Result<LoginOutcome, BackendError> {
        let user = self
            .store
            .find_by_username_or_email(identifier.username(), identifier.email())
            .await?
            .ok_or_else(|| {
                tracing::warn!("User not found: {}", identifier.describe());
                BackendError::not_found("User doesn't exist")
            })?;

        let valid = verify(password, &user.password_hash).map_err(|e| {
            tracing::error!("Password verification error: {:?}", e);
            BackendError::internal("Password verification failed")
        })?;
        if !valid {
            tracing::warn!("Invalid password for user: {}", user.username);
            return Err(BackendError::unauthorized("Invalid user credentials"));
        }

        let tokens = self.issuer.issue(&user)?;
        let updated = self
            .store
            .update_refresh_token(user.id, Some(&tokens.refresh_token))
            .await?;
        if !updated {
            tracing::error!("User {} vanished while logging in", user.id);
            return Err(BackendError::internal(
                crate::backend::error::types::TOKEN_GENERATION_FAILED,
            ));
        }

        tracing::info!("User logged in successfully: {} ({})", user.username, user.email);

        Ok(LoginOutcome {
            user: UserProfile::from(user),
            tokens,
        })
    }

    /// Clear the refresh-token slot. Idempotent.
    pub async fn logout(&self, user_id: Uuid) -> Result<(), BackendError> {
        let updated = self.store.update_refresh_token(user_id, None).await?;
        if updated {
            tracing::info!("User logged out: {}", user_id);
        } else {
            tracing::debug!("Logout for unknown user {}", user_id);
        }
        Ok(())
    }

    /// Exchange the current refresh token for a new pair.
    ///
    /// # Errors
    ///
    /// * `Unauthorized` - token absent, invalid, expired, for a deleted user,
    ///   not the value in the slot, or exchanged concurrently by another request
    /// * `Internal` - store failure or token generation failure
    pub async fn refresh(&self, presented: Option<&str>) -> Result<TokenPair, BackendError> {
        let presented = presented
            .filter(|token| !token.is_empty())
            .ok_or_else(|| BackendError::unauthorized("Unauthorized request"))?;

        let claims = self.issuer.verify_refresh(presented).map_err(|e| {
            if e.is_expired() {
                tracing::info!("Expired refresh token presented");
            } else {
                tracing::warn!("Refresh token rejected: {}", e);
            }
            BackendError::unauthorized(INVALID_REFRESH_TOKEN)
        })?;
        let user_id = claims
            .user_id()
            .map_err(|_| BackendError::unauthorized(INVALID_REFRESH_TOKEN))?;

        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| BackendError::unauthorized(INVALID_REFRESH_TOKEN))?;

        if !slot_matches(&user, presented) {
            tracing::warn!("Stale refresh token presented for user {}", user.id);
            return Err(BackendError::unauthorized(STALE_REFRESH_TOKEN));
        }

        let tokens = self.issuer.issue(&user)?;
        let swapped = self
            .store
            .rotate_refresh_token(user.id, presented, &tokens.refresh_token)
            .await?;
        if !swapped {
            tracing::warn!("Refresh token for user {} was rotated concurrently", user.id);
            return Err(BackendError::unauthorized(STALE_REFRESH_TOKEN));
        }

        tracing::info!("Access token refreshed for user {}", user.id);
        Ok(tokens)
    }

    /// Resolve an access token to the user it was issued for.
    ///
    /// # Errors
    ///
    /// * `Unauthorized` - token absent, invalid, expired, or its user no
    ///   longer exists
    /// * `Internal` - store failure
    pub async fn authenticate(&self, access_token: Option<&str>) -> Result<UserProfile, BackendError> {
        let token = access_token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| BackendError::unauthorized("Unauthorized request"))?;

        let claims = self.issuer.verify_access(token).map_err(|e| {
            tracing::warn!("Access token rejected: {}", e);
            BackendError::unauthorized(INVALID_ACCESS_TOKEN)
        })?;
        let user_id = claims
            .user_id()
            .map_err(|_| BackendError::unauthorized(INVALID_ACCESS_TOKEN))?;

        self.store
            .find_by_id(user_id)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| {
                tracing::warn!("Access token for unknown user {}", user_id);
                BackendError::unauthorized(INVALID_ACCESS_TOKEN)
            })
    }

    /// Sanitized profile of an authenticated user.
    pub async fn current_user(&self, user_id: Uuid) -> Result<UserProfile, BackendError> {
        self.store
            .find_by_id(user_id)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| BackendError::not_found("User doesn't exist"))
    }
}

fn slot_matches(user: &User, presented: &str) -> bool {
    user.refresh_token
        .as_deref()
        .is_some_and(|stored| stored.as_bytes() == presented.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::memory::InMemoryCredentialStore;
    use crate::backend::auth::users::{NewUser, StoreError};
    use crate::shared::config::TokenConfig;
    use axum::http::StatusCode;

    const PASSWORD: &str = "Abcdef1!";

    async fn setup() -> (SessionHandshake, InMemoryCredentialStore, User) {
        let store = InMemoryCredentialStore::new();
        let user = store
            .create(NewUser {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                full_name: "Alice".to_string(),
                avatar: "https://cdn.example.com/a.png".to_string(),
                cover_image: String::new(),
                password_hash: bcrypt::hash(PASSWORD, 4).unwrap(),
            })
            .await
            .unwrap();
        let config = TokenConfig::builder()
            .access_secret("access")
            .refresh_secret("refresh")
            .build()
            .unwrap();
        let handshake = SessionHandshake::new(Arc::new(store.clone()), TokenIssuer::new(&config));
        (handshake, store, user)
    }

    fn by_username(name: &str) -> LoginIdentifier {
        LoginIdentifier::new(Some(name), None).unwrap()
    }

    async fn stored_slot(store: &InMemoryCredentialStore, id: Uuid) -> Option<String> {
        store.find_by_id(id).await.unwrap().unwrap().refresh_token
    }

    #[test]
    fn test_identifier_requires_one_value() {
        assert!(LoginIdentifier::new(None, None).is_none());
        assert!(LoginIdentifier::new(Some("  "), Some("")).is_none());
        let id = LoginIdentifier::new(Some("Alice"), None).unwrap();
        assert_eq!(id.username(), Some("alice"));
        assert_eq!(id.email(), None);
    }

    #[tokio::test]
    async fn test_login_stores_refresh_token() {
        let (handshake, store, user) = setup().await;
        let outcome = handshake.login(&by_username("alice"), PASSWORD).await.unwrap();

        assert_eq!(outcome.user.id, user.id);
        assert_eq!(
            stored_slot(&store, user.id).await.as_deref(),
            Some(outcome.tokens.refresh_token.as_str())
        );
    }

    #[tokio::test]
    async fn test_login_by_email_case_insensitive() {
        let (handshake, _store, user) = setup().await;
        let identifier = LoginIdentifier::new(None, Some("ALICE@example.com")).unwrap();
        let outcome = handshake.login(&identifier, PASSWORD).await.unwrap();
        assert_eq!(outcome.user.id, user.id);
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let (handshake, _store, _user) = setup().await;
        let err = handshake.login(&by_username("nobody"), PASSWORD).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_login_wrong_password_writes_nothing() {
        let (handshake, store, user) = setup().await;
        let err = handshake.login(&by_username("alice"), "Wrong1!x").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(stored_slot(&store, user.id).await, None);
    }

    #[tokio::test]
    async fn test_refresh_rotates_once() {
        let (handshake, store, user) = setup().await;
        let first = handshake.login(&by_username("alice"), PASSWORD).await.unwrap().tokens;

        let second = handshake.refresh(Some(&first.refresh_token)).await.unwrap();
        assert_ne!(first.refresh_token, second.refresh_token);
        assert_eq!(
            stored_slot(&store, user.id).await.as_deref(),
            Some(second.refresh_token.as_str())
        );

        let stale = handshake.refresh(Some(&first.refresh_token)).await.unwrap_err();
        assert_eq!(stale.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(stale.message(), STALE_REFRESH_TOKEN);

        let third = handshake.refresh(Some(&second.refresh_token)).await.unwrap();
        assert!(handshake.refresh(Some(&second.refresh_token)).await.is_err());
        assert!(handshake.refresh(Some(&third.refresh_token)).await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_rejects_missing_and_garbage() {
        let (handshake, _store, _user) = setup().await;
        for presented in [None, Some(""), Some("   "), Some("not.a.jwt")] {
            let err = handshake.refresh(presented).await.unwrap_err();
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn test_access_token_cannot_refresh() {
        let (handshake, _store, _user) = setup().await;
        let tokens = handshake.login(&by_username("alice"), PASSWORD).await.unwrap().tokens;
        let err = handshake.refresh(Some(&tokens.access_token)).await.unwrap_err();
        assert_eq!(err.message(), INVALID_REFRESH_TOKEN);
    }

    #[tokio::test]
    async fn test_logout_then_refresh_fails() {
        let (handshake, store, user) = setup().await;
        let tokens = handshake.login(&by_username("alice"), PASSWORD).await.unwrap().tokens;

        handshake.logout(user.id).await.unwrap();
        assert_eq!(stored_slot(&store, user.id).await, None);
        handshake.logout(user.id).await.unwrap();

        let err = handshake.refresh(Some(&tokens.refresh_token)).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_second_login_invalidates_first_refresh_token() {
        let (handshake, _store, _user) = setup().await;
        let first = handshake.login(&by_username("alice"), PASSWORD).await.unwrap().tokens;
        let _second = handshake.login(&by_username("alice"), PASSWORD).await.unwrap();
        assert!(handshake.refresh(Some(&first.refresh_token)).await.is_err());
    }

    /// Holds every `find_by_id` caller at a barrier, so concurrent refreshes
    /// all read the slot before any of them writes it.
    struct LockstepStore {
        inner: InMemoryCredentialStore,
        barrier: tokio::sync::Barrier,
    }

    #[async_trait::async_trait]
    impl CredentialStore for LockstepStore {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
            let user = self.inner.find_by_id(id).await?;
            self.barrier.wait().await;
            Ok(user)
        }

        async fn find_by_username_or_email(
            &self,
            username: Option<&str>,
            email: Option<&str>,
        ) -> Result<Option<User>, StoreError> {
            self.inner.find_by_username_or_email(username, email).await
        }

        async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
            self.inner.create(new_user).await
        }

        async fn update_refresh_token(
            &self,
            id: Uuid,
            token: Option<&str>,
        ) -> Result<bool, StoreError> {
            self.inner.update_refresh_token(id, token).await
        }

        async fn rotate_refresh_token(
            &self,
            id: Uuid,
            expected: &str,
            new: &str,
        ) -> Result<bool, StoreError> {
            self.inner.rotate_refresh_token(id, expected, new).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_refresh_has_single_winner() {
        let (handshake, store, user) = setup().await;
        let tokens = handshake.login(&by_username("alice"), PASSWORD).await.unwrap().tokens;

        let lockstep = SessionHandshake::new(
            Arc::new(LockstepStore {
                inner: store.clone(),
                barrier: tokio::sync::Barrier::new(2),
            }),
            handshake.issuer().clone(),
        );

        let (a, b) = tokio::join!(
            lockstep.refresh(Some(&tokens.refresh_token)),
            lockstep.refresh(Some(&tokens.refresh_token)),
        );

        let winners: Vec<_> = [a, b].into_iter().filter_map(Result::ok).collect();
        assert_eq!(winners.len(), 1);
        assert_eq!(
            stored_slot(&store, user.id).await.as_deref(),
            Some(winners[0].refresh_token.as_str())
        );
    }

    #[tokio::test]
    async fn test_refresh_token_compared_exactly() {
        let (handshake, store, user) = setup().await;
        let tokens = handshake.login(&by_username("alice"), PASSWORD).await.unwrap().tokens;

        for padded in [
            format!("  {}", tokens.refresh_token),
            format!("{}\n", tokens.refresh_token),
        ] {
            let err = handshake.refresh(Some(&padded)).await.unwrap_err();
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        }
        assert_eq!(
            stored_slot(&store, user.id).await.as_deref(),
            Some(tokens.refresh_token.as_str())
        );
        assert!(handshake.refresh(Some(&tokens.refresh_token)).await.is_ok());
    }

    #[tokio::test]
    async fn test_current_user() {
        let (handshake, _store, user) = setup().await;
        let profile = handshake.current_user(user.id).await.unwrap();
        assert_eq!(profile.username, "alice");

        let err = handshake.current_user(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_authenticate_access_token() {
        let (handshake, _store, user) = setup().await;
        let tokens = handshake.login(&by_username("alice"), PASSWORD).await.unwrap().tokens;

        let profile = handshake.authenticate(Some(&tokens.access_token)).await.unwrap();
        assert_eq!(profile.id, user.id);

        let err = handshake.authenticate(Some(&tokens.refresh_token)).await.unwrap_err();
        assert_eq!(err.message(), "Invalid access token");
        let err = handshake.authenticate(None).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user() {
        let (handshake, _store, _user) = setup().await;
        let ghost = User {
            id: Uuid::new_v4(),
            username: "ghost".to_string(),
            email: "ghost@example.com".to_string(),
            full_name: "Ghost".to_string(),
            avatar: String::new(),
            cover_image: String::new(),
            password_hash: String::new(),
            refresh_token: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let tokens = handshake.issuer().issue(&ghost).unwrap();
        let err = handshake.authenticate(Some(&tokens.access_token)).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}
