use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use tokio::sync::RwLock;

use crate::{
    error::SyncError,
    info,
    spotify::auth::SpotifyAuth,
    types::{Credential, TokenResponse},
};

/// Access to the Spotify credentials as seen by a sync pass.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Replaces the access token using the stored refresh token.
    async fn refresh(&self) -> Result<(), SyncError>;

    /// True once any access token has been obtained.
    async fn is_authorized(&self) -> bool;

    /// The `Authorization` header value for API calls, if authorized.
    async fn auth_header(&self) -> Option<String>;
}

#[derive(Debug, Default)]
struct TokenState {
    credential: Option<Credential>,
    auth_header: Option<String>,
}

impl TokenState {
    fn set(&mut self, credential: Credential) {
        self.auth_header = Some(format!("Bearer {}", credential.access_token));
        self.credential = Some(credential);
    }
}

/// Holds the credential pair for the single configured account.
///
/// Cloning is cheap and every clone shares the same credential, so the HTTP
/// callback and the scheduler can hold their own handle. Nothing is written
/// to disk: a restart needs a new authorization.
#[derive(Debug, Clone)]
pub struct TokenStore {
    auth: Arc<SpotifyAuth>,
    state: Arc<RwLock<TokenState>>,
}

impl TokenStore {
    pub fn new(auth: SpotifyAuth) -> Self {
        TokenStore {
            auth: Arc::new(auth),
            state: Arc::new(RwLock::new(TokenState::default())),
        }
    }

    pub fn auth(&self) -> &SpotifyAuth {
        &self.auth
    }

    /// Completes the authorization code flow and stores the first credential.
    pub async fn exchange_code(&self, code: &str) -> Result<(), SyncError> {
        let response = self.auth.exchange_code(code).await?;
        let refresh_token = response.refresh_token.clone().ok_or_else(|| {
            SyncError::Auth("authorization response carried no refresh token".to_string())
        })?;

        self.store(credential_from(response, refresh_token)).await;
        info!("Spotify authorization complete.");
        Ok(())
    }

    /// Overwrites the stored credential and regenerates the auth header.
    pub async fn store(&self, credential: Credential) {
        self.state.write().await.set(credential);
    }

    pub async fn credential(&self) -> Option<Credential> {
        self.state.read().await.credential.clone()
    }

    pub async fn current_auth_header(&self) -> Option<String> {
        self.state.read().await.auth_header.clone()
    }
}

#[async_trait]
impl TokenProvider for TokenStore {
    async fn refresh(&self) -> Result<(), SyncError> {
        info!("Refreshing token...");
        let refresh_token = match self.credential().await {
            Some(credential) => credential.refresh_token,
            None => return Err(SyncError::Auth("no refresh token available".to_string())),
        };

        let response = self.auth.refresh(&refresh_token).await?;
        // Spotify usually keeps the refresh token; reuse it unless rotated.
        let refresh_token = response.refresh_token.clone().unwrap_or(refresh_token);
        self.store(credential_from(response, refresh_token)).await;

        info!("Token refreshed.");
        Ok(())
    }

    async fn is_authorized(&self) -> bool {
        self.state.read().await.credential.is_some()
    }

    async fn auth_header(&self) -> Option<String> {
        self.current_auth_header().await
    }
}

fn credential_from(response: TokenResponse, refresh_token: String) -> Credential {
    Credential {
        access_token: response.access_token,
        refresh_token,
        // out-of-range lifetimes are stored as unknown
        expires_at: response
            .expires_in
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime)),
    }
}
