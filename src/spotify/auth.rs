use reqwest::Client;
use url::Url;

use crate::{
    config::{ClientCredentials, SPOTIFY_SCOPE, Settings},
    error::SyncError,
    types::TokenResponse,
    utils,
};

/// Client for the Spotify accounts service (authorize + token endpoints).
///
/// Uses the confidential authorization code flow: the client secret is sent
/// as Basic auth on every token request.
#[derive(Debug, Clone)]
pub struct SpotifyAuth {
    client: Client,
    accounts_url: String,
    credentials: ClientCredentials,
    redirect_uri: String,
}

impl SpotifyAuth {
    pub fn new(settings: &Settings) -> Self {
        Self::with_client(
            Client::new(),
            settings.spotify_accounts_url.clone(),
            settings.spotify.clone(),
            settings.redirect_uri(),
        )
    }

    pub fn with_client(
        client: Client,
        accounts_url: String,
        credentials: ClientCredentials,
        redirect_uri: String,
    ) -> Self {
        Self {
            client,
            accounts_url,
            credentials,
            redirect_uri,
        }
    }

    /// Builds the provider URL the user is redirected to.
    ///
    /// `state` is echoed back on the callback and must be checked there.
    pub fn authorization_url(&self, state: &str) -> Result<String, url::ParseError> {
        let url = Url::parse_with_params(
            &format!("{}/authorize", self.accounts_url),
            &[
                ("response_type", "code"),
                ("client_id", self.credentials.client_id.as_str()),
                ("scope", SPOTIFY_SCOPE),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("state", state),
            ],
        )?;
        Ok(url.into())
    }

    /// Exchanges an authorization code for an access/refresh token pair.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, SyncError> {
        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ])
        .await
    }

    /// Trades a refresh token for a fresh access token.
    ///
    /// The response may or may not carry a rotated refresh token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, SyncError> {
        self.request_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, SyncError> {
        let response = self
            .client
            .post(format!("{}/api/token", self.accounts_url))
            .header(
                reqwest::header::AUTHORIZATION,
                utils::basic_auth_header(
                    &self.credentials.client_id,
                    &self.credentials.client_secret,
                ),
            )
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Auth(format!("token endpoint returned {status}: {body}")));
        }

        let token = response.json::<TokenResponse>().await?;
        if token.access_token.is_empty() {
            return Err(SyncError::Auth("token endpoint returned no access token".to_string()));
        }
        Ok(token)
    }
}
