use axum::{
    Extension,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::{management::TokenStore, utils, warning};

/// Name of the cookie carrying the CSRF state between redirect and callback.
pub const STATE_COOKIE: &str = "spotify_auth_state";

/// Redirects the browser to the Spotify consent page.
///
/// A fresh state nonce goes both into the redirect and into a session
/// cookie; the callback only accepts a code when the two agree.
pub async fn authorize(Extension(tokens): Extension<TokenStore>, jar: CookieJar) -> Response {
    let state = utils::generate_state();

    let url = match tokens.auth().authorization_url(&state) {
        Ok(url) => url,
        Err(e) => {
            warning!("Cannot build authorization URL: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let cookie = Cookie::build((STATE_COOKIE, state))
        .path("/")
        .http_only(true);

    (jar.add(cookie), Redirect::to(&url)).into_response()
}
