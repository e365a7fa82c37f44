use axum::{Extension, extract::Query, http::StatusCode};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use super::authorize::STATE_COOKIE;
use crate::{management::TokenStore, warning};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// Completes the authorization code flow.
///
/// Answers 400 on a state mismatch or a failed exchange and 200 once the
/// token store holds a credential. Bodies are empty.
pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(tokens): Extension<TokenStore>,
    jar: CookieJar,
) -> (CookieJar, StatusCode) {
    let stored_state = jar.get(STATE_COOKIE).map(|c| c.value().to_string());

    let state_matches = match (&params.state, &stored_state) {
        (Some(state), Some(stored)) => state == stored,
        _ => false,
    };
    if !state_matches {
        warning!("spotifyCallback: State mismatch.");
        return (jar, StatusCode::BAD_REQUEST);
    }

    let jar = jar.remove(Cookie::build(STATE_COOKIE).path("/"));

    let Some(code) = params.code else {
        warning!("spotifyCallback: Missing authorization code.");
        return (jar, StatusCode::BAD_REQUEST);
    };

    match tokens.exchange_code(&code).await {
        Ok(()) => (jar, StatusCode::OK),
        Err(e) => {
            warning!("spotifyCallback: Invalid token. {}", e);
            (jar, StatusCode::BAD_REQUEST)
        }
    }
}
