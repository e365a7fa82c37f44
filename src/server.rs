use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr};

use crate::{
    Res, api,
    config::{AUTHORIZE_PATH, CALLBACK_PATH},
    info,
    management::TokenStore,
};

/// Builds the router serving the OAuth routes.
pub fn router(tokens: TokenStore) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route(AUTHORIZE_PATH, get(api::authorize))
        .route(CALLBACK_PATH, get(api::callback))
        .layer(Extension(tokens))
}

/// Binds `address` and serves the OAuth routes until the process exits.
pub async fn start_api_server(address: &str, tokens: TokenStore) -> Res<()> {
    let addr = SocketAddr::from_str(address)?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}.", addr);

    axum::serve(listener, router(tokens)).await?;
    Ok(())
}
