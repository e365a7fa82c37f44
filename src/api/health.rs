use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::management::{TokenProvider, TokenStore};

pub async fn health(Extension(tokens): Extension<TokenStore>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "authorized": tokens.is_authorized().await,
    }))
}
