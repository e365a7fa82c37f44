//! Tests for the OAuth routes served by the local HTTP shim.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use scrobblesync::api::STATE_COOKIE;
use scrobblesync::config::ClientCredentials;
use scrobblesync::management::{TokenProvider, TokenStore};
use scrobblesync::server::router;
use scrobblesync::spotify::auth::SpotifyAuth;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token_store(accounts_url: String) -> TokenStore {
    TokenStore::new(SpotifyAuth::with_client(
        reqwest::Client::new(),
        accounts_url,
        ClientCredentials {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
        },
        "http://localhost:8888/spotifyCallback".to_string(),
    ))
}

fn callback_request(query: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(format!("/spotifyCallback?{query}"));
    if let Some(value) = cookie {
        builder = builder.header(header::COOKIE, format!("{STATE_COOKIE}={value}"));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_authorize_redirects_with_state_cookie() {
    let tokens = token_store("https://accounts.example.com".to_string());

    let response = router(tokens)
        .oneshot(
            Request::builder()
                .uri("/authSpotify")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_redirection());

    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("https://accounts.example.com/authorize?"));

    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    let prefix = format!("{STATE_COOKIE}=");
    assert!(cookie.starts_with(&prefix));

    let state = cookie[prefix.len()..].split(';').next().unwrap();
    assert_eq!(state.len(), 16);
    assert!(location.contains(&format!("state={state}")));
}

#[tokio::test]
async fn test_callback_rejects_state_mismatch() {
    let server = MockServer::start().await;
    let tokens = token_store(server.uri());

    let response = router(tokens.clone())
        .oneshot(callback_request("code=abc&state=one", Some("two")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!tokens.is_authorized().await);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_callback_rejects_missing_cookie() {
    let server = MockServer::start().await;
    let tokens = token_store(server.uri());

    let response = router(tokens.clone())
        .oneshot(callback_request("code=abc&state=one", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!tokens.is_authorized().await);
}

#[tokio::test]
async fn test_callback_exchanges_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("code=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access",
            "refresh_token": "refresh",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = token_store(server.uri());
    assert!(!tokens.is_authorized().await);

    let response = router(tokens.clone())
        .oneshot(callback_request("code=abc&state=same", Some("same")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(tokens.is_authorized().await);
    assert_eq!(
        tokens.current_auth_header().await.as_deref(),
        Some("Bearer access")
    );
}

#[tokio::test]
async fn test_callback_failed_exchange_is_bad_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant"
        })))
        .mount(&server)
        .await;

    let tokens = token_store(server.uri());
    let response = router(tokens.clone())
        .oneshot(callback_request("code=abc&state=same", Some("same")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!tokens.is_authorized().await);
}

#[tokio::test]
async fn test_health_reports_authorization() {
    let tokens = token_store("https://accounts.example.com".to_string());

    let response = router(tokens)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["authorized"], false);
}
