//! # API Module
//!
//! HTTP handlers for the local server. The server is only a shim around the
//! Spotify authorization code flow:
//!
//! - [`authorize`] - redirects to the Spotify consent page with a CSRF state
//! - [`callback`] - checks the state and exchanges the code for tokens
//! - [`health`] - liveness plus whether authorization has happened
//!
//! Handlers receive the shared [`crate::management::TokenStore`] through an
//! axum `Extension`.

mod authorize;
mod callback;
mod health;

pub use authorize::STATE_COOKIE;
pub use authorize::authorize;
pub use callback::callback;
pub use health::health;
