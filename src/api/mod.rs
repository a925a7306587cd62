//! # API Module
//!
//! HTTP endpoints served by the short-lived local server that runs during
//! `albumroom auth`.
//!
//! - [`callback`] - OAuth 2.0 PKCE redirect target. Exchanges the
//!   authorization code for a token and hands it to the waiting auth flow.
//! - [`health`] - reports status and version, handy to check that the
//!   configured `SERVER_ADDRESS` is reachable.
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use albumroom::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
