//! Configuration management for albumroom.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Everything except the Spotify client id
//! has a default, so a fresh install only needs that one value.
//!
//! Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf};

pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:3000/callback";
pub const DEFAULT_SCOPE: &str = "user-top-read playlist-read-private playlist-read-collaborative";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_ALBUMS_DIR: &str = "public/albums";

/// Loads environment variables from `albumroom/.env` in the local data directory.
///
/// The directory is created when missing. A missing `.env` file is not an
/// error because every variable can also come from the process environment.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/albumroom/.env`
/// - macOS: `~/Library/Application Support/albumroom/.env`
/// - Windows: `%LOCALAPPDATA%/albumroom/.env`
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file exists but
/// cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = app_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Root of the application's local data, e.g. `~/.local/share/albumroom`.
pub fn app_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("albumroom");
    path
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Returns the Spotify API client ID.
///
/// # Errors
///
/// Fails when `SPOTIFY_API_AUTH_CLIENT_ID` is unset or empty. Register an app
/// at <https://developer.spotify.com/dashboard> to obtain one.
pub fn spotify_client_id() -> Result<String, String> {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| "SPOTIFY_API_AUTH_CLIENT_ID must be set".to_string())
}

/// Callback URL Spotify redirects to after authorization.
///
/// Must match the redirect URI registered for the app.
pub fn spotify_redirect_uri() -> String {
    var_or("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI)
}

/// Space separated OAuth scopes requested during authentication.
pub fn spotify_scope() -> String {
    var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE)
}

pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_API_URL)
}

pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

/// Address the local OAuth callback server binds to.
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Directory that extracted JSON and CSV files are written to.
pub fn data_dir() -> PathBuf {
    PathBuf::from(var_or("DATA_DIR", DEFAULT_DATA_DIR))
}

/// Directory that downloaded cover images are written to.
pub fn albums_dir() -> PathBuf {
    PathBuf::from(var_or("ALBUMS_DIR", DEFAULT_ALBUMS_DIR))
}
