use std::path::PathBuf;

#[cfg(feature = "client")]
use std::sync::Arc;

#[cfg(feature = "client")]
use crate::console::Session;
#[cfg(feature = "client")]
use crate::forms::auth::LoginForm;
#[cfg(feature = "client")]
use crate::models::config::ClientConfig;
#[cfg(feature = "client")]
use crate::repository::HttpRepository;
#[cfg(feature = "client")]
use crate::services::auth as auth_service;

pub mod domain;
pub mod forms;
pub mod models;
pub mod pagination;

#[cfg(feature = "client")]
pub mod console;
#[cfg(feature = "client")]
pub mod controller;
#[cfg(feature = "client")]
pub mod repository;
#[cfg(feature = "client")]
pub mod services;

/// Resolves an optional path setting; blank values count as unset.
pub fn configured_path(value: Option<&str>) -> Option<PathBuf> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Connects to the backend, opens a session and runs the interactive console
/// until the user quits.
#[cfg(feature = "client")]
pub async fn run(client_config: ClientConfig) -> std::io::Result<()> {
    let repo = HttpRepository::new(&client_config.api_base_url, client_config.request_timeout())
        .map_err(|e| std::io::Error::other(format!("Failed to build HTTP client: {e}")))?;
    let repo = Arc::new(repo);

    let logged_in = match client_config.credentials() {
        Some((username, password)) => {
            let form = LoginForm {
                username: username.to_string(),
                password: password.to_string(),
            };
            auth_service::login(repo.as_ref(), &form)
                .await
                .map_err(|e| std::io::Error::other(format!("Login failed: {e}")))?;
            true
        }
        None => false,
    };

    // Every screen is behind the session guard.
    let user = auth_service::require_session(repo.as_ref())
        .await
        .map_err(|e| std::io::Error::other(format!("No active session: {e}")))?;
    log::info!("Session open for {} ({})", user.username, user.email);

    let session = Session::new(
        Arc::clone(&repo),
        PathBuf::from(&client_config.template_dir),
        configured_path(client_config.rw_geojson_path.as_deref()),
    );
    console::run(session).await;

    if logged_in && let Err(err) = auth_service::logout(repo.as_ref()).await {
        log::warn!("Logout failed: {err}");
    }
    Ok(())
}
