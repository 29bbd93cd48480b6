//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_template_dir() -> String {
    ".".to_string()
}

#[derive(Clone, Debug, Deserialize)]
/// Settings of the admin client: where the backend lives and how to sign in.
pub struct ClientConfig {
    /// Root of the REST API, e.g. `http://localhost:5000/api`.
    pub api_base_url: String,
    /// Credentials used to open a session on start-up. Without them the
    /// client relies on an existing session and fails the session check.
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// RW boundary polygons used by the density overlay.
    #[serde(default)]
    pub rw_geojson_path: Option<String>,
    /// Directory receiving the downloaded input template.
    #[serde(default = "default_template_dir")]
    pub template_dir: String,
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Both username and password, when configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) if !username.trim().is_empty() => {
                Some((username, password))
            }
            _ => None,
        }
    }
}
