use std::env;

use config::Config;
use dotenvy::dotenv;

use lansia_admin::models::config::ClientConfig;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        // Add `./config/default.yaml`
        .add_source(config::File::with_name("config/default"))
        // Add environment-specific overrides
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        // Add settings from the environment (with a prefix of APP)
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {err}");
            std::process::exit(1);
        }
    };

    let client_config = match settings.try_deserialize::<ClientConfig>() {
        Ok(client_config) => client_config,
        Err(err) => {
            log::error!("Error loading client config: {err}");
            std::process::exit(1);
        }
    };

    lansia_admin::run(client_config).await
}
