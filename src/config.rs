use crate::error::{config_error, CalResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

/// Default timezone attached to created events
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

/// Main configuration structure for the tool
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the OAuth client secret file downloaded from the Google Cloud console
    pub client_secret_path: PathBuf,
    /// Path where the authorized token is cached between runs
    pub token_path: PathBuf,
    /// Calendar to operate on ("primary" unless overridden)
    pub calendar_id: String,
    /// IANA timezone attached to created events
    pub timezone: Tz,
    /// Local port for the OAuth redirect listener
    pub redirect_port: u16,
}

impl Config {
    /// Load configuration from environment variables, with defaults for every value
    pub fn load() -> CalResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let client_secret_path = env::var("GOOGLE_CLIENT_SECRET_PATH")
            .unwrap_or_else(|_| String::from("credentials.json"))
            .into();

        let token_path = env::var("GOOGLE_TOKEN_PATH")
            .unwrap_or_else(|_| String::from("token.json"))
            .into();

        let calendar_id =
            env::var("GOOGLE_CALENDAR_ID").unwrap_or_else(|_| String::from("primary"));

        let timezone_name = env::var("TIMEZONE").unwrap_or_else(|_| String::from(DEFAULT_TIMEZONE));
        let timezone: Tz = timezone_name
            .parse()
            .map_err(|_| config_error(&format!("Invalid TIMEZONE value: {}", timezone_name)))?;

        let redirect_port = match env::var("OAUTH_REDIRECT_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| config_error("Invalid OAUTH_REDIRECT_PORT format"))?,
            Err(_) => 8080,
        };

        Ok(Config {
            client_secret_path,
            token_path,
            calendar_id,
            timezone,
            redirect_port,
        })
    }
}
