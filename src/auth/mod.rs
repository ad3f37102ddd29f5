mod client_secret;
mod flow;
mod token;

pub use client_secret::ClientSecret;
pub use token::{StoredToken, TokenFileLock};

use crate::config::Config;
use crate::error::{credential_error, CalResult};
use reqwest::Client;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// Owns the persisted token file and drives the OAuth credential lifecycle:
/// stored token, silent refresh, or interactive authorization.
pub struct CredentialStore {
    client_secret_path: PathBuf,
    token_path: PathBuf,
    redirect_port: u16,
    http: Client,
}

impl CredentialStore {
    pub fn new(config: &Config) -> Self {
        Self {
            client_secret_path: config.client_secret_path.clone(),
            token_path: config.token_path.clone(),
            redirect_port: config.redirect_port,
            http: Client::new(),
        }
    }

    /// Get a valid token, refreshing or re-authorizing as needed.
    /// Fresh tokens are always persisted before being returned.
    pub async fn get_credentials(&self) -> CalResult<StoredToken> {
        if let Some(token) = self.load_stored_token()? {
            if !token.is_expired() {
                return Ok(token);
            }

            info!("Stored token is expired");
            if let Some(refresh_token) = token.refresh_token.clone() {
                match self.refresh_token(&refresh_token).await {
                    Ok(fresh) => {
                        self.persist(&fresh)?;
                        info!("Token refreshed silently");
                        return Ok(fresh);
                    }
                    Err(e) => {
                        warn!("Token refresh failed, falling back to interactive authorization: {}", e);
                    }
                }
            }
        }

        // No usable token, run the interactive flow
        let secret = ClientSecret::load(&self.client_secret_path)?;
        let token = flow::run_interactive_flow(&self.http, &secret, self.redirect_port).await?;
        self.persist(&token)?;
        info!("Interactive authorization complete, token saved");
        Ok(token)
    }

    /// Load the persisted token if one exists. A token file that fails to
    /// deserialize is deleted so the next step is a clean re-authorization.
    pub fn load_stored_token(&self) -> CalResult<Option<StoredToken>> {
        if !self.token_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.token_path)?;
        match serde_json::from_str::<StoredToken>(&content) {
            Ok(token) => Ok(Some(token)),
            Err(e) => {
                warn!(
                    "Token file {} is corrupted ({}), removing it",
                    self.token_path.display(),
                    e
                );
                fs::remove_file(&self.token_path)?;
                Ok(None)
            }
        }
    }

    /// Write the token file under the scoped lock
    pub fn persist(&self, token: &StoredToken) -> CalResult<()> {
        let _lock = TokenFileLock::acquire(&self.token_path)?;
        fs::write(&self.token_path, serde_json::to_string_pretty(token)?)?;
        Ok(())
    }

    /// Exchange the refresh token for a new access token
    async fn refresh_token(&self, refresh_token: &str) -> CalResult<StoredToken> {
        let secret = ClientSecret::load(&self.client_secret_path)?;

        let response = self
            .http
            .post(&secret.installed.token_uri)
            .form(&[
                ("client_id", secret.installed.client_id.as_str()),
                ("client_secret", secret.installed.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| credential_error(&format!("Failed to refresh token: {}", e)))?;

        flow::token_from_response(response, Some(refresh_token.to_string())).await
    }
}
