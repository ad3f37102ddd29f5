use crate::error::{validation_error, CalResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// OAuth client identity for an installed application, as downloaded from the
/// Google Cloud console
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientSecret {
    #[serde(default)]
    pub installed: InstalledApp,
}

/// The "installed" section of the client secret file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstalledApp {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub auth_uri: String,
    #[serde(default)]
    pub token_uri: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

impl ClientSecret {
    /// Load and validate the client secret file before any authorization attempt
    pub fn load(path: &Path) -> CalResult<Self> {
        if !path.exists() {
            return Err(validation_error(&format!(
                "Client secret file not found: {}. Create an OAuth client ID of type \
                 \"Desktop app\" in the Google Cloud console (APIs & Services > Credentials), \
                 download its JSON, and save it to that path.",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        let secret: ClientSecret = serde_json::from_str(&content).map_err(|e| {
            validation_error(&format!(
                "Client secret file {} is not valid JSON: {}",
                path.display(),
                e
            ))
        })?;

        secret.validate()?;
        Ok(secret)
    }

    /// Check that every identity field required for the OAuth flow is present
    pub fn validate(&self) -> CalResult<()> {
        let app = &self.installed;
        for (field, value) in [
            ("installed.client_id", &app.client_id),
            ("installed.client_secret", &app.client_secret),
            ("installed.auth_uri", &app.auth_uri),
            ("installed.token_uri", &app.token_uri),
        ] {
            if value.trim().is_empty() {
                return Err(validation_error(&format!(
                    "Client secret file is missing required field '{}'. \
                     Re-download the OAuth client JSON from the Google Cloud console.",
                    field
                )));
            }
        }

        Ok(())
    }
}
