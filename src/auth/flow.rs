use super::client_secret::ClientSecret;
use super::token::StoredToken;
use crate::error::{credential_error, CalResult};
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use tracing::info;
use url::Url;

/// OAuth scope granting read/write calendar access
pub const SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// How long the callback listener waits for the user to grant consent
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

/// Fallback token lifetime when the token endpoint omits `expires_in`
const DEFAULT_EXPIRES_IN: i64 = 3600;

/// Run the interactive installed-app authorization flow: open a browser at the
/// consent page, wait for the redirect on a short-lived localhost listener, and
/// exchange the authorization code for a token.
pub async fn run_interactive_flow(
    http: &Client,
    secret: &ClientSecret,
    port: u16,
) -> CalResult<StoredToken> {
    let redirect_uri = format!("http://localhost:{}", port);

    // Random state to tie the callback to this invocation
    let state = uuid::Uuid::new_v4().to_string();

    let mut auth_url = Url::parse(&secret.installed.auth_uri).map_err(|e| {
        credential_error(&format!(
            "Invalid auth_uri in client secret file: {}",
            e
        ))
    })?;
    auth_url
        .query_pairs_mut()
        .append_pair("client_id", &secret.installed.client_id)
        .append_pair("redirect_uri", &redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent")
        .append_pair("scope", SCOPE)
        .append_pair("state", &state);

    // Start the local listener before opening the browser so the redirect
    // cannot land on a closed port
    let server = tiny_http::Server::http(format!("127.0.0.1:{}", port)).map_err(|e| {
        credential_error(&format!(
            "Failed to start the authorization callback listener on port {}: {}",
            port, e
        ))
    })?;

    println!("Opening browser for Google Calendar authorization...");
    if webbrowser::open(auth_url.as_str()).is_err() {
        println!("Could not open a browser. Visit this URL to authorize:");
        println!("{}", auth_url);
    }

    println!("Waiting for authorization callback on {}...", redirect_uri);
    let code = wait_for_code(&server, &state)?;
    info!("Authorization code received, exchanging it for a token");

    // Exchange the code for tokens
    let response = http
        .post(&secret.installed.token_uri)
        .form(&[
            ("client_id", secret.installed.client_id.as_str()),
            ("client_secret", secret.installed.client_secret.as_str()),
            ("code", code.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| credential_error(&format!("Failed to reach the token endpoint: {}", e)))?;

    token_from_response(response, None).await
}

/// Block until the redirect delivers the authorization code, verifying the
/// state parameter. Gives up after [`CALLBACK_TIMEOUT`].
fn wait_for_code(server: &tiny_http::Server, expected_state: &str) -> CalResult<String> {
    let request = server
        .recv_timeout(CALLBACK_TIMEOUT)
        .map_err(|e| credential_error(&format!("Callback listener error: {}", e)))?
        .ok_or_else(|| {
            credential_error("Timed out waiting for the authorization callback (5 minutes)")
        })?;

    // tiny_http hands us a path-relative URL; parse it against a dummy base
    let url = Url::parse(&format!("http://localhost{}", request.url()))
        .map_err(|e| credential_error(&format!("Malformed callback URL: {}", e)))?;

    let mut code = None;
    let mut state = None;
    let mut consent_error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => consent_error = Some(value.into_owned()),
            _ => {}
        }
    }

    let result = if let Some(reason) = consent_error {
        Err(credential_error(&format!(
            "Authorization was not granted: {}",
            reason
        )))
    } else if state.as_deref() != Some(expected_state) {
        Err(credential_error(
            "State mismatch in authorization callback, discarding the response",
        ))
    } else {
        code.ok_or_else(|| credential_error("No authorization code found in callback"))
    };

    let page = match &result {
        Ok(_) => "Authorization successful! You can close this window.",
        Err(_) => "Authorization failed. Check the terminal for details.",
    };
    let _ = request.respond(tiny_http::Response::from_string(page));

    result
}

/// Build a [`StoredToken`] from a token endpoint response, keeping
/// `fallback_refresh` when the response carries no refresh token (refresh
/// responses usually do not repeat it).
pub async fn token_from_response(
    response: reqwest::Response,
    fallback_refresh: Option<String>,
) -> CalResult<StoredToken> {
    if !response.status().is_success() {
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        return Err(credential_error(&format!(
            "Token endpoint returned HTTP {} - {}",
            status, error_body
        )));
    }

    let payload: serde_json::Value = response
        .json()
        .await
        .map_err(|e| credential_error(&format!("Failed to parse token response: {}", e)))?;

    let access_token = payload
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| credential_error("Token response missing 'access_token' field"))?
        .to_string();

    let refresh_token = payload
        .get("refresh_token")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .or(fallback_refresh);

    let expires_in = payload
        .get("expires_in")
        .and_then(|v| v.as_i64())
        .unwrap_or(DEFAULT_EXPIRES_IN);

    Ok(StoredToken {
        access_token,
        refresh_token,
        expires_at: Utc::now().timestamp() + expires_in,
    })
}
