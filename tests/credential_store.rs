use chrono::Utc;
use gcal_sync::auth::{ClientSecret, CredentialStore, StoredToken, TokenFileLock};
use gcal_sync::config::Config;
use gcal_sync::error::Error;
use std::fs;
use std::path::Path;

fn test_config(dir: &Path) -> Config {
    Config {
        client_secret_path: dir.join("credentials.json"),
        token_path: dir.join("token.json"),
        calendar_id: "primary".to_string(),
        timezone: chrono_tz::UTC,
        redirect_port: 8080,
    }
}

#[test]
fn missing_token_file_means_no_stored_token() {
    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(&test_config(dir.path()));

    assert!(store.load_stored_token().unwrap().is_none());
}

#[test]
fn corrupted_token_file_is_deleted_and_treated_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    fs::write(&config.token_path, "{not valid json!").unwrap();

    let store = CredentialStore::new(&config);
    let loaded = store.load_stored_token().unwrap();

    assert!(loaded.is_none());
    assert!(
        !config.token_path.exists(),
        "corrupted token file should be removed"
    );
}

#[test]
fn persisted_token_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let store = CredentialStore::new(&config);

    let token = StoredToken {
        access_token: "access-abc".to_string(),
        refresh_token: Some("refresh-xyz".to_string()),
        expires_at: Utc::now().timestamp() + 3600,
    };
    store.persist(&token).unwrap();

    let loaded = store.load_stored_token().unwrap().unwrap();
    assert_eq!(loaded.access_token, "access-abc");
    assert_eq!(loaded.refresh_token.as_deref(), Some("refresh-xyz"));
    assert!(!loaded.is_expired());
}

#[test]
fn persist_fails_when_the_lock_is_held() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let store = CredentialStore::new(&config);

    let _lock = TokenFileLock::acquire(&config.token_path).unwrap();

    let token = StoredToken {
        access_token: "access-abc".to_string(),
        refresh_token: None,
        expires_at: 0,
    };
    let err = store.persist(&token).unwrap_err();
    assert!(matches!(err, Error::Credential(ref m) if m.contains("lock")));
    assert!(!config.token_path.exists(), "token must not be written");
}

#[test]
fn client_secret_load_reports_a_missing_file_with_setup_help() {
    let dir = tempfile::tempdir().unwrap();
    let err = ClientSecret::load(&dir.path().join("credentials.json")).unwrap_err();
    assert!(
        matches!(err, Error::Validation(ref m) if m.contains("Google Cloud console")),
        "error should carry setup instructions"
    );
}

#[test]
fn client_secret_load_rejects_invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");
    fs::write(&path, "not json at all").unwrap();

    let err = ClientSecret::load(&path).unwrap_err();
    assert!(matches!(err, Error::Validation(ref m) if m.contains("not valid JSON")));
}

#[test]
fn client_secret_load_rejects_missing_identity_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");
    fs::write(&path, r#"{"installed": {"client_id": "id-only"}}"#).unwrap();

    let err = ClientSecret::load(&path).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn client_secret_load_accepts_a_complete_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");
    fs::write(
        &path,
        r#"{
            "installed": {
                "client_id": "id-123.apps.googleusercontent.com",
                "client_secret": "shhh",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": "https://oauth2.googleapis.com/token",
                "redirect_uris": ["http://localhost"]
            }
        }"#,
    )
    .unwrap();

    let secret = ClientSecret::load(&path).unwrap();
    assert_eq!(
        secret.installed.client_id,
        "id-123.apps.googleusercontent.com"
    );
}
