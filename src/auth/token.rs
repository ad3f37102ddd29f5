use crate::error::{credential_error, CalResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Authorized token persisted between runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Unix timestamp after which the access token is no longer valid
    pub expires_at: i64,
}

impl StoredToken {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now().timestamp()
    }
}

/// Scoped lock guarding the token file against concurrent invocations.
/// The lock file is created with `create_new` so a second process fails fast
/// instead of racing on the token, and it is removed when the guard drops.
pub struct TokenFileLock {
    lock_path: PathBuf,
}

impl TokenFileLock {
    pub fn acquire(token_path: &Path) -> CalResult<Self> {
        let lock_path = PathBuf::from(format!("{}.lock", token_path.display()));

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Ok(_) => Ok(Self { lock_path }),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(credential_error(&format!(
                "Another invocation appears to hold the token lock at {}. \
                 If no other run is in progress, remove the lock file and retry.",
                lock_path.display()
            ))),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for TokenFileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}
