//! Bearer token persistence
//!
//! Loads the shared API secret from a plaintext file, generating and
//! persisting a fresh one on first run. The token is logged once per process
//! inside a visually distinct banner so operators can retrieve it from the
//! logs. Persistence failures are logged and degrade to an in-memory token:
//! availability wins over durability.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

/// Distinguishes concurrent staging files within one process
static STAGING_SEQ: AtomicU64 = AtomicU64::new(0);

/// Length of a generated token, matching 32 bytes of URL-safe base64
const TOKEN_LEN: usize = 43;

/// URL-safe alphabet used for generated tokens
const TOKEN_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// The shared bearer secret protecting every API endpoint
///
/// Obtained once at service construction and cached for the process
/// lifetime; restarts read the same persisted value back.
#[derive(Clone, Debug)]
pub struct TokenStore {
    path: PathBuf,
    token: String,
}

impl TokenStore {
    /// Load the token from `path`, generating and persisting a new one if
    /// the file is absent or empty
    ///
    /// Never fails: if the file can neither be read nor written, the
    /// process runs with an in-memory token and the error is logged.
    pub fn obtain(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        match fs::read_to_string(&path) {
            Ok(contents) => {
                let existing = contents.trim();
                if !existing.is_empty() {
                    let token = existing.to_string();
                    log_token("Using existing API bearer token from file", &token);
                    return Self { path, token };
                }
                // File exists but is empty: overwrite it in place
                let token = generate_token();
                if let Err(e) = fs::write(&path, &token) {
                    tracing::error!(path = %path.display(), error = %e, "Could not save token to file");
                    log_token("Generated new API bearer token (not persisted)", &token);
                } else {
                    log_token("Generated new API bearer token and saved to file", &token);
                }
                return Self { path, token };
            }
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                tracing::error!(path = %path.display(), error = %e, "Could not read token file");
            }
            Err(_) => {}
        }

        let token = Self::persist_new_token(&path);
        Self { path, token }
    }

    /// Generate a token and link it into place atomically
    ///
    /// The token is staged in a sibling file and hard-linked to `path`;
    /// the link fails if `path` already exists, so processes racing on the
    /// same absent file all converge on whichever token landed first and
    /// none can observe a half-written file.
    fn persist_new_token(path: &Path) -> String {
        let token = generate_token();

        let staging = path.with_extension(format!(
            "tmp.{}.{}",
            std::process::id(),
            STAGING_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        if let Err(e) = fs::write(&staging, &token) {
            tracing::error!(path = %path.display(), error = %e, "Could not save token to file");
            log_token("Generated new API bearer token (not persisted)", &token);
            return token;
        }

        let linked = fs::hard_link(&staging, path);
        let _ = fs::remove_file(&staging);

        match linked {
            Ok(()) => {
                log_token("Generated new API bearer token and saved to file", &token);
                token
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // Lost the race: another process persisted first
                match fs::read_to_string(path) {
                    Ok(contents) if !contents.trim().is_empty() => {
                        let winner = contents.trim().to_string();
                        log_token("Using existing API bearer token from file", &winner);
                        winner
                    }
                    _ => {
                        tracing::error!(path = %path.display(), "Token file exists but is unreadable, using in-memory token");
                        log_token("Generated new API bearer token (not persisted)", &token);
                        token
                    }
                }
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Could not save token to file");
                log_token("Generated new API bearer token (not persisted)", &token);
                token
            }
        }
    }

    /// The bearer token value
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Where the token is (or would be) persisted
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Generate a cryptographically random URL-safe token
fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..TOKEN_CHARSET.len());
            TOKEN_CHARSET[idx] as char
        })
        .collect()
}

/// Emit the token banner so it can be retrieved out-of-band
fn log_token(message: &str, token: &str) {
    tracing::info!("------------------------------------------");
    tracing::info!("IMPORTANT: Save this API bearer token securely!");
    tracing::info!("{message}: {token}");
    tracing::info!("------------------------------------------");
}
