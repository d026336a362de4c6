//! Anonymous user identity used to scope favorites on the server.
//!
//! The token is random, created on first use and then reused for the
//! lifetime of the profile. `FileIdentity` publishes a new token with a
//! no-clobber rename, so two processes racing on first start both end up
//! with whichever token landed first.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::error::CinefavError;

/// Source of the user identifier sent as `userId` on favorites calls.
pub trait IdentityProvider: Send + Sync {
    fn user_id(&self) -> Result<String, CinefavError>;
}

/// A fixed identifier, for tests and explicit overrides.
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub String);

impl IdentityProvider for StaticIdentity {
    fn user_id(&self) -> Result<String, CinefavError> {
        Ok(self.0.clone())
    }
}

/// Identity persisted in a single file, created lazily.
#[derive(Debug)]
pub struct FileIdentity {
    path: PathBuf,
    cached: Mutex<Option<String>>,
}

impl FileIdentity {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: Mutex::new(None),
        }
    }

    fn load_or_create(&self) -> Result<String, CinefavError> {
        if let Some(token) = read_token(&self.path)? {
            return Ok(token);
        }

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let token = generate_token();
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(token.as_bytes())?;
        tmp.flush()?;

        match tmp.persist_noclobber(&self.path) {
            Ok(_) => {
                tracing::info!(path = %self.path.display(), "created user identity");
                Ok(token)
            }
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                // Lost the race; adopt the token that landed first.
                read_token(&self.path)?.ok_or_else(|| {
                    CinefavError::Identity(format!("{} exists but is empty", self.path.display()))
                })
            }
            Err(e) => Err(CinefavError::Io(e.error)),
        }
    }
}

impl IdentityProvider for FileIdentity {
    fn user_id(&self) -> Result<String, CinefavError> {
        let mut cached = self
            .cached
            .lock()
            .map_err(|_| CinefavError::Identity("identity lock poisoned".into()))?;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }
        let token = self.load_or_create()?;
        *cached = Some(token.clone());
        Ok(token)
    }
}

fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}

fn read_token(path: &Path) -> Result<Option<String>, CinefavError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let token = content.trim();
            Ok((!token.is_empty()).then(|| token.to_string()))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
