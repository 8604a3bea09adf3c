//! File-backed token persistence

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::warn;

use super::TokenStore;

/// [`TokenStore`] that keeps the bearer token in a single file.
///
/// I/O failures are logged and otherwise swallowed: losing durability only
/// means the next start is anonymous, which the auth flow already handles.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Uses `path` as the token file. Parent directories are created on the
    /// first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(_) => None,
        }
    }

    fn save(&self, token: &str) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(path = %self.path.display(), "could not create token directory: {e}");
                return;
            }
        }
        if let Err(e) = fs::write(&self.path, token) {
            warn!(path = %self.path.display(), "could not persist token: {e}");
        }
    }

    fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                warn!(path = %self.path.display(), "could not remove token file: {e}");
            }
        }
    }
}
