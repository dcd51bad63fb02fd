//! File-backed visitor id storage.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use freshharvest::user::{UserId, UserIdError, UserIdStore};
use tracing::debug;

/// Keeps the visitor id in a single text file.
#[derive(Debug, Clone)]
pub struct FileUserIdStore {
    path: PathBuf,
}

impl FileUserIdStore {
    /// Store the id at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UserIdStore for FileUserIdStore {
    fn load(&self) -> Result<Option<UserId>, UserIdError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        let id = contents.trim();

        if id.is_empty() {
            return Ok(None);
        }

        Ok(Some(UserId::from_stored(id)))
    }

    fn save(&self, user_id: &UserId) -> Result<(), UserIdError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, format!("{user_id}\n"))?;

        debug!(path = %self.path.display(), "saved user id");

        Ok(())
    }
}
