//! File-backed text source confined to a workspace directory.

use std::path::{Path, PathBuf};

use crate::error::{PriceError, PriceResult};
use crate::source::TextSource;
use crate::util::atomic::atomic_write;

/// A UTF-8 file inside the workspace.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Open `file_path` (absolute or relative to `workspace`).
    ///
    /// The file must exist and resolve inside the workspace; anything else is
    /// reported as [`PriceError::TextSourceUnavailable`].
    pub fn open(workspace: &Path, file_path: &str) -> PriceResult<Self> {
        let path = resolve_in_workspace(workspace, file_path)?;
        if !path.is_file() {
            return Err(unavailable(format!("file not found: {}", path.display())));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TextSource for FileSource {
    fn id(&self) -> String {
        self.path.display().to_string()
    }

    fn url(&self) -> String {
        url::Url::from_file_path(&self.path)
            .map_or_else(|()| format!("file://{}", self.path.display()), String::from)
    }

    fn get_content(&self) -> PriceResult<String> {
        let bytes = std::fs::read(&self.path).map_err(|source| PriceError::Io {
            path: self.path.clone(),
            source,
        })?;
        if bytes.contains(&0) {
            return Err(unavailable(format!("binary file: {}", self.path.display())));
        }
        String::from_utf8(bytes).map_err(|_| unavailable(format!("not UTF-8 text: {}", self.path.display())))
    }

    fn set_content(&mut self, content: &str) -> PriceResult<()> {
        atomic_write(&self.path, content).map_err(|source| PriceError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Resolve `file_path` against `workspace`, rejecting null bytes and any
/// path (including through symlinks or `..`) that lands outside it.
pub fn resolve_in_workspace(workspace: &Path, file_path: &str) -> PriceResult<PathBuf> {
    if file_path.contains('\0') {
        return Err(unavailable("path contains null byte".to_owned()));
    }

    let raw_path = if Path::new(file_path).is_absolute() {
        PathBuf::from(file_path)
    } else {
        workspace.join(file_path)
    };

    let canonical_workspace = workspace
        .canonicalize()
        .unwrap_or_else(|_| workspace.to_path_buf());

    let canonical_path = raw_path
        .canonicalize()
        .map_err(|_| unavailable(format!("file not found: {}", raw_path.display())))?;

    if !canonical_path.starts_with(&canonical_workspace) {
        return Err(unavailable(format!("path escapes workspace boundary: {file_path}")));
    }

    Ok(canonical_path)
}

fn unavailable(reason: String) -> PriceError {
    PriceError::TextSourceUnavailable { reason }
}
