//! Atomic file writing via tempfile + rename.
//!
//! Content and store files are written to a temporary file in the same
//! directory and then renamed over the target, so a crash mid-write never
//! leaves a half-replaced price list or a truncated store behind.

use std::io::{self, Write};
use std::path::Path;

/// Atomically replace `path` with `content`, creating parent directories.
pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}
