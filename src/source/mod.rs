//! Text sources: where content is read from and written back to.
//!
//! The engine only ever sees plain strings. Each concrete host (a file in
//! the workspace, an in-memory buffer, an editor widget bridged from
//! elsewhere) implements [`TextSource`] once.

pub mod file;
pub mod memory;

use crate::error::PriceResult;

pub use file::FileSource;
pub use memory::MemorySource;

/// Read/write access to one body of content.
pub trait TextSource {
    /// Stable key for this source; undo snapshots are stored under it.
    fn id(&self) -> String;

    /// Location of the content, used for domain checks and history.
    fn url(&self) -> String;

    /// Current content.
    fn get_content(&self) -> PriceResult<String>;

    /// Replace the content wholesale.
    fn set_content(&mut self, content: &str) -> PriceResult<()>;
}
