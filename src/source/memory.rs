//! In-memory text source, for content handed over by a caller.

use crate::error::PriceResult;
use crate::source::TextSource;

#[derive(Debug, Clone)]
pub struct MemorySource {
    id: String,
    url: String,
    content: String,
}

impl MemorySource {
    pub fn new(id: impl Into<String>, url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl TextSource for MemorySource {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn url(&self) -> String {
        self.url.clone()
    }

    fn get_content(&self) -> PriceResult<String> {
        Ok(self.content.clone())
    }

    fn set_content(&mut self, content: &str) -> PriceResult<()> {
        content.clone_into(&mut self.content);
        Ok(())
    }
}
