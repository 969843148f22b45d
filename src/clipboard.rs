//! Host clipboard seam

use std::sync::{Arc, Mutex};
use log::debug;

/// Host-provided clipboard
pub trait Clipboard: Send + Sync
{   fn write_text(&self, text: &str) -> Result<(), crate::error::Error>;
}

/// In-process clipboard for headless hosts
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard
{   contents: Arc<Mutex<Option<String>>>
}

impl MemoryClipboard
{   pub fn new() -> Self
    {   MemoryClipboard::default()
    }

    /// Last text written, if any
    pub fn contents(&self) -> Option<String>
    {   self.contents
          .lock()
          .ok()
          .and_then(|guard| guard.clone())
    }
}

impl Clipboard for MemoryClipboard
{   fn write_text(&self, text: &str) -> Result<(), crate::error::Error>
    {   debug!("Clipboard write ({} chars)", text.chars().count());
        let mut guard = self.contents
          .lock()
          .map_err(|e| crate::error::Error::Clipboard(e.to_string()))?;
        *guard = Some(text.to_string());
        Ok(())
    }
}
