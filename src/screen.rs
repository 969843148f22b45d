//! In-app screen view model.
//!
//! Holds what the host renders (subtitle, quote card, buttons, toast)
//! and turns taps into backend calls. Layout and styling stay with the
//! host.

use std::time::{Duration, Instant};
use log::{debug, warn};

/// Fade in, hold, fade out
pub const TOAST_LIFETIME: Duration = Duration::from_millis(200 + 1200 + 300);

pub const TOAST_COPIED: &str = "Copied ✓";
pub const TOAST_COPY_FAILED: &str = "Copy failed";
pub const QUOTE_PLACEHOLDER: &str = "Press Generate";

/// Transient notification
#[derive(Debug, Clone, PartialEq)]
pub struct Toast
{   pub message: String
  , pub shown_at: Instant
}

impl Toast
{   fn new(message: &str) -> Self
    {   Toast
        {   message: message.to_string()
          , shown_at: Instant::now()
        }
    }

    pub fn is_visible_at(&self, now: Instant) -> bool
    {   now.saturating_duration_since(self.shown_at) < TOAST_LIFETIME
    }
}

#[derive(Debug, Clone)]
pub struct QuoteScreen
{   pub discovering: bool
  , pub loading: bool
  , /// Last displayed text, empty before the first generate
    pub quote: String
  , pub error: Option<String>
  , pub model: Option<String>
  , pub toast: Option<Toast>
}

impl Default for QuoteScreen
{   fn default() -> Self
    {   QuoteScreen
        {   discovering: true
          , loading: false
          , quote: String::new()
          , error: None
          , model: None
          , toast: None
        }
    }
}

impl QuoteScreen
{   pub fn new() -> Self
    {   QuoteScreen::default()
    }

    /// Apply the startup discovery result
    pub fn on_discovery(&mut self, result: &crate::GetDiscoveryReply)
    {   self.discovering = false;
        match result
        {   Ok(found) => {
              self.model = Some(found.model.clone());
              self.error = None;
            }
          , Err(e) => {
              warn!("Screen blocked: {}", e);
              self.model = None;
              self.error = Some(e.to_string());
            }
        }
    }

    pub fn can_generate(&self) -> bool
    {   self.model.is_some()
    }

    pub fn subtitle(&self) -> String
    {   if self.discovering
        {   "Discovering models…".to_string()
        } else if let Some(model) = &self.model
        {   format!("powered by: {}", model)
        } else
        {   "Model not ready".to_string()
        }
    }

    pub fn generate_label(&self) -> &'static str
    {   if !self.can_generate() || self.discovering
        {   "Waiting…"
        } else if self.loading
        {   "Loading…"
        } else
        {   "Generate"
        }
    }

    pub fn generate_enabled(&self) -> bool
    {   self.can_generate() && !self.loading && !self.discovering
    }

    pub fn copy_enabled(&self) -> bool
    {   !self.quote.is_empty() && !self.loading && !self.discovering
    }

    /// Text for the quote card
    pub fn display_quote(&self) -> &str
    {   if self.quote.is_empty()
        {   QUOTE_PLACEHOLDER
        } else
        {   &self.quote
        }
    }

    /// Start a generate; false when the model is not ready
    pub fn begin_generate(&mut self) -> bool
    {   self.error = None;
        if !self.can_generate()
        {   self.error = Some(crate::error::Error::NotReady.to_string());
            return false;
        }
        self.loading = true;
        self.quote.clear();
        true
    }

    pub fn finish_generate(&mut self, reply: crate::GenerateReply)
    {   self.loading = false;
        match reply
        {   Ok(outcome) => {
              self.quote = outcome.text;
              self.error = outcome.error.map(|e| e.to_string());
            }
          , Err(e) => {
              self.error = Some(e.to_string());
            }
        }
    }

    /// Generate tap
    pub async fn generate(&mut self, backend: &crate::QuoteBackend)
    {   if !self.begin_generate()
        {   return;
        }
        let reply = backend.generate().await;
        self.finish_generate(reply);
    }

    /// Copy tap; no-op without a quote
    pub fn copy(&mut self, clipboard: &dyn crate::clipboard::Clipboard)
    {   if self.quote.is_empty()
        {   return;
        }
        let message = match clipboard.write_text(&self.quote)
        {   Ok(()) => TOAST_COPIED
          , Err(e) => {
              warn!("{}", e);
              TOAST_COPY_FAILED
            }
        };
        debug!("Toast: {}", message);
        self.toast = Some(Toast::new(message));
    }

    /// Toast message if still on screen
    pub fn visible_toast(&self) -> Option<&str>
    {   self.toast
          .as_ref()
          .filter(|t| t.is_visible_at(Instant::now()))
          .map(|t| t.message.as_str())
    }
}
