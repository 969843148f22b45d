//! Home-screen widget task handler.
//!
//! The host runtime owns the persisted [`WidgetState`] and calls
//! [`WidgetTaskHandler::handle`] once per widget event, one at a time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Shown before the first generate
pub const WIDGET_PLACEHOLDER: &str = "…";

/// Persisted widget state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetState
{   pub text: String
  , #[serde(default)]
    pub copied: bool
}

impl Default for WidgetState
{   fn default() -> Self
    {   WidgetState
        {   text: WIDGET_PLACEHOLDER.to_string()
          , copied: false
        }
    }
}

impl WidgetState
{   /// Whether there is real text to copy
    pub fn has_quote(&self) -> bool
    {   !self.text.is_empty() && self.text != WIDGET_PLACEHOLDER
    }
}

/// Host-owned key/value store for the widget
pub trait WidgetStateStore: Send + Sync
{   fn get_state(&self) -> Option<WidgetState>;
    fn set_state(&self, state: WidgetState)
      -> Result<(), crate::error::Error>;
}

/// In-process store for headless hosts and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryWidgetStore
{   state: Arc<Mutex<Option<WidgetState>>>
}

impl MemoryWidgetStore
{   pub fn new() -> Self
    {   MemoryWidgetStore::default()
    }
}

impl WidgetStateStore for MemoryWidgetStore
{   fn get_state(&self) -> Option<WidgetState>
    {   self.state.lock().ok().and_then(|guard| guard.clone())
    }

    fn set_state(&self, state: WidgetState)
      -> Result<(), crate::error::Error>
    {   let mut guard = self.state
          .lock()
          .map_err(|e| crate::error::Error::Other(e.to_string()))?;
        *guard = Some(state);
        Ok(())
    }
}

/// Widget click actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetAction
{   Generate
  , Copy
}

impl WidgetAction
{   /// Parse the host's click action string
    pub fn from_click_action(action: &str) -> Option<Self>
    {   match action
        {   "GEN" | "ACTION_GENERATE" => Some(WidgetAction::Generate)
          , "COPY" | "ACTION_COPY" => Some(WidgetAction::Copy)
          , _ => None
        }
    }
}

/// Apply the widget acceptance rule to fetched text
pub fn widget_quote(raw: &str, config: &crate::config::WidgetConfig) -> String
{   match crate::CanonicalQuote::parse(raw)
    {   Some(quote) => quote.into_string()
      , None => {
          debug!("Fetched text rejected: {:?}", raw);
          config.invalid_fallback.clone()
        }
    }
}

pub struct WidgetTaskHandler
{   store: Arc<dyn WidgetStateStore>
  , clipboard: Arc<dyn crate::clipboard::Clipboard>
  , source: crate::providers::QuoteSourceClient
  , config: crate::config::WidgetConfig
  , /// Bumped per event; a pending reset only fires if still current
    click_token: Arc<AtomicU64>
}

impl WidgetTaskHandler
{   pub fn new(
      store: Arc<dyn WidgetStateStore>
    , clipboard: Arc<dyn crate::clipboard::Clipboard>
    , config: crate::config::WidgetConfig
    ) -> Self
    {   let source = crate::providers::QuoteSourceClient::new(
          config.source_url.clone()
        );
        WidgetTaskHandler
        {   store
          , clipboard
          , source
          , config
          , click_token: Arc::new(AtomicU64::new(0))
        }
    }

    /// Fetch and normalize one quote; never empty
    pub async fn fetch_quote(&self) -> String
    {   match self.source.fetch_raw().await
        {   Ok(raw) => widget_quote(&raw, &self.config)
          , Err(e) => {
              warn!("Widget source failed: {}", e);
              self.config.offline_fallback.clone()
            }
        }
    }

    /// Handle one widget event; `None` for non-click events
    pub async fn handle(
      &self
    , action: Option<WidgetAction>
    ) -> Result<WidgetState, crate::error::Error>
    {   let token = self.click_token.fetch_add(1, Ordering::SeqCst) + 1;
        let prev = self.store.get_state().unwrap_or_default();
        let mut next = WidgetState
        {   text: prev.text.clone()
          , copied: false
        };

        match action
        {   Some(WidgetAction::Generate) => {
              next.text = self.fetch_quote().await;
              info!("Widget quote: {}", next.text);
            }
          , Some(WidgetAction::Copy) => {
              if prev.has_quote()
              {   match self.clipboard.write_text(&prev.text)
                  {   Ok(()) => next.copied = true
                    , Err(e) => warn!("Widget copy failed: {}", e)
                  }
              }
            }
          , None => {
              debug!("Widget refresh");
            }
        }

        self.store.set_state(next.clone())?;

        if next.copied
        {   self.schedule_copied_reset(token, next.text.clone());
        }
        Ok(next)
    }

    fn schedule_copied_reset(&self, token: u64, text: String)
    {   let store = Arc::clone(&self.store);
        let click_token = Arc::clone(&self.click_token);
        let delay = Duration::from_millis(self.config.copied_reset_ms);

        tokio::spawn(async move {
          tokio::time::sleep(delay).await;
          if click_token.load(Ordering::SeqCst) != token
          {   debug!("Copied reset superseded");
              return;
          }
          if let Err(e) = store.set_state(WidgetState
          {   text
            , copied: false
          })
          {   warn!("Copied reset failed: {}", e);
          }
        });
    }
}
