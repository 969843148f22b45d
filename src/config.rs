//! Configuration for the provider, generation and widget

use std::path::Path;
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

/// Environment variable holding the Gemini API key
pub const CREDENTIAL_ENV: &str = "GEMINI_API_KEY";
/// Optional override for the provider host
pub const PROVIDER_HOST_ENV: &str = "QUOTAMENT_PROVIDER_HOST";
/// Optional override for the widget quote source
pub const WIDGET_SOURCE_ENV: &str = "QUOTAMENT_WIDGET_SOURCE_URL";

pub const DEFAULT_PROVIDER_HOST: &str
  = "https://generativelanguage.googleapis.com";
pub const DEFAULT_WIDGET_SOURCE_URL: &str
  = "https://zenquotes.io/api/random";

/// First attempt plus one retry
pub const MAX_GENERATION_ATTEMPTS: usize = 2;

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig
{   /// Scheme and host, no trailing slash
    pub host: String
  , /// Endpoint variants in priority order
    pub variants: Vec<crate::EndpointVariant>
  , /// Model short names in preference order
    pub preferred_models: Vec<String>
  , /// Request timeout in seconds (transport default when unset)
    pub timeout_secs: Option<u64>
}

impl Default for ProviderConfig
{   fn default() -> Self
    {   ProviderConfig
        {   host: DEFAULT_PROVIDER_HOST.to_string()
          , variants: vec![
              crate::EndpointVariant::Stable
            , crate::EndpointVariant::Beta
            ]
          , preferred_models: [
              "gemini-2.5-flash-lite"
            , "gemini-2.5-flash"
            , "gemini-2.0-flash-lite"
            , "gemini-1.5-flash-latest"
            , "gemini-1.5-flash-8b"
            , "gemini-1.5-flash"
            ].iter().map(|s| s.to_string()).collect()
          , timeout_secs: None
        }
    }
}

/// Generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig
{   /// Sampling temperature for each attempt, in order
    pub temperatures: Vec<f64>
  , pub max_output_tokens: u32
  , pub top_p: f64
  , /// Shown when every attempt fails
    pub fallback_phrase: String
}

impl Default for GenerationConfig
{   fn default() -> Self
    {   GenerationConfig
        {   temperatures: vec![0.7, 0.5]
          , max_output_tokens: 24
          , top_p: 0.9
          , fallback_phrase: "Create boldly iterate daily".to_string()
        }
    }
}

/// Widget configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig
{   /// Keyless quote source returning `[{ "q": ... }]`
    pub source_url: String
  , /// Used when fetched text is not 5 or 6 words
    pub invalid_fallback: String
  , /// Used when the fetch itself fails
    pub offline_fallback: String
  , /// Delay before "copied" flips back
    pub copied_reset_ms: u64
}

impl Default for WidgetConfig
{   fn default() -> Self
    {   WidgetConfig
        {   source_url: DEFAULT_WIDGET_SOURCE_URL.to_string()
          , invalid_fallback:
              "Begin now refine relentlessly repeat".to_string()
          , offline_fallback:
              "Keep moving forward with courage".to_string()
          , copied_reset_ms: 1200
        }
    }
}

/// Blank keys load as absent so the environment can fill them
fn blank_credential_as_none<'de, D>(deserializer: D)
  -> Result<Option<crate::Credential>, D::Error>
where
  D: serde::Deserializer<'de>
{   let key: Option<String> = Option::deserialize(deserializer)?;
    Ok(key.and_then(crate::Credential::new))
}

/// Quotament configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotamentConfig
{   /// Static API key; absence surfaces at discovery time
    #[serde(deserialize_with = "blank_credential_as_none")]
    pub credential: Option<crate::Credential>
  , pub provider: ProviderConfig
  , pub generation: GenerationConfig
  , pub widget: WidgetConfig
}

impl QuotamentConfig
{   /// Defaults overlaid with the process environment
    pub fn from_env() -> Self
    {   let mut config = QuotamentConfig::default();
        config.apply_env();
        config
    }

    /// Load a JSON file, then let the environment fill gaps
    pub fn from_json_file(path: impl AsRef<Path>)
      -> Result<Self, crate::error::Error>
    {   let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(path)
          .map_err(|e| {
            error!("Cannot read config {}: {}", path.display(), e);
            crate::error::Error::InvalidConfiguration(
              format!("{}: {}", path.display(), e)
            )
          })?;
        let mut config: QuotamentConfig
          = serde_json::from_str(&text).map_err(|e| {
            error!("Cannot parse config: {}", e);
            crate::error::Error::InvalidConfiguration(e.to_string())
          })?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self)
    {   if self.credential.is_none()
        {   self.credential = std::env::var(CREDENTIAL_ENV)
              .ok()
              .and_then(crate::Credential::new);
        }
        if let Ok(host) = std::env::var(PROVIDER_HOST_ENV)
        {   debug!("Provider host overridden to {}", host);
            self.provider.host = host;
        }
        if let Ok(url) = std::env::var(WIDGET_SOURCE_ENV)
        {   debug!("Widget source overridden to {}", url);
            self.widget.source_url = url;
        }
        if self.credential.is_none()
        {   warn!("{} is not set", CREDENTIAL_ENV);
        }
    }

    /// Builder-style credential setter
    pub fn with_credential(
      mut self
    , credential: impl Into<String>
    ) -> Self
    {   self.credential = crate::Credential::new(credential.into());
        self
    }

    /// Builder-style host setter, mostly for tests
    pub fn with_provider_host(mut self, host: impl Into<String>) -> Self
    {   self.provider.host = host.into();
        self
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<(), crate::error::Error>
    {   if self.provider.variants.is_empty()
        {   return Err(crate::error::Error::InvalidConfiguration(
              "no endpoint variants".to_string()
            ));
        }
        if self.generation.temperatures.is_empty()
        {   return Err(crate::error::Error::InvalidConfiguration(
              "no generation temperatures".to_string()
            ));
        }
        if self.generation.temperatures.len() > MAX_GENERATION_ATTEMPTS
        {   return Err(crate::error::Error::InvalidConfiguration(
              format!(
                "{} generation temperatures, at most {} allowed"
              , self.generation.temperatures.len()
              , MAX_GENERATION_ATTEMPTS
              )
            ));
        }
        if let Some(t) = self.generation.temperatures
          .iter()
          .find(|t| !(0.0..=2.0).contains(*t))
        {   return Err(crate::error::Error::InvalidConfiguration(
              format!("temperature {} outside 0.0..=2.0", t)
            ));
        }
        if self.generation.fallback_phrase.trim().is_empty()
        {   return Err(crate::error::Error::InvalidConfiguration(
              "empty fallback phrase".to_string()
            ));
        }
        Ok(())
    }
}
