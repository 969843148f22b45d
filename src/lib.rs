pub mod error;
pub mod config;
pub mod normalize;
pub mod providers;
pub mod request;
pub mod failover;
pub mod discovery;
pub mod generator;
pub mod client;
pub mod clipboard;
pub mod screen;
pub mod widget;

use std::fmt;
use serde::{Deserialize, Serialize};

pub use client::QuoteBackend;
pub use config::QuotamentConfig;
pub use error::Error;
pub use normalize::{normalize, CanonicalQuote};

/*

quotament: tiny 5-6 word quotes from the Gemini API.

quotament/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Core types and the backend channel interface
│   ├── error.rs        # Error kinds surfaced to hosts
│   ├── config.rs       # Provider, generation and widget settings
│   ├── normalize.rs    # Shared 5/6-word normalizer
│   ├── providers/      # HTTP clients (Gemini, widget quote source)
│   ├── request.rs      # Wire types for the Gemini REST surface
│   ├── failover.rs     # Variant sequence and temperature schedule
│   ├── discovery.rs    # (variant, model) discovery
│   ├── generator.rs    # Generate, retry once, fall back
│   ├── client.rs       # Backend actor owning the discovery cache
│   ├── clipboard.rs    # Host clipboard seam
│   ├── screen.rs       # In-app screen view model
│   ├── widget.rs       # Widget task handler and state store
│   └── main.rs         # CLI host
└── tests/

*/

/// QUOTAMENT API INTERFACE:

// ===== Generate =====

pub type GenerateReply
  = Result<crate::generator::GenerationOutcome, crate::error::Error>;
pub type GenerateReplySender
  = tokio::sync::mpsc::UnboundedSender<GenerateReply>;

pub struct GenerateArgs
{   pub reply: GenerateReplySender
}

// ===== GetDiscovery =====

pub type GetDiscoveryReply
  = Result<DiscoveryResult, crate::error::Error>;
pub type GetDiscoveryReplySender
  = tokio::sync::mpsc::UnboundedSender<GetDiscoveryReply>;

pub struct GetDiscoveryArgs
{   pub reply: GetDiscoveryReplySender
}

// ===== SetCredential =====

pub type SetCredentialReply
  = Result<DiscoveryResult, crate::error::Error>;
pub type SetCredentialReplySender
  = tokio::sync::mpsc::UnboundedSender<SetCredentialReply>;

pub struct SetCredentialArgs
{   pub credential: Option<Credential>
  , pub reply: SetCredentialReplySender
}

// ===== KillProcess =====

pub type KillProcessReply = Result<(), crate::error::Error>;
pub type KillProcessReplySender
  = tokio::sync::mpsc::UnboundedSender<KillProcessReply>;

pub struct KillProcessArgs
{   pub reply: KillProcessReplySender
}

// ===== QuoteHand (sender side) =====

pub struct QuoteHand
{   pub generate_tx
      : tokio::sync::mpsc::UnboundedSender<GenerateArgs>
  , pub get_discovery_tx
      : tokio::sync::mpsc::UnboundedSender<GetDiscoveryArgs>
  , pub set_credential_tx
      : tokio::sync::mpsc::UnboundedSender<SetCredentialArgs>
  , pub kill_process_tx
      : tokio::sync::mpsc::UnboundedSender<KillProcessArgs>
}

// ===== QuoteFoot (receiver side) =====

pub struct QuoteFoot
{   pub generate_rx
      : tokio::sync::mpsc::UnboundedReceiver<GenerateArgs>
  , pub get_discovery_rx
      : tokio::sync::mpsc::UnboundedReceiver<GetDiscoveryArgs>
  , pub set_credential_rx
      : tokio::sync::mpsc::UnboundedReceiver<SetCredentialArgs>
  , pub kill_process_rx
      : tokio::sync::mpsc::UnboundedReceiver<KillProcessArgs>
}

/// QUOTAMENT STRUCTURES:

/// Opaque API key. Never printed.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Credential(String);

impl Credential
{   /// `None` for empty or whitespace-only keys
    pub fn new(key: impl Into<String>) -> Option<Self>
    {   let key = key.into();
        if key.trim().is_empty()
        {   None
        } else
        {   Some(Credential(key))
        }
    }

    pub fn as_str(&self) -> &str
    {   &self.0
    }
}

impl TryFrom<String> for Credential
{   type Error = crate::error::Error;

    fn try_from(key: String) -> Result<Self, Self::Error>
    {   Credential::new(key).ok_or(crate::error::Error::MissingCredential)
    }
}

impl From<Credential> for String
{   fn from(credential: Credential) -> Self
    {   credential.0
    }
}

impl fmt::Debug for Credential
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   write!(f, "Credential(***)")
    }
}

/// Parallel API surfaces of the Generative Language service,
/// declared in default priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Hash)]
pub enum EndpointVariant
{   /// `/v1`
    #[serde(rename = "/v1")]
    Stable
  , /// `/v1beta`
    #[serde(rename = "/v1beta")]
    Beta
}

impl EndpointVariant
{   /// Path prefix appended to the provider host
    pub fn path(&self) -> &'static str
    {   match self
        {   EndpointVariant::Stable => "/v1"
          , EndpointVariant::Beta => "/v1beta"
        }
    }
}

impl fmt::Display for EndpointVariant
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(self.path())
    }
}

/// A model as listed by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor
{   /// Fully-qualified name, e.g. `models/gemini-2.5-flash`
    pub name: String
}

impl ModelDescriptor
{   pub fn new(name: impl Into<String>) -> Self
    {   ModelDescriptor { name: name.into() }
    }

    /// Suffix after the last `/`
    pub fn short_name(&self) -> &str
    {   self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Exact match or `/{short}` suffix match
    pub fn matches(&self, short: &str) -> bool
    {   self.name == short
          || self.name.ends_with(&format!("/{}", short))
    }
}

/// First viable (variant, model) pair for a credential
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiscoveryResult
{   pub variant: EndpointVariant
  , /// Short model name used in generate calls
    pub model: String
}
