use std::fmt;

/// Custom error type for Quotament operations
/// Implements Clone for sending through channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// No credential configured (GEMINI_API_KEY)
    MissingCredential
  , /// Configuration rejected by validation
    InvalidConfiguration(String)
  , /// No (variant, model) pair usable with this credential
    NoCompatibleModel
  , /// Generate requested before discovery produced a model
    NotReady
  , /// Transport-level HTTP failure
    HttpError(String)
  , /// API answered with a non-success status
    ApiError
    {   status: u16
      , body: String
    }
  , /// Failed to parse API response
    ParseError(String)
  , /// Normalizer rejected every attempt
    InvalidQuote
    {   attempts: usize
    }
  , /// Host clipboard write failed
    Clipboard(String)
  , /// Backend task is gone
    BackendDisconnected
  , /// Generic error
    Other(String)
}

/// Longest slice of an error body kept in `ApiError`
pub const API_ERROR_BODY_LIMIT: usize = 200;

impl Error
{   /// Build an `ApiError`, clipping the body for display
    pub fn api(status: u16, body: &str) -> Self
    {   Error::ApiError
        {   status
          , body: body.chars().take(API_ERROR_BODY_LIMIT).collect()
        }
    }

    /// Whether the error is terminal until the credential changes
    pub fn is_terminal(&self) -> bool
    {   matches!(
          self
        , Error::MissingCredential
          | Error::InvalidConfiguration(_)
          | Error::NoCompatibleModel
        )
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::MissingCredential => {
              write!(f,
                "Missing GEMINI_API_KEY in configuration"
              )
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::NoCompatibleModel => {
              write!(f,
                "No compatible Gemini model found for this API key. \
                 Enable Generative Language API for your project, \
                 then restart."
              )
            }
          , Error::NotReady => {
              write!(f,
                "Model not ready yet. If this persists, \
                 check API key & project enablement."
              )
            }
          , Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::ApiError { status, body } => {
              write!(f, "HTTP {}: {}", status, body)
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::InvalidQuote { attempts } => {
              if *attempts >= 2
              {   write!(f,
                    "Model returned incomplete/invalid line twice"
                  )
              } else
              {   write!(f,
                    "Model returned incomplete/invalid line"
                  )
              }
            }
          , Error::Clipboard(msg) => {
              write!(f, "Copy failed: {}", msg)
            }
          , Error::BackendDisconnected => {
              write!(f, "Backend disconnected")
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}
