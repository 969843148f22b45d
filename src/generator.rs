//! Generate one quote: first attempt, one retry, then a fixed fallback

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use crate::request::GenerateContentRequest;

/// Instruction sent with every generation request
pub const INSTRUCTION: &str = "Write one complete quote in exactly strictly six words.\n\
No author names, hashtags, emojis, or quotation marks. no more than six words\n \n\
Words only. If six is impossible, use exactly five words.\n\n\
Examples (do not reuse):\n\
- Endless dreams beneath open skies\n\
- The journey matters more than destination\n\
- Strong Roots, Limitless Growth\n";

/// Where the displayed text came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteSource
{   /// Accepted model output; zero-based attempt number
    Generated { attempt: usize }
  , /// Static fallback phrase
    Fallback
}

/// Display text plus the diagnostic that forced a fallback, if any
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome
{   /// Always non-empty
    pub text: String
  , pub source: QuoteSource
  , pub error: Option<crate::error::Error>
}

impl GenerationOutcome
{   fn generated(quote: crate::CanonicalQuote, attempt: usize) -> Self
    {   GenerationOutcome
        {   text: quote.into_string()
          , source: QuoteSource::Generated { attempt }
          , error: None
        }
    }

    fn fallback(phrase: &str, error: crate::error::Error) -> Self
    {   GenerationOutcome
        {   text: phrase.to_string()
          , source: QuoteSource::Fallback
          , error: Some(error)
        }
    }

    pub fn is_fallback(&self) -> bool
    {   self.source == QuoteSource::Fallback
    }
}

/// Try each attempt of `policy` until one normalizes.
///
/// Stops at the first transport or API error.
pub async fn try_generate(
  client: &crate::providers::GeminiClient
, discovery: &crate::DiscoveryResult
, config: &crate::config::GenerationConfig
) -> Result<(crate::CanonicalQuote, usize), crate::error::Error>
{   let policy = crate::failover::RetryPolicy::from(config);

    for attempt in 0..policy.max_attempts()
    {   let Some(temperature) = policy.temperature_for_attempt(attempt)
        else
        {   break;
        };
        let request = GenerateContentRequest::user_prompt(
          INSTRUCTION
        , config.max_output_tokens
        , temperature
        , config.top_p
        );
        let raw = client
          .generate_content(discovery.variant, &discovery.model, &request)
          .await?;

        match crate::CanonicalQuote::parse(&raw)
        {   Some(quote) => {
              debug!("Attempt {} accepted: {}", attempt, quote);
              return Ok((quote, attempt));
            }
          , None => {
              warn!("Attempt {} rejected: {:?}", attempt, raw);
            }
        }
    }

    Err(crate::error::Error::InvalidQuote
    {   attempts: policy.max_attempts()
    })
}

/// Produce display text for one user "generate" action.
///
/// Never returns empty text: failures yield the configured fallback
/// phrase with the error attached.
pub async fn generate(
  client: &crate::providers::GeminiClient
, discovery: &crate::DiscoveryResult
, config: &crate::config::GenerationConfig
) -> GenerationOutcome
{   match try_generate(client, discovery, config).await
    {   Ok((quote, attempt)) => {
          info!("Generated quote on attempt {}", attempt);
          GenerationOutcome::generated(quote, attempt)
        }
      , Err(e) => {
          warn!("Generation failed, using fallback: {}", e);
          GenerationOutcome::fallback(&config.fallback_phrase, e)
        }
    }
}
