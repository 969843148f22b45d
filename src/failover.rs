//! Bounded retry and endpoint failover ordering

use log::{debug, warn};

/// Bounded retry policy: one attempt per listed temperature,
/// never more than `MAX_GENERATION_ATTEMPTS`
#[derive(Debug, Clone)]
pub struct RetryPolicy
{   temperatures: Vec<f64>
}

impl RetryPolicy
{   /// Create a new retry policy; extra temperatures are dropped
    pub fn new(mut temperatures: Vec<f64>) -> Self
    {   if temperatures.len() > crate::config::MAX_GENERATION_ATTEMPTS
        {   warn!(
              "Ignoring {} temperatures past the retry bound",
              temperatures.len() - crate::config::MAX_GENERATION_ATTEMPTS
            );
            temperatures.truncate(crate::config::MAX_GENERATION_ATTEMPTS);
        }
        RetryPolicy { temperatures }
    }

    /// Total attempts allowed, first one included
    pub fn max_attempts(&self) -> usize
    {   self.temperatures.len()
    }

    /// Sampling temperature for a zero-based attempt number
    pub fn temperature_for_attempt(
      &self
    , attempt: usize
    ) -> Option<f64>
    {   debug!("Temperature for attempt {}", attempt);
        self.temperatures.get(attempt).copied()
    }
}

impl From<&crate::config::GenerationConfig> for RetryPolicy
{   fn from(config: &crate::config::GenerationConfig) -> Self
    {   RetryPolicy::new(config.temperatures.clone())
    }
}

/// Ordered endpoint variants to walk during discovery
#[derive(Debug, Clone)]
pub struct FailoverSequence
{   pub variants: Vec<crate::EndpointVariant>
  , pub current_index: usize
}

impl FailoverSequence
{   /// Create a new failover sequence
    pub fn new(
      variants: Vec<crate::EndpointVariant>
    ) -> Self
    {   debug!(
          "Creating failover sequence with {} variants",
          variants.len()
        );
        FailoverSequence
        {   variants
          , current_index: 0
        }
    }

    /// Get the current variant
    pub fn current(&self) -> Option<crate::EndpointVariant>
    {   self.variants.get(self.current_index).copied()
    }

    /// Move to the next variant
    pub fn advance(&mut self) -> Option<crate::EndpointVariant>
    {   self.current_index += 1;
        self.current()
    }
}
