//! Find the first (endpoint variant, model) pair a credential can use

use log::{debug, info, warn, error};

/// Pick a model from a listing.
///
/// Walks `preferred` in order and takes the first name present in
/// `models`; otherwise the first listed model containing "flash".
/// Returns the short name.
pub fn select_model(
  models: &[crate::ModelDescriptor]
, preferred: &[String]
) -> Option<String>
{   for wanted in preferred
    {   if let Some(m) = models.iter().find(|m| m.matches(wanted))
        {   debug!("Preferred model {} found as {}", wanted, m.name);
            return Some(m.short_name().to_string());
        }
    }

    models
      .iter()
      .find(|m| m.name.to_lowercase().contains("flash"))
      .map(|m| {
        debug!("Falling back to flash model {}", m.name);
        m.short_name().to_string()
      })
}

/// Run discovery for the client's credential.
///
/// Listing failures skip to the next variant; only the absence of any
/// match is reported as an error.
pub async fn discover(
  client: &crate::providers::GeminiClient
, provider: &crate::config::ProviderConfig
) -> Result<crate::DiscoveryResult, crate::error::Error>
{   if client.credential().is_none()
    {   error!("Discovery aborted: no credential");
        return Err(crate::error::Error::MissingCredential);
    }

    let mut sequence = crate::failover::FailoverSequence::new(
      provider.variants.clone()
    );
    let mut next = sequence.current();

    while let Some(variant) = next
    {   match client.list_models(variant).await
        {   Ok(models) => {
              if let Some(model) = select_model(
                &models, &provider.preferred_models
              )
              {   info!("Discovered {} on {}", model, variant);
                  return Ok(crate::DiscoveryResult { variant, model });
              }
              warn!(
                "No usable model among {} on {}",
                models.len(), variant
              );
            }
          , Err(e) => {
              warn!("Variant {} not viable: {}", variant, e);
            }
        }
        next = sequence.advance();
    }

    error!("No compatible model for this credential");
    Err(crate::error::Error::NoCompatibleModel)
}
