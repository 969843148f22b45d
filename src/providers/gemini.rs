use std::time::Duration;
use log::{debug, trace, error};
use crate::request::{
  GenerateContentRequest, GenerateContentResponse, ListModelsResponse
};

/// Gemini REST client scoped to one credential
#[derive(Debug, Clone)]
pub struct GeminiClient
{   host: String
  , credential: Option<crate::Credential>
  , http_client: reqwest::Client
}

impl GeminiClient
{   /// Create a client for `host` (no trailing slash)
    pub fn new(
      host: impl Into<String>
    , credential: Option<crate::Credential>
    , timeout: Option<Duration>
    ) -> Result<Self, crate::error::Error>
    {   let host = host.into().trim_end_matches('/').to_string();
        debug!("Creating GeminiClient for {}", host);
        let http_client = match timeout
        {   Some(timeout) => reqwest::Client::builder()
              .timeout(timeout)
              .build()
              .map_err(|e| {
                error!("Cannot build HTTP client: {}", e);
                crate::error::Error::InvalidConfiguration(e.to_string())
              })?
          , None => reqwest::Client::new()
        };
        Ok(GeminiClient
        {   host
          , credential
          , http_client
        })
    }

    /// Client configured from the provider section
    pub fn from_config(
      config: &crate::config::QuotamentConfig
    ) -> Result<Self, crate::error::Error>
    {   GeminiClient::new(
          config.provider.host.clone()
        , config.credential.clone()
        , config.provider.timeout_secs.map(Duration::from_secs)
        )
    }

    pub fn credential(&self) -> Option<&crate::Credential>
    {   self.credential.as_ref()
    }

    /// Same host and transport, different key
    pub fn with_credential(
      &self
    , credential: Option<crate::Credential>
    ) -> Self
    {   GeminiClient
        {   host: self.host.clone()
          , credential
          , http_client: self.http_client.clone()
        }
    }

    fn api_key(&self) -> Result<&str, crate::error::Error>
    {   self.credential
          .as_ref()
          .map(|c| c.as_str())
          .ok_or_else(|| {
            error!("No Gemini credential");
            crate::error::Error::MissingCredential
          })
    }

    /// List model names available on `variant`
    pub async fn list_models(
      &self
    , variant: crate::EndpointVariant
    ) -> Result<Vec<crate::ModelDescriptor>, crate::error::Error>
    {   debug!("Listing models on {}", variant);
        let api_key = self.api_key()?;

        let response = self.http_client
          .get(format!("{}{}/models", self.host, variant.path()))
          .query(&[("key", api_key)])
          .send()
          .await
          .map_err(|e| {
            error!("Failed to fetch models: {}", e);
            crate::error::Error::HttpError(e.to_string())
          })?;

        let status = response.status();
        trace!("ListModels {} status: {}", variant, status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            error!("ListModels {} HTTP {}", variant, status);
            return Err(crate::error::Error::api(
              status.as_u16(), &error_text
            ));
        }

        let models_response: ListModelsResponse
          = response.json().await.map_err(|e| {
            error!("Parse error: {}", e);
            crate::error::Error::ParseError(e.to_string())
          })?;

        let models: Vec<crate::ModelDescriptor>
          = models_response.models
            .into_iter()
            .filter(|m| !m.name.is_empty())
            .map(|m| crate::ModelDescriptor::new(m.name))
            .collect();

        debug!("Retrieved {} models from {}", models.len(), variant);
        Ok(models)
    }

    /// Run one generateContent call and return the raw text
    pub async fn generate_content(
      &self
    , variant: crate::EndpointVariant
    , model: &str
    , request: &GenerateContentRequest
    ) -> Result<String, crate::error::Error>
    {   debug!(
          "generateContent on {} with {} at temperature {}",
          variant, model, request.generation_config.temperature
        );
        let api_key = self.api_key()?;

        let response = self.http_client
          .post(format!(
            "{}{}/models/{}:generateContent",
            self.host, variant.path(), model
          ))
          .query(&[("key", api_key)])
          .json(request)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            crate::error::Error::HttpError(e.to_string())
          })?;

        let status = response.status();
        trace!("generateContent status: {}", status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            error!("Gemini API error: HTTP {}", status);
            return Err(crate::error::Error::api(
              status.as_u16(), &error_text
            ));
        }

        let body: GenerateContentResponse
          = response.json().await.map_err(|e| {
            error!("Parse error: {}", e);
            crate::error::Error::ParseError(e.to_string())
          })?;

        let text = body.first_text();
        trace!("Raw generation: {:?}", text);
        Ok(text)
    }
}
