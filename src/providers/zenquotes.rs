use log::{debug, trace, error};
use crate::request::SourceQuote;

/// Keyless public quote source used by the widget
#[derive(Debug, Clone)]
pub struct QuoteSourceClient
{   url: String
  , http_client: reqwest::Client
}

impl QuoteSourceClient
{   pub fn new(url: impl Into<String>) -> Self
    {   let url = url.into();
        debug!("Creating QuoteSourceClient for {}", url);
        QuoteSourceClient
        {   url
          , http_client: reqwest::Client::new()
        }
    }

    /// Fetch one raw quote, `""` when the body has none
    pub async fn fetch_raw(&self)
      -> Result<String, crate::error::Error>
    {   let response = self.http_client
          .get(&self.url)
          .send()
          .await
          .map_err(|e| {
            error!("Quote source unreachable: {}", e);
            crate::error::Error::HttpError(e.to_string())
          })?;

        let status = response.status();
        trace!("Quote source status: {}", status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_default();
            return Err(crate::error::Error::api(
              status.as_u16(), &error_text
            ));
        }

        let quotes: Vec<SourceQuote>
          = response.json().await.map_err(|e| {
            error!("Parse error: {}", e);
            crate::error::Error::ParseError(e.to_string())
          })?;

        Ok(quotes.into_iter().next().map(|q| q.q).unwrap_or_default())
    }
}
