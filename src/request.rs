//! Wire types for the Generative Language REST surface

use serde::{Deserialize, Serialize};

// ===== Generation request =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part
{   #[serde(default)]
    pub text: Option<String>
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content
{   #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>
  , #[serde(default)]
    pub parts: Vec<Part>
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams
{   pub max_output_tokens: u32
  , pub temperature: f64
  , pub top_p: f64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest
{   pub contents: Vec<Content>
  , pub generation_config: GenerationParams
}

impl GenerateContentRequest
{   /// Single user turn carrying `instruction`
    pub fn user_prompt(
      instruction: &str
    , max_output_tokens: u32
    , temperature: f64
    , top_p: f64
    ) -> Self
    {   GenerateContentRequest
        {   contents: vec![
              Content
              {   role: Some("user".to_string())
                , parts: vec![
                    Part { text: Some(instruction.to_string()) }
                  ]
              }
            ]
          , generation_config: GenerationParams
            {   max_output_tokens
              , temperature
              , top_p
            }
        }
    }
}

// ===== Generation response =====

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse
{   #[serde(default)]
    pub candidates: Vec<Candidate>
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate
{   #[serde(default)]
    pub content: Option<Content>
  , /// Legacy single-string payload
    #[serde(default)]
    pub output_text: Option<String>
}

impl GenerateContentResponse
{   /// Raw text of the first candidate, `""` when there is none.
    ///
    /// Parts are joined with single spaces; falls back to the first
    /// part, then to the legacy `output_text` field.
    pub fn first_text(&self) -> String
    {   let Some(candidate) = self.candidates.first()
        else
        {   return String::new();
        };
        let parts: &[Part] = candidate.content
          .as_ref()
          .map(|c| c.parts.as_slice())
          .unwrap_or(&[]);

        let joined = parts
          .iter()
          .map(|p| p.text.as_deref().unwrap_or(""))
          .collect::<Vec<_>>()
          .join(" ");
        let joined = joined.trim();
        if !joined.is_empty()
        {   return joined.to_string();
        }

        if let Some(text) = parts.first().and_then(|p| p.text.clone())
        {   if !text.is_empty()
            {   return text;
            }
        }

        candidate.output_text.clone().unwrap_or_default()
    }
}

// ===== Model listing =====

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListModelsResponse
{   #[serde(default)]
    pub models: Vec<ModelEntry>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry
{   #[serde(default)]
    pub name: String
}

// ===== Widget quote source =====

#[derive(Debug, Clone, Deserialize)]
pub struct SourceQuote
{   #[serde(default)]
    pub q: String
}
