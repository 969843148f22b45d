//! Shared normalizer for generated and fetched quotes.
//!
//! Both the in-app generator and the widget feed raw text through
//! [`normalize`]. The output is either a 5 or 6 word phrase with its
//! first letter capitalised, or the empty string when the text does
//! not qualify.

use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;

static QUOTE_MARKS: Lazy<Regex>
  = Lazy::new(|| Regex::new(r#"[“”‘’"']"#).expect("valid regex"));
static DISALLOWED: Lazy<Regex>
  = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s-]").expect("valid regex"));
static WHITESPACE: Lazy<Regex>
  = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static TRAILING_PUNCT: Lazy<Regex>
  = Lazy::new(|| Regex::new(r"[.?!,\-–—;:]+$").expect("valid regex"));

/// Accepted token counts, preferred first
pub const ACCEPTED_WORD_COUNTS: [usize; 2] = [6, 5];

/// Normalize raw text; `""` means invalid.
pub fn normalize(raw: &str) -> String
{   let cleaned = QUOTE_MARKS.replace_all(raw, "");
    let cleaned = DISALLOWED.replace_all(&cleaned, " ");
    let cleaned = WHITESPACE.replace_all(&cleaned, " ");
    let cleaned = cleaned.trim();

    if cleaned.is_empty()
    {   return String::new();
    }

    let no_trail = TRAILING_PUNCT.replace(cleaned, "");
    let mut words: Vec<String> = no_trail
      .split(' ')
      .filter(|w| !w.is_empty())
      .map(str::to_string)
      .collect();

    if !ACCEPTED_WORD_COUNTS.contains(&words.len())
    {   return String::new();
    }

    words[0] = capitalize_first(&words[0]);
    words.join(" ")
}

fn capitalize_first(word: &str) -> String
{   let mut chars = word.chars();
    match chars.next()
    {   Some(first) => first.to_uppercase().chain(chars).collect()
      , None => String::new()
    }
}

/// Text that passed [`normalize`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalQuote(String);

impl CanonicalQuote
{   pub fn parse(raw: &str) -> Option<Self>
    {   let text = normalize(raw);
        if text.is_empty()
        {   None
        } else
        {   Some(CanonicalQuote(text))
        }
    }

    pub fn as_str(&self) -> &str
    {   &self.0
    }

    pub fn word_count(&self) -> usize
    {   self.0.split(' ').count()
    }

    pub fn into_string(self) -> String
    {   self.0
    }
}

impl fmt::Display for CanonicalQuote
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalQuote
{   fn as_ref(&self) -> &str
    {   &self.0
    }
}
