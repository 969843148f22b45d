//! HTTP clients for the quote providers

pub mod gemini;
pub mod zenquotes;

// Re-export for convenience
pub use gemini::GeminiClient;
pub use zenquotes::QuoteSourceClient;
