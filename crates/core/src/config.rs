use std::fmt;

use crate::{
    error::{QuizError, Result},
    provider::{Provider, is_placeholder_key},
};

pub const DEFAULT_CAPTIONS_LANGUAGE: &str = "en";
pub const DEFAULT_MIN_WORD_COUNT: usize = 50;
pub const DEFAULT_TRANSCRIPT_CHAR_LIMIT: usize = 3000;

pub const CAPTIONS_LANG_ENV: &str = "TUBEQUIZ_CAPTIONS_LANG";
pub const MODEL_ENV: &str = "TUBEQUIZ_MODEL";
pub const API_URL_ENV: &str = "TUBEQUIZ_API_URL";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscriptConfig {
    pub language: String,
    pub min_word_count: usize,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_CAPTIONS_LANGUAGE.to_string(),
            min_word_count: DEFAULT_MIN_WORD_COUNT,
        }
    }
}

impl TranscriptConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            language: non_empty(lookup(CAPTIONS_LANG_ENV))
                .unwrap_or_else(|| DEFAULT_CAPTIONS_LANGUAGE.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Clone)]
pub struct SynthesizerConfig {
    pub provider: Provider,
    pub api_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub transcript_char_limit: usize,
}

impl SynthesizerConfig {
    pub fn new(provider: Provider, api_key: Option<String>) -> Self {
        let defaults = provider.config();
        Self {
            provider,
            api_url: defaults.api_url.to_string(),
            model: defaults.model.to_string(),
            api_key,
            transcript_char_limit: DEFAULT_TRANSCRIPT_CHAR_LIMIT,
        }
    }

    pub fn from_env(provider: Provider) -> Self {
        Self::from_lookup(provider, |key| std::env::var(key).ok())
    }

    pub fn from_lookup(provider: Provider, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new(provider, lookup(provider.config().env_var));
        if let Some(model) = non_empty(lookup(MODEL_ENV)) {
            config.model = model;
        }
        if let Some(api_url) = non_empty(lookup(API_URL_ENV)) {
            config.api_url = api_url;
        }
        config
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// The configured key, or `MissingCredential` when it is absent or a placeholder.
    pub fn api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !is_placeholder_key(key) => Ok(key.trim()),
            _ => Err(QuizError::MissingCredential {
                provider: self.provider.name().to_string(),
                env_var: self.provider.config().env_var,
            }),
        }
    }
}

impl fmt::Debug for SynthesizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynthesizerConfig")
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("transcript_char_limit", &self.transcript_char_limit)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn synthesizer_defaults_come_from_provider() {
        let config = SynthesizerConfig::from_lookup(Provider::Openai, lookup_from(&[]));
        assert_eq!(config.api_url, "https://api.openai.com/v1/chat/completions");
        assert_eq!(config.model, "gpt-5.1");
        assert_eq!(config.transcript_char_limit, 3000);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn synthesizer_overrides_from_lookup() {
        let config = SynthesizerConfig::from_lookup(
            Provider::Grok,
            lookup_from(&[
                ("XAI_API_KEY", "xai-secret"),
                (MODEL_ENV, "grok-3-mini"),
                (API_URL_ENV, "http://localhost:9000/v1/chat/completions"),
            ]),
        );
        assert_eq!(config.api_key().unwrap(), "xai-secret");
        assert_eq!(config.model, "grok-3-mini");
        assert_eq!(config.api_url, "http://localhost:9000/v1/chat/completions");
    }

    #[test]
    fn missing_or_placeholder_key_is_missing_credential() {
        let missing = SynthesizerConfig::new(Provider::Gemini, None);
        assert!(matches!(
            missing.api_key(),
            Err(QuizError::MissingCredential {
                env_var: "GEMINI_API_KEY",
                ..
            })
        ));

        let placeholder = SynthesizerConfig::new(Provider::Grok, Some("your_api_key_here".into()));
        assert!(matches!(
            placeholder.api_key(),
            Err(QuizError::MissingCredential { .. })
        ));
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = SynthesizerConfig::new(Provider::Grok, Some("xai-very-secret".into()));
        let debug = format!("{config:?}");
        assert!(!debug.contains("xai-very-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn transcript_config_language_override() {
        assert_eq!(TranscriptConfig::from_lookup(lookup_from(&[])).language, "en");
        let config = TranscriptConfig::from_lookup(lookup_from(&[(CAPTIONS_LANG_ENV, "de")]));
        assert_eq!(config.language, "de");
        assert_eq!(config.min_word_count, 50);
    }
}
