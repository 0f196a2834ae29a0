//! Endpoint credentials for the hosted REST backend.

use std::env;
use std::fmt;

/// Environment variable holding the backend base URL.
pub const URL_VAR: &str = "SUPABASE_URL";
/// Environment variable holding the public API key.
pub const KEY_VAR: &str = "SUPABASE_ANON_KEY";

/// Placeholder shipped in sample configuration for the base URL.
pub const URL_PLACEHOLDER: &str = "YOUR-PROJECT-REF";
/// Placeholder shipped in sample configuration for the API key.
pub const KEY_PLACEHOLDER: &str = "YOUR-ANON-PUBLIC-KEY";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Credentials are missing or still hold their placeholders.
pub enum ConfigError {
    /// Base URL is empty or a placeholder.
    #[error("Please set SUPABASE_URL and SUPABASE_ANON_KEY (base URL is missing or a placeholder).")]
    BaseUrl,
    /// API key is empty or a placeholder.
    #[error("Please set SUPABASE_URL and SUPABASE_ANON_KEY (API key is missing or a placeholder).")]
    ApiKey,
}

#[derive(Clone, Default, PartialEq, Eq)]
/// Base URL and API key of the backend.
pub struct BackendConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`.
    pub base_url: String,
    /// Public API key sent as both `apikey` and bearer token.
    pub api_key: String,
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl BackendConfig {
    /// Build a config from explicit values.
    #[must_use]
    pub fn new<U: Into<String>, K: Into<String>>(base_url: U, api_key: K) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Read both values from the process environment.
    ///
    /// Unset variables become empty strings; the problem surfaces through
    /// [`BackendConfig::ensure_configured`] on the first request.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(
            env::var(URL_VAR).unwrap_or_default().trim(),
            env::var(KEY_VAR).unwrap_or_default().trim(),
        )
    }

    /// Check that both values are set and are not placeholders.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first unusable value.
    pub fn ensure_configured(&self) -> Result<(), ConfigError> {
        if self.base_url.is_empty() || self.base_url.contains(URL_PLACEHOLDER) {
            return Err(ConfigError::BaseUrl);
        }
        if self.api_key.is_empty() || self.api_key.contains(KEY_PLACEHOLDER) {
            return Err(ConfigError::ApiKey);
        }
        Ok(())
    }

    /// Base URL of the REST surface, without a trailing slash.
    #[must_use]
    pub fn rest_root(&self) -> String {
        format!("{}/rest/v1", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_rejected() {
        assert_eq!(
            BackendConfig::default().ensure_configured(),
            Err(ConfigError::BaseUrl)
        );
        assert_eq!(
            BackendConfig::new("https://abc.supabase.co", "").ensure_configured(),
            Err(ConfigError::ApiKey)
        );
    }

    #[test]
    fn placeholders_are_rejected() {
        let config = BackendConfig::new("https://YOUR-PROJECT-REF.supabase.co", "key");
        assert_eq!(config.ensure_configured(), Err(ConfigError::BaseUrl));

        let config = BackendConfig::new("https://abc.supabase.co", "YOUR-ANON-PUBLIC-KEY");
        assert_eq!(config.ensure_configured(), Err(ConfigError::ApiKey));
    }

    #[test]
    fn rest_root_strips_trailing_slash() {
        let config = BackendConfig::new("https://abc.supabase.co/", "key");
        assert!(config.ensure_configured().is_ok(), "real values pass");
        assert_eq!(config.rest_root(), "https://abc.supabase.co/rest/v1");
    }

    #[test]
    fn debug_output_hides_the_key() {
        let config = BackendConfig::new("https://abc.supabase.co", "secret-key");
        assert!(!format!("{config:?}").contains("secret-key"), "key redacted");
    }
}
