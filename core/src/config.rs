//! Client configuration.

/// Public Convore API root.
pub const API_URL: &str = "https://convore.com/api/";

/// Environment variable overriding the API root, e.g. to target a mock server.
pub const API_URL_ENV: &str = "CONVORE_API_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reads `CONVORE_API_URL`, falling back to the public API root.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
            Some(url) => Self::new(url.trim()),
            None => Self::default(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(API_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_public_api() {
        assert_eq!(ClientConfig::default().base_url, "https://convore.com/api");
    }

    #[test]
    fn env_override_is_trimmed() {
        let config = ClientConfig::from_lookup(|_| Some(" http://127.0.0.1:3000/api/ ".to_string()));
        assert_eq!(config.base_url, "http://127.0.0.1:3000/api");
    }

    #[test]
    fn blank_env_value_is_ignored() {
        let config = ClientConfig::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config, ClientConfig::default());
    }
}
