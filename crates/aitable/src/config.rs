//! Node configuration, populated from environment variables.

/// Public Aitable host.
pub const DEFAULT_BASE_URL: &str = "https://aitable.ai";

/// Runtime configuration for the Aitable node.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `AITABLE_BASE_URL` | `https://aitable.ai` | Host the fusion API paths are appended to |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AitableConfig {
    /// Scheme and host without a trailing slash, e.g. `https://aitable.ai`.
    pub base_url: String,
}

impl AitableConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self { base_url: base_url.trim().trim_end_matches('/').to_owned() }
    }

    /// Populate config from environment variables, applying defaults where absent.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("AITABLE_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        Self::new(base_url)
    }

    /// Absolute URL for a fusion API path starting with `/`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for AitableConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = AitableConfig::new("http://localhost:8080/");
        assert_eq!(config.url("/fusion/v1/spaces"), "http://localhost:8080/fusion/v1/spaces");
    }

    #[test]
    fn absent_or_blank_variable_falls_back_to_public_host() {
        assert_eq!(AitableConfig::from_lookup(|_| None), AitableConfig::default());
        assert_eq!(AitableConfig::from_lookup(|_| Some("  ".into())).base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn variable_overrides_base_url() {
        let config = AitableConfig::from_lookup(|key| {
            (key == "AITABLE_BASE_URL").then(|| "https://aitable.internal".to_owned())
        });
        assert_eq!(config.base_url, "https://aitable.internal");
    }
}
