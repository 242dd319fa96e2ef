use log::Level;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const TOKEN_STORAGE_KEY: &str = "media_feed_token";
pub const ROOT_SELECTOR: &str = "#media_feed_root";

/// Attributes on the root element that override the defaults.
pub const API_BASE_ATTRIBUTE: &str = "data-api-base";
pub const LOG_LEVEL_ATTRIBUTE: &str = "data-log-level";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub token_storage_key: String,
    pub root_selector: String,
    pub log_level: Level,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            token_storage_key: TOKEN_STORAGE_KEY.to_owned(),
            root_selector: ROOT_SELECTOR.to_owned(),
            log_level: Level::Info,
        }
    }
}

impl ClientConfig {
    /// Blank values keep the current base URL.
    pub fn with_api_base_url(mut self, api_base_url: &str) -> Self {
        let normalized = normalize_base_url(api_base_url);
        if !normalized.is_empty() {
            self.api_base_url = normalized;
        }
        self
    }

    /// Unknown level names keep the current level.
    pub fn with_log_level(mut self, level_name: &str) -> Self {
        if let Ok(level) = level_name.trim().parse::<Level>() {
            self.log_level = level;
        }
        self
    }

    /// Applies the root element's attributes, then a base URL passed in from
    /// script, which takes precedence over `data-api-base`.
    pub fn resolve(
        self,
        root_api_base: Option<&str>,
        root_log_level: Option<&str>,
        explicit_api_base: Option<&str>,
    ) -> Self {
        let config = match root_api_base {
            Some(base_url) => self.with_api_base_url(base_url),
            None => self,
        };

        let config = match root_log_level {
            Some(level) => config.with_log_level(level),
            None => config,
        };

        match explicit_api_base {
            Some(base_url) => config.with_api_base_url(base_url),
            None => config,
        }
    }
}

pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();

        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.token_storage_key, "media_feed_token");
        assert_eq!(config.log_level, Level::Info);
    }

    #[test]
    fn base_url_override_is_normalized() {
        let config = ClientConfig::default().with_api_base_url(" https://api.example.com/ ");
        assert_eq!(config.api_base_url, "https://api.example.com");

        let config = config.with_api_base_url("   ");
        assert_eq!(config.api_base_url, "https://api.example.com");
    }

    #[test]
    fn explicit_base_url_beats_root_attribute() {
        let config = ClientConfig::default().resolve(
            Some("http://x/"),
            Some("debug"),
            Some("https://api.example.com/"),
        );

        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.log_level, Level::Debug);
    }

    #[test]
    fn root_attributes_apply_without_explicit_url() {
        let config = ClientConfig::default().resolve(Some("http://x/"), None, None);
        assert_eq!(config.api_base_url, "http://x");
        assert_eq!(config.log_level, Level::Info);

        let config = ClientConfig::default().resolve(None, None, None);
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn log_level_override() {
        assert_eq!(
            ClientConfig::default().with_log_level("debug").log_level,
            Level::Debug
        );
        assert_eq!(
            ClientConfig::default().with_log_level("chatty").log_level,
            Level::Info
        );
    }
}
