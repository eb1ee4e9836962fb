use url::Url;

use crate::{
    error::{Error, Result},
    index::RebuildPolicy,
    token::AccessToken,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub app_name: String,
    pub app_version: String,
    pub app_lang: String,

    /// ISO 3166-1 alpha-2 country code that top tracks are ranked for.
    pub market: String,

    /// Maximum number of artists requested per search.
    pub search_limit: u8,

    pub api_url: Url,

    pub user_agent: String,

    pub rebuild_policy: RebuildPolicy,

    pub access_token: Option<AccessToken>,
}

impl Config {
    pub const DEFAULT_API_URL: &'static str = "https://api.spotify.com/v1/";
    pub const DEFAULT_MARKET: &'static str = "US";
    pub const DEFAULT_SEARCH_LIMIT: u8 = 20;

    /// Creates a configuration for unauthenticated use of the public
    /// catalog API.
    ///
    /// # Panics
    ///
    /// Panics when the package name, version or language cannot be used in
    /// a `User-Agent` header. These are compile-time constants.
    #[must_use]
    pub fn new() -> Self {
        let app_name = env!("CARGO_PKG_NAME").to_owned();
        let app_version = env!("CARGO_PKG_VERSION").to_owned();
        let app_lang = "en".to_owned();

        // Additional `User-Agent` string checks on top of `reqwest::HeaderValue`.
        let illegal_chars = |chr| chr == '/' || chr == ';';
        if app_name.is_empty()
            || app_name.contains(illegal_chars)
            || app_version.is_empty()
            || app_version.contains(illegal_chars)
            || app_lang.chars().count() != 2
            || app_lang.contains(illegal_chars)
        {
            panic!(
                "application name, version and/or language invalid (\"{app_name}\"; \"{app_version}\"; \"{app_lang}\")"
            );
        }

        let os_name = match std::env::consts::OS {
            "macos" => "osx",
            other => other,
        };

        // Unlike the application fields, the OS version comes from the host
        // and falls back instead of failing.
        let os_version = sysinfo::System::os_version()
            .filter(|version| !version.is_empty() && !version.contains(illegal_chars))
            .unwrap_or_else(|| String::from("0"));

        let user_agent =
            format!("{app_name}/{app_version} (Rust; {os_name}/{os_version}; Desktop; {app_lang})");
        trace!("user agent: {user_agent}");

        Self {
            app_name,
            app_version,
            app_lang,

            market: Self::DEFAULT_MARKET.to_owned(),
            search_limit: Self::DEFAULT_SEARCH_LIMIT,

            api_url: Url::parse(Self::DEFAULT_API_URL).expect("invalid default api url"),

            user_agent,

            rebuild_policy: RebuildPolicy::default(),

            access_token: None,
        }
    }

    #[must_use]
    pub fn with_token(token: AccessToken) -> Self {
        Self {
            access_token: Some(token),
            ..Self::new()
        }
    }

    /// Sets the market, validating it as a two-letter country code.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `market` is not two ASCII letters.
    pub fn set_market(&mut self, market: &str) -> Result<()> {
        if market.len() != 2 || !market.chars().all(|chr| chr.is_ascii_alphabetic()) {
            return Err(Error::invalid_argument(format!(
                "market should be a two-letter country code but is \"{market}\""
            )));
        }

        self.market = market.to_ascii_uppercase();
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
