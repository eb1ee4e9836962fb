//! Catalog access token.
//!
//! The catalog accepts bearer tokens on its public endpoints. How a token is
//! obtained is outside of this crate: users paste one into a secrets file:
//!
//! ```toml
//! access_token = "BQC4...redacted"
//! ```

use std::{fmt, fs, path::Path, str::FromStr};

use serde::Deserialize;
use veil::Redact;

use crate::error::{Error, Result};

/// Bearer token for the catalog API.
///
/// Redacted when formatted with `Debug` so it does not leak into logs.
#[derive(Clone, PartialEq, Eq, Hash, Deserialize, Redact)]
#[redact(all)]
pub struct AccessToken(String);

#[derive(Deserialize)]
struct Secrets {
    access_token: Option<AccessToken>,
}

impl AccessToken {
    /// Secrets files are expected to be tiny; anything larger is refused
    /// before reading it into memory.
    const MAX_FILE_SIZE: u64 = 4 * 1024;

    /// Loads the token from a TOML secrets file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is too large, is not
    /// valid TOML, or has no non-blank `access_token` key.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file_size = fs::metadata(path)?.len();
        if file_size > Self::MAX_FILE_SIZE {
            return Err(Error::invalid_argument(format!(
                "{} is too large ({file_size} bytes)",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        let secrets: Secrets = toml::from_str(&contents)?;

        match secrets.access_token {
            Some(token) => token.as_str().parse(),
            None => Err(Error::invalid_argument(format!(
                "{} does not contain an access_token",
                path.display()
            ))),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AccessToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        if token.is_empty() {
            return Err(Error::invalid_argument("access token must not be blank"));
        }

        // Header values cannot hold control characters or whitespace.
        if token.contains(|chr: char| chr.is_whitespace() || chr.is_control()) {
            return Err(Error::invalid_argument(
                "access token contains illegal characters",
            ));
        }

        Ok(Self(token.to_owned()))
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
