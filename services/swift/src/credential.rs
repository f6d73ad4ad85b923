use std::fmt::{Debug, Formatter};

use swiftsign_core::time::{now, DateTime};
use swiftsign_core::utils::Redact;
use swiftsign_core::{Error, Result, SigningCredential};

/// Credential for authenticated account, container and object calls.
#[derive(Clone, Default)]
pub struct Credential {
    /// Storage url of the account, for example `http://127.0.0.1:8080/v1/AUTH_test`.
    pub storage_url: String,
    /// Value sent as `X-Auth-Token`.
    pub auth_token: String,
    /// Expiration time for this token.
    pub expires_in: Option<DateTime>,
}

impl Credential {
    /// Create a new credential.
    pub fn new(storage_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            storage_url: storage_url.into(),
            auth_token: auth_token.into(),
            expires_in: None,
        }
    }

    /// Set the token expiration.
    pub fn with_expires_in(mut self, expires_in: DateTime) -> Self {
        self.expires_in = Some(expires_in);
        self
    }

    /// Path component of the storage url, which is what temporary urls sign.
    ///
    /// `http://127.0.0.1:8080/v1/AUTH_test/` yields `/v1/AUTH_test`. Query and
    /// fragment are ignored, and a url without a path yields an empty string.
    pub fn base_path(&self) -> Result<String> {
        let uri: http::Uri = self.storage_url.parse().map_err(|e| {
            Error::config_invalid("storage url is not a valid url")
                .with_source(e)
                .with_context(format!("storage_url: {}", self.storage_url))
        })?;

        Ok(uri.path().trim_end_matches('/').to_string())
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("storage_url", &self.storage_url)
            .field("auth_token", &Redact::from(&self.auth_token))
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        self.is_valid_at(now())
    }

    fn is_valid_at(&self, now: DateTime) -> bool {
        if self.storage_url.is_empty() || self.auth_token.is_empty() {
            return false;
        }
        // Take 20s as buffer to avoid edge cases.
        if let Some(expires_in) = self.expires_in {
            return now
                .checked_add_signed(chrono::TimeDelta::try_seconds(20).expect("in bounds"))
                .is_some_and(|deadline| expires_in > deadline);
        }

        true
    }
}
