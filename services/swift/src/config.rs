use std::fmt::{Debug, Formatter};

use log::warn;
use swiftsign_core::utils::Redact;
use swiftsign_core::Context;

use crate::constants::*;
use crate::Digest;

/// Config carries all the configuration for Swift services.
#[derive(Clone, Default)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Config {
    /// `storage_url` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SWIFT_STORAGE_URL`]
    pub storage_url: Option<String>,
    /// `auth_token` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SWIFT_AUTH_TOKEN`]
    pub auth_token: Option<String>,
    /// `auth_url` is the v1 TempAuth endpoint, loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SWIFT_AUTH_URL`]
    pub auth_url: Option<String>,
    /// `user` for TempAuth, for example `test:tester`, loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SWIFT_USER`]
    pub user: Option<String>,
    /// `key` (password) for TempAuth, loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SWIFT_KEY`]
    pub key: Option<String>,
    /// `temp_url_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SWIFT_TEMP_URL_KEY`]
    pub temp_url_key: Option<String>,
    /// `temp_url_key_2` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SWIFT_TEMP_URL_KEY_2`]
    pub temp_url_key_2: Option<String>,
    /// `digest` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`SWIFT_TEMP_URL_DIGEST`]
    pub digest: Option<Digest>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set storage_url
    pub fn with_storage_url(mut self, storage_url: impl Into<String>) -> Self {
        self.storage_url = Some(storage_url.into());
        self
    }

    /// Set auth_token
    pub fn with_auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.auth_token = Some(auth_token.into());
        self
    }

    /// Set auth_url, user and key for TempAuth
    pub fn with_temp_auth(
        mut self,
        auth_url: impl Into<String>,
        user: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        self.auth_url = Some(auth_url.into());
        self.user = Some(user.into());
        self.key = Some(key.into());
        self
    }

    /// Set temp_url_key
    pub fn with_temp_url_key(mut self, temp_url_key: impl Into<String>) -> Self {
        self.temp_url_key = Some(temp_url_key.into());
        self
    }

    /// Set temp_url_key_2
    pub fn with_temp_url_key_2(mut self, temp_url_key_2: impl Into<String>) -> Self {
        self.temp_url_key_2 = Some(temp_url_key_2.into());
        self
    }

    /// Set digest
    pub fn with_digest(mut self, digest: Digest) -> Self {
        self.digest = Some(digest);
        self
    }

    /// Load config from env, keeping fields that are already set.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(SWIFT_STORAGE_URL) {
            self.storage_url.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SWIFT_AUTH_TOKEN) {
            self.auth_token.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SWIFT_AUTH_URL) {
            self.auth_url.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SWIFT_USER) {
            self.user.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SWIFT_KEY) {
            self.key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SWIFT_TEMP_URL_KEY) {
            self.temp_url_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SWIFT_TEMP_URL_KEY_2) {
            self.temp_url_key_2.get_or_insert(v);
        }
        if self.digest.is_none() {
            if let Some(v) = ctx.env_var(SWIFT_TEMP_URL_DIGEST) {
                match v.parse() {
                    Ok(digest) => self.digest = Some(digest),
                    Err(e) => warn!("ignoring {SWIFT_TEMP_URL_DIGEST}: {e}"),
                }
            }
        }

        self
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("storage_url", &self.storage_url)
            .field("auth_token", &Redact::from(&self.auth_token))
            .field("auth_url", &self.auth_url)
            .field("user", &self.user)
            .field("key", &Redact::from(&self.key))
            .field("temp_url_key", &Redact::from(&self.temp_url_key))
            .field("temp_url_key_2", &Redact::from(&self.temp_url_key_2))
            .field("digest", &self.digest)
            .finish()
    }
}
