use async_trait::async_trait;
use swiftsign_core::{Context, ProvideCredential, Result};

use crate::constants::*;
use crate::Credential;

/// EnvCredentialProvider loads an account credential from environment variables.
///
/// This provider looks for the following environment variables:
/// - `SWIFT_STORAGE_URL`: the storage url of the account
/// - `SWIFT_AUTH_TOKEN`: a pre-issued auth token
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let envs = ctx.env_vars();

        match (envs.get(SWIFT_STORAGE_URL), envs.get(SWIFT_AUTH_TOKEN)) {
            (Some(url), Some(token)) if !url.is_empty() && !token.is_empty() => {
                Ok(Some(Credential::new(url, token)))
            }
            _ => Ok(None),
        }
    }
}
