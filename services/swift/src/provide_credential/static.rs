use async_trait::async_trait;
use swiftsign_core::{Context, ProvideCredential, Result};

use crate::Credential;

/// StaticCredentialProvider provides a known storage url and auth token.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    storage_url: String,
    auth_token: String,
}

impl StaticCredentialProvider {
    /// Create a new StaticCredentialProvider.
    pub fn new(storage_url: &str, auth_token: &str) -> Self {
        Self {
            storage_url: storage_url.to_string(),
            auth_token: auth_token.to_string(),
        }
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(Credential::new(&self.storage_url, &self.auth_token)))
    }
}
