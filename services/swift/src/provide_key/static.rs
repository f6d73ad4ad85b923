use async_trait::async_trait;
use swiftsign_core::{Context, ProvideCredential, Result};

use crate::TempUrlKey;

/// StaticKeyProvider provides a fixed temp url key.
///
/// Use it when the key is already known, for example because the caller has
/// just written it to the account metadata.
#[derive(Debug, Clone)]
pub struct StaticKeyProvider {
    key: String,
    key_2: Option<String>,
}

impl StaticKeyProvider {
    /// Create a new StaticKeyProvider.
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            key_2: None,
        }
    }

    /// Set the secondary key.
    pub fn with_key_2(mut self, key_2: &str) -> Self {
        self.key_2 = Some(key_2.to_string());
        self
    }
}

#[async_trait]
impl ProvideCredential for StaticKeyProvider {
    type Credential = TempUrlKey;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(TempUrlKey {
            key: self.key.clone(),
            key_2: self.key_2.clone(),
        }))
    }
}
