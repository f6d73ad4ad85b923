use std::sync::Arc;

use async_trait::async_trait;
use swiftsign_core::{Context, ProvideCredential, Result};

use crate::{Config, TempUrlKey};

/// ConfigKeyProvider reads `temp_url_key` and `temp_url_key_2` from [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigKeyProvider {
    config: Arc<Config>,
}

impl ConfigKeyProvider {
    /// Create a new ConfigKeyProvider.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ProvideCredential for ConfigKeyProvider {
    type Credential = TempUrlKey;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        let key = self
            .config
            .temp_url_key
            .clone()
            .filter(|v| !v.is_empty())
            .map(|key| TempUrlKey {
                key,
                key_2: self.config.temp_url_key_2.clone(),
            });

        Ok(key)
    }
}
