use async_trait::async_trait;
use swiftsign_core::{Context, ProvideCredential, Result};

use crate::constants::*;
use crate::TempUrlKey;

/// EnvKeyProvider loads the temp url key from environment variables.
///
/// - `SWIFT_TEMP_URL_KEY`: the signing key
/// - `SWIFT_TEMP_URL_KEY_2`: the secondary key (optional)
#[derive(Debug, Default, Clone)]
pub struct EnvKeyProvider;

impl EnvKeyProvider {
    /// Create a new EnvKeyProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvKeyProvider {
    type Credential = TempUrlKey;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let Some(key) = ctx.env_var(SWIFT_TEMP_URL_KEY).filter(|v| !v.is_empty()) else {
            return Ok(None);
        };

        Ok(Some(TempUrlKey {
            key,
            key_2: ctx.env_var(SWIFT_TEMP_URL_KEY_2).filter(|v| !v.is_empty()),
        }))
    }
}
