use async_trait::async_trait;
use swiftsign_core::{Context, ProvideCredential, ProvideCredentialChain, Result};

use crate::provide_key::{AccountMetadataKeyProvider, EnvKeyProvider};
use crate::TempUrlKey;

/// DefaultKeyProvider is a loader that will try to load the temp url key via default chains.
///
/// Resolution order:
///
/// 1. Environment variables
/// 2. Account metadata, authenticated with [`crate::DefaultCredentialProvider`]
#[derive(Debug)]
pub struct DefaultKeyProvider {
    chain: ProvideCredentialChain<TempUrlKey>,
}

impl Default for DefaultKeyProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultKeyProvider {
    /// Create a new `DefaultKeyProvider` instance.
    pub fn new() -> Self {
        let chain = ProvideCredentialChain::new()
            .push(EnvKeyProvider::new())
            .push(AccountMetadataKeyProvider::default());

        Self { chain }
    }

    /// Create with a custom key chain.
    pub fn with_chain(chain: ProvideCredentialChain<TempUrlKey>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl ProvideCredential for DefaultKeyProvider {
    type Credential = TempUrlKey;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.chain.provide_credential(ctx).await
    }
}
