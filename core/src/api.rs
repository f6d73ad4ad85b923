use crate::time::DateTime;
use crate::{Context, Result};
use std::fmt::Debug;
use std::time::Duration;

/// SigningCredential is the trait used by signer as the signing credential.
///
/// For temporary urls this is the account's `Temp-URL-Key`, for API calls it
/// is the storage url together with an auth token.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is valid.
    fn is_valid(&self) -> bool;

    /// Check if the credential is valid at `now`.
    ///
    /// [`Signer`](crate::Signer) calls this with the context clock. Credentials
    /// that expire must override it; the default ignores `now`.
    fn is_valid_at(&self, now: DateTime) -> bool {
        let _ = now;
        self.is_valid()
    }
}

impl<T: SigningCredential> SigningCredential for Option<T> {
    fn is_valid(&self) -> bool {
        let Some(cred) = self else {
            return false;
        };

        cred.is_valid()
    }

    fn is_valid_at(&self, now: DateTime) -> bool {
        let Some(cred) = self else {
            return false;
        };

        cred.is_valid_at(now)
    }
}

/// ProvideCredential is the trait used by signer to load the credential from the environment.
///
/// Returning `Ok(None)` means this source has nothing to offer and the caller
/// may try the next one.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this loader.
    type Credential: Send + Sync + Unpin + 'static;

    /// Load signing credential from current env.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}

/// SignRequest is the trait used by signer to sign the request.
#[async_trait::async_trait]
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Credential used by this signer.
    type Credential: Send + Sync + Unpin + 'static;

    /// Sign the request in place.
    ///
    /// ## Credential
    ///
    /// The `credential` parameter is the credential required by the signer to
    /// sign the request. `None` means no credential could be loaded.
    ///
    /// ## Expires In
    ///
    /// The `expires_in` parameter specifies how long the signed request stays
    /// valid. Temporary urls put the resulting timestamp into the
    /// `temp_url_expires` query, so signers that only produce temporary urls
    /// must return an error when it is `None`.
    async fn sign_request(
        &self,
        ctx: &Context,
        req: &mut http::request::Parts,
        credential: Option<&Self::Credential>,
        expires_in: Option<Duration>,
    ) -> Result<()>;
}
