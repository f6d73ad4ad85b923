//! OpenStack Swift temporary url signer
//!
//! Temporary urls grant time-limited access to a single object (or every
//! object under a prefix) without handing out an auth token. They are signed
//! with the account's `Temp-URL-Key` metadata.
//!
//! ## Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use swiftsign_core::{Context, OsEnv, Signer};
//! use swiftsign_swift::{DefaultKeyProvider, RequestSigner};
//!
//! # async fn example() -> swiftsign_core::Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let signer = Signer::new(ctx, DefaultKeyProvider::new(), RequestSigner::new());
//!
//! let mut parts = http::Request::get("http://127.0.0.1:8080/v1/AUTH_test/cont/obj")
//!     .body(())?
//!     .into_parts()
//!     .0;
//! signer.sign(&mut parts, Some(Duration::from_secs(3600))).await?;
//! println!("{}", parts.uri);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod key;
pub use key::TempUrlKey;

mod digest;
pub use digest::Digest;

mod sign_request;
pub use sign_request::compute_expiry;
pub use sign_request::compute_signed_url;
pub use sign_request::split_object_path;
pub use sign_request::string_to_sign;
pub use sign_request::RequestSigner;
pub use sign_request::TempUrlOptions;

mod verify;
pub use verify::verify;
pub use verify::Verifier;

mod provide_key;
pub use provide_key::*;

mod provide_credential;
pub use provide_credential::*;

mod client;
pub use client::SwiftClient;

mod scenario;
pub use scenario::ExpiredTempUrlScenario;
pub use scenario::ScenarioConfig;

pub mod data;
