use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use http::StatusCode;
use pretty_assertions::assert_eq;
use swiftsign_core::{Context, ProvideCredential, Signer, StaticEnv};
use swiftsign_swift::{
    AccountMetadataKeyProvider, Config, DefaultCredentialProvider, DefaultKeyProvider,
    RequestSigner, TempAuthCredentialProvider,
};

use crate::mock::{AUTH_URL, PASSWORD, STORAGE_URL, TOKEN, USER};
use crate::{mock_client, mock_context};

fn with_tempauth_env(ctx: Context) -> Context {
    ctx.with_env(StaticEnv {
        envs: HashMap::from([
            ("SWIFT_AUTH_URL".to_string(), AUTH_URL.to_string()),
            ("SWIFT_USER".to_string(), USER.to_string()),
            ("SWIFT_KEY".to_string(), PASSWORD.to_string()),
        ]),
    })
}

#[tokio::test]
async fn test_default_credential_provider_uses_tempauth() -> Result<()> {
    let (ctx, _, _) = mock_context();
    let ctx = with_tempauth_env(ctx);

    let cred = DefaultCredentialProvider::new()
        .provide_credential(&ctx)
        .await?
        .expect("credential must be loaded");
    assert_eq!(cred.storage_url, STORAGE_URL);
    assert_eq!(cred.auth_token, TOKEN);
    assert!(cred.expires_in.is_some());
    Ok(())
}

#[tokio::test]
async fn test_tempauth_wrong_password() -> Result<()> {
    let (ctx, _, _) = mock_context();
    let config = Config::new().with_temp_auth(AUTH_URL, USER, "wrong");

    let err = TempAuthCredentialProvider::new(Arc::new(config))
        .provide_credential(&ctx)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), swiftsign_core::ErrorKind::CredentialDenied);
    Ok(())
}

#[tokio::test]
async fn test_default_key_provider_reads_account_metadata() -> Result<()> {
    let (ctx, _, _) = mock_context();
    let ctx = with_tempauth_env(ctx);

    assert!(DefaultKeyProvider::new()
        .provide_credential(&ctx)
        .await?
        .is_none());

    mock_client(&ctx)
        .update_account_metadata(&[("Temp-URL-Key", "Meta")])
        .await?;
    let key = DefaultKeyProvider::new()
        .provide_credential(&ctx)
        .await?
        .expect("key must be loaded");
    assert_eq!(key.key, "Meta");
    Ok(())
}

#[tokio::test]
async fn test_signer_with_account_metadata_key() -> Result<()> {
    let (ctx, _, clock) = mock_context();
    let ctx = with_tempauth_env(ctx);
    let client = mock_client(&ctx);
    client
        .update_account_metadata(&[("Temp-URL-Key", "FromAccount")])
        .await?;
    client.create_container("cont").await?;
    client.create_object("cont", "obj", "hello").await?;

    let signer = Signer::new(
        ctx.clone(),
        AccountMetadataKeyProvider::new(DefaultCredentialProvider::new()),
        RequestSigner::new(),
    );
    let mut parts = http::Request::get(format!("{STORAGE_URL}/cont/obj"))
        .body(())?
        .into_parts()
        .0;
    signer.sign(&mut parts, Some(Duration::from_secs(5))).await?;

    let req = http::Request::get(parts.uri.clone()).body(bytes::Bytes::new())?;
    assert_eq!(ctx.http_send(req).await?.status(), StatusCode::OK);

    clock.advance(Duration::from_secs(6));
    let req = http::Request::get(parts.uri).body(bytes::Bytes::new())?;
    assert_eq!(ctx.http_send(req).await?.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
