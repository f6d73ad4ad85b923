//! Checks against a real Swift cluster.
//!
//! Enabled with `SWIFTSIGN_SWIFT_TEST=on`; credentials come from the usual
//! `SWIFT_*` variables, optionally through a `.env` file.

use std::env;
use std::time::Duration;

use anyhow::Result;
use log::warn;
use swiftsign_clock_tokio::TokioClock;
use swiftsign_core::{Context, OsEnv, ProvideCredential, Signer};
use swiftsign_http_send_reqwest::ReqwestHttpSend;
use swiftsign_swift::{
    DefaultCredentialProvider, ExpiredTempUrlScenario, RequestSigner, ScenarioConfig,
    StaticKeyProvider, SwiftClient,
};

async fn init_client() -> Option<SwiftClient> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("SWIFTSIGN_SWIFT_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
        .with_clock(TokioClock);
    let cred = DefaultCredentialProvider::new()
        .provide_credential(&ctx)
        .await
        .expect("load credential must succeed")
        .expect("SWIFT_STORAGE_URL/SWIFT_AUTH_TOKEN or TempAuth env must be set");

    Some(SwiftClient::new(ctx, cred))
}

#[tokio::test]
async fn test_live_expired_temp_url() -> Result<()> {
    let Some(client) = init_client().await else {
        warn!("SWIFTSIGN_SWIFT_TEST is not set, skipped");
        return Ok(());
    };

    ExpiredTempUrlScenario::new(client, ScenarioConfig::default())
        .execute()
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_live_fresh_temp_url() -> Result<()> {
    let Some(client) = init_client().await else {
        warn!("SWIFTSIGN_SWIFT_TEST is not set, skipped");
        return Ok(());
    };

    let container = swiftsign_swift::data::rand_name("TempUrlContainer");
    client
        .update_account_metadata(&[("Temp-URL-Key", "Meta")])
        .await?;
    client.create_container(&container).await?;
    client.create_object(&container, "obj", "hello").await?;

    let signer = Signer::new(
        client.context().clone(),
        StaticKeyProvider::new("Meta"),
        RequestSigner::new(),
    );
    let mut parts = http::Request::get(format!(
        "{}/{container}/obj",
        client.credential().storage_url
    ))
    .body(())?
    .into_parts()
    .0;
    signer.sign(&mut parts, Some(Duration::from_secs(300))).await?;

    let req = http::Request::get(parts.uri).body(bytes::Bytes::new())?;
    let resp = client.context().http_send(req).await;

    let _ = client.delete_object(&container, "obj").await;
    let _ = client.delete_container(&container).await;
    let _ = client.delete_account_metadata(&["Temp-URL-Key"]).await;

    assert_eq!(resp?.body().as_ref(), b"hello");
    Ok(())
}
