use std::time::Duration;

use anyhow::Result;
use pretty_assertions::assert_eq;
use swiftsign_core::{Clock, ErrorKind};
use swiftsign_swift::{ExpiredTempUrlScenario, ScenarioConfig};

use crate::{mock_client, mock_context};

#[tokio::test]
async fn test_expired_temp_url_is_denied() -> Result<()> {
    let (ctx, mock, clock) = mock_context();
    let started = clock.now().timestamp();

    ExpiredTempUrlScenario::new(mock_client(&ctx), ScenarioConfig::default())
        .execute()
        .await?;

    // The wait went through the manual clock.
    assert_eq!(clock.now().timestamp() - started, 2);
    assert_eq!(mock.temp_url_gets(), 1);
    // Cleanup removed everything setup created.
    assert!(mock.metadata().is_empty());
    assert!(mock.containers().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_setup_creates_resources() -> Result<()> {
    let (ctx, mock, _) = mock_context();
    let mut scenario = ExpiredTempUrlScenario::new(mock_client(&ctx), ScenarioConfig::default());

    scenario.setup().await?;

    assert_eq!(
        mock.metadata().get("x-account-meta-temp-url-key"),
        Some(&"Meta".to_string())
    );
    let object = scenario.object().expect("object must be created").to_string();
    assert!(object.starts_with("ObjectTemp-"));
    let content = mock
        .object(scenario.container(), &object)
        .expect("object must exist");
    assert_eq!(content.len(), object.len());
    assert_eq!(content, object.as_bytes());

    scenario.run().await?;
    scenario.cleanup().await;
    assert!(mock.containers().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_url_at_expiry_second_is_still_served() -> Result<()> {
    let (ctx, mock, _) = mock_context();
    let config = ScenarioConfig::default().with_wait(Duration::from_secs(1));

    let err = ExpiredTempUrlScenario::new(mock_client(&ctx), config)
        .execute()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert!(err.to_string().contains("was served"));
    assert!(mock.containers().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_custom_key_and_timing() -> Result<()> {
    let (ctx, mock, clock) = mock_context();
    let started = clock.now().timestamp();
    let config = ScenarioConfig::default()
        .with_key("another-secret")
        .with_expires_in(Duration::from_secs(30))
        .with_wait(Duration::from_secs(31));

    ExpiredTempUrlScenario::new(mock_client(&ctx), config)
        .execute()
        .await?;

    assert_eq!(clock.now().timestamp() - started, 31);
    assert!(mock.metadata().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_requires_tempurl_capability() -> Result<()> {
    let (ctx, mock, _) = mock_context();
    let ctx = ctx.with_http_send(mock.clone().without_tempurl());

    let err = ExpiredTempUrlScenario::new(mock_client(&ctx), ScenarioConfig::default())
        .execute()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(mock.containers().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_wrong_token_fails_setup() -> Result<()> {
    let (ctx, mock, _) = mock_context();
    let client = swiftsign_swift::SwiftClient::new(
        ctx,
        swiftsign_swift::Credential::new(crate::mock::STORAGE_URL, "AUTH_wrong"),
    );

    let err = ExpiredTempUrlScenario::new(client, ScenarioConfig::default())
        .execute()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialDenied);
    assert!(mock.containers().is_empty());
    Ok(())
}
