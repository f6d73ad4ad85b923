use std::time::Duration;

use anyhow::Result;
use bytes::Bytes;
use http::StatusCode;
use pretty_assertions::assert_eq;
use swiftsign_core::{Context, SignRequest, Signer};
use swiftsign_swift::{
    compute_signed_url, Digest, RequestSigner, StaticKeyProvider, TempUrlKey,
};

use crate::mock::{BASE_PATH, STORAGE_URL};
use crate::{mock_client, mock_context, pinned_mock_context};

async fn prepare(ctx: &Context, key: &str) -> Result<()> {
    let client = mock_client(ctx);
    client.update_account_metadata(&[("Temp-URL-Key", key)]).await?;
    client.create_container("cont").await?;
    client.create_object("cont", "obj", "hello").await?;
    client.create_object("cont", "dir/a", "a").await?;
    client.create_object("cont", "dir/b", "b").await?;
    Ok(())
}

async fn get(ctx: &Context, uri: &http::Uri) -> Result<(StatusCode, Bytes)> {
    let req = http::Request::get(uri.clone()).body(Bytes::new())?;
    let resp = ctx.http_send(req).await?;
    Ok((resp.status(), resp.into_body()))
}

async fn presign(ctx: &Context, signer: RequestSigner, url: &str) -> Result<http::Uri> {
    let mut parts = http::Request::get(url).body(())?.into_parts().0;
    signer
        .sign_request(
            ctx,
            &mut parts,
            Some(&TempUrlKey::new("Meta")),
            Some(Duration::from_secs(60)),
        )
        .await?;
    Ok(parts.uri)
}

#[tokio::test]
async fn test_signed_url_until_expiry() -> Result<()> {
    let (ctx, _, clock) = mock_context();
    prepare(&ctx, "Meta").await?;

    let signer = Signer::new(ctx.clone(), StaticKeyProvider::new("Meta"), RequestSigner::new());
    let mut parts = http::Request::get(format!("{STORAGE_URL}/cont/obj"))
        .body(())?
        .into_parts()
        .0;
    signer.sign(&mut parts, Some(Duration::from_secs(1))).await?;

    let (status, body) = get(&ctx, &parts.uri).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Bytes::from_static(b"hello"));

    clock.advance(Duration::from_secs(1));
    assert_eq!(get(&ctx, &parts.uri).await?.0, StatusCode::OK);

    clock.advance(Duration::from_secs(1));
    assert_eq!(get(&ctx, &parts.uri).await?.0, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_compute_signed_url_against_mock() -> Result<()> {
    let (ctx, _, _) = pinned_mock_context();
    prepare(&ctx, "Meta").await?;
    let client = mock_client(&ctx);

    let url = compute_signed_url("GET", "cont", "obj", 1700000001, "Meta", BASE_PATH)?;
    assert_eq!(client.get(&url).await?, Bytes::from_static(b"hello"));

    let url = compute_signed_url("GET", "cont", "obj", 1700000001, "Wrong", BASE_PATH)?;
    assert!(client.get(&url).await.is_err());

    let url = compute_signed_url("GET", "cont", "obj", 1699999999, "Meta", BASE_PATH)?;
    assert!(client.get(&url).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_signer_options_against_mock() -> Result<()> {
    let (ctx, _, _) = mock_context();
    prepare(&ctx, "Meta").await?;

    for signer in [
        RequestSigner::new().with_digest(Digest::Sha1),
        RequestSigner::new().with_digest(Digest::Sha512),
        RequestSigner::new().with_iso8601(),
        RequestSigner::new().with_inline().with_filename("hello.txt"),
    ] {
        let uri = presign(&ctx, signer, &format!("{STORAGE_URL}/cont/obj")).await?;
        assert_eq!(get(&ctx, &uri).await?.0, StatusCode::OK, "{uri}");
    }
    Ok(())
}

#[tokio::test]
async fn test_prefix_url_covers_siblings() -> Result<()> {
    let (ctx, _, _) = mock_context();
    prepare(&ctx, "Meta").await?;

    let uri = presign(
        &ctx,
        RequestSigner::new().with_prefix("dir/"),
        &format!("{STORAGE_URL}/cont/dir/a"),
    )
    .await?;
    assert_eq!(get(&ctx, &uri).await?, (StatusCode::OK, Bytes::from_static(b"a")));

    let sibling: http::Uri = uri.to_string().replace("/dir/a?", "/dir/b?").parse()?;
    assert_eq!(
        get(&ctx, &sibling).await?,
        (StatusCode::OK, Bytes::from_static(b"b"))
    );

    let outside: http::Uri = uri.to_string().replace("/dir/a?", "/obj?").parse()?;
    assert_eq!(get(&ctx, &outside).await?.0, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_secondary_key_during_rotation() -> Result<()> {
    let (ctx, _, _) = mock_context();
    prepare(&ctx, "Old").await?;
    mock_client(&ctx)
        .update_account_metadata(&[("Temp-URL-Key-2", "Meta")])
        .await?;

    let uri = presign(&ctx, RequestSigner::new(), &format!("{STORAGE_URL}/cont/obj")).await?;
    assert_eq!(get(&ctx, &uri).await?.0, StatusCode::OK);

    mock_client(&ctx)
        .delete_account_metadata(&["Temp-URL-Key-2"])
        .await?;
    assert_eq!(get(&ctx, &uri).await?.0, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_tampered_url_is_denied() -> Result<()> {
    let (ctx, _, _) = mock_context();
    prepare(&ctx, "Meta").await?;

    let uri = presign(&ctx, RequestSigner::new(), &format!("{STORAGE_URL}/cont/obj")).await?;
    let query = uri.query().unwrap_or_default().to_string();
    let expires = query
        .split('&')
        .find_map(|kv| kv.strip_prefix("temp_url_expires="))
        .expect("expires must be present")
        .parse::<i64>()?;

    let tampered: http::Uri = uri
        .to_string()
        .replace(
            &format!("temp_url_expires={expires}"),
            &format!("temp_url_expires={}", expires + 3600),
        )
        .parse()?;
    assert_eq!(get(&ctx, &tampered).await?.0, StatusCode::UNAUTHORIZED);

    // PUT needs its own signature.
    let req = http::Request::put(uri.clone()).body(Bytes::from_static(b"x"))?;
    assert_eq!(ctx.http_send(req).await?.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
