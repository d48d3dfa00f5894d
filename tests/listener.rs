//! End-to-end tests driving the callback listener over real loopback HTTP.

use std::time::Duration;

use anyhow::Result;
use spotify_auth::{
    CallbackListener, CaptureResult, ListenerConfig, MISSING_CODE_BODY, MISSING_CODE_REASON,
    SUCCESS_PAGE, SpotifyAuthError, TIMEOUT_REASON,
};

/// Bind on an OS-assigned port and return the listener plus its base URL.
async fn bind_ephemeral() -> (CallbackListener, String) {
    let config = ListenerConfig::new().port(0);
    let listener = CallbackListener::bind(&config)
        .await
        .expect("loopback bind");
    let base = format!("http://{}", listener.local_addr());
    (listener, base)
}

#[tokio::test]
async fn captures_code_and_serves_confirmation_page() -> Result<()> {
    let (listener, base) = bind_ephemeral().await;
    let capture = tokio::spawn(listener.capture(Some(Duration::from_secs(5))));

    let resp = reqwest::get(format!("{base}/callback?code=abc123&state=xyz")).await?;
    assert_eq!(resp.status(), 200);
    let content_type = resp.headers()["content-type"].to_str()?.to_string();
    assert!(content_type.starts_with("text/html"), "{content_type}");
    assert_eq!(resp.text().await?, SUCCESS_PAGE);

    let result = capture.await??;
    assert_eq!(
        result,
        CaptureResult::Success {
            code: "abc123".to_string()
        }
    );
    Ok(())
}

#[tokio::test]
async fn missing_code_is_a_400_and_a_failure_result() -> Result<()> {
    let (listener, base) = bind_ephemeral().await;
    let capture = tokio::spawn(listener.capture(Some(Duration::from_secs(5))));

    let resp = reqwest::get(format!("{base}/callback?state=xyz")).await?;
    assert_eq!(resp.status(), 400);
    assert_eq!(resp.text().await?, MISSING_CODE_BODY);

    let result = capture.await??;
    assert_eq!(result.failure_reason(), Some(MISSING_CODE_REASON));
    Ok(())
}

#[tokio::test]
async fn duplicate_code_params_keep_the_first() -> Result<()> {
    let (listener, base) = bind_ephemeral().await;
    let capture = tokio::spawn(listener.capture(Some(Duration::from_secs(5))));

    reqwest::get(format!("{base}/callback?code=a&code=b"))
        .await?
        .error_for_status()?;

    assert_eq!(capture.await??.code(), Some("a"));
    Ok(())
}

#[tokio::test]
async fn reserved_characters_decode_to_their_literals() -> Result<()> {
    let (listener, base) = bind_ephemeral().await;
    let capture = tokio::spawn(listener.capture(Some(Duration::from_secs(5))));

    reqwest::get(format!("{base}/callback?code=hello%20world"))
        .await?
        .error_for_status()?;

    assert_eq!(capture.await??.code(), Some("hello world"));
    Ok(())
}

#[tokio::test]
async fn any_path_is_accepted() -> Result<()> {
    let (listener, base) = bind_ephemeral().await;
    let capture = tokio::spawn(listener.capture(Some(Duration::from_secs(5))));

    let resp = reqwest::get(format!("{base}/some/deep/path?code=zzz")).await?;
    assert_eq!(resp.status(), 200);

    assert_eq!(capture.await??.code(), Some("zzz"));
    Ok(())
}

#[tokio::test]
async fn non_get_requests_are_not_terminal() -> Result<()> {
    let (listener, base) = bind_ephemeral().await;
    let capture = tokio::spawn(listener.capture(Some(Duration::from_secs(5))));

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/callback?code=ignored"))
        .send()
        .await?;
    assert_eq!(resp.status(), 405);

    // The listener is still waiting; a proper GET resolves it.
    reqwest::get(format!("{base}/callback?code=real"))
        .await?
        .error_for_status()?;

    assert_eq!(capture.await??.code(), Some("real"));
    Ok(())
}

#[tokio::test]
async fn duplicate_redirects_record_exactly_one_result() -> Result<()> {
    let (listener, base) = bind_ephemeral().await;
    let capture = tokio::spawn(listener.capture(Some(Duration::from_secs(5))));

    let first = reqwest::get(format!("{base}/callback?code=first"));
    let second = reqwest::get(format!("{base}/callback?code=second"));
    let (first, second) = tokio::join!(first, second);

    // The loser may race the shutdown and get its connection refused, but
    // any response that does come back is the same confirmation page.
    let mut served = 0;
    for resp in [first, second].into_iter().flatten() {
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.text().await?, SUCCESS_PAGE);
        served += 1;
    }
    assert!(served >= 1, "at least the winning redirect must be answered");

    // Exactly one capture, holding whichever redirect arrived first.
    let result = capture.await??;
    let code = result.code().expect("capture must succeed");
    assert!(code == "first" || code == "second", "unexpected code {code}");
    Ok(())
}

#[tokio::test]
async fn query_less_request_is_terminal_with_400() -> Result<()> {
    let (listener, base) = bind_ephemeral().await;
    let capture = tokio::spawn(listener.capture(Some(Duration::from_secs(5))));

    // A stray browser fetch with no query string at all.
    let resp = reqwest::get(format!("{base}/favicon.ico")).await?;
    assert_eq!(resp.status(), 400);
    assert_eq!(resp.text().await?, MISSING_CODE_BODY);

    let result = capture.await??;
    assert_eq!(result.failure_reason(), Some(MISSING_CODE_REASON));
    Ok(())
}

#[tokio::test]
async fn timeout_resolves_to_a_failure_and_releases_the_port() -> Result<()> {
    let (listener, _base) = bind_ephemeral().await;
    let addr = listener.local_addr();

    let result = listener.capture(Some(Duration::from_millis(50))).await?;
    assert_eq!(result.failure_reason(), Some(TIMEOUT_REASON));

    // The one-shot run has ended, so the port must be bindable again.
    tokio::net::TcpListener::bind(addr).await?;
    Ok(())
}

#[tokio::test]
async fn port_is_released_after_a_successful_capture() -> Result<()> {
    let (listener, base) = bind_ephemeral().await;
    let addr = listener.local_addr();
    let capture = tokio::spawn(listener.capture(Some(Duration::from_secs(5))));

    reqwest::get(format!("{base}/callback?code=done"))
        .await?
        .error_for_status()?;
    assert!(capture.await??.is_success());

    tokio::net::TcpListener::bind(addr).await?;
    Ok(())
}

#[tokio::test]
async fn bind_conflict_fails_fast() {
    let (listener, _base) = bind_ephemeral().await;
    let taken = listener.local_addr();

    let config = ListenerConfig::new()
        .bind_address(taken.ip().to_string())
        .port(taken.port());
    match CallbackListener::bind(&config).await {
        Err(SpotifyAuthError::Bind { addr, .. }) => assert_eq!(addr, taken.to_string()),
        other => panic!("expected bind error, got {:?}", other.map(|_| ())),
    }
}
