use axum::{
    Router,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use url::form_urlencoded;

use crate::types::{MISSING_CODE_REASON, TIMEOUT_REASON};
use crate::{CaptureResult, ListenerConfig, Result, SpotifyAuthError};

/// Exact success page served to the browser. Kept byte-for-byte stable for
/// integrations that match on it.
pub const SUCCESS_PAGE: &str = "<html><body><h1>Authorization code received</h1></body></html>";

/// Body of the 400 response when the redirect carries no `code` parameter
pub const MISSING_CODE_BODY: &str = "Authorization code not found in the request";

struct ListenerState {
    tx: tokio::sync::Mutex<Option<oneshot::Sender<CaptureResult>>>,
}

/// One-shot local listener for the OAuth redirect
///
/// Binds a local TCP port and waits for the browser redirect that carries the
/// authorization code. The listener serves exactly one meaningful request:
/// the first GET with a parseable query string resolves the capture, after
/// which the server stops accepting connections and the port is released.
///
/// # Example
///
/// ```no_run
/// use spotify_auth::{CallbackListener, ListenerConfig};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let listener = CallbackListener::bind(&ListenerConfig::default()).await?;
/// let result = listener.capture(Some(Duration::from_secs(120))).await?;
/// match result.code() {
///     Some(code) => println!("captured {code}"),
///     None => eprintln!("no code: {:?}", result.failure_reason()),
/// }
/// # Ok(())
/// # }
/// ```
pub struct CallbackListener {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl CallbackListener {
    /// Bind the listening socket
    ///
    /// Prints the `Server started at http://<addr>` notice once the socket is
    /// bound and before any request is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`SpotifyAuthError::Bind`] if the socket cannot be created,
    /// for example when the port is already in use. No notice is emitted in
    /// that case.
    pub async fn bind(config: &ListenerConfig) -> Result<Self> {
        let addr = config.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| SpotifyAuthError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| SpotifyAuthError::Bind { addr, source })?;
        println!("Server started at http://{}", local_addr);
        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// The address the socket is actually bound to
    ///
    /// Useful when the config requested port 0 and the OS picked one.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until the first terminal request, then shut down
    ///
    /// Blocks until a GET request with a parseable query string arrives, the
    /// response to it is flushed, and the socket is closed. Both outcomes of
    /// that request are terminal: a present `code` resolves to
    /// [`CaptureResult::Success`], an absent one to a 400 response and
    /// [`CaptureResult::Failure`]. Requests with other methods are answered
    /// with 405 and do not resolve the capture.
    ///
    /// With `timeout` set, expiry resolves to `Failure("timeout")` instead of
    /// blocking forever; `None` waits indefinitely. The port is released on
    /// every exit path, including timeout.
    pub async fn capture(self, timeout: Option<Duration>) -> Result<CaptureResult> {
        let (tx, rx) = oneshot::channel();
        let state = Arc::new(ListenerState {
            tx: tokio::sync::Mutex::new(Some(tx)),
        });

        // Any path is accepted; only the query string is inspected.
        let app = Router::new()
            .route("/", get(handle_redirect))
            .route("/{*path}", get(handle_redirect))
            .with_state(state);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let serve = axum::serve(self.listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        let server = tokio::spawn(async move { serve.await });

        let result = match timeout {
            Some(limit) => match tokio::time::timeout(limit, rx).await {
                Ok(received) => received.map_err(channel_closed),
                Err(_) => Ok(CaptureResult::Failure {
                    reason: TIMEOUT_REASON.to_string(),
                }),
            },
            None => rx.await.map_err(channel_closed),
        };

        // Stop accepting, let the in-flight response flush, release the port.
        let _ = shutdown_tx.send(());
        let _ = server.await;

        result
    }
}

fn channel_closed(_: oneshot::error::RecvError) -> SpotifyAuthError {
    SpotifyAuthError::CallbackServer("server shut down unexpectedly".to_string())
}

/// Bind a listener and wait for one capture
///
/// Convenience wrapper around [`CallbackListener::bind`] followed by
/// [`CallbackListener::capture`].
///
/// # Example
///
/// ```no_run
/// use spotify_auth::{ListenerConfig, run_callback_listener};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ListenerConfig::new().port(8080);
/// let result = run_callback_listener(&config, Some(Duration::from_secs(120))).await?;
/// if let Some(code) = result.code() {
///     println!("Authorization code captured: {code}");
/// }
/// # Ok(())
/// # }
/// ```
pub async fn run_callback_listener(
    config: &ListenerConfig,
    timeout: Option<Duration>,
) -> Result<CaptureResult> {
    CallbackListener::bind(config).await?.capture(timeout).await
}

async fn handle_redirect(
    State(state): State<Arc<ListenerState>>,
    RawQuery(query): RawQuery,
) -> Response {
    match query.as_deref().and_then(first_code) {
        Some(code) => {
            // First terminal request wins; later ones still get a page but
            // never overwrite the result or print.
            if let Some(tx) = state.tx.lock().await.take() {
                println!("Authorization code: {}", code);
                let _ = tx.send(CaptureResult::Success { code });
            }
            (StatusCode::OK, Html(SUCCESS_PAGE)).into_response()
        }
        None => {
            if let Some(tx) = state.tx.lock().await.take() {
                let _ = tx.send(CaptureResult::Failure {
                    reason: MISSING_CODE_REASON.to_string(),
                });
            }
            (StatusCode::BAD_REQUEST, MISSING_CODE_BODY).into_response()
        }
    }
}

/// Extract the first non-empty `code` value from a raw query string
///
/// Standard URL-query decoding: `&`-separated pairs, `=`-separated key/value,
/// percent-decoding, `+` as space. Unparseable fragments are skipped rather
/// than rejecting the whole query. An empty value counts as absent.
fn first_code(query: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, value)| key.as_ref() == "code" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}
