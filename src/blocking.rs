//! Blocking API for callers without an async runtime
//!
//! Drives the callback listener to completion on a private current-thread
//! tokio runtime, giving the plain `start(bind_address, port) -> CaptureResult`
//! shape interactive tools want.

use std::time::Duration;

use crate::{CallbackListener, CaptureResult, ListenerConfig, Result, SpotifyAuthError};

/// Bind the listener and block until one capture resolves
///
/// Blocking equivalent of [`run_callback_listener`](crate::run_callback_listener).
/// Must not be called from within an async runtime.
///
/// # Example
///
/// ```no_run
/// use spotify_auth::{ListenerConfig, blocking};
/// use std::time::Duration;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ListenerConfig::new().port(8080);
///     let result = blocking::capture(&config, Some(Duration::from_secs(120)))?;
///     match result.code() {
///         Some(code) => println!("captured {code}"),
///         None => eprintln!("no code captured"),
///     }
///     Ok(())
/// }
/// ```
pub fn capture(config: &ListenerConfig, timeout: Option<Duration>) -> Result<CaptureResult> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| SpotifyAuthError::CallbackServer(format!("failed to start runtime: {}", e)))?;

    runtime.block_on(async {
        let listener = CallbackListener::bind(config).await?;
        listener.capture(timeout).await
    })
}
