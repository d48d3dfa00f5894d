//! # spotify-auth
//!
//! A Rust library for capturing Spotify OAuth 2.0 authorization codes with a
//! one-shot local callback listener.
//!
//! After a user consents in the browser, the authorization server redirects
//! to a local URL carrying a `code` query parameter. This crate implements
//! the receiving end of that redirect: it binds a loopback port, waits for
//! exactly one qualifying request, shows the user a confirmation page, and
//! hands the captured code (or a failure reason) back to the caller. Token
//! exchange is deliberately out of scope; feed the captured code and the
//! PKCE verifier to your own exchanger.
//!
//! ## Features
//!
//! - **One-shot capture**: the listener stops accepting connections after the
//!   first terminal request and releases the port deterministically
//! - **Timeouts**: caller-supplied wait limit instead of blocking forever
//! - **PKCE Support**: S256 challenge generation and authorization URL building
//! - **Browser Integration** (`browser`, default): auto-open the
//!   authorization URL
//! - **Blocking API** (`blocking`, optional): capture without managing an
//!   async runtime
//!
//! ## Quick Start
//!
//! ```no_run
//! use spotify_auth::{FlowConfig, ListenerConfig, open_browser, run_callback_listener, start_flow};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let flow = start_flow(&FlowConfig::new("my-client-id").redirect_port(8080))?;
//!     open_browser(&flow.authorization_url)?;
//!
//!     let config = ListenerConfig::new().port(8080);
//!     let result = run_callback_listener(&config, Some(Duration::from_secs(120))).await?;
//!
//!     match result.code() {
//!         Some(code) => println!("Exchange {code} with verifier {}", flow.pkce_verifier),
//!         None => eprintln!("Capture failed: {:?}", result.failure_reason()),
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod flow;
mod server;
mod types;

#[cfg(feature = "blocking")]
pub mod blocking;

#[cfg(feature = "browser")]
mod browser;

// Public API exports
pub use error::{Result, SpotifyAuthError};
pub use flow::start_flow;
pub use server::{CallbackListener, MISSING_CODE_BODY, SUCCESS_PAGE, run_callback_listener};
pub use types::{
    AuthFlow, CaptureResult, FlowConfig, ListenerConfig, MISSING_CODE_REASON, TIMEOUT_REASON,
};

#[cfg(feature = "browser")]
pub use browser::open_browser;
