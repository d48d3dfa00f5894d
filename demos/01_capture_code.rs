//! Wait for an authorization code on the default loopback listener
//!
//! Start this, then simulate the browser redirect with:
//!
//!   curl "http://127.0.0.1:8080/callback?code=abc123"
//!
//! Run with: cargo run --example 01_capture_code

use spotify_auth::{ListenerConfig, Result, run_callback_listener};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Spotify OAuth - Callback Capture ===\n");

    let config = ListenerConfig::new().port(8080);

    println!("⏳ Waiting up to 2 minutes for the OAuth redirect...");
    let result = run_callback_listener(&config, Some(Duration::from_secs(120))).await?;

    match result.code() {
        Some(code) => println!("✅ Captured authorization code: {code}"),
        None => println!("❌ Capture failed: {}", result.failure_reason().unwrap_or("unknown")),
    }

    Ok(())
}
