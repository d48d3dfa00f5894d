//! Capture an authorization code without managing an async runtime
//!
//! Required features: `blocking`
//!
//! Run with: cargo run --example 03_blocking_capture --features blocking

use spotify_auth::{ListenerConfig, Result, blocking};
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Spotify OAuth - Blocking Capture ===\n");

    let config = ListenerConfig::new().port(8080);

    println!("⏳ Blocking until the OAuth redirect arrives (2 minute limit)...");
    let result = blocking::capture(&config, Some(Duration::from_secs(120)))?;

    match result.code() {
        Some(code) => println!("✅ Captured authorization code: {code}"),
        None => println!("❌ Capture failed: {}", result.failure_reason().unwrap_or("unknown")),
    }

    Ok(())
}
