//! Full authorization flow: browser auto-opens and the local listener
//! captures the redirected code.
//!
//! The captured code and the PKCE verifier are what a token exchanger needs;
//! exchanging them is outside this crate.
//!
//! Required features: `browser` (default)
//!
//! Run with: SPOTIFY_CLIENT_ID=... cargo run --example 02_full_flow

use spotify_auth::{FlowConfig, ListenerConfig, Result, open_browser, run_callback_listener, start_flow};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Spotify OAuth - Automatic with Callback Listener ===\n");

    let client_id = std::env::var("SPOTIFY_CLIENT_ID").unwrap_or_else(|_| {
        eprintln!("SPOTIFY_CLIENT_ID not set; using a placeholder client id");
        "your-client-id".to_string()
    });

    let flow = start_flow(&FlowConfig::new(client_id).redirect_port(8080))?;

    println!("🌐 Opening browser and starting callback listener...");
    match open_browser(&flow.authorization_url) {
        Ok(_) => println!("✅ Browser opened! Waiting for authorization..."),
        Err(e) => {
            println!("⚠️  Could not open browser: {}", e);
            println!("Please manually visit: {}", flow.authorization_url);
        }
    }

    println!("\n⏳ Waiting for OAuth callback...");
    let config = ListenerConfig::new().port(8080);
    let result = run_callback_listener(&config, Some(Duration::from_secs(300))).await?;

    match result.code() {
        Some(code) => {
            println!("✅ Received authorization code!");
            println!(
                "Exchange it with PKCE verifier: {}...",
                &flow.pkce_verifier[..16.min(flow.pkce_verifier.len())]
            );
            let _ = code;
        }
        None => println!("❌ {}", result.failure_reason().unwrap_or("unknown failure")),
    }

    Ok(())
}
