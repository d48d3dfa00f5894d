use crate::{Result, SpotifyAuthError};

/// Open a URL in the user's default web browser
///
/// Convenience function for opening the authorization URL from
/// [`start_flow`](crate::start_flow).
///
/// # Errors
///
/// Returns an error if the browser cannot be launched; callers should fall
/// back to printing the URL for the user to visit manually.
///
/// # Example
///
/// ```no_run
/// use spotify_auth::{FlowConfig, open_browser, start_flow};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let flow = start_flow(&FlowConfig::new("my-client-id"))?;
/// open_browser(&flow.authorization_url)?;
/// println!("Browser opened! Please authorize the application.");
/// # Ok(())
/// # }
/// ```
pub fn open_browser(url: &str) -> Result<()> {
    webbrowser::open(url)
        .map_err(|e| SpotifyAuthError::BrowserLaunch(format!("failed to open browser: {}", e)))
}
