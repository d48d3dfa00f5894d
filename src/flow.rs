use url::Url;

use crate::types::{generate_pkce_pair, generate_random_state};
use crate::{AuthFlow, FlowConfig, Result};

/// Start a Spotify authorization flow
///
/// Generates a PKCE challenge and a CSRF state token and builds the
/// authorization URL the user should visit. Exchanging the captured code for
/// tokens is left to the caller's token exchanger, which needs the returned
/// `pkce_verifier`.
///
/// # Example
///
/// ```
/// use spotify_auth::{FlowConfig, start_flow};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = FlowConfig::new("my-client-id").redirect_port(8080);
/// let flow = start_flow(&config)?;
/// println!("Visit: {}", flow.authorization_url);
/// # Ok(())
/// # }
/// ```
pub fn start_flow(config: &FlowConfig) -> Result<AuthFlow> {
    let state = generate_random_state();
    let (pkce_challenge, pkce_verifier) = generate_pkce_pair();

    let mut url = Url::parse(&config.auth_url)?;
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &config.client_id)
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("scope", &config.scopes.join(" "))
        .append_pair("code_challenge", &pkce_challenge)
        .append_pair("code_challenge_method", "S256")
        .append_pair("state", &state);

    Ok(AuthFlow {
        authorization_url: url.to_string(),
        pkce_verifier,
        state,
    })
}
