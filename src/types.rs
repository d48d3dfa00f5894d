use sha2::{Digest, Sha256};

/// Configuration for the local callback listener
///
/// The bind address and port are the entire configuration surface of the
/// listener; everything else about the capture is fixed protocol behavior.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Network interface to listen on (default: "127.0.0.1")
    pub bind_address: String,
    /// TCP port to listen on (default: 8080; use 0 for an OS-assigned port)
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ListenerConfig {
    /// Create a listener config with the default loopback address and port
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the network interface to listen on
    pub fn bind_address(mut self, bind_address: impl Into<String>) -> Self {
        self.bind_address = bind_address.into();
        self
    }

    /// Set the TCP port to listen on
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub(crate) fn addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Terminal outcome of the listener's one-shot capture
///
/// At most one `CaptureResult` is produced per listener lifetime. A missing
/// `code` parameter or an expired wait is a `Failure` handed back to the
/// caller, not an error that terminates the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureResult {
    /// A `code` query parameter was received; holds its decoded first value
    Success { code: String },
    /// No code was captured; holds a human-readable reason
    Failure { reason: String },
}

/// Failure reason when the redirect carried no `code` parameter
pub const MISSING_CODE_REASON: &str = "authorization code not found";

/// Failure reason when the caller-supplied wait expired
pub const TIMEOUT_REASON: &str = "timeout";

impl CaptureResult {
    /// The captured authorization code, if the capture succeeded
    pub fn code(&self) -> Option<&str> {
        match self {
            CaptureResult::Success { code } => Some(code),
            CaptureResult::Failure { .. } => None,
        }
    }

    /// The failure reason, if the capture failed
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            CaptureResult::Success { .. } => None,
            CaptureResult::Failure { reason } => Some(reason),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CaptureResult::Success { .. })
    }
}

/// Spotify OAuth authorization flow information
///
/// Contains the authorization URL the user should visit and the PKCE
/// verifier a token exchanger needs to redeem the captured code.
#[derive(Debug, Clone)]
pub struct AuthFlow {
    /// The URL the user should visit to authorize the application
    pub authorization_url: String,
    /// The PKCE verifier matching the challenge embedded in the URL
    pub pkce_verifier: String,
    /// The CSRF state token included in the URL
    pub state: String,
}

/// Configuration for building a Spotify authorization request
#[derive(Debug, Clone)]
pub struct FlowConfig {
    /// Spotify application client ID
    pub client_id: String,
    /// Authorization endpoint URL
    pub auth_url: String,
    /// Redirect URI registered for the application; should point at the
    /// address the callback listener is bound to
    pub redirect_uri: String,
    /// OAuth scopes to request
    pub scopes: Vec<String>,
}

/// Playback and library scopes used by the accompanying player application.
const DEFAULT_SCOPES: [&str; 5] = [
    "user-read-currently-playing",
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-library-modify",
    "user-library-read",
];

impl FlowConfig {
    /// Create a flow config for the given client ID with Spotify's
    /// authorization endpoint, the listener's default redirect URI, and the
    /// default scope set
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            auth_url: "https://accounts.spotify.com/authorize".to_string(),
            redirect_uri: "http://127.0.0.1:8080/callback".to_string(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Set the authorization endpoint URL
    pub fn auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.auth_url = auth_url.into();
        self
    }

    /// Set the redirect URI
    pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = redirect_uri.into();
        self
    }

    /// Set the redirect URI to the loopback callback listener on a custom port
    pub fn redirect_port(mut self, port: u16) -> Self {
        self.redirect_uri = format!("http://127.0.0.1:{}/callback", port);
        self
    }

    /// Replace the requested OAuth scopes
    pub fn scopes(mut self, scopes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }
}

/// Generate a random state string for CSRF protection
pub(crate) fn generate_random_state() -> String {
    use base64::{Engine as _, engine::general_purpose};
    use rand::Rng;

    let random_bytes: Vec<u8> = (0..32).map(|_| rand::thread_rng().r#gen()).collect();
    general_purpose::URL_SAFE_NO_PAD.encode(&random_bytes)
}

/// Generate a PKCE (challenge, verifier) pair using the S256 method
pub(crate) fn generate_pkce_pair() -> (String, String) {
    use base64::{Engine as _, engine::general_purpose};
    use rand::RngCore;

    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let verifier = general_purpose::URL_SAFE_NO_PAD.encode(bytes);
    let digest = Sha256::digest(verifier.as_bytes());
    let challenge = general_purpose::URL_SAFE_NO_PAD.encode(digest);
    (challenge, verifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine as _, engine::general_purpose};

    #[test]
    fn listener_config_defaults_to_loopback_8080() {
        let config = ListenerConfig::default();
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn listener_config_builder_overrides() {
        let config = ListenerConfig::new().bind_address("0.0.0.0").port(9090);
        assert_eq!(config.addr(), "0.0.0.0:9090");
    }

    #[test]
    fn capture_result_accessors() {
        let success = CaptureResult::Success {
            code: "abc".to_string(),
        };
        assert!(success.is_success());
        assert_eq!(success.code(), Some("abc"));
        assert_eq!(success.failure_reason(), None);

        let failure = CaptureResult::Failure {
            reason: MISSING_CODE_REASON.to_string(),
        };
        assert!(!failure.is_success());
        assert_eq!(failure.code(), None);
        assert_eq!(failure.failure_reason(), Some(MISSING_CODE_REASON));
    }

    #[test]
    fn pkce_challenge_is_s256_of_verifier() {
        let (challenge, verifier) = generate_pkce_pair();
        let digest = Sha256::digest(verifier.as_bytes());
        assert_eq!(challenge, general_purpose::URL_SAFE_NO_PAD.encode(digest));
    }

    #[test]
    fn state_is_url_safe_and_unique() {
        let a = generate_random_state();
        let b = generate_random_state();
        assert_ne!(a, b);
        assert!(general_purpose::URL_SAFE_NO_PAD.decode(&a).is_ok());
    }

    #[test]
    fn flow_config_redirect_port_points_at_loopback() {
        let config = FlowConfig::new("client").redirect_port(9090);
        assert_eq!(config.redirect_uri, "http://127.0.0.1:9090/callback");
    }
}
