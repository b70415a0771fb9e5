use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Token-based HTTP auth for fetch and push.
///
/// Passed to git as `-c http.extraheader=...` so the token never lands in the
/// remote URL or in `.git/config`.
#[derive(Clone, Default)]
pub struct GitAuth {
    header: Option<String>,
}

impl std::fmt::Debug for GitAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitAuth")
            .field("token", &self.header.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl GitAuth {
    /// Build from a raw token. Empty tokens mean no auth.
    pub fn from_token(token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() {
            return Self::default();
        }
        let credentials = STANDARD.encode(format!("x-access-token:{}", token));
        Self {
            header: Some(format!("AUTHORIZATION: basic {}", credentials)),
        }
    }

    /// Read the token from the named environment variable, if set.
    pub fn from_env(var: &str) -> Self {
        match std::env::var(var) {
            Ok(token) => Self::from_token(&token),
            Err(_) => Self::default(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.header.is_some()
    }

    pub(crate) fn config_args(&self) -> Vec<String> {
        match &self.header {
            Some(header) => vec!["-c".to_string(), format!("http.extraheader={}", header)],
            None => Vec::new(),
        }
    }
}
