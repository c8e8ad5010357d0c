use secrecy::SecretString;
use serde::Deserialize;

/// Key material used to verify session tokens on incoming requests.
#[derive(Debug, Deserialize)]
pub struct JwtSettings {
    pub secret: SecretString,
}

impl JwtSettings {
    pub fn new(secret: String) -> Self {
        Self {
            secret: SecretString::new(secret.into_boxed_str()),
        }
    }
}
