use secrecy::SecretString;
use serde::Deserialize;

/// Token signing configuration. The secret is loaded once at process start
/// and held immutably for the process lifetime; it is never re-derived per
/// request.
#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
#[readonly::make]
pub struct AuthSettings {
    pub jwt_secret: SecretString,
}

impl AuthSettings {
    pub fn new(jwt_secret: SecretString) -> Self {
        AuthSettings { jwt_secret }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        // Development fallback only; deployments override via
        // GUARDIA__AUTH__JWT_SECRET or config/local.yaml.
        AuthSettings::new(SecretString::from("mi_clave_ultra_segura"))
    }
}
