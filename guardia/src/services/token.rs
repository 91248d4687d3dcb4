use chrono::Utc;
use guardia_core::auth::{Claims, TOKEN_VALIDITY_SECS};
use guardia_core::entities::User;
use guardia_core::settings::auth::AuthSettings;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use tracing::debug;

use crate::api::error::AppError;

/// Issues and validates signed bearer tokens.
///
/// Keys are derived once from the process-wide signing secret; the service
/// is cheap to clone and holds no other state.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(settings: &AuthSettings) -> Self {
        let secret = settings.jwt_secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issues a token for the user with a 2 hour validity window. The role
    /// name is embedded as an issuance-time snapshot.
    pub fn issue(&self, user: &User, nombre_rol: &str) -> Result<String, AppError> {
        let claims = Claims {
            id_usuario: user.id_usuario,
            usuario: user.usuario.clone(),
            nombre: user.nombre.clone(),
            nombre_rol: nombre_rol.to_string(),
            exp: Utc::now().timestamp() + TOKEN_VALIDITY_SECS,
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        jsonwebtoken::encode(&Header::default(), claims, &self.encoding)
            .map_err(|e| AppError::InternalServerError(format!("failed to sign token: {e}")))
    }

    /// Verifies signature and expiry. Malformed, tampered and expired
    /// tokens all collapse into `InvalidToken` for the caller; the precise
    /// reason is only logged.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token rejected: {}", e);
                AppError::InvalidToken
            })
    }
}

/// Pulls the bearer credential out of an Authorization header value.
/// Accepts the value with or without the "Bearer " prefix; a missing or
/// empty header yields None (anonymous), never an error.
pub fn extract_bearer(headers: &axum::http::HeaderMap) -> Option<String> {
    let value = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> TokenService {
        TokenService::new(&AuthSettings::default())
    }

    fn test_user() -> User {
        User {
            id_usuario: 7,
            usuario: "jdoe".to_string(),
            contrasena: "$2b$04$irrelevant".to_string(),
            nombre: "Jane Doe".to_string(),
            estado: true,
        }
    }

    #[test]
    fn issue_then_decode_round_trips_claims() {
        let service = test_service();
        let token = service.issue(&test_user(), "admin").unwrap();
        let claims = service.decode(&token).unwrap();

        assert_eq!(claims.id_usuario, 7);
        assert_eq!(claims.usuario, "jdoe");
        assert_eq!(claims.nombre, "Jane Doe");
        assert_eq!(claims.nombre_rol, "admin");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn expired_token_is_rejected() {
        let service = test_service();
        let claims = Claims {
            id_usuario: 7,
            usuario: "jdoe".to_string(),
            nombre: "Jane Doe".to_string(),
            nombre_rol: "admin".to_string(),
            // Far enough in the past to defeat the default leeway.
            exp: Utc::now().timestamp() - TOKEN_VALIDITY_SECS,
        };
        let token = service.sign(&claims).unwrap();

        assert!(matches!(
            service.decode(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_and_foreign_signatures_are_rejected() {
        let service = test_service();
        assert!(matches!(
            service.decode("not-a-token"),
            Err(AppError::InvalidToken)
        ));

        let other = TokenService::new(&AuthSettings::new(secrecy::SecretString::from(
            "otra_clave",
        )));
        let token = other.issue(&test_user(), "admin").unwrap();
        assert!(matches!(
            service.decode(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn bearer_extraction_tolerates_absence_and_prefixes() {
        let mut headers = axum::http::HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(axum::http::header::AUTHORIZATION, "Bearer abc".parse().unwrap());
        assert_eq!(extract_bearer(&headers), Some("abc".to_string()));

        headers.insert(axum::http::header::AUTHORIZATION, "abc".parse().unwrap());
        assert_eq!(extract_bearer(&headers), Some("abc".to_string()));

        headers.insert(axum::http::header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(extract_bearer(&headers), None);
    }
}
