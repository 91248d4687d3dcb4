use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use guardia_core::auth::Claims;
use serde::Serialize;
use tracing::debug;

use crate::api::error::AppError;
use crate::app_state::SharedAppState;
use crate::services::token::extract_bearer;

/// Identity decoded from the request's bearer token.
#[derive(Clone, Debug, Serialize)]
pub struct CurrentUser {
    pub id_usuario: i64,
    pub usuario: String,
    pub nombre: String,
    pub nombre_rol: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        CurrentUser {
            id_usuario: claims.id_usuario,
            usuario: claims.usuario,
            nombre: claims.nombre,
            nombre_rol: claims.nombre_rol,
        }
    }
}

/// Acting identity attached to every API request. `None` means anonymous;
/// audit entries then carry the "Sistema" actor.
#[derive(Clone, Debug, Default)]
pub struct Identity(pub Option<CurrentUser>);

impl Identity {
    pub fn user_id(&self) -> Option<i64> {
        self.0.as_ref().map(|u| u.id_usuario)
    }

    pub fn role_name(&self) -> String {
        self.0
            .as_ref()
            .map(|u| u.nombre_rol.clone())
            .unwrap_or_else(|| "Sistema".to_string())
    }

    pub fn login_name(&self) -> String {
        self.0
            .as_ref()
            .map(|u| u.usuario.clone())
            .unwrap_or_else(|| "Sin usuario autenticado".to_string())
    }
}

/// Decodes the optional bearer token and stores the result as a request
/// extension. A missing, malformed or expired token degrades to anonymous
/// here; routes that require authentication layer `require_auth` on top.
pub async fn identity(State(state): State<SharedAppState>, mut req: Request, next: Next) -> Response {
    let identity = match extract_bearer(req.headers()) {
        Some(token) => match state.tokens.decode(&token) {
            Ok(claims) => Identity(Some(claims.into())),
            Err(_) => {
                debug!("Ignoring invalid bearer token on an anonymous-tolerant route");
                Identity(None)
            }
        },
        None => Identity(None),
    };

    req.extensions_mut().insert(identity);
    next.run(req).await
}

/// Rejects requests without a valid token: absent → Unauthorized, present
/// but not decodable → InvalidToken.
pub async fn require_auth(
    State(state): State<SharedAppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer(req.headers()).ok_or(AppError::Unauthorized)?;
    let claims = state.tokens.decode(&token)?;

    let user: CurrentUser = claims.into();
    debug!("Authenticated request from '{}'", user.usuario);
    req.extensions_mut().insert(Identity(Some(user.clone())));
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
