use serde::{Deserialize, Serialize};

/// Fixed validity window for issued tokens.
pub const TOKEN_VALIDITY_SECS: i64 = 2 * 60 * 60;

/// Claims embedded in an issued token.
///
/// `nombre_rol` is a snapshot taken at issuance and is not re-validated
/// against the directory on later requests; consumers must not trust it for
/// anything beyond display and audit tagging. `exp` is a unix timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub id_usuario: i64,
    pub usuario: String,
    pub nombre: String,
    pub nombre_rol: String,
    pub exp: i64,
}
