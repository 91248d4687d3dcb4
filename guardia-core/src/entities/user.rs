use serde::{Deserialize, Serialize};

/// A principal of the security module.
///
/// Field names follow the wire contract of the wider application
/// (`usuarios` table). The bcrypt hash in `contrasena` is deserialized from
/// storage snapshots but never serialized back out, so neither API responses
/// nor audit payloads carry it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id_usuario: i64,
    pub usuario: String,
    #[serde(skip_serializing, default)]
    pub contrasena: String,
    pub nombre: String,
    pub estado: bool,
}

/// The slice of a user that login hands back next to the token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id_usuario: i64,
    pub usuario: String,
    pub nombre: String,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id_usuario: self.id_usuario,
            usuario: self.usuario.clone(),
            nombre: self.nombre.clone(),
        }
    }
}
