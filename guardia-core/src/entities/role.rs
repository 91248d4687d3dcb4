use serde::{Deserialize, Serialize};

/// A named bundle of permissions, held by zero or more users.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Role {
    pub id_rol: i64,
    pub nombre_rol: String,
    pub descripcion: Option<String>,
    pub estado: bool,
}
