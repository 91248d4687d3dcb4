use serde::{Deserialize, Serialize};

/// User↔role join row. No attributes beyond the pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRole {
    pub id_usuario: i64,
    pub id_rol: i64,
}

/// Role↔permission join row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RolePermission {
    pub id_rol: i64,
    pub id_permiso: i64,
}
