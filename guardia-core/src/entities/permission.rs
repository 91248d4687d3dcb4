use serde::{Deserialize, Serialize};

/// A named grant tied to one resource path within one application module.
///
/// `id_modulo` is a mandatory many-to-one reference; the directory rejects
/// permissions pointing at a module it does not know.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Permission {
    pub id_permiso: i64,
    pub nombre_permiso: String,
    pub descripcion: Option<String>,
    pub url_permiso: String,
    pub estado: bool,
    pub id_modulo: String,
}

/// Permission row enriched with the owning module's display name, as
/// returned by the role→permission→module join.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PermissionWithModule {
    pub id_permiso: i64,
    pub nombre_permiso: String,
    pub descripcion: Option<String>,
    pub url_permiso: String,
    pub estado: bool,
    pub nombre_modulo: String,
}

impl PermissionWithModule {
    pub fn new(permission: &Permission, nombre_modulo: &str) -> Self {
        Self {
            id_permiso: permission.id_permiso,
            nombre_permiso: permission.nombre_permiso.clone(),
            descripcion: permission.descripcion.clone(),
            url_permiso: permission.url_permiso.clone(),
            estado: permission.estado,
            nombre_modulo: nombre_modulo.to_string(),
        }
    }
}
