use serde::{Deserialize, Serialize};

/// An independent application surface (e.g. "seguridad") that scopes which
/// permissions are relevant to it. Identifiers are assigned by the caller,
/// not generated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Module {
    pub id_modulo: String,
    pub nombre_modulo: String,
    pub estado: bool,
}
