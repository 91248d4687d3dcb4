use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use super::basic_auth::{identity, require_auth};
use super::handlers::audit::{append_audit_handler, get_audit_handler, list_audit_handler};
use super::handlers::login::{login_handler, verify_token_handler};
use super::handlers::modules::{
    create_module_handler, delete_module_handler, get_module_handler, list_modules_handler,
    update_module_handler,
};
use super::handlers::permissions::{
    create_permission_handler, delete_permission_handler, get_permission_handler,
    list_permissions_handler, update_permission_handler,
};
use super::handlers::role_permissions::{
    add_permission_to_role_handler, bulk_assign_permissions_handler,
    list_permissions_of_role_handler, remove_permission_from_role_handler,
};
use super::handlers::roles::{
    create_role_handler, delete_role_handler, get_role_handler, list_roles_handler,
    update_role_handler,
};
use super::handlers::user_roles::{
    add_role_to_user_handler, list_roles_of_user_handler, remove_role_from_user_handler,
};
use super::handlers::users::{
    create_user_handler, delete_user_handler, get_user_handler, list_users_handler,
    update_user_handler,
};
use crate::app_state::SharedAppState;

async fn landing_handler() -> &'static str {
    "API de Seguridad"
}

pub struct ApiRoutes;

impl ApiRoutes {
    pub fn create(state: SharedAppState) -> Router {
        // Every /api route carries the optional decoded identity; only
        // verificar-token additionally demands a valid token.
        let api_router = Router::new()
            .route(
                "/api/usuarios/verificar-token",
                get(verify_token_handler).route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_auth,
                )),
            )
            .route("/api/usuarios", get(list_users_handler).post(create_user_handler))
            .route(
                "/api/usuarios/{id}",
                get(get_user_handler)
                    .put(update_user_handler)
                    .delete(delete_user_handler),
            )
            .route("/api/roles", get(list_roles_handler).post(create_role_handler))
            .route(
                "/api/roles/{id}",
                get(get_role_handler)
                    .put(update_role_handler)
                    .delete(delete_role_handler),
            )
            .route(
                "/api/permisos",
                get(list_permissions_handler).post(create_permission_handler),
            )
            .route(
                "/api/permisos/{id}",
                get(get_permission_handler)
                    .put(update_permission_handler)
                    .delete(delete_permission_handler),
            )
            .route(
                "/api/modulos",
                get(list_modules_handler).post(create_module_handler),
            )
            .route(
                "/api/modulos/{id}",
                get(get_module_handler)
                    .put(update_module_handler)
                    .delete(delete_module_handler),
            )
            .route(
                "/api/usuarios_roles/usuarios/{id_usuario}/roles",
                get(list_roles_of_user_handler),
            )
            .route(
                "/api/usuarios_roles",
                post(add_role_to_user_handler).delete(remove_role_from_user_handler),
            )
            .route(
                "/api/roles_permisos/roles/{id_rol}/permisos",
                get(list_permissions_of_role_handler).put(bulk_assign_permissions_handler),
            )
            .route(
                "/api/roles_permisos/roles/permisos",
                post(add_permission_to_role_handler).delete(remove_permission_from_role_handler),
            )
            .route("/api/auditoria", get(list_audit_handler).post(append_audit_handler))
            .route("/api/auditoria/{id}", get(get_audit_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), identity));

        let public_router = Router::new()
            .route("/", get(landing_handler))
            .route("/api/usuarios/login", post(login_handler));

        Router::new()
            .merge(api_router)
            .merge(public_router)
            .with_state(state)
    }
}
