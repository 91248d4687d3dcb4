use axum_test::TestServer;
use guardia::api::router::ApiRoutes;
use guardia::app_state::{AppState, SharedAppState};
use guardia::settings::config::Settings;
use serde_json::{json, Value};

fn test_server() -> (TestServer, SharedAppState) {
    let state = AppState::with_settings(Settings::default());
    let server = TestServer::new(ApiRoutes::create(state.clone())).unwrap();
    (server, state)
}

/// Provisions module, permission, role and user over HTTP and returns the
/// ids the other requests need.
async fn provision(server: &TestServer) -> (i64, i64, i64) {
    let response = server
        .post("/api/modulos")
        .json(&json!({ "id_modulo": "seguridad", "nombre_modulo": "Seguridad", "estado": true }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let permission: Value = server
        .post("/api/permisos")
        .json(&json!({
            "nombre_permiso": "ver_usuarios",
            "url_permiso": "/usuarios",
            "id_modulo": "seguridad",
        }))
        .await
        .json();
    let id_permiso = permission["id_permiso"].as_i64().unwrap();

    let role: Value = server
        .post("/api/roles")
        .json(&json!({ "nombre_rol": "admin", "descripcion": "Administradores" }))
        .await
        .json();
    let id_rol = role["data"]["id_rol"].as_i64().unwrap();

    let user: Value = server
        .post("/api/usuarios")
        .json(&json!({
            "usuario": "jdoe",
            "contrasena": "s3creta",
            "nombre": "Jane Doe",
        }))
        .await
        .json();
    let id_usuario = user["id_usuario"].as_i64().unwrap();

    server
        .post("/api/usuarios_roles")
        .json(&json!({ "id_usuario": id_usuario, "id_rol": id_rol }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    (id_usuario, id_rol, id_permiso)
}

#[tokio::test]
async fn provisioning_bulk_assignment_and_login_round_trip() {
    let (server, state) = test_server();
    let (id_usuario, id_rol, id_permiso) = provision(&server).await;

    let response = server
        .put(&format!("/api/roles_permisos/roles/{id_rol}/permisos"))
        .json(&json!({ "permisos": [id_permiso] }))
        .await;
    response.assert_status_ok();
    response.assert_json_contains(&json!({ "success": true }));

    let login: Value = server
        .post("/api/usuarios/login")
        .json(&json!({
            "usuario": "jdoe",
            "contrasena": "s3creta",
            "id_modulo": "seguridad",
        }))
        .await
        .json();

    assert_eq!(login["usuario"]["id_usuario"].as_i64(), Some(id_usuario));
    let permisos = login["permisos"].as_array().unwrap();
    assert_eq!(permisos.len(), 1);
    assert_eq!(permisos[0]["nombre_permiso"], "ver_usuarios");

    // The join listing carries the owning module's display name.
    let granted: Value = server
        .get(&format!("/api/roles_permisos/roles/{id_rol}/permisos"))
        .await
        .json();
    assert_eq!(granted[0]["nombre_modulo"], "Seguridad");

    // The issued token passes verification; its claims match the user.
    let token = login["token"].as_str().unwrap();
    let verified: Value = server
        .get("/api/usuarios/verificar-token")
        .authorization_bearer(token)
        .await
        .json();
    assert_eq!(verified["usuario"]["usuario"], "jdoe");
    assert_eq!(verified["usuario"]["nombre_rol"], "admin");

    let claims = state.tokens.decode(token).unwrap();
    assert_eq!(claims.id_usuario, id_usuario);
}

#[tokio::test]
async fn verify_token_requires_a_valid_credential() {
    let (server, _state) = test_server();

    server
        .get("/api/usuarios/verificar-token")
        .await
        .assert_status(axum::http::StatusCode::UNAUTHORIZED);

    server
        .get("/api/usuarios/verificar-token")
        .authorization_bearer("no-es-un-token")
        .await
        .assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn failed_login_is_unauthorized_and_leaves_no_trace() {
    let (server, state) = test_server();
    provision(&server).await;
    let audit_before = state.audit.list_all().await.len();

    let response = server
        .post("/api/usuarios/login")
        .json(&json!({
            "usuario": "jdoe",
            "contrasena": "equivocada",
            "id_modulo": "seguridad",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
    assert!(response.text().contains("Invalid username or password"));

    // No LOGIN record for a rejected attempt.
    assert_eq!(state.audit.list_all().await.len(), audit_before);
}

#[tokio::test]
async fn authenticated_reads_tag_the_audit_trail_with_the_actor() {
    let (server, state) = test_server();
    let (id_usuario, id_rol, id_permiso) = provision(&server).await;
    server
        .put(&format!("/api/roles_permisos/roles/{id_rol}/permisos"))
        .json(&json!({ "permisos": [id_permiso] }))
        .await
        .assert_status_ok();

    let login: Value = server
        .post("/api/usuarios/login")
        .json(&json!({
            "usuario": "jdoe",
            "contrasena": "s3creta",
            "id_modulo": "seguridad",
        }))
        .await
        .json();
    let token = login["token"].as_str().unwrap();

    server
        .get("/api/roles")
        .authorization_bearer(token)
        .await
        .assert_status_ok();

    // Newest first: the roles read leads, tagged with the acting user.
    let records: Value = server.get("/api/auditoria").await.json();
    let newest = &records.as_array().unwrap()[0];
    assert_eq!(newest["accion"], "SELECT");
    assert_eq!(newest["tabla"], "roles");
    assert_eq!(newest["id_usuario"].as_i64(), Some(id_usuario));
    assert_eq!(newest["nombre_rol"], "admin");

    // The same read without a token is attributed to the system actor.
    server.get("/api/roles").await.assert_status_ok();
    let records: Value = server.get("/api/auditoria").await.json();
    let newest = &records.as_array().unwrap()[0];
    assert_eq!(newest["nombre_rol"], "Sistema");
    assert!(newest["id_usuario"].is_null());
}

#[tokio::test]
async fn bulk_assignment_failure_leaves_the_prior_set_intact() {
    let (server, _state) = test_server();
    let (_, id_rol, id_permiso) = provision(&server).await;
    server
        .put(&format!("/api/roles_permisos/roles/{id_rol}/permisos"))
        .json(&json!({ "permisos": [id_permiso] }))
        .await
        .assert_status_ok();

    let before: Value = server
        .get(&format!("/api/roles_permisos/roles/{id_rol}/permisos"))
        .await
        .json();

    server
        .put(&format!("/api/roles_permisos/roles/{id_rol}/permisos"))
        .json(&json!({ "permisos": [id_permiso, 999] }))
        .await
        .assert_status(axum::http::StatusCode::NOT_FOUND);

    let after: Value = server
        .get(&format!("/api/roles_permisos/roles/{id_rol}/permisos"))
        .await
        .json();
    assert_eq!(before, after);
}

#[tokio::test]
async fn sibling_modules_can_append_audit_records() {
    let (server, _state) = test_server();

    server
        .post("/api/auditoria")
        .json(&json!({
            "accion": "INSERT",
            "modulo": "inventario",
            "tabla": "productos",
            "id_usuario": 42,
            "details": { "id_producto": 7 },
            "nombre_rol": "bodeguero",
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let records: Value = server.get("/api/auditoria").await.json();
    let newest = &records.as_array().unwrap()[0];
    assert_eq!(newest["modulo"], "inventario");
    assert_eq!(newest["nombre_rol"], "bodeguero");

    let id = newest["id"].as_i64().unwrap();
    let fetched: Value = server.get(&format!("/api/auditoria/{id}")).await.json();
    assert_eq!(&fetched, newest);

    server
        .get("/api/auditoria/99999")
        .await
        .assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_responses_never_leak_the_password_hash() {
    let (server, _state) = test_server();
    provision(&server).await;

    let users: Value = server.get("/api/usuarios").await.json();
    let user = &users.as_array().unwrap()[0];
    assert!(user.get("contrasena").is_none());

    // Neither do the audit payloads of user mutations.
    let records: Value = server.get("/api/auditoria").await.json();
    let insert = records
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["accion"] == "INSERT" && r["tabla"] == "usuarios")
        .unwrap();
    assert!(insert["details"].get("contrasena").is_none());
}
