use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use caresuite_domain::PermissionCatalog;
use serde_json::Value;
use tower::ServiceExt;

use super::build_router;
use crate::api_services::{RolePorts, build_app_state};
use crate::bootstrap_seed;
use crate::middleware::SUBJECT_HEADER;

async fn router() -> Router {
    let ports = RolePorts::in_memory(Arc::new(PermissionCatalog::clinic()));
    if let Err(error) = bootstrap_seed::run(&ports, "admin").await {
        panic!("failed to seed roles: {error}");
    }

    match build_router(build_app_state(&ports), "http://localhost:3000") {
        Ok(router) => router,
        Err(error) => panic!("failed to build router: {error}"),
    }
}

async fn send_json(router: Router, method: Method, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(SUBJECT_HEADER, "admin")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()));
    let Ok(request) = request else {
        panic!("failed to build request");
    };

    match router.oneshot(request).await {
        Ok(response) => response,
        Err(error) => match error {},
    }
}

async fn error_kind(response: Response) -> Value {
    let bytes = match to_bytes(response.into_body(), usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => panic!("failed to read response body: {error}"),
    };
    let body: Value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(error) => panic!("response body is not json: {error}"),
    };

    body["error"]["kind"].clone()
}

#[tokio::test]
async fn create_without_name_is_a_validation_error() {
    let response = send_json(
        router().await,
        Method::POST,
        "/api/roles",
        r#"{"description":"x","permissionIds":[]}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(response).await, "validation_error");
}

#[tokio::test]
async fn mistyped_permission_ids_are_a_validation_error() {
    let response = send_json(
        router().await,
        Method::POST,
        "/api/roles",
        r#"{"name":"Pharmacist","permissionIds":"bogus"}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(response).await, "validation_error");
}

#[tokio::test]
async fn assign_without_role_id_is_a_validation_error() {
    let response = send_json(router().await, Method::PUT, "/api/users/nina/role", "{}").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(response).await, "validation_error");
}

#[tokio::test]
async fn duplicate_active_name_is_a_bad_request() {
    let response = send_json(
        router().await,
        Method::POST,
        "/api/roles",
        r#"{"name":" doctor ","permissionIds":[]}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(response).await, "duplicate_name");
}
