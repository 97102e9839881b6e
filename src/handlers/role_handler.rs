//! Role management handlers.

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::constants::{
    MSG_ROLES, MSG_ROLE_CREATED, MSG_ROLE_DELETED, MSG_ROLE_FOUND, MSG_ROLE_UPDATED,
};
use crate::errors::ApiError;
use crate::handlers::current_user;
use crate::models::{ApiResponse, CreateRoleRequest, RoleResponse, UpdateRoleRequest};
use crate::services::{RoleService, UserService};
use crate::validators::validation_errors_to_api_error;

/// List the roles of the caller's tenant
#[utoipa::path(
    get,
    path = "/api/v1/roles",
    tag = "Roles",
    responses(
        (status = 200, description = "Roles", body = [RoleResponse]),
        (status = 401, description = "Missing view_role", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_roles(
    req: HttpRequest,
    users: web::Data<UserService>,
    roles: web::Data<RoleService>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    let data: Vec<RoleResponse> = roles
        .list(&caller)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_ROLES, data)))
}

/// Get a role
#[utoipa::path(
    get,
    path = "/api/v1/roles/{id}",
    tag = "Roles",
    params(("id" = String, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role found", body = RoleResponse),
        (status = 401, description = "Missing view_role", body = crate::models::ErrorResponse),
        (status = 404, description = "Role not found", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_role(
    req: HttpRequest,
    users: web::Data<UserService>,
    roles: web::Data<RoleService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    let role = roles.get(&caller, &path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_ROLE_FOUND, RoleResponse::from(role))))
}

/// Create a role from a comma separated permission list
#[utoipa::path(
    post,
    path = "/api/v1/roles",
    tag = "Roles",
    request_body = CreateRoleRequest,
    responses(
        (status = 201, description = "Role created", body = RoleResponse),
        (status = 400, description = "Unknown permission or role exists", body = crate::models::ErrorResponse),
        (status = 401, description = "Missing add_role", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_role(
    req: HttpRequest,
    users: web::Data<UserService>,
    roles: web::Data<RoleService>,
    body: web::Json<CreateRoleRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let role = roles.create(&caller, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        MSG_ROLE_CREATED,
        RoleResponse::from(role),
    )))
}

/// Replace a role's permissions
#[utoipa::path(
    put,
    path = "/api/v1/roles/{id}",
    tag = "Roles",
    params(("id" = String, Path, description = "Role ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = RoleResponse),
        (status = 400, description = "Admin role or unknown permission", body = crate::models::ErrorResponse),
        (status = 401, description = "Missing change_role", body = crate::models::ErrorResponse),
        (status = 404, description = "Role not found", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_role_permissions(
    req: HttpRequest,
    users: web::Data<UserService>,
    roles: web::Data<RoleService>,
    path: web::Path<String>,
    body: web::Json<UpdateRoleRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    let role = roles.update(&caller, &path, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MSG_ROLE_UPDATED,
        RoleResponse::from(role),
    )))
}

/// Delete a custom role
#[utoipa::path(
    delete,
    path = "/api/v1/roles/{id}",
    tag = "Roles",
    params(("id" = String, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role deleted"),
        (status = 400, description = "Default roles cannot be deleted", body = crate::models::ErrorResponse),
        (status = 401, description = "Missing delete_role", body = crate::models::ErrorResponse),
        (status = 404, description = "Role not found", body = crate::models::ErrorResponse),
        (status = 409, description = "Role still assigned", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_role(
    req: HttpRequest,
    users: web::Data<UserService>,
    roles: web::Data<RoleService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    roles.delete(&caller, &path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(MSG_ROLE_DELETED)))
}
