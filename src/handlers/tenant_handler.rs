//! Tenant administration handlers (staff only).

use actix_web::{web, HttpRequest, HttpResponse};
use mongodb::bson::oid::ObjectId;
use validator::Validate;

use crate::constants::{
    MSG_TENANT_CREATED, MSG_TENANT_DELETED, MSG_TENANT_FOUND, MSG_TENANT_UPDATED,
};
use crate::errors::ApiError;
use crate::handlers::current_user;
use crate::middleware::require_staff;
use crate::models::{
    ApiResponse, CreateTenantRequest, ListQuery, PaginatedResponse, TenantResponse,
    UpdateTenantRequest,
};
use crate::services::{TenantService, UserService};
use crate::validators::validation_errors_to_api_error;

/// List tenants
#[utoipa::path(
    get,
    path = "/api/v1/tenants/admin",
    tag = "Tenants",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)")
    ),
    responses(
        (status = 200, description = "List of tenants", body = crate::models::PaginatedResponse<TenantResponse>),
        (status = 403, description = "Staff only", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_tenants(
    req: HttpRequest,
    users: web::Data<UserService>,
    tenants: web::Data<TenantService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    require_staff(&caller)?;

    let page = query.page();
    let (items, total) = tenants.list(page).await?;
    let data: Vec<TenantResponse> = items.into_iter().map(TenantResponse::from).collect();
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(data, total, page)))
}

/// Create a tenant together with its default roles
#[utoipa::path(
    post,
    path = "/api/v1/tenants/admin",
    tag = "Tenants",
    request_body = CreateTenantRequest,
    responses(
        (status = 201, description = "Tenant created", body = TenantResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 403, description = "Staff only", body = crate::models::ErrorResponse),
        (status = 409, description = "Subdomain prefix taken", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_tenant(
    req: HttpRequest,
    users: web::Data<UserService>,
    tenants: web::Data<TenantService>,
    body: web::Json<CreateTenantRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    require_staff(&caller)?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let tenant = tenants.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        MSG_TENANT_CREATED,
        TenantResponse::from(tenant),
    )))
}

/// Get a tenant
#[utoipa::path(
    get,
    path = "/api/v1/tenants/admin/{id}",
    tag = "Tenants",
    params(("id" = String, Path, description = "Tenant ID")),
    responses(
        (status = 200, description = "Tenant found", body = TenantResponse),
        (status = 403, description = "Staff only", body = crate::models::ErrorResponse),
        (status = 404, description = "Tenant not found", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_tenant(
    req: HttpRequest,
    users: web::Data<UserService>,
    tenants: web::Data<TenantService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    require_staff(&caller)?;

    let tenant = tenants.get(ObjectId::parse_str(path.as_str())?).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MSG_TENANT_FOUND,
        TenantResponse::from(tenant),
    )))
}

/// Update a tenant's name, quota, cooldown or lock expiry
#[utoipa::path(
    put,
    path = "/api/v1/tenants/admin/{id}",
    tag = "Tenants",
    params(("id" = String, Path, description = "Tenant ID")),
    request_body = UpdateTenantRequest,
    responses(
        (status = 200, description = "Tenant updated", body = TenantResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 403, description = "Staff only", body = crate::models::ErrorResponse),
        (status = 404, description = "Tenant not found", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_tenant(
    req: HttpRequest,
    users: web::Data<UserService>,
    tenants: web::Data<TenantService>,
    path: web::Path<String>,
    body: web::Json<UpdateTenantRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    require_staff(&caller)?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let tenant = tenants
        .update(ObjectId::parse_str(path.as_str())?, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MSG_TENANT_UPDATED,
        TenantResponse::from(tenant),
    )))
}

/// Delete a tenant and everything it owns
#[utoipa::path(
    delete,
    path = "/api/v1/tenants/admin/{id}",
    tag = "Tenants",
    params(("id" = String, Path, description = "Tenant ID")),
    responses(
        (status = 200, description = "Tenant deleted"),
        (status = 403, description = "Staff only", body = crate::models::ErrorResponse),
        (status = 404, description = "Tenant not found", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_tenant(
    req: HttpRequest,
    users: web::Data<UserService>,
    tenants: web::Data<TenantService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    require_staff(&caller)?;

    tenants.delete(ObjectId::parse_str(path.as_str())?).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(MSG_TENANT_DELETED)))
}
