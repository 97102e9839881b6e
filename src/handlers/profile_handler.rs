//! User profile handlers: listing, creation, updates, role and manager
//! assignment, and profile notes.

use actix_web::{web, HttpRequest, HttpResponse};
use log::debug;
use validator::Validate;

use crate::constants::{
    MSG_MANAGER_ASSIGNED, MSG_NOTE_ADDED, MSG_PASSWORD_UPDATED, MSG_ROLE_ASSIGNED,
    MSG_USER_CREATED, MSG_USER_FOUND, MSG_USER_PROFILE_RETRIEVED, MSG_USER_UPDATED,
};
use crate::errors::ApiError;
use crate::handlers::current_user;
use crate::models::{
    AddNoteRequest, ApiResponse, AssignManagerRequest, AssignRoleRequest, ChangePasswordRequest,
    CreateProfileRequest, ListQuery, PaginatedResponse, UpdateProfileRequest, UserNoteResponse,
    UserResponse,
};
use crate::services::UserService;
use crate::validators::validation_errors_to_api_error;

/// Get the currently authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/v1/profiles/profile/me",
    tag = "Profiles",
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    req: HttpRequest,
    users: web::Data<UserService>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MSG_USER_PROFILE_RETRIEVED,
        UserResponse::from(caller.profile),
    )))
}

/// List profiles of the caller's tenant
///
/// Managers only see the users assigned to them.
#[utoipa::path(
    get,
    path = "/api/v1/profiles/profile",
    tag = "Profiles",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)"),
        ("search" = Option<String>, Query, description = "Search by email, first or last name")
    ),
    responses(
        (status = 200, description = "List of profiles", body = crate::models::PaginatedResponse<UserResponse>),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 404, description = "Not permitted", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_profiles(
    req: HttpRequest,
    users: web::Data<UserService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    let page = query.page();
    let (data, total) = users.list_profiles(&caller, page, query.search()).await?;
    debug!("Returning {} of {} profiles", data.len(), total);
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(data, total, page)))
}

/// Create a user in the caller's tenant (staff only)
#[utoipa::path(
    post,
    path = "/api/v1/profiles/profile",
    tag = "Profiles",
    request_body = CreateProfileRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error or email in use", body = crate::models::ErrorResponse),
        (status = 401, description = "Staff only", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_profile(
    req: HttpRequest,
    users: web::Data<UserService>,
    body: web::Json<CreateProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let profile = users.create_profile(&caller, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        MSG_USER_CREATED,
        UserResponse::from(profile),
    )))
}

/// Get a profile
#[utoipa::path(
    get,
    path = "/api/v1/profiles/profile/{id}",
    tag = "Profiles",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 404, description = "User not found or not permitted", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    req: HttpRequest,
    users: web::Data<UserService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    let profile = users.get_profile(&caller, &path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MSG_USER_FOUND,
        UserResponse::from(profile),
    )))
}

/// Update a profile (staff or self)
#[utoipa::path(
    put,
    path = "/api/v1/profiles/profile/{id}",
    tag = "Profiles",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error or email in use", body = crate::models::ErrorResponse),
        (status = 404, description = "User not found or not permitted", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    req: HttpRequest,
    users: web::Data<UserService>,
    path: web::Path<String>,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let profile = users
        .update_profile(&caller, &path, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MSG_USER_UPDATED,
        UserResponse::from(profile),
    )))
}

/// Change a user's password (staff or self)
#[utoipa::path(
    patch,
    path = "/api/v1/profiles/profile/{id}/update_password",
    tag = "Profiles",
    params(("id" = String, Path, description = "User ID")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 202, description = "Password updated"),
        (status = 400, description = "Wrong old password, mismatch or weak password", body = crate::models::ErrorResponse),
        (status = 404, description = "User not found or not permitted", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_password(
    req: HttpRequest,
    users: web::Data<UserService>,
    path: web::Path<String>,
    body: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    body.validate().map_err(validation_errors_to_api_error)?;

    users
        .update_password(&caller, &path, body.into_inner())
        .await?;
    Ok(HttpResponse::Accepted().json(ApiResponse::<()>::message(MSG_PASSWORD_UPDATED)))
}

/// Assign a role by name
#[utoipa::path(
    patch,
    path = "/api/v1/profiles/profile/{id}/update_role",
    tag = "Profiles",
    params(("id" = String, Path, description = "User ID")),
    request_body = AssignRoleRequest,
    responses(
        (status = 202, description = "Role updated"),
        (status = 404, description = "User or role not found, or not permitted", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_role(
    req: HttpRequest,
    users: web::Data<UserService>,
    path: web::Path<String>,
    body: web::Json<AssignRoleRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    body.validate().map_err(validation_errors_to_api_error)?;

    users.update_role(&caller, &path, body.into_inner()).await?;
    Ok(HttpResponse::Accepted().json(ApiResponse::<()>::message(MSG_ROLE_ASSIGNED)))
}

/// Put a sales user under a manager
#[utoipa::path(
    patch,
    path = "/api/v1/profiles/profile/{id}/assign_manager",
    tag = "Profiles",
    params(("id" = String, Path, description = "User ID")),
    request_body = AssignManagerRequest,
    responses(
        (status = 202, description = "Manager assigned"),
        (status = 400, description = "Manager or subordinate has the wrong role", body = crate::models::ErrorResponse),
        (status = 404, description = "User not found or not permitted", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn assign_manager(
    req: HttpRequest,
    users: web::Data<UserService>,
    path: web::Path<String>,
    body: web::Json<AssignManagerRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    users
        .assign_manager(&caller, &path, body.into_inner())
        .await?;
    Ok(HttpResponse::Accepted().json(ApiResponse::<()>::message(MSG_MANAGER_ASSIGNED)))
}

/// Notes written about a user, newest first
#[utoipa::path(
    get,
    path = "/api/v1/profiles/profile/{id}/get_notes",
    tag = "Profiles",
    params(
        ("id" = String, Path, description = "User ID"),
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)")
    ),
    responses(
        (status = 200, description = "Notes", body = crate::models::PaginatedResponse<UserNoteResponse>),
        (status = 404, description = "User not found or not permitted", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_notes(
    req: HttpRequest,
    users: web::Data<UserService>,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    let page = query.page();
    let (data, total) = users.get_notes(&caller, &path, page).await?;
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(data, total, page)))
}

/// Add a note about a user
#[utoipa::path(
    post,
    path = "/api/v1/profiles/profile/{id}/add_note",
    tag = "Profiles",
    params(("id" = String, Path, description = "User ID")),
    request_body = AddNoteRequest,
    responses(
        (status = 201, description = "Note added", body = UserNoteResponse),
        (status = 400, description = "Empty note", body = crate::models::ErrorResponse),
        (status = 404, description = "User not found or not permitted", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_note(
    req: HttpRequest,
    users: web::Data<UserService>,
    path: web::Path<String>,
    body: web::Json<AddNoteRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let note = users.add_note(&caller, &path, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        MSG_NOTE_ADDED,
        UserNoteResponse::from(note),
    )))
}
