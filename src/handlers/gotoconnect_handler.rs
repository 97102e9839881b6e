//! GoToConnect handlers: tenant integration, user OAuth and click-to-call.

use actix_web::{http::header, web, HttpRequest, HttpResponse};
use log::debug;
use validator::Validate;

use crate::constants::{
    CODE_VALIDATION_FAILED, MSG_GOTO_CALL_PLACED, MSG_GOTO_CONNECTED, MSG_GOTO_INTEGRATION_ADDED,
    MSG_GOTO_LINE_UPDATED,
};
use crate::errors::ApiError;
use crate::handlers::current_user;
use crate::models::{
    AddIntegrationRequest, ApiResponse, CallQuery, GoToConnectionResponse, OAuthCallbackQuery,
    SelectLineRequest,
};
use crate::services::{GoToConnectService, UserService};
use crate::validators::validation_errors_to_api_error;

/// Store the tenant's GoToConnect OAuth client (staff only)
#[utoipa::path(
    post,
    path = "/api/v1/gotoconnect/add_integration",
    tag = "GoToConnect",
    request_body = AddIntegrationRequest,
    responses(
        (status = 200, description = "Integration saved"),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 403, description = "Staff only", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_integration(
    req: HttpRequest,
    users: web::Data<UserService>,
    goto: web::Data<GoToConnectService>,
    body: web::Json<AddIntegrationRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    body.validate().map_err(validation_errors_to_api_error)?;

    goto.add_integration(&caller, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(MSG_GOTO_INTEGRATION_ADDED)))
}

/// Redirect the caller to the GoToConnect login page
#[utoipa::path(
    get,
    path = "/api/v1/gotoconnect/login",
    tag = "GoToConnect",
    responses(
        (status = 302, description = "Redirect to the provider"),
        (status = 400, description = "Integration not configured", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn goto_login(
    req: HttpRequest,
    users: web::Data<UserService>,
    goto: web::Data<GoToConnectService>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    let url = goto.login_url(&caller).await?;
    debug!("Redirecting user {} to GoToConnect", caller.id());
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, url))
        .finish())
}

/// OAuth callback; the user is identified by the signed `state`
#[utoipa::path(
    get,
    path = "/api/v1/gotoconnect/auth",
    tag = "GoToConnect",
    params(
        ("code" = Option<String>, Query, description = "Authorization code"),
        ("state" = Option<String>, Query, description = "State issued by the login redirect")
    ),
    responses(
        (status = 200, description = "Connected", body = GoToConnectionResponse),
        (status = 400, description = "Missing code or state", body = crate::models::ErrorResponse),
        (status = 401, description = "Invalid state", body = crate::models::ErrorResponse),
        (status = 502, description = "Token exchange failed", body = crate::models::ErrorResponse)
    )
)]
pub async fn goto_auth(
    goto: web::Data<GoToConnectService>,
    query: web::Query<OAuthCallbackQuery>,
) -> Result<HttpResponse, ApiError> {
    let token = goto.complete_auth(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MSG_GOTO_CONNECTED,
        GoToConnectionResponse::from(token),
    )))
}

/// Choose the line outbound calls are placed from
#[utoipa::path(
    patch,
    path = "/api/v1/gotoconnect/line",
    tag = "GoToConnect",
    request_body = SelectLineRequest,
    responses(
        (status = 200, description = "Line saved"),
        (status = 400, description = "Not connected to GoToConnect", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn select_line(
    req: HttpRequest,
    users: web::Data<UserService>,
    goto: web::Data<GoToConnectService>,
    body: web::Json<SelectLineRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    body.validate().map_err(validation_errors_to_api_error)?;

    goto.set_line(&caller, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(MSG_GOTO_LINE_UPDATED)))
}

/// Place an outbound call through GoToConnect
#[utoipa::path(
    get,
    path = "/api/v1/gotoconnect/call",
    tag = "GoToConnect",
    params(("call_to" = String, Query, description = "Number to dial")),
    responses(
        (status = 200, description = "Call initiated"),
        (status = 400, description = "Not connected or no line selected", body = crate::models::ErrorResponse),
        (status = 502, description = "Provider rejected the call", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn place_call(
    req: HttpRequest,
    users: web::Data<UserService>,
    goto: web::Data<GoToConnectService>,
    query: web::Query<CallQuery>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    if query.call_to.trim().is_empty() {
        return Err(ApiError::bad_request(
            CODE_VALIDATION_FAILED,
            "call_to is required",
        ));
    }

    let reply = goto.place_call(&caller, &query.call_to).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_GOTO_CALL_PLACED, reply)))
}
