use actix_governor::Governor;
use actix_web::{web, HttpResponse};
use utoipa::OpenApi;

use crate::handlers;
use crate::middleware::{AuthMiddleware, AuthRateLimiter};
use crate::models::HealthResponse;
use crate::openapi::ApiDoc;
use crate::services::TokenBlacklist;

pub fn configure_routes(
    cfg: &mut web::ServiceConfig,
    blacklist: &TokenBlacklist,
    limiter: &AuthRateLimiter,
) {
    let auth = || AuthMiddleware::new(blacklist.clone());

    cfg.route("/api-docs/openapi.json", web::get().to(openapi_json))
        .service(
            web::scope("/api")
                // Health check
                .route("/health", web::get().to(health_check))
                // Login is public and rate limited, logout needs a valid token
                .service(
                    web::scope("/v1/auth")
                        .service(
                            web::resource("/login")
                                .wrap(Governor::new(limiter))
                                .route(web::post().to(handlers::login)),
                        )
                        .service(
                            web::resource("/logout")
                                .wrap(auth())
                                .route(web::post().to(handlers::logout)),
                        ),
                )
                // Tenant administration (staff only)
                .service(
                    web::scope("/v1/tenants/admin")
                        .wrap(auth())
                        .route("", web::get().to(handlers::list_tenants))
                        .route("", web::post().to(handlers::create_tenant))
                        .route("/{id}", web::get().to(handlers::get_tenant))
                        .route("/{id}", web::put().to(handlers::update_tenant))
                        .route("/{id}", web::delete().to(handlers::delete_tenant)),
                )
                .service(
                    web::scope("/v1/profiles")
                        .service(
                            web::resource("/login")
                                .wrap(Governor::new(limiter))
                                .route(web::post().to(handlers::login)),
                        )
                        // Password reset (public)
                        .service(
                            web::scope("/password_reset")
                                .wrap(Governor::new(limiter))
                                .route("/", web::post().to(handlers::request_password_reset))
                                .route(
                                    "/validate_token/",
                                    web::post().to(handlers::validate_reset_token),
                                )
                                .route(
                                    "/confirm/",
                                    web::post().to(handlers::confirm_password_reset),
                                ),
                        )
                        .service(
                            web::scope("/profile")
                                .wrap(auth())
                                // Must be before /{id} to avoid conflict
                                .route("/me", web::get().to(handlers::get_me))
                                .route("", web::get().to(handlers::list_profiles))
                                .route("", web::post().to(handlers::create_profile))
                                .route("/{id}", web::get().to(handlers::get_profile))
                                .route("/{id}", web::put().to(handlers::update_profile))
                                .route(
                                    "/{id}/update_password",
                                    web::patch().to(handlers::update_password),
                                )
                                .route("/{id}/update_role", web::patch().to(handlers::update_role))
                                .route(
                                    "/{id}/assign_manager",
                                    web::patch().to(handlers::assign_manager),
                                )
                                .route("/{id}/get_notes", web::get().to(handlers::get_notes))
                                .route("/{id}/add_note", web::post().to(handlers::add_note)),
                        ),
                )
                .service(
                    web::scope("/v1/roles")
                        .wrap(auth())
                        .route("", web::get().to(handlers::list_roles))
                        .route("", web::post().to(handlers::create_role))
                        .route("/{id}", web::get().to(handlers::get_role))
                        .route("/{id}", web::put().to(handlers::update_role_permissions))
                        .route("/{id}", web::delete().to(handlers::delete_role)),
                )
                .service(
                    web::scope("/v1/contacts")
                        .wrap(auth())
                        .route("", web::get().to(handlers::list_contacts))
                        .route("", web::post().to(handlers::create_contact))
                        // Must be before /{id} to avoid conflict
                        .route("/my_customers", web::get().to(handlers::my_customers))
                        .route("/my_prospects", web::get().to(handlers::my_prospects))
                        .route("/{id}", web::get().to(handlers::get_contact))
                        .route("/{id}", web::put().to(handlers::update_contact))
                        .route("/{id}", web::delete().to(handlers::delete_contact))
                        .route("/{id}/add_note", web::post().to(handlers::add_contact_note))
                        .route("/{id}/notes", web::get().to(handlers::get_contact_notes))
                        .route("/{id}/timeline", web::get().to(handlers::get_contact_timeline))
                        .route("/{id}/associates", web::get().to(handlers::list_associates))
                        .route("/{id}/associates", web::post().to(handlers::add_associate))
                        .route(
                            "/{id}/associates/{associate_id}",
                            web::delete().to(handlers::delete_associate),
                        )
                        .route("/{id}/lock", web::patch().to(handlers::lock_contact))
                        .route("/{id}/unlock", web::patch().to(handlers::unlock_contact))
                        .route(
                            "/{id}/convert_to_customer",
                            web::patch().to(handlers::convert_to_customer),
                        )
                        .route(
                            "/{id}/convert_to_prospect",
                            web::patch().to(handlers::convert_to_prospect),
                        ),
                )
                .service(
                    web::scope("/v1/gotoconnect")
                        // OAuth callback carries a signed state instead of a bearer token
                        .route("/auth", web::get().to(handlers::goto_auth))
                        .service(
                            web::scope("")
                                .wrap(auth())
                                .route("/add_integration", web::post().to(handlers::add_integration))
                                .route("/login", web::get().to(handlers::goto_login))
                                .route("/line", web::patch().to(handlers::select_line))
                                .route("/call", web::get().to(handlers::place_call)),
                        ),
                ),
        );
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Server is running", body = HealthResponse)
    )
)]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
    })
}

async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::create_auth_rate_limiter_config;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_health_check() {
        let blacklist = TokenBlacklist::new();
        let limiter = create_auth_rate_limiter_config();
        let app = test::init_service(
            App::new().configure(|cfg| configure_routes(cfg, &blacklist, &limiter)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "OK");
    }

    #[actix_web::test]
    async fn test_openapi_document_is_served() {
        let blacklist = TokenBlacklist::new();
        let limiter = create_auth_rate_limiter_config();
        let app = test::init_service(
            App::new().configure(|cfg| configure_routes(cfg, &blacklist, &limiter)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api-docs/openapi.json")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["paths"]["/api/v1/contacts/{id}/lock"].is_object());
    }

    #[actix_web::test]
    async fn test_contacts_require_token() {
        let blacklist = TokenBlacklist::new();
        let limiter = create_auth_rate_limiter_config();
        let app = test::init_service(
            App::new().configure(|cfg| configure_routes(cfg, &blacklist, &limiter)),
        )
        .await;

        let req = test::TestRequest::patch()
            .uri("/api/v1/contacts/65f000000000000000000001/lock")
            .to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);
    }
}
