//! JWT Authentication middleware for protected routes.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use jsonwebtoken::{decode, DecodingKey, Validation};
use log::debug;
use std::rc::Rc;

use crate::config::CONFIG;
use crate::constants::{
    CODE_AUTH_REQUIRED, CODE_INVALID_TOKEN, CODE_TOKEN_REVOKED, ERR_INVALID_AUTH_HEADER,
    ERR_INVALID_TOKEN, ERR_TOKEN_REVOKED,
};
use crate::errors::ApiError;
use crate::models::Claims;
use crate::services::TokenBlacklist;

use super::request_ext::RawToken;

/// Validates `Authorization: Bearer <jwt>`, rejects revoked tokens and puts
/// the decoded [`Claims`] into the request extensions.
pub struct AuthMiddleware {
    blacklist: TokenBlacklist,
}

impl AuthMiddleware {
    pub fn new(blacklist: TokenBlacklist) -> Self {
        Self { blacklist }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
            blacklist: self.blacklist.clone(),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    blacklist: TokenBlacklist,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let blacklist = self.blacklist.clone();

        Box::pin(async move {
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(str::to_string)
                .ok_or_else(|| ApiError::unauthorized(CODE_AUTH_REQUIRED, ERR_INVALID_AUTH_HEADER))?;

            if blacklist.is_revoked(&token) {
                return Err(ApiError::unauthorized(CODE_TOKEN_REVOKED, ERR_TOKEN_REVOKED).into());
            }

            let token_data = decode::<Claims>(
                &token,
                &DecodingKey::from_secret(CONFIG.jwt_secret.as_bytes()),
                &Validation::default(),
            )
            .map_err(|e| {
                debug!("Rejected bearer token: {}", e);
                ApiError::unauthorized(CODE_INVALID_TOKEN, ERR_INVALID_TOKEN)
            })?;

            req.extensions_mut().insert(RawToken(token));
            req.extensions_mut().insert(token_data.claims);

            service.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::RequestExt;
    use crate::services::AuthService;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpRequest, HttpResponse};
    use mongodb::bson::oid::ObjectId;

    async fn whoami(req: HttpRequest) -> HttpResponse {
        match req.get_claims() {
            Some(claims) => HttpResponse::Ok().body(claims.email),
            None => HttpResponse::InternalServerError().finish(),
        }
    }

    fn token() -> String {
        AuthService::generate_token(
            &ObjectId::new().to_hex(),
            "dana@example.com",
            &ObjectId::new().to_hex(),
            false,
            false,
        )
        .unwrap()
    }

    #[actix_web::test]
    async fn test_missing_header_is_unauthorized() {
        let app = test::init_service(
            App::new().service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(TokenBlacklist::new()))
                    .route("/me", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/me").to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_valid_token_reaches_handler() {
        let app = test::init_service(
            App::new().service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(TokenBlacklist::new()))
                    .route("/me", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", format!("Bearer {}", token())))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, web::Bytes::from_static(b"dana@example.com"));
    }

    #[actix_web::test]
    async fn test_revoked_token_is_rejected() {
        let blacklist = TokenBlacklist::new();
        let token = token();
        blacklist
            .revoke(&token, (chrono::Utc::now().timestamp() + 600) as usize)
            .await;

        let app = test::init_service(
            App::new().service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(blacklist))
                    .route("/me", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);
    }
}
