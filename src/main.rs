mod config;
mod constants;
mod errors;
mod handlers;
mod middleware;
mod models;
mod openapi;
mod repositories;
mod routes;
mod services;
mod utils;
mod validators;

use actix_web::{middleware::Logger, web, App, HttpServer};
use log::info;
use mongodb::bson::doc;
use mongodb::Client;
use std::sync::Arc;

use crate::config::CONFIG;
use crate::middleware::create_auth_rate_limiter_config;
use crate::services::{
    AuthService, ContactService, GoToConnectClient, GoToConnectService, Mailer,
    PasswordResetService, RoleService, TenantService, TokenBlacklist, UnlockProspectsJob,
    UserService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment variables and logger
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Connect to MongoDB
    info!("Connecting to MongoDB...");
    let client = Client::with_uri_str(&CONFIG.mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");

    let db = client.database(&CONFIG.database_name);

    // Test MongoDB connection
    db.run_command(doc! { "ping": 1 })
        .await
        .expect("Failed to ping MongoDB");
    info!("Connected to MongoDB successfully!");

    repositories::create_indexes(&db)
        .await
        .expect("Failed to create MongoDB indexes");

    // Initialize services
    let tenant_service = Arc::new(TenantService::new(&client, &db));
    let contact_service = Arc::new(ContactService::new(&client, &db));
    let user_service = UserService::new(&db);

    if CONFIG.seed_admin {
        user_service
            .seed_admin(&tenant_service)
            .await
            .expect("Failed to seed the admin account");
    }

    let mailer = Mailer::from_config().expect("Invalid SMTP configuration");

    UnlockProspectsJob::new(
        &CONFIG.unlock_prospects_cron,
        Arc::clone(&contact_service),
        Arc::clone(&tenant_service),
    )
    .expect("Invalid UNLOCK_PROSPECTS_CRON expression")
    .spawn();

    let user_service = web::Data::new(user_service);
    let tenant_service = web::Data::from(tenant_service);
    let contact_service = web::Data::from(contact_service);
    let auth_service = web::Data::new(AuthService::new(&db));
    let role_service = web::Data::new(RoleService::new(&db));
    let goto_service = web::Data::new(GoToConnectService::new(
        &db,
        GoToConnectClient::from_config(),
    ));
    let password_reset_service =
        web::Data::new(PasswordResetService::new(&db, Arc::new(mailer)));
    let token_blacklist = TokenBlacklist::new();
    let rate_limiter = create_auth_rate_limiter_config();

    // Start HTTP server
    let server_addr = format!("{}:{}", CONFIG.server_host, CONFIG.server_port);
    info!("Starting server at http://{}", server_addr);

    HttpServer::new(move || {
        let blacklist = token_blacklist.clone();
        let limiter = rate_limiter.clone();
        App::new()
            .wrap(Logger::default())
            .app_data(user_service.clone())
            .app_data(tenant_service.clone())
            .app_data(contact_service.clone())
            .app_data(auth_service.clone())
            .app_data(role_service.clone())
            .app_data(goto_service.clone())
            .app_data(password_reset_service.clone())
            .app_data(web::Data::new(blacklist.clone()))
            .configure(move |cfg| routes::configure_routes(cfg, &blacklist, &limiter))
    })
    .bind(&server_addr)?
    .run()
    .await
}
