use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::models::{
    AddContactNoteRequest, AddIntegrationRequest, AddNoteRequest, AssignManagerRequest,
    AssignRoleRequest, AuthResponse, ChangePasswordRequest, ContactAssociateResponse,
    ContactNoteResponse, ContactResponse, ContactTimelineResponse, CreateAssociateRequest,
    CreateContactRequest, CreateProfileRequest, CreateRoleRequest, CreateTenantRequest,
    ErrorResponse, GoToConnectionResponse, HealthResponse, Lifecycle, LoginRequest,
    PaginatedResponse, PasswordResetConfirmRequest, PasswordResetRequest,
    PasswordResetTokenRequest, RoleResponse, SelectLineRequest, TenantResponse, TimeZone,
    UpdateContactRequest, UpdateProfileRequest, UpdateRoleRequest, UpdateTenantRequest,
    UserNoteResponse, UserResponse,
};

/// OpenAPI documentation for the Logistics CRM API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Logistics CRM API",
        version = "1.0.0",
        description = "Multi-tenant CRM: contacts with a locking lifecycle, user profiles, roles and the GoToConnect telephony integration."
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Authentication", description = "Login and logout"),
        (name = "Tenants", description = "Tenant administration (staff only)"),
        (name = "Profiles", description = "User profiles, role and manager assignment, notes"),
        (name = "Password reset", description = "E-mailed password reset tokens"),
        (name = "Roles", description = "Tenant roles and their permissions"),
        (name = "Contacts", description = "Contacts, associates, notes and timeline"),
        (name = "Lifecycle", description = "Locking and lifecycle transitions of contacts"),
        (name = "GoToConnect", description = "Telephony integration")
    ),
    paths(
        crate::routes::health_check,
        crate::handlers::login,
        crate::handlers::logout,
        crate::handlers::list_tenants,
        crate::handlers::create_tenant,
        crate::handlers::get_tenant,
        crate::handlers::update_tenant,
        crate::handlers::delete_tenant,
        crate::handlers::get_me,
        crate::handlers::list_profiles,
        crate::handlers::create_profile,
        crate::handlers::get_profile,
        crate::handlers::update_profile,
        crate::handlers::update_password,
        crate::handlers::update_role,
        crate::handlers::assign_manager,
        crate::handlers::get_notes,
        crate::handlers::add_note,
        crate::handlers::request_password_reset,
        crate::handlers::validate_reset_token,
        crate::handlers::confirm_password_reset,
        crate::handlers::list_roles,
        crate::handlers::get_role,
        crate::handlers::create_role,
        crate::handlers::update_role_permissions,
        crate::handlers::delete_role,
        crate::handlers::list_contacts,
        crate::handlers::my_customers,
        crate::handlers::my_prospects,
        crate::handlers::create_contact,
        crate::handlers::get_contact,
        crate::handlers::update_contact,
        crate::handlers::delete_contact,
        crate::handlers::add_contact_note,
        crate::handlers::get_contact_notes,
        crate::handlers::get_contact_timeline,
        crate::handlers::list_associates,
        crate::handlers::add_associate,
        crate::handlers::delete_associate,
        crate::handlers::lock_contact,
        crate::handlers::unlock_contact,
        crate::handlers::convert_to_customer,
        crate::handlers::convert_to_prospect,
        crate::handlers::add_integration,
        crate::handlers::goto_login,
        crate::handlers::goto_auth,
        crate::handlers::select_line,
        crate::handlers::place_call
    ),
    components(
        schemas(
            LoginRequest,
            AuthResponse,
            CreateTenantRequest,
            UpdateTenantRequest,
            TenantResponse,
            CreateProfileRequest,
            UpdateProfileRequest,
            ChangePasswordRequest,
            AssignRoleRequest,
            AssignManagerRequest,
            AddNoteRequest,
            UserResponse,
            UserNoteResponse,
            PaginatedResponse<UserResponse>,
            PaginatedResponse<UserNoteResponse>,
            PasswordResetRequest,
            PasswordResetTokenRequest,
            PasswordResetConfirmRequest,
            CreateRoleRequest,
            UpdateRoleRequest,
            RoleResponse,
            Lifecycle,
            TimeZone,
            CreateContactRequest,
            UpdateContactRequest,
            AddContactNoteRequest,
            CreateAssociateRequest,
            ContactResponse,
            ContactNoteResponse,
            ContactTimelineResponse,
            ContactAssociateResponse,
            PaginatedResponse<ContactResponse>,
            PaginatedResponse<TenantResponse>,
            AddIntegrationRequest,
            SelectLineRequest,
            GoToConnectionResponse,
            ErrorResponse,
            HealthResponse
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security configuration for Bearer token authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "JWT token obtained from the /api/v1/auth/login endpoint",
                        ))
                        .build(),
                ),
            );
        }
    }
}

