//! Contact handlers: CRUD, notes, timeline, associates and lifecycle actions.

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::constants::{
    MSG_ASSOCIATES, MSG_ASSOCIATE_ADDED, MSG_ASSOCIATE_DELETED, MSG_CONTACT_CREATED,
    MSG_CONTACT_DELETED, MSG_CONTACT_FOUND, MSG_CONTACT_LOCKED, MSG_CONTACT_NOTES,
    MSG_CONTACT_NOTE_ADDED, MSG_CONTACT_TIMELINE, MSG_CONTACT_UNLOCKED, MSG_CONTACT_UPDATED,
    MSG_CONVERTED_TO_CUSTOMER, MSG_CONVERTED_TO_PROSPECT,
};
use crate::errors::ApiError;
use crate::handlers::current_user;
use crate::models::{
    AddContactNoteRequest, ApiResponse, ContactAssociateResponse, ContactNoteResponse,
    ContactResponse, ContactTimelineResponse, CreateAssociateRequest, CreateContactRequest,
    ListQuery, PaginatedResponse, UpdateContactRequest,
};
use crate::services::{ContactService, UserService};
use crate::validators::validation_errors_to_api_error;

fn contact_page(
    (contacts, total): (Vec<crate::models::Contact>, u64),
    query: &ListQuery,
) -> HttpResponse {
    let data: Vec<ContactResponse> = contacts.into_iter().map(ContactResponse::from).collect();
    HttpResponse::Ok().json(PaginatedResponse::new(data, total, query.page()))
}

/// List contacts, newest first
#[utoipa::path(
    get,
    path = "/api/v1/contacts",
    tag = "Contacts",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)"),
        ("search" = Option<String>, Query, description = "Search by name, email, state or city")
    ),
    responses(
        (status = 200, description = "Contacts", body = crate::models::PaginatedResponse<ContactResponse>),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_contacts(
    req: HttpRequest,
    users: web::Data<UserService>,
    contacts: web::Data<ContactService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    let result = contacts.list(&caller, query.page(), query.search()).await?;
    Ok(contact_page(result, &query))
}

/// Customers owned by the caller
#[utoipa::path(
    get,
    path = "/api/v1/contacts/my_customers",
    tag = "Contacts",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)")
    ),
    responses(
        (status = 200, description = "Customers", body = crate::models::PaginatedResponse<ContactResponse>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_customers(
    req: HttpRequest,
    users: web::Data<UserService>,
    contacts: web::Data<ContactService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    let result = contacts.my_customers(&caller, query.page()).await?;
    Ok(contact_page(result, &query))
}

/// Prospects locked by the caller
#[utoipa::path(
    get,
    path = "/api/v1/contacts/my_prospects",
    tag = "Contacts",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)")
    ),
    responses(
        (status = 200, description = "Prospects", body = crate::models::PaginatedResponse<ContactResponse>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_prospects(
    req: HttpRequest,
    users: web::Data<UserService>,
    contacts: web::Data<ContactService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    let result = contacts.my_prospects(&caller, query.page()).await?;
    Ok(contact_page(result, &query))
}

/// Create a contact in the caller's tenant
#[utoipa::path(
    post,
    path = "/api/v1/contacts",
    tag = "Contacts",
    request_body = CreateContactRequest,
    responses(
        (status = 201, description = "Contact created", body = ContactResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 409, description = "Name already used in this tenant", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_contact(
    req: HttpRequest,
    users: web::Data<UserService>,
    contacts: web::Data<ContactService>,
    body: web::Json<CreateContactRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let contact = contacts.create(&caller, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        MSG_CONTACT_CREATED,
        ContactResponse::from(contact),
    )))
}

/// Get a contact
#[utoipa::path(
    get,
    path = "/api/v1/contacts/{id}",
    tag = "Contacts",
    params(("id" = String, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "Contact found", body = ContactResponse),
        (status = 403, description = "Locked by another user", body = crate::models::ErrorResponse),
        (status = 404, description = "Contact not found", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_contact(
    req: HttpRequest,
    users: web::Data<UserService>,
    contacts: web::Data<ContactService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    let contact = contacts.get(&caller, &path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MSG_CONTACT_FOUND,
        ContactResponse::from(contact),
    )))
}

/// Update the editable fields of a contact
#[utoipa::path(
    put,
    path = "/api/v1/contacts/{id}",
    tag = "Contacts",
    params(("id" = String, Path, description = "Contact ID")),
    request_body = UpdateContactRequest,
    responses(
        (status = 200, description = "Contact updated", body = ContactResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 403, description = "Locked by another user", body = crate::models::ErrorResponse),
        (status = 404, description = "Contact not found", body = crate::models::ErrorResponse),
        (status = 409, description = "Name already used in this tenant", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_contact(
    req: HttpRequest,
    users: web::Data<UserService>,
    contacts: web::Data<ContactService>,
    path: web::Path<String>,
    body: web::Json<UpdateContactRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let contact = contacts.update(&caller, &path, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MSG_CONTACT_UPDATED,
        ContactResponse::from(contact),
    )))
}

/// Delete a contact with its associates, notes and timeline
#[utoipa::path(
    delete,
    path = "/api/v1/contacts/{id}",
    tag = "Contacts",
    params(("id" = String, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "Contact deleted"),
        (status = 403, description = "Missing delete_contact or locked by another user", body = crate::models::ErrorResponse),
        (status = 404, description = "Contact not found", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_contact(
    req: HttpRequest,
    users: web::Data<UserService>,
    contacts: web::Data<ContactService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    contacts.delete(&caller, &path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(MSG_CONTACT_DELETED)))
}

/// Add a note to a contact
#[utoipa::path(
    post,
    path = "/api/v1/contacts/{id}/add_note",
    tag = "Contacts",
    params(("id" = String, Path, description = "Contact ID")),
    request_body = AddContactNoteRequest,
    responses(
        (status = 201, description = "Note added", body = ContactNoteResponse),
        (status = 400, description = "Empty note", body = crate::models::ErrorResponse),
        (status = 404, description = "Contact not found", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_contact_note(
    req: HttpRequest,
    users: web::Data<UserService>,
    contacts: web::Data<ContactService>,
    path: web::Path<String>,
    body: web::Json<AddContactNoteRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let note = contacts.add_note(&caller, &path, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        MSG_CONTACT_NOTE_ADDED,
        ContactNoteResponse::from(note),
    )))
}

/// Notes of a contact, newest first
#[utoipa::path(
    get,
    path = "/api/v1/contacts/{id}/notes",
    tag = "Contacts",
    params(("id" = String, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "Notes", body = [ContactNoteResponse]),
        (status = 404, description = "Contact not found", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_contact_notes(
    req: HttpRequest,
    users: web::Data<UserService>,
    contacts: web::Data<ContactService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    let data: Vec<ContactNoteResponse> = contacts
        .notes(&caller, &path)
        .await?
        .into_iter()
        .map(ContactNoteResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_CONTACT_NOTES, data)))
}

/// Timeline of a contact, newest first
#[utoipa::path(
    get,
    path = "/api/v1/contacts/{id}/timeline",
    tag = "Contacts",
    params(("id" = String, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "Timeline events", body = [ContactTimelineResponse]),
        (status = 404, description = "Contact not found", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_contact_timeline(
    req: HttpRequest,
    users: web::Data<UserService>,
    contacts: web::Data<ContactService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    let data: Vec<ContactTimelineResponse> = contacts
        .timeline(&caller, &path)
        .await?
        .into_iter()
        .map(ContactTimelineResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_CONTACT_TIMELINE, data)))
}

/// Associates of a contact
#[utoipa::path(
    get,
    path = "/api/v1/contacts/{id}/associates",
    tag = "Contacts",
    params(("id" = String, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "Associates", body = [ContactAssociateResponse]),
        (status = 404, description = "Contact not found", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_associates(
    req: HttpRequest,
    users: web::Data<UserService>,
    contacts: web::Data<ContactService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    let data: Vec<ContactAssociateResponse> = contacts
        .associates(&caller, &path)
        .await?
        .into_iter()
        .map(ContactAssociateResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_ASSOCIATES, data)))
}

/// Add an associate to a contact
#[utoipa::path(
    post,
    path = "/api/v1/contacts/{id}/associates",
    tag = "Contacts",
    params(("id" = String, Path, description = "Contact ID")),
    request_body = CreateAssociateRequest,
    responses(
        (status = 201, description = "Associate added", body = ContactAssociateResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 404, description = "Contact not found", body = crate::models::ErrorResponse),
        (status = 409, description = "Phone number or email already used", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_associate(
    req: HttpRequest,
    users: web::Data<UserService>,
    contacts: web::Data<ContactService>,
    path: web::Path<String>,
    body: web::Json<CreateAssociateRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    body.validate().map_err(validation_errors_to_api_error)?;

    let associate = contacts
        .add_associate(&caller, &path, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        MSG_ASSOCIATE_ADDED,
        ContactAssociateResponse::from(associate),
    )))
}

/// Remove an associate; the last one stays
#[utoipa::path(
    delete,
    path = "/api/v1/contacts/{id}/associates/{associate_id}",
    tag = "Contacts",
    params(
        ("id" = String, Path, description = "Contact ID"),
        ("associate_id" = String, Path, description = "Associate ID")
    ),
    responses(
        (status = 200, description = "Associate deleted"),
        (status = 400, description = "Last associate of the contact", body = crate::models::ErrorResponse),
        (status = 404, description = "Contact or associate not found", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_associate(
    req: HttpRequest,
    users: web::Data<UserService>,
    contacts: web::Data<ContactService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    let (id, associate_id) = path.into_inner();
    contacts
        .delete_associate(&caller, &id, &associate_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(MSG_ASSOCIATE_DELETED)))
}

/// Lock a contact for the caller
#[utoipa::path(
    patch,
    path = "/api/v1/contacts/{id}/lock",
    tag = "Lifecycle",
    params(("id" = String, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "Contact locked", body = ContactResponse),
        (status = 400, description = "Customers cannot be locked", body = crate::models::ErrorResponse),
        (status = 403, description = "Locked by another user", body = crate::models::ErrorResponse),
        (status = 409, description = "Already locked, cooldown active or quota reached", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn lock_contact(
    req: HttpRequest,
    users: web::Data<UserService>,
    contacts: web::Data<ContactService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    let contact = contacts.lock(&caller, &path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MSG_CONTACT_LOCKED,
        ContactResponse::from(contact),
    )))
}

/// Release the caller's lock on a contact
#[utoipa::path(
    patch,
    path = "/api/v1/contacts/{id}/unlock",
    tag = "Lifecycle",
    params(("id" = String, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "Contact unlocked", body = ContactResponse),
        (status = 400, description = "Customers cannot be unlocked", body = crate::models::ErrorResponse),
        (status = 403, description = "Locked by another user", body = crate::models::ErrorResponse),
        (status = 409, description = "Already unlocked", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn unlock_contact(
    req: HttpRequest,
    users: web::Data<UserService>,
    contacts: web::Data<ContactService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    let contact = contacts.unlock(&caller, &path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MSG_CONTACT_UNLOCKED,
        ContactResponse::from(contact),
    )))
}

/// Mark a contact as the caller's customer
#[utoipa::path(
    patch,
    path = "/api/v1/contacts/{id}/convert_to_customer",
    tag = "Lifecycle",
    params(("id" = String, Path, description = "Contact ID")),
    responses(
        (status = 202, description = "Converted to customer", body = ContactResponse),
        (status = 403, description = "Locked by another user", body = crate::models::ErrorResponse),
        (status = 404, description = "Contact not found", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn convert_to_customer(
    req: HttpRequest,
    users: web::Data<UserService>,
    contacts: web::Data<ContactService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    let contact = contacts.convert_to_customer(&caller, &path).await?;
    Ok(HttpResponse::Accepted().json(ApiResponse::success(
        MSG_CONVERTED_TO_CUSTOMER,
        ContactResponse::from(contact),
    )))
}

/// Move a contact to PROSPECT
#[utoipa::path(
    patch,
    path = "/api/v1/contacts/{id}/convert_to_prospect",
    tag = "Lifecycle",
    params(("id" = String, Path, description = "Contact ID")),
    responses(
        (status = 202, description = "Converted to prospect", body = ContactResponse),
        (status = 403, description = "Not the customer's owner", body = crate::models::ErrorResponse),
        (status = 409, description = "Cooldown active or quota reached", body = crate::models::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn convert_to_prospect(
    req: HttpRequest,
    users: web::Data<UserService>,
    contacts: web::Data<ContactService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let caller = current_user(&req, &users).await?;
    let contact = contacts.convert_to_prospect(&caller, &path).await?;
    Ok(HttpResponse::Accepted().json(ApiResponse::success(
        MSG_CONVERTED_TO_PROSPECT,
        ContactResponse::from(contact),
    )))
}
