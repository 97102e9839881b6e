//! Contact service: CRUD, notes, associates and the locking lifecycle.

use chrono::Utc;
use log::{debug, info, warn};
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::{Client, ClientSession, Database};
use std::sync::Arc;

use crate::constants::{
    CODE_ASSOCIATE_NOT_FOUND, CODE_CONFLICT, CODE_CONTACT_LOCKED_BY_OTHER,
    CODE_CONTACT_NOT_FOUND, CODE_LAST_ASSOCIATE, CODE_PROSPECT_LIMIT_REACHED,
    CODE_TENANT_NOT_FOUND, ERR_ASSOCIATE_EXISTS, ERR_ASSOCIATE_NOT_FOUND, ERR_CONTACT_EXISTS,
    ERR_CONTACT_LOCKED_BY_OTHER, ERR_CONTACT_MODIFIED, ERR_CONTACT_NOT_FOUND,
    ERR_LAST_ASSOCIATE, ERR_PROSPECT_LIMIT_REACHED, ERR_TENANT_NOT_FOUND, PERM_CHANGE_CONTACT,
    PERM_DELETE_CONTACT,
};
use crate::errors::ApiError;
use crate::middleware::require_model_perm;
use crate::models::{
    AddContactNoteRequest, Contact, ContactAssociate, ContactNote, ContactTimeline,
    CreateAssociateRequest, CreateContactRequest, CurrentUser, Lifecycle, Page, Tenant,
    UpdateContactRequest,
};
use crate::repositories::{search_filter, ContactRepository, TenantRepository, UserRepository};
use crate::services::lifecycle::{self, Transition};

const DEFAULT_RATING: i32 = 1;

pub struct ContactService {
    client: Client,
    repository: Arc<ContactRepository>,
    users: Arc<UserRepository>,
    tenants: Arc<TenantRepository>,
}

fn name_taken(err: ApiError) -> ApiError {
    match err {
        ApiError::Conflict { .. } => ApiError::conflict(CODE_CONFLICT, ERR_CONTACT_EXISTS),
        other => other,
    }
}

/// Contacts locked by someone else are hidden from everyone but superusers.
fn check_access(caller: &CurrentUser, contact: &Contact) -> Result<(), ApiError> {
    if contact.is_locked_by_other(caller.id()) && !caller.profile.is_superuser {
        warn!(
            "User {} denied access to contact {} locked by another user",
            caller.id(),
            contact.id
        );
        return Err(ApiError::forbidden(
            CODE_CONTACT_LOCKED_BY_OTHER,
            ERR_CONTACT_LOCKED_BY_OTHER,
        ));
    }
    Ok(())
}

fn new_contact(tenant_id: ObjectId, created_by: ObjectId, req: CreateContactRequest) -> Contact {
    Contact {
        id: ObjectId::new(),
        tenant_id,
        name: req.name.trim().to_string(),
        address_1: req.address_1,
        address_2: req.address_2,
        city: req.city,
        state: req.state,
        zip_code: req.zip_code,
        email: req.email.map(|email| email.trim().to_lowercase()),
        logo: req.logo,
        timezone: req.timezone.unwrap_or_default(),
        created_by: Some(created_by),
        created_on: mongodb::bson::DateTime::now(),
        lifecycle_updated_on: None,
        lifecycle_status: Lifecycle::Lead,
        rating: req.rating.unwrap_or(DEFAULT_RATING),
        is_locked: false,
        locked_on: None,
        locked_by: None,
        customer_of: None,
        last_locked_by: None,
        unlocked_on: None,
    }
}

fn update_document(req: UpdateContactRequest) -> Result<Document, ApiError> {
    let mut set = Document::new();
    if let Some(name) = req.name {
        set.insert("name", name.trim());
    }
    if let Some(address_1) = req.address_1 {
        set.insert("address_1", address_1);
    }
    if let Some(address_2) = req.address_2 {
        set.insert("address_2", address_2);
    }
    if let Some(city) = req.city {
        set.insert("city", city);
    }
    if let Some(state) = req.state {
        set.insert("state", state);
    }
    if let Some(zip_code) = req.zip_code {
        set.insert("zip_code", zip_code);
    }
    if let Some(email) = req.email {
        set.insert("email", email.trim().to_lowercase());
    }
    if let Some(logo) = req.logo {
        set.insert("logo", logo);
    }
    if let Some(timezone) = req.timezone {
        let timezone =
            mongodb::bson::to_bson(&timezone).map_err(|e| ApiError::internal(e.to_string()))?;
        set.insert("timezone", timezone);
    }
    if let Some(rating) = req.rating {
        set.insert("rating", rating);
    }
    Ok(set)
}

impl ContactService {
    pub fn new(client: &Client, db: &Database) -> Self {
        Self {
            client: client.clone(),
            repository: Arc::new(ContactRepository::new(db)),
            users: Arc::new(UserRepository::new(db)),
            tenants: Arc::new(TenantRepository::new(db)),
        }
    }

    async fn find(&self, caller: &CurrentUser, id: &str) -> Result<Contact, ApiError> {
        let id = ObjectId::parse_str(id)?;
        self.repository
            .find_in_tenant(caller.tenant_id(), id)
            .await?
            .ok_or_else(|| ApiError::not_found(CODE_CONTACT_NOT_FOUND, ERR_CONTACT_NOT_FOUND))
    }

    /// Load a contact the caller is allowed to act on.
    async fn load_for(&self, caller: &CurrentUser, id: &str) -> Result<Contact, ApiError> {
        let contact = self.find(caller, id).await?;
        check_access(caller, &contact)?;
        Ok(contact)
    }

    async fn tenant_of(&self, caller: &CurrentUser) -> Result<Tenant, ApiError> {
        self.tenants
            .find_by_id(caller.tenant_id())
            .await?
            .ok_or_else(|| ApiError::not_found(CODE_TENANT_NOT_FOUND, ERR_TENANT_NOT_FOUND))
    }

    pub async fn list(
        &self,
        caller: &CurrentUser,
        page: Page,
        search: Option<&str>,
    ) -> Result<(Vec<Contact>, u64), ApiError> {
        let mut filter = doc! { "tenant_id": caller.tenant_id() };
        if let Some(term) = search {
            filter.extend(search_filter(term, &["name", "email", "state", "city"]));
        }
        self.page_of(filter, doc! { "created_on": -1 }, page).await
    }

    /// Customers owned by the caller, by name.
    pub async fn my_customers(
        &self,
        caller: &CurrentUser,
        page: Page,
    ) -> Result<(Vec<Contact>, u64), ApiError> {
        let filter = doc! { "tenant_id": caller.tenant_id(), "customer_of": caller.id() };
        self.page_of(filter, doc! { "name": 1 }, page).await
    }

    /// Prospects locked by the caller, by name.
    pub async fn my_prospects(
        &self,
        caller: &CurrentUser,
        page: Page,
    ) -> Result<(Vec<Contact>, u64), ApiError> {
        let filter = doc! { "tenant_id": caller.tenant_id(), "locked_by": caller.id() };
        self.page_of(filter, doc! { "name": 1 }, page).await
    }

    async fn page_of(
        &self,
        filter: Document,
        sort: Document,
        page: Page,
    ) -> Result<(Vec<Contact>, u64), ApiError> {
        debug!("Listing contacts with filter: {:?}", filter);
        let total = self.repository.count(filter.clone()).await?;
        let contacts = self
            .repository
            .find_with_filter(filter, sort, page.skip(), page.limit())
            .await?;
        Ok((contacts, total))
    }

    pub async fn create(
        &self,
        caller: &CurrentUser,
        req: CreateContactRequest,
    ) -> Result<Contact, ApiError> {
        let contact = new_contact(caller.tenant_id(), caller.id(), req);
        self.repository.insert(&contact).await.map_err(name_taken)?;
        info!("Contact {} created by {}", contact.id, caller.id());
        Ok(contact)
    }

    pub async fn get(&self, caller: &CurrentUser, id: &str) -> Result<Contact, ApiError> {
        self.load_for(caller, id).await
    }

    pub async fn update(
        &self,
        caller: &CurrentUser,
        id: &str,
        req: UpdateContactRequest,
    ) -> Result<Contact, ApiError> {
        let contact = self.load_for(caller, id).await?;
        let set = update_document(req)?;
        self.repository
            .update_fields(contact.tenant_id, contact.id, set)
            .await
            .map_err(name_taken)?;
        self.find(caller, id).await
    }

    /// Delete a contact with its associates, notes and timeline.
    pub async fn delete(&self, caller: &CurrentUser, id: &str) -> Result<(), ApiError> {
        require_model_perm(caller, PERM_DELETE_CONTACT)?;
        let contact = self.load_for(caller, id).await?;

        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;
        match self.repository.delete_cascade(contact.id, &mut session).await {
            Ok(_) => {
                session.commit_transaction().await?;
                info!("Contact {} deleted by {}", contact.id, caller.id());
                Ok(())
            }
            Err(err) => {
                let _ = session.abort_transaction().await;
                Err(err)
            }
        }
    }

    pub async fn add_note(
        &self,
        caller: &CurrentUser,
        id: &str,
        req: AddContactNoteRequest,
    ) -> Result<ContactNote, ApiError> {
        let contact = self.load_for(caller, id).await?;
        let note = ContactNote {
            id: ObjectId::new(),
            tenant_id: contact.tenant_id,
            contact_id: contact.id,
            created_on: mongodb::bson::DateTime::now(),
            body: req.note,
        };
        self.repository.insert_note(&note).await?;
        Ok(note)
    }

    pub async fn notes(&self, caller: &CurrentUser, id: &str) -> Result<Vec<ContactNote>, ApiError> {
        let contact = self.load_for(caller, id).await?;
        self.repository.find_notes(contact.id).await
    }

    pub async fn timeline(
        &self,
        caller: &CurrentUser,
        id: &str,
    ) -> Result<Vec<ContactTimeline>, ApiError> {
        let contact = self.load_for(caller, id).await?;
        self.repository.find_timeline(contact.id).await
    }

    pub async fn associates(
        &self,
        caller: &CurrentUser,
        id: &str,
    ) -> Result<Vec<ContactAssociate>, ApiError> {
        let contact = self.load_for(caller, id).await?;
        self.repository.find_associates(contact.id).await
    }

    pub async fn add_associate(
        &self,
        caller: &CurrentUser,
        id: &str,
        req: CreateAssociateRequest,
    ) -> Result<ContactAssociate, ApiError> {
        let contact = self.load_for(caller, id).await?;
        let associate = ContactAssociate {
            id: ObjectId::new(),
            tenant_id: contact.tenant_id,
            contact_id: contact.id,
            name: req.name,
            phone_number: req.phone_number,
            phone_number_ext: req.phone_number_ext,
            designation: req.designation,
            email: req.email.map(|email| email.trim().to_lowercase()),
            created_by: Some(caller.id()),
        };
        self.repository
            .insert_associate(&associate)
            .await
            .map_err(|err| match err {
                ApiError::Conflict { .. } => ApiError::conflict(CODE_CONFLICT, ERR_ASSOCIATE_EXISTS),
                other => other,
            })?;
        Ok(associate)
    }

    /// A contact always keeps at least one associate.
    pub async fn delete_associate(
        &self,
        caller: &CurrentUser,
        id: &str,
        associate_id: &str,
    ) -> Result<(), ApiError> {
        let contact = self.load_for(caller, id).await?;
        let associate_id = ObjectId::parse_str(associate_id)?;

        let associates = self.repository.find_associates(contact.id).await?;
        if !associates.iter().any(|a| a.id == associate_id) {
            return Err(ApiError::not_found(
                CODE_ASSOCIATE_NOT_FOUND,
                ERR_ASSOCIATE_NOT_FOUND,
            ));
        }
        if associates.len() <= 1 {
            return Err(ApiError::bad_request(CODE_LAST_ASSOCIATE, ERR_LAST_ASSOCIATE));
        }

        self.repository
            .delete_associate(contact.id, associate_id)
            .await?;
        Ok(())
    }

    pub async fn lock(&self, caller: &CurrentUser, id: &str) -> Result<Contact, ApiError> {
        let before = self.load_for(caller, id).await?;
        let tenant = self.tenant_of(caller).await?;
        let mut contact = before.clone();
        let transition = lifecycle::lock(&mut contact, &caller.profile, &tenant, Utc::now())?;
        self.persist(&contact, &before, &transition).await?;
        info!("Contact {} locked by {}", contact.id, caller.id());
        Ok(contact)
    }

    pub async fn unlock(&self, caller: &CurrentUser, id: &str) -> Result<Contact, ApiError> {
        let before = self.load_for(caller, id).await?;
        let mut contact = before.clone();
        let transition = lifecycle::unlock(&mut contact, &caller.profile, Utc::now())?;
        self.persist(&contact, &before, &transition).await?;
        info!("Contact {} unlocked by {}", contact.id, caller.id());
        Ok(contact)
    }

    pub async fn convert_to_customer(
        &self,
        caller: &CurrentUser,
        id: &str,
    ) -> Result<Contact, ApiError> {
        let before = self.load_for(caller, id).await?;
        let mut contact = before.clone();
        let transition = lifecycle::convert_to_customer(&mut contact, &caller.profile, Utc::now());
        self.persist(&contact, &before, &transition).await?;
        Ok(contact)
    }

    pub async fn convert_to_prospect(
        &self,
        caller: &CurrentUser,
        id: &str,
    ) -> Result<Contact, ApiError> {
        let before = self.load_for(caller, id).await?;
        let tenant = self.tenant_of(caller).await?;
        let mut contact = before.clone();
        let transition = lifecycle::convert_to_prospect(
            &mut contact,
            &caller.profile,
            caller.has_perm(PERM_CHANGE_CONTACT),
            &tenant,
            Utc::now(),
        )?;
        self.persist(&contact, &before, &transition).await?;
        Ok(contact)
    }

    /// Release every lock of `tenant` older than its expiry. Returns how many
    /// contacts were released.
    pub async fn expire_stale_locks(
        &self,
        tenant: &Tenant,
        now: chrono::DateTime<Utc>,
    ) -> Result<usize, ApiError> {
        let Some(cutoff) = lifecycle::lock_cutoff(now, tenant.lock_expiry_days) else {
            warn!(
                "Lock expiry of {} days for tenant {} is out of range, skipping",
                tenant.lock_expiry_days, tenant.subdomain_prefix
            );
            return Ok(0);
        };
        let candidates = self
            .repository
            .find_locked_before(tenant.id, mongodb::bson::DateTime::from_chrono(cutoff))
            .await?;

        let mut released = 0;
        for before in candidates {
            if !lifecycle::is_lock_expired(&before, tenant, now) {
                continue;
            }
            let mut contact = before.clone();
            let transition = lifecycle::expire_lock(&mut contact, now);
            match self.persist(&contact, &before, &transition).await {
                Ok(()) => released += 1,
                Err(err) => warn!("Could not release lock on contact {}: {}", contact.id, err),
            }
        }
        Ok(released)
    }

    /// Save a lifecycle step: the contact, the counters and the timeline
    /// events commit together or not at all.
    async fn persist(
        &self,
        contact: &Contact,
        before: &Contact,
        transition: &Transition,
    ) -> Result<(), ApiError> {
        if transition.is_noop() {
            return Ok(());
        }

        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;
        match self.write_transition(contact, before, transition, &mut session).await {
            Ok(()) => {
                session.commit_transaction().await?;
                Ok(())
            }
            Err(err) => {
                let _ = session.abort_transaction().await;
                Err(err)
            }
        }
    }

    async fn write_transition(
        &self,
        contact: &Contact,
        before: &Contact,
        transition: &Transition,
        session: &mut ClientSession,
    ) -> Result<(), ApiError> {
        if !self
            .repository
            .update_lifecycle_if_unchanged(contact, before, session)
            .await?
        {
            return Err(ApiError::conflict(CODE_CONFLICT, ERR_CONTACT_MODIFIED));
        }
        for change in &transition.counters {
            let applied = self
                .users
                .apply_counter(change, transition.prospect_limit, session)
                .await?;
            if !applied && change.delta > 0 && transition.prospect_limit.is_some() {
                return Err(ApiError::conflict(
                    CODE_PROSPECT_LIMIT_REACHED,
                    ERR_PROSPECT_LIMIT_REACHED,
                ));
            }
        }

        let now = mongodb::bson::DateTime::now();
        let events: Vec<ContactTimeline> = transition
            .events
            .iter()
            .map(|title| ContactTimeline::for_contact(contact, title.clone(), now))
            .collect();
        self.repository.insert_events(&events, session).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contact::fixtures::contact;
    use crate::models::user::fixtures::profile;
    use crate::models::TimeZone;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    fn caller(tenant: ObjectId) -> CurrentUser {
        CurrentUser {
            profile: profile(tenant, "Rob", "Diaz"),
            role: None,
        }
    }

    #[test]
    fn test_locked_by_other_is_forbidden() {
        let tenant = ObjectId::new();
        let me = caller(tenant);
        let mut c = contact(tenant, "Acme Freight");
        assert!(check_access(&me, &c).is_ok());

        c.is_locked = true;
        c.locked_by = Some(ObjectId::new());
        let err = check_access(&me, &c).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.code(), CODE_CONTACT_LOCKED_BY_OTHER);

        let mut root = caller(tenant);
        root.profile.is_superuser = true;
        assert!(check_access(&root, &c).is_ok());

        c.locked_by = Some(me.id());
        assert!(check_access(&me, &c).is_ok());
    }

    #[test]
    fn test_new_contact_defaults() {
        let tenant = ObjectId::new();
        let creator = ObjectId::new();
        let c = new_contact(
            tenant,
            creator,
            CreateContactRequest {
                name: "  Acme Freight ".to_string(),
                address_1: "100 Harbor Way".to_string(),
                address_2: None,
                city: "Savannah".to_string(),
                state: "GA".to_string(),
                zip_code: "31401".to_string(),
                email: Some("Ops@Acme.com".to_string()),
                logo: None,
                timezone: None,
                rating: None,
            },
        );
        assert_eq!(c.name, "Acme Freight");
        assert_eq!(c.email.as_deref(), Some("ops@acme.com"));
        assert_eq!(c.lifecycle_status, Lifecycle::Lead);
        assert_eq!(c.timezone, TimeZone::EST);
        assert_eq!(c.rating, 1);
        assert_eq!(c.created_by, Some(creator));
        assert!(!c.is_locked);
    }

    #[test]
    fn test_update_document_only_sets_given_fields() {
        let set = update_document(UpdateContactRequest {
            name: None,
            address_1: None,
            address_2: None,
            city: Some("Macon".to_string()),
            state: None,
            zip_code: None,
            email: None,
            logo: None,
            timezone: Some(TimeZone::PST),
            rating: Some(4),
        })
        .unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.get_str("city").unwrap(), "Macon");
        assert_eq!(set.get_str("timezone").unwrap(), "PST");
        assert_eq!(set.get_i32("rating").unwrap(), 4);
    }

    #[test]
    fn test_duplicate_name_maps_to_conflict() {
        let err = name_taken(ApiError::conflict(CODE_CONFLICT, "Resource already exists"));
        match err {
            ApiError::Conflict { message, .. } => assert_eq!(message, ERR_CONTACT_EXISTS),
            other => panic!("unexpected error: {}", other),
        }
        let passthrough = name_taken(ApiError::internal("boom"));
        assert_eq!(passthrough.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
