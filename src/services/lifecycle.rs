//! Contact lifecycle rules: locking, unlocking and status conversion.
//!
//! Every function here mutates the in-memory [`Contact`] and returns a
//! [`Transition`] describing the counter changes and timeline titles the
//! caller must persist together. Nothing in this module touches the database,
//! so the rules are exercised directly by the unit tests below.

use chrono::{DateTime, Duration, Utc};
use mongodb::bson::oid::ObjectId;

use crate::constants::{
    CODE_CONTACT_ALREADY_LOCKED, CODE_CONTACT_ALREADY_UNLOCKED, CODE_CONTACT_COOLDOWN,
    CODE_CUSTOMER_NOT_LOCKABLE, CODE_FORBIDDEN, CODE_PROSPECT_LIMIT_REACHED,
    ERR_CONTACT_ALREADY_LOCKED, ERR_CONTACT_ALREADY_UNLOCKED, ERR_CUSTOMER_NOT_LOCKABLE,
    ERR_ONLY_OWNER_DEMOTES_CUSTOMER, ERR_PROSPECT_LIMIT_REACHED,
};
use crate::errors::ApiError;
use crate::models::{Contact, Lifecycle, Tenant, UserProfile};

pub const LOCK_EXPIRED_TITLE: &str = "Contact lock expired";

/// Profile counters maintained by the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    ContactsLocked,
    Customers,
}

impl Counter {
    pub fn field(&self) -> &'static str {
        match self {
            Counter::ContactsLocked => "total_contacts_locked",
            Counter::Customers => "total_customers",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterChange {
    pub user_id: ObjectId,
    pub counter: Counter,
    pub delta: i32,
}

/// Side effects of one lifecycle step.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Transition {
    pub counters: Vec<CounterChange>,
    pub events: Vec<String>,
    /// Ceiling the holder's locked counter must stay under when it grows.
    pub prospect_limit: Option<i32>,
}

impl Transition {
    /// No-op transitions (converting to the current status) persist nothing.
    pub fn is_noop(&self) -> bool {
        self.counters.is_empty() && self.events.is_empty()
    }

    fn bump(&mut self, user_id: ObjectId, counter: Counter, delta: i32) {
        self.counters.push(CounterChange {
            user_id,
            counter,
            delta,
        });
    }
}

fn bson_time(now: DateTime<Utc>) -> mongodb::bson::DateTime {
    mongodb::bson::DateTime::from_chrono(now)
}

/// Locks taken at or before the returned instant are past `lock_expiry_days`.
///
/// `None` when the window reaches beyond the representable date range.
pub fn lock_cutoff(now: DateTime<Utc>, lock_expiry_days: i32) -> Option<DateTime<Utc>> {
    now.checked_sub_signed(Duration::try_days(i64::from(lock_expiry_days))?)
}

/// Time left before `user` may re-lock a contact they released.
///
/// Only the user who last held the lock is subject to the cooldown; it runs
/// from the moment the contact was unlocked.
pub fn cooldown_remaining(
    contact: &Contact,
    user: &UserProfile,
    tenant: &Tenant,
    now: DateTime<Utc>,
) -> Duration {
    let (Some(last), Some(unlocked_on)) = (contact.last_locked_by, contact.unlocked_on) else {
        return Duration::zero();
    };
    if last != user.id {
        return Duration::zero();
    }
    let Some(window) = Duration::try_days(i64::from(tenant.prospect_cooldown_days)) else {
        return Duration::zero();
    };
    let elapsed = now.signed_duration_since(unlocked_on.to_chrono());
    window
        .checked_sub(&elapsed)
        .map_or(Duration::zero(), |remaining| remaining.max(Duration::zero()))
}

/// Renders a cooldown as `"{d}d {h}h {m}m"`, rounding up to the next minute.
pub fn format_remaining(remaining: Duration) -> String {
    let millis = remaining.num_milliseconds().max(0);
    let minutes = (millis + 59_999) / 60_000;
    format!(
        "{}d {}h {}m",
        minutes / (24 * 60),
        (minutes / 60) % 24,
        minutes % 60
    )
}

/// Claim `contact` for `user`. A LEAD is promoted to PROSPECT on the way.
///
/// Customers are stored locked, so they are rejected before the
/// already-locked check.
pub fn lock(
    contact: &mut Contact,
    user: &UserProfile,
    tenant: &Tenant,
    now: DateTime<Utc>,
) -> Result<Transition, ApiError> {
    if contact.lifecycle_status == Lifecycle::Customer {
        return Err(ApiError::bad_request(
            CODE_CUSTOMER_NOT_LOCKABLE,
            ERR_CUSTOMER_NOT_LOCKABLE,
        ));
    }
    if contact.is_locked {
        return Err(ApiError::conflict(
            CODE_CONTACT_ALREADY_LOCKED,
            ERR_CONTACT_ALREADY_LOCKED,
        ));
    }
    let remaining = cooldown_remaining(contact, user, tenant, now);
    if remaining > Duration::zero() {
        return Err(ApiError::conflict(
            CODE_CONTACT_COOLDOWN,
            format!("Cannot lock prospect for {}", format_remaining(remaining)),
        ));
    }
    if user.total_contacts_locked >= tenant.max_prospects_per_user {
        return Err(ApiError::conflict(
            CODE_PROSPECT_LIMIT_REACHED,
            ERR_PROSPECT_LIMIT_REACHED,
        ));
    }

    let stamp = bson_time(now);
    contact.is_locked = true;
    contact.locked_on = Some(stamp);
    contact.locked_by = Some(user.id);
    contact.customer_of = None;

    let mut transition = Transition {
        prospect_limit: Some(tenant.max_prospects_per_user),
        ..Transition::default()
    };
    transition.bump(user.id, Counter::ContactsLocked, 1);
    transition
        .events
        .push(format!("Contact Locked By: {}", user.display_name()));

    if contact.lifecycle_status == Lifecycle::Lead {
        transition.events.push(set_status(contact, Lifecycle::Prospect, now));
    }
    Ok(transition)
}

/// Release the lock held on `contact`. `actor` is the user performing it,
/// which may differ from the holder when a superuser steps in.
pub fn unlock(
    contact: &mut Contact,
    actor: &UserProfile,
    now: DateTime<Utc>,
) -> Result<Transition, ApiError> {
    if !contact.is_locked {
        return Err(ApiError::conflict(
            CODE_CONTACT_ALREADY_UNLOCKED,
            ERR_CONTACT_ALREADY_UNLOCKED,
        ));
    }
    if contact.lifecycle_status == Lifecycle::Customer {
        return Err(ApiError::bad_request(
            CODE_CUSTOMER_NOT_LOCKABLE,
            ERR_CUSTOMER_NOT_LOCKABLE,
        ));
    }

    let mut transition = release(contact, now);
    transition
        .events
        .push(format!("Contact unlocked by: {}", actor.full_name()));
    Ok(transition)
}

/// True when the periodic job should release this contact's lock.
pub fn is_lock_expired(contact: &Contact, tenant: &Tenant, now: DateTime<Utc>) -> bool {
    if !contact.is_locked
        || contact.lifecycle_status != Lifecycle::Prospect
        || contact.locked_by.is_none()
    {
        return false;
    }
    match (contact.locked_on, lock_cutoff(now, tenant.lock_expiry_days)) {
        (Some(locked_on), Some(cutoff)) => locked_on.to_chrono() <= cutoff,
        _ => false,
    }
}

/// Release an expired lock. The holder's cooldown starts now.
pub fn expire_lock(contact: &mut Contact, now: DateTime<Utc>) -> Transition {
    let mut transition = release(contact, now);
    transition.events.push(LOCK_EXPIRED_TITLE.to_string());
    transition
}

fn release(contact: &mut Contact, now: DateTime<Utc>) -> Transition {
    let mut transition = Transition::default();
    if let Some(holder) = contact.locked_by.take() {
        transition.bump(holder, Counter::ContactsLocked, -1);
        contact.last_locked_by = Some(holder);
    }
    contact.is_locked = false;
    contact.unlocked_on = Some(bson_time(now));
    transition
}

/// Mark `contact` as a customer of `user`.
pub fn convert_to_customer(
    contact: &mut Contact,
    user: &UserProfile,
    now: DateTime<Utc>,
) -> Transition {
    let mut transition = Transition::default();
    if contact.lifecycle_status == Lifecycle::Customer {
        return transition;
    }
    if contact.is_locked {
        if let Some(holder) = contact.locked_by {
            transition.bump(holder, Counter::ContactsLocked, -1);
        }
    }
    contact.customer_of = Some(user.id);
    contact.is_locked = true;
    contact.locked_by = None;
    transition.bump(user.id, Counter::Customers, 1);
    transition
        .events
        .push(set_status(contact, Lifecycle::Customer, now));
    transition
}

/// Move `contact` to PROSPECT.
///
/// From LEAD this is a lock by `user` (quota and cooldown apply). From
/// CUSTOMER only the owning user, or someone allowed to change contacts, may
/// demote it; the contact comes back unlocked.
pub fn convert_to_prospect(
    contact: &mut Contact,
    user: &UserProfile,
    can_change_contacts: bool,
    tenant: &Tenant,
    now: DateTime<Utc>,
) -> Result<Transition, ApiError> {
    match contact.lifecycle_status {
        Lifecycle::Prospect => Ok(Transition::default()),
        Lifecycle::Lead => lock(contact, user, tenant, now),
        Lifecycle::Customer => {
            let owner = contact.customer_of;
            if owner != Some(user.id) && !can_change_contacts {
                return Err(ApiError::forbidden(
                    CODE_FORBIDDEN,
                    ERR_ONLY_OWNER_DEMOTES_CUSTOMER,
                ));
            }
            let mut transition = Transition::default();
            if let Some(owner) = owner {
                transition.bump(owner, Counter::Customers, -1);
            }
            contact.customer_of = None;
            contact.is_locked = false;
            contact.locked_by = None;
            transition
                .events
                .push(set_status(contact, Lifecycle::Prospect, now));
            Ok(transition)
        }
    }
}

fn set_status(contact: &mut Contact, status: Lifecycle, now: DateTime<Utc>) -> String {
    let title = format!(
        "Contact updated from {} to {}",
        contact.lifecycle_status, status
    );
    contact.lifecycle_status = status;
    contact.lifecycle_updated_on = Some(bson_time(now));
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contact::fixtures::contact;
    use crate::models::user::fixtures::profile;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    fn tenant() -> Tenant {
        Tenant {
            id: ObjectId::new(),
            name: "Blue Ridge Logistics".to_string(),
            subdomain_prefix: "blueridge".to_string(),
            max_prospects_per_user: 2,
            prospect_cooldown_days: 3,
            lock_expiry_days: 30,
            created_at: mongodb::bson::DateTime::now(),
        }
    }

    fn setup() -> (Tenant, Contact, UserProfile) {
        let t = tenant();
        let c = contact(t.id, "Acme Freight");
        let u = profile(t.id, "Dana", "Reyes");
        (t, c, u)
    }

    #[test]
    fn test_lock_promotes_lead() {
        let (t, mut c, u) = setup();
        let now = Utc::now();
        let transition = lock(&mut c, &u, &t, now).unwrap();

        assert!(c.is_locked);
        assert_eq!(c.locked_by, Some(u.id));
        assert_eq!(c.lifecycle_status, Lifecycle::Prospect);
        assert!(c.lifecycle_updated_on.is_some());
        assert_eq!(
            transition.counters,
            vec![CounterChange {
                user_id: u.id,
                counter: Counter::ContactsLocked,
                delta: 1
            }]
        );
        assert_eq!(transition.prospect_limit, Some(t.max_prospects_per_user));
        assert_eq!(
            transition.events,
            vec![
                "Contact Locked By: Dana Reyes <dana@example.com>".to_string(),
                "Contact updated from LEAD to PROSPECT".to_string(),
            ]
        );
    }

    #[test]
    fn test_lock_already_locked_is_conflict() {
        let (t, mut c, u) = setup();
        lock(&mut c, &u, &t, Utc::now()).unwrap();
        let err = lock(&mut c, &u, &t, Utc::now()).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.code(), CODE_CONTACT_ALREADY_LOCKED);
    }

    #[test]
    fn test_customer_cannot_be_locked() {
        let (t, mut c, u) = setup();
        convert_to_customer(&mut c, &u, Utc::now());
        let err = lock(&mut c, &u, &t, Utc::now()).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), CODE_CUSTOMER_NOT_LOCKABLE);
    }

    #[test]
    fn test_quota_reached() {
        let (t, mut c, mut u) = setup();
        u.total_contacts_locked = t.max_prospects_per_user;
        let err = lock(&mut c, &u, &t, Utc::now()).unwrap_err();
        assert_eq!(err.code(), CODE_PROSPECT_LIMIT_REACHED);
        assert!(!c.is_locked);
    }

    #[test]
    fn test_cooldown_blocks_relock_within_window() {
        let (t, mut c, u) = setup();
        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        lock(&mut c, &u, &t, start).unwrap();
        unlock(&mut c, &u, start).unwrap();

        let later = start + Duration::days(1) + Duration::hours(2);
        let err = lock(&mut c, &u, &t, later).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.code(), CODE_CONTACT_COOLDOWN);
        assert!(err.to_string().contains("Cannot lock prospect for 1d 22h 0m"));

        let after = start + Duration::days(3) + Duration::seconds(1);
        assert!(lock(&mut c, &u, &t, after).is_ok());
    }

    #[test]
    fn test_cooldown_only_applies_to_previous_holder() {
        let (t, mut c, u) = setup();
        let other = profile(t.id, "Rob", "Diaz");
        let now = Utc::now();
        lock(&mut c, &u, &t, now).unwrap();
        unlock(&mut c, &u, now).unwrap();

        assert_eq!(cooldown_remaining(&c, &other, &t, now), Duration::zero());
        assert!(lock(&mut c, &other, &t, now).is_ok());
        assert_eq!(c.locked_by, Some(other.id));
    }

    #[test]
    fn test_zero_day_cooldown() {
        let (mut t, mut c, u) = setup();
        t.prospect_cooldown_days = 0;
        let now = Utc::now();
        lock(&mut c, &u, &t, now).unwrap();
        unlock(&mut c, &u, now).unwrap();
        assert!(lock(&mut c, &u, &t, now).is_ok());
    }

    #[test]
    fn test_unlock_moves_holder_to_last_locked_by() {
        let (t, mut c, u) = setup();
        let now = Utc::now();
        lock(&mut c, &u, &t, now).unwrap();
        let transition = unlock(&mut c, &u, now).unwrap();

        assert!(!c.is_locked);
        assert_eq!(c.locked_by, None);
        assert_eq!(c.last_locked_by, Some(u.id));
        assert_eq!(c.unlocked_on, Some(mongodb::bson::DateTime::from_chrono(now)));
        assert_eq!(c.lifecycle_status, Lifecycle::Prospect);
        assert_eq!(transition.counters[0].delta, -1);
        assert_eq!(transition.events, vec!["Contact unlocked by: Dana Reyes".to_string()]);
    }

    #[test]
    fn test_unlock_by_superuser_decrements_holder() {
        let (t, mut c, u) = setup();
        let mut admin = profile(t.id, "Root", "Admin");
        admin.is_superuser = true;
        lock(&mut c, &u, &t, Utc::now()).unwrap();

        let transition = unlock(&mut c, &admin, Utc::now()).unwrap();
        assert_eq!(transition.counters[0].user_id, u.id);
        assert_eq!(transition.events[0], "Contact unlocked by: Root Admin");
    }

    #[test]
    fn test_unlock_already_unlocked() {
        let (_, mut c, u) = setup();
        let err = unlock(&mut c, &u, Utc::now()).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.code(), CODE_CONTACT_ALREADY_UNLOCKED);
    }

    #[test]
    fn test_unlock_customer_is_bad_request() {
        let (_, mut c, u) = setup();
        convert_to_customer(&mut c, &u, Utc::now());
        let err = unlock(&mut c, &u, Utc::now()).unwrap_err();
        assert_eq!(err.code(), CODE_CUSTOMER_NOT_LOCKABLE);
    }

    #[test]
    fn test_convert_locked_prospect_to_customer() {
        let (t, mut c, u) = setup();
        lock(&mut c, &u, &t, Utc::now()).unwrap();
        let transition = convert_to_customer(&mut c, &u, Utc::now());

        assert_eq!(c.lifecycle_status, Lifecycle::Customer);
        assert_eq!(c.customer_of, Some(u.id));
        assert!(c.is_locked);
        assert_eq!(c.locked_by, None);
        assert_eq!(
            transition.counters,
            vec![
                CounterChange {
                    user_id: u.id,
                    counter: Counter::ContactsLocked,
                    delta: -1
                },
                CounterChange {
                    user_id: u.id,
                    counter: Counter::Customers,
                    delta: 1
                },
            ]
        );
        assert_eq!(
            transition.events,
            vec!["Contact updated from PROSPECT to CUSTOMER".to_string()]
        );
    }

    #[test]
    fn test_convert_unlocked_lead_to_customer() {
        let (_, mut c, u) = setup();
        let transition = convert_to_customer(&mut c, &u, Utc::now());
        assert_eq!(transition.counters.len(), 1);
        assert_eq!(transition.counters[0].counter, Counter::Customers);
        assert_eq!(transition.events[0], "Contact updated from LEAD to CUSTOMER");
    }

    #[test]
    fn test_convert_to_same_status_is_noop() {
        let (t, mut c, u) = setup();
        convert_to_customer(&mut c, &u, Utc::now());
        assert!(convert_to_customer(&mut c, &u, Utc::now()).is_noop());

        let mut prospect = contact(t.id, "Harbor Co");
        prospect.lifecycle_status = Lifecycle::Prospect;
        assert!(convert_to_prospect(&mut prospect, &u, false, &t, Utc::now())
            .unwrap()
            .is_noop());
    }

    #[test]
    fn test_convert_lead_to_prospect_locks() {
        let (t, mut c, u) = setup();
        let transition = convert_to_prospect(&mut c, &u, false, &t, Utc::now()).unwrap();
        assert!(c.is_locked);
        assert_eq!(c.locked_by, Some(u.id));
        assert_eq!(c.lifecycle_status, Lifecycle::Prospect);
        assert_eq!(transition.events.len(), 2);
    }

    #[test]
    fn test_owner_demotes_customer() {
        let (t, mut c, u) = setup();
        convert_to_customer(&mut c, &u, Utc::now());
        let transition = convert_to_prospect(&mut c, &u, false, &t, Utc::now()).unwrap();

        assert_eq!(c.lifecycle_status, Lifecycle::Prospect);
        assert_eq!(c.customer_of, None);
        assert!(!c.is_locked);
        assert_eq!(
            transition.counters,
            vec![CounterChange {
                user_id: u.id,
                counter: Counter::Customers,
                delta: -1
            }]
        );
        assert_eq!(
            transition.events,
            vec!["Contact updated from CUSTOMER to PROSPECT".to_string()]
        );
    }

    #[test]
    fn test_non_owner_cannot_demote_customer() {
        let (t, mut c, u) = setup();
        let other = profile(t.id, "Rob", "Diaz");
        convert_to_customer(&mut c, &u, Utc::now());

        let err = convert_to_prospect(&mut c, &other, false, &t, Utc::now()).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(c.lifecycle_status, Lifecycle::Customer);

        let transition = convert_to_prospect(&mut c, &other, true, &t, Utc::now()).unwrap();
        assert_eq!(transition.counters[0].user_id, u.id);
    }

    #[test]
    fn test_lock_expiry() {
        let (t, mut c, u) = setup();
        let start = Utc::now();
        lock(&mut c, &u, &t, start).unwrap();

        assert!(!is_lock_expired(&c, &t, start + Duration::days(29)));
        let expired_at = start + Duration::days(30);
        assert!(is_lock_expired(&c, &t, expired_at));

        let transition = expire_lock(&mut c, expired_at);
        assert!(!c.is_locked);
        assert_eq!(c.last_locked_by, Some(u.id));
        assert_eq!(transition.counters[0].delta, -1);
        assert_eq!(transition.events, vec![LOCK_EXPIRED_TITLE.to_string()]);
        assert!(!is_lock_expired(&c, &t, expired_at));
    }

    #[test]
    fn test_customers_never_expire() {
        let (t, mut c, u) = setup();
        convert_to_customer(&mut c, &u, Utc::now());
        c.locked_on = Some(mongodb::bson::DateTime::from_chrono(
            Utc::now() - Duration::days(365),
        ));
        assert!(!is_lock_expired(&c, &t, Utc::now()));
    }

    #[test]
    fn test_lock_expiry_with_huge_window_never_fires() {
        let (mut t, mut c, u) = setup();
        t.lock_expiry_days = i32::MAX;
        let start = Utc::now();
        lock(&mut c, &u, &t, start).unwrap();
        assert!(!is_lock_expired(&c, &t, start + Duration::days(3650)));
    }

    #[test]
    fn test_lock_cutoff() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(lock_cutoff(now, 30), Some(now - Duration::days(30)));
        assert_eq!(lock_cutoff(now, 0), Some(now));
        assert_eq!(lock_cutoff(now, i32::MAX), None);
    }

    #[test]
    fn test_lock_cutoff_boundary_is_inclusive() {
        let (t, mut c, u) = setup();
        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        lock(&mut c, &u, &t, start).unwrap();

        let at = start + Duration::days(30);
        assert_eq!(lock_cutoff(at, t.lock_expiry_days), Some(start));
        assert!(is_lock_expired(&c, &t, at));
        assert!(!is_lock_expired(&c, &t, at - Duration::seconds(1)));
    }

    #[test]
    fn test_huge_cooldown_does_not_block_forever_by_overflow() {
        let (mut t, mut c, u) = setup();
        let now = Utc::now();
        lock(&mut c, &u, &t, now).unwrap();
        unlock(&mut c, &u, now).unwrap();
        t.prospect_cooldown_days = i32::MAX;
        assert!(cooldown_remaining(&c, &u, &t, now) > Duration::days(365));
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(Duration::minutes(0)), "0d 0h 0m");
        assert_eq!(
            format_remaining(Duration::days(2) + Duration::hours(5) + Duration::minutes(7)),
            "2d 5h 7m"
        );
    }

    #[test]
    fn test_format_remaining_rounds_up_partial_minutes() {
        assert_eq!(format_remaining(Duration::seconds(30)), "0d 0h 1m");
        assert_eq!(format_remaining(Duration::milliseconds(1)), "0d 0h 1m");
        assert_eq!(
            format_remaining(Duration::hours(23) + Duration::minutes(59) + Duration::seconds(1)),
            "1d 0h 0m"
        );
    }

    #[test]
    fn test_cooldown_under_a_minute_still_reports_time_left() {
        let (t, mut c, u) = setup();
        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        lock(&mut c, &u, &t, start).unwrap();
        unlock(&mut c, &u, start).unwrap();

        let almost = start + Duration::days(3) - Duration::seconds(20);
        let err = lock(&mut c, &u, &t, almost).unwrap_err();
        assert!(err.to_string().contains("Cannot lock prospect for 0d 0h 1m"));
    }
}
