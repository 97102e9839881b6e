//! Periodic release of expired contact locks.

use chrono::{DateTime, Utc};
use cron::Schedule;
use log::{error, info, warn};
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use crate::errors::ApiError;
use crate::models::Tenant;
use crate::services::{ContactService, TenantService};

pub struct UnlockProspectsJob {
    schedule: Schedule,
    contacts: Arc<ContactService>,
    tenants: Arc<TenantService>,
}

/// Time until the next firing of `schedule` after `now`.
pub fn next_delay(schedule: &Schedule, now: DateTime<Utc>) -> Option<std::time::Duration> {
    let next = schedule.after(&now).next()?;
    (next - now).to_std().ok()
}

impl UnlockProspectsJob {
    pub fn new(
        expression: &str,
        contacts: Arc<ContactService>,
        tenants: Arc<TenantService>,
    ) -> Result<Self, ApiError> {
        let schedule = Schedule::from_str(expression).map_err(|e| {
            ApiError::internal(format!("Invalid cron expression '{}': {}", expression, e))
        })?;
        Ok(Self {
            schedule,
            contacts,
            tenants,
        })
    }

    /// Run forever on the configured schedule.
    pub fn spawn(self) {
        tokio::spawn(async move {
            info!("Unlock prospects job scheduled");
            loop {
                let Some(delay) = next_delay(&self.schedule, Utc::now()) else {
                    warn!("Cron schedule has no upcoming run, stopping unlock prospects job");
                    break;
                };
                tokio::time::sleep(delay).await;
                self.run_once(Utc::now()).await;
            }
        });
    }

    /// One pass over every tenant. A failing tenant is logged and skipped.
    pub async fn run_once(&self, now: DateTime<Utc>) -> usize {
        let tenants = match self.tenants.find_all().await {
            Ok(tenants) => tenants,
            Err(err) => {
                error!("Unlock prospects job could not load tenants: {}", err);
                return 0;
            }
        };

        let contacts = Arc::clone(&self.contacts);
        let released = release_across(&tenants, |tenant: &Tenant| {
            let contacts = Arc::clone(&contacts);
            let tenant = tenant.clone();
            async move { contacts.expire_stale_locks(&tenant, now).await }
        })
        .await;
        info!(
            "Unlock prospects job finished: {} locks released across {} tenants",
            released,
            tenants.len()
        );
        released
    }
}

/// Run `release` for each tenant in turn and sum what it released. A failing
/// tenant is logged and the pass moves on.
pub async fn release_across<F, Fut>(tenants: &[Tenant], mut release: F) -> usize
where
    F: FnMut(&Tenant) -> Fut,
    Fut: Future<Output = Result<usize, ApiError>>,
{
    let mut released = 0;
    for tenant in tenants {
        match release(tenant).await {
            Ok(count) => {
                if count > 0 {
                    info!(
                        "Released {} expired locks in tenant {}",
                        count, tenant.subdomain_prefix
                    );
                }
                released += count;
            }
            Err(err) => error!(
                "Unlock prospects job failed for tenant {}: {}",
                tenant.subdomain_prefix, err
            ),
        }
    }
    released
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mongodb::bson::oid::ObjectId;

    fn tenant(prefix: &str) -> Tenant {
        Tenant {
            id: ObjectId::new(),
            name: prefix.to_uppercase(),
            subdomain_prefix: prefix.to_string(),
            max_prospects_per_user: 5,
            prospect_cooldown_days: 3,
            lock_expiry_days: 30,
            created_at: mongodb::bson::DateTime::now(),
        }
    }

    #[test]
    fn test_weekly_schedule_delay() {
        let schedule = Schedule::from_str("0 30 0 * * Mon").unwrap();
        // Sunday 2024-03-03 23:00 UTC
        let now = Utc.with_ymd_and_hms(2024, 3, 3, 23, 0, 0).unwrap();
        let delay = next_delay(&schedule, now).unwrap();
        assert_eq!(delay, std::time::Duration::from_secs(90 * 60));
    }

    #[test]
    fn test_delay_skips_current_instant() {
        let schedule = Schedule::from_str("0 30 0 * * Mon").unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 0, 30, 0).unwrap();
        let delay = next_delay(&schedule, now).unwrap();
        assert_eq!(delay, std::time::Duration::from_secs(7 * 24 * 60 * 60));
    }

    #[test]
    fn test_invalid_expression() {
        assert!(Schedule::from_str("every monday").is_err());
    }

    #[tokio::test]
    async fn test_failing_tenant_does_not_stop_the_pass() {
        let tenants = vec![tenant("alpha"), tenant("broken"), tenant("gamma")];
        let mut visited = Vec::new();
        let released = release_across(&tenants, |t: &Tenant| {
            visited.push(t.subdomain_prefix.clone());
            let outcome = if t.subdomain_prefix == "broken" {
                Err(ApiError::internal("database unavailable"))
            } else {
                Ok(2)
            };
            async move { outcome }
        })
        .await;

        assert_eq!(released, 4);
        assert_eq!(visited, vec!["alpha", "broken", "gamma"]);
    }

    #[tokio::test]
    async fn test_no_tenants_releases_nothing() {
        let released = release_across(&[], |_: &Tenant| async { Ok(1) }).await;
        assert_eq!(released, 0);
    }
}
