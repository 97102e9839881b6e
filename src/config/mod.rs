use std::env;

use lazy_static::lazy_static;

lazy_static! {
    pub static ref CONFIG: Config = Config::from_env();
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub base_url: String,
    pub mongodb_uri: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub seed_admin: bool,
    pub admin_tenant_name: String,
    pub admin_tenant_subdomain: String,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_first_name: String,
    pub admin_last_name: String,
    pub goto_auth_base_url: String,
    pub goto_api_base_url: String,
    pub unlock_prospects_cron: String,
    pub password_reset_expiry_hours: i64,
    pub smtp_host: Option<String>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub email_from: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a valid number"),
            base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database_name: env::var("DATABASE_NAME")
                .unwrap_or_else(|_| "logistics_crm".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-super-secret-jwt-key-change-in-production".to_string()),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a valid number"),
            seed_admin: parse_flag(env::var("SEED_ADMIN").ok().as_deref()),
            admin_tenant_name: env::var("ADMIN_TENANT_NAME")
                .unwrap_or_else(|_| "Default".to_string()),
            admin_tenant_subdomain: env::var("ADMIN_TENANT_SUBDOMAIN")
                .unwrap_or_else(|_| "default".to_string()),
            admin_email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string()),
            admin_password: env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| "Admin@123456".to_string()),
            admin_first_name: env::var("ADMIN_FIRST_NAME").unwrap_or_else(|_| "System".to_string()),
            admin_last_name: env::var("ADMIN_LAST_NAME")
                .unwrap_or_else(|_| "Administrator".to_string()),
            goto_auth_base_url: env::var("GOTO_AUTH_BASE_URL")
                .unwrap_or_else(|_| "https://authentication.logmeininc.com".to_string()),
            goto_api_base_url: env::var("GOTO_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.jive.com".to_string()),
            // sec min hour day-of-month month day-of-week
            unlock_prospects_cron: env::var("UNLOCK_PROSPECTS_CRON")
                .unwrap_or_else(|_| "0 30 0 * * Mon".to_string()),
            password_reset_expiry_hours: env::var("PASSWORD_RESET_EXPIRY_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("PASSWORD_RESET_EXPIRY_HOURS must be a valid number"),
            smtp_host: non_empty(env::var("SMTP_HOST").ok()),
            smtp_username: non_empty(env::var("SMTP_USERNAME").ok()),
            smtp_password: non_empty(env::var("SMTP_PASSWORD").ok()),
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "no-reply@logistics-crm.local".to_string()),
        }
    }

    /// Callback registered with GoToConnect for the OAuth authorization code.
    pub fn goto_redirect_url(&self) -> String {
        format!("{}/api/v1/gotoconnect/auth", self.base_url)
    }
}

fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_lowercase()).as_deref(),
        Some("1") | Some("true") | Some("yes") | Some("on")
    )
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag(Some("true")));
        assert!(parse_flag(Some(" YES ")));
        assert!(parse_flag(Some("1")));
        assert!(!parse_flag(Some("false")));
        assert!(!parse_flag(Some("")));
        assert!(!parse_flag(None));
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("smtp.example.com".into())).as_deref(), Some("smtp.example.com"));
        assert_eq!(non_empty(Some("   ".into())), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_goto_redirect_url() {
        let mut config = CONFIG.clone();
        config.base_url = "https://crm.example.com".to_string();
        assert_eq!(
            config.goto_redirect_url(),
            "https://crm.example.com/api/v1/gotoconnect/auth"
        );
    }
}
