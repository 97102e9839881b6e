//! GoToConnect integration: tenant credentials, user OAuth and outbound calls.

use log::{info, warn};
use mongodb::bson::Document;
use mongodb::Database;
use serde_json::Value;
use std::sync::Arc;

use crate::constants::{
    CODE_BAD_REQUEST, CODE_GOTO_LINE_MISSING, CODE_GOTO_NOT_CONNECTED,
    CODE_INTEGRATION_NOT_CONFIGURED, ERR_GOTO_CLIENT_ID_MISSING, ERR_GOTO_CLIENT_SECRET_MISSING,
    ERR_GOTO_LINE_MISSING, ERR_GOTO_NOT_LOGGED_IN,
};
use crate::errors::ApiError;
use crate::middleware::require_staff;
use crate::models::{
    AddIntegrationRequest, CurrentUser, GoToConnectConfig, GoToTokenResponse, OAuthCallbackQuery,
    SelectLineRequest,
};
use crate::repositories::GoToConnectRepository;
use crate::services::{AuthService, GoToConnectClient};

pub struct GoToConnectService {
    repository: Arc<GoToConnectRepository>,
    client: GoToConnectClient,
}

fn client_id_of(config: Option<&GoToConnectConfig>) -> Result<&str, ApiError> {
    config
        .and_then(|c| c.client_id.as_deref())
        .ok_or_else(|| {
            ApiError::bad_request(CODE_INTEGRATION_NOT_CONFIGURED, ERR_GOTO_CLIENT_ID_MISSING)
        })
}

fn client_secret_of(config: Option<&GoToConnectConfig>) -> Result<&str, ApiError> {
    config
        .and_then(|c| c.client_secret.as_deref())
        .ok_or_else(|| {
            ApiError::bad_request(
                CODE_INTEGRATION_NOT_CONFIGURED,
                ERR_GOTO_CLIENT_SECRET_MISSING,
            )
        })
}

impl GoToConnectService {
    pub fn new(db: &Database, client: GoToConnectClient) -> Self {
        Self {
            repository: Arc::new(GoToConnectRepository::new(db)),
            client,
        }
    }

    /// Store the tenant's OAuth client credentials. Staff only.
    pub async fn add_integration(
        &self,
        caller: &CurrentUser,
        req: AddIntegrationRequest,
    ) -> Result<(), ApiError> {
        require_staff(caller)?;

        let mut set = Document::new();
        if let Some(client_id) = req.client_id {
            set.insert("client_id", client_id.trim());
        }
        if let Some(client_secret) = req.client_secret {
            set.insert("client_secret", client_secret.trim());
        }
        self.repository
            .upsert_config(caller.tenant_id(), set)
            .await?;
        info!("GoToConnect integration updated for tenant {}", caller.tenant_id());
        Ok(())
    }

    /// Provider URL the caller's browser is redirected to.
    pub async fn login_url(&self, caller: &CurrentUser) -> Result<String, ApiError> {
        let config = self.repository.find_config(caller.tenant_id()).await?;
        let client_id = client_id_of(config.as_ref())?;
        let state = AuthService::generate_oauth_state(caller.id(), caller.tenant_id())?;
        Ok(self.client.authorization_url(client_id, &state))
    }

    /// Finish the OAuth flow started by [`Self::login_url`].
    pub async fn complete_auth(
        &self,
        query: OAuthCallbackQuery,
    ) -> Result<GoToTokenResponse, ApiError> {
        let (Some(code), Some(state)) = (query.code, query.state) else {
            return Err(ApiError::bad_request(
                CODE_BAD_REQUEST,
                "Missing code or state parameter",
            ));
        };
        let (user_id, tenant_id) = AuthService::verify_oauth_state(&state)?;

        let config = self.repository.find_config(tenant_id).await?;
        let client_id = client_id_of(config.as_ref())?;
        let client_secret = client_secret_of(config.as_ref())?;

        let token = self
            .client
            .exchange_code(client_id, client_secret, &code)
            .await?;
        if token.refresh_token.is_none() {
            warn!("GoToConnect returned no refresh token for user {}", user_id);
        }
        self.repository
            .upsert_tokens(
                tenant_id,
                user_id,
                &token.access_token,
                token.refresh_token.as_deref().unwrap_or_default(),
            )
            .await?;

        info!("User {} connected to GoToConnect", user_id);
        Ok(token)
    }

    pub async fn set_line(&self, caller: &CurrentUser, req: SelectLineRequest) -> Result<(), ApiError> {
        if !self.repository.set_line(caller.id(), req.line_id.trim()).await? {
            return Err(ApiError::bad_request(
                CODE_GOTO_NOT_CONNECTED,
                ERR_GOTO_NOT_LOGGED_IN,
            ));
        }
        Ok(())
    }

    pub async fn place_call(&self, caller: &CurrentUser, call_to: &str) -> Result<Value, ApiError> {
        let account = self
            .repository
            .find_user(caller.id())
            .await?
            .ok_or_else(|| ApiError::bad_request(CODE_GOTO_NOT_CONNECTED, ERR_GOTO_NOT_LOGGED_IN))?;
        let line_id = account
            .line_id
            .as_deref()
            .ok_or_else(|| ApiError::bad_request(CODE_GOTO_LINE_MISSING, ERR_GOTO_LINE_MISSING))?;

        self.client
            .place_call(&account.access_token, line_id, call_to.trim())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    fn config(client_id: Option<&str>, client_secret: Option<&str>) -> GoToConnectConfig {
        GoToConnectConfig {
            id: ObjectId::new(),
            tenant_id: ObjectId::new(),
            client_id: client_id.map(String::from),
            client_secret: client_secret.map(String::from),
        }
    }

    #[test]
    fn test_missing_client_id() {
        let err = client_id_of(None).unwrap_err();
        assert_eq!(err.code(), CODE_INTEGRATION_NOT_CONFIGURED);
        assert!(err.to_string().contains(ERR_GOTO_CLIENT_ID_MISSING));

        let partial = config(None, Some("secret"));
        assert!(client_id_of(Some(&partial)).is_err());
    }

    #[test]
    fn test_credentials_present() {
        let full = config(Some("client-1"), Some("secret"));
        assert_eq!(client_id_of(Some(&full)).unwrap(), "client-1");
        assert_eq!(client_secret_of(Some(&full)).unwrap(), "secret");

        let err = client_secret_of(Some(&config(Some("client-1"), None))).unwrap_err();
        assert!(err.to_string().contains(ERR_GOTO_CLIENT_SECRET_MISSING));
    }
}
