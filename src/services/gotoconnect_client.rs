//! HTTP client for the GoToConnect OAuth and call-control APIs.

use log::{debug, info};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::config::CONFIG;
use crate::errors::ApiError;
use crate::models::GoToTokenResponse;
use crate::utils::mask_secret;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CallLine<'a> {
    line_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CallRequest<'a> {
    dial_string: &'a str,
    from: CallLine<'a>,
}

#[derive(Clone)]
pub struct GoToConnectClient {
    client: Client,
    auth_base_url: String,
    api_base_url: String,
    redirect_uri: String,
}

impl GoToConnectClient {
    pub fn new(auth_base_url: &str, api_base_url: &str, redirect_uri: &str) -> Self {
        Self {
            client: Client::new(),
            auth_base_url: auth_base_url.trim_end_matches('/').to_string(),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            redirect_uri: redirect_uri.to_string(),
        }
    }

    pub fn from_config() -> Self {
        Self::new(
            &CONFIG.goto_auth_base_url,
            &CONFIG.goto_api_base_url,
            &CONFIG.goto_redirect_url(),
        )
    }

    /// Provider login page the user is redirected to.
    pub fn authorization_url(&self, client_id: &str, state: &str) -> String {
        format!(
            "{}/oauth/authorize?response_type=code&client_id={}&redirect_uri={}&state={}",
            self.auth_base_url,
            urlencoding::encode(client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(state)
        )
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
    ) -> Result<GoToTokenResponse, ApiError> {
        let token_url = format!("{}/oauth/token", self.auth_base_url);

        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("client_id", client_id),
        ];

        debug!("Exchanging GoToConnect authorization code {}", mask_secret(code));
        let response = self
            .client
            .post(&token_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&params)
            .send()
            .await?
            .error_for_status()?
            .json::<GoToTokenResponse>()
            .await?;

        Ok(response)
    }

    /// Start an outbound call from `line_id` to `dial_string`.
    pub async fn place_call(
        &self,
        access_token: &str,
        line_id: &str,
        dial_string: &str,
    ) -> Result<Value, ApiError> {
        let calls_url = format!("{}/calls/v2/calls", self.api_base_url);

        let body = CallRequest {
            dial_string,
            from: CallLine { line_id },
        };

        let response = self
            .client
            .post(&calls_url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        info!("GoToConnect call placed from line {}", line_id);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;
    use mockito::Matcher;

    fn client(server: &mockito::ServerGuard) -> GoToConnectClient {
        GoToConnectClient::new(
            &server.url(),
            &server.url(),
            "https://crm.example.com/api/v1/gotoconnect/auth",
        )
    }

    #[test]
    fn test_authorization_url_encodes_parameters() {
        let goto = GoToConnectClient::new(
            "https://auth.example.com/",
            "https://api.example.com",
            "https://crm.example.com/api/v1/gotoconnect/auth",
        );
        let url = goto.authorization_url("client-1", "a.b");
        assert_eq!(
            url,
            "https://auth.example.com/oauth/authorize?response_type=code&client_id=client-1\
             &redirect_uri=https%3A%2F%2Fcrm.example.com%2Fapi%2Fv1%2Fgotoconnect%2Fauth&state=a.b"
        );
    }

    #[tokio::test]
    async fn test_exchange_code() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/oauth/token")
            .match_header("authorization", Matcher::Regex("^Basic ".to_string()))
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
                Matcher::UrlEncoded("code".into(), "abc123".into()),
                Matcher::UrlEncoded("client_id".into(), "client-1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"access_token":"at","refresh_token":"rt","token_type":"Bearer","expires_in":3600}"#,
            )
            .create_async()
            .await;

        let token = client(&server)
            .exchange_code("client-1", "secret", "abc123")
            .await
            .unwrap();
        assert_eq!(token.access_token, "at");
        assert_eq!(token.refresh_token.as_deref(), Some("rt"));
        assert_eq!(token.expires_in, Some(3600));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_exchange_code_rejected_is_bad_gateway() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/oauth/token")
            .with_status(401)
            .with_body(r#"{"error":"invalid_client"}"#)
            .create_async()
            .await;

        let err = client(&server)
            .exchange_code("client-1", "wrong", "abc123")
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_place_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/calls/v2/calls")
            .match_header("authorization", "Bearer at")
            .match_body(Matcher::Json(serde_json::json!({
                "dialString": "+19125550100",
                "from": { "lineId": "line-7" }
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sessionId":"s-1"}"#)
            .create_async()
            .await;

        let reply = client(&server)
            .place_call("at", "line-7", "+19125550100")
            .await
            .unwrap();
        assert_eq!(reply["sessionId"], "s-1");
        mock.assert_async().await;
    }
}
