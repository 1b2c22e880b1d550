use crate::config::Config;
use crate::error::{auth_error, SyncResult};
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tracing::info;

const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const REDIRECT_URI: &str = "http://localhost:8080";
const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// OAuth token persisted between runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: i64,
}

impl StoredToken {
    /// Whether the access token is still usable
    pub fn is_valid(&self) -> bool {
        self.expires_at > Utc::now().timestamp()
    }
}

/// File-backed credential store for the Google Calendar API.
///
/// Tokens live in a JSON cache on disk; an expired token is refreshed in
/// place, and a missing or unrefreshable one falls back to the interactive
/// browser consent flow.
pub struct TokenStore {
    path: PathBuf,
    client_id: String,
    client_secret: String,
    client: Client,
}

impl TokenStore {
    pub fn new(config: &Config) -> Self {
        Self {
            path: PathBuf::from(&config.token_path),
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            client: Client::new(),
        }
    }

    /// Get a usable access token, loading, refreshing or authorizing as needed
    pub async fn access_token(&self) -> SyncResult<String> {
        if let Some(token) = self.load()? {
            if token.is_valid() {
                return Ok(token.access_token);
            }
            if token.refresh_token.is_some() {
                let refreshed = self.refresh(&token).await?;
                self.persist(&refreshed)?;
                return Ok(refreshed.access_token);
            }
        }

        let token = self.authorize().await?;
        self.persist(&token)?;
        Ok(token.access_token)
    }

    /// Read the persisted token, if any
    pub fn load(&self) -> SyncResult<Option<StoredToken>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let token: StoredToken = serde_json::from_str(&content)?;

        Ok(Some(token))
    }

    /// Write the token cache back to disk
    pub fn persist(&self, token: &StoredToken) -> SyncResult<()> {
        fs::write(&self.path, serde_json::to_string(token)?)?;
        Ok(())
    }

    /// Refresh an expired token, keeping its refresh token
    pub async fn refresh(&self, token: &StoredToken) -> SyncResult<StoredToken> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or_else(|| auth_error("No refresh token in token data"))?;

        let params = [
            ("client_id", self.client_id.clone()),
            ("client_secret", self.client_secret.clone()),
            ("refresh_token", refresh_token.to_string()),
            ("grant_type", "refresh_token".to_string()),
        ];

        let response = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await
            .map_err(|e| auth_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(auth_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let new_token: Value = response
            .json()
            .await
            .map_err(|e| auth_error(&format!("Failed to parse token response: {}", e)))?;

        let access_token = new_token
            .get("access_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| auth_error("Token response missing 'access_token' field"))?
            .to_string();

        let expires_in = new_token
            .get("expires_in")
            .and_then(|v| v.as_i64())
            .unwrap_or(3600);

        Ok(StoredToken {
            access_token,
            refresh_token: Some(refresh_token.to_string()),
            expires_at: Utc::now().timestamp() + expires_in,
        })
    }

    /// Interactive consent flow: open a browser, receive the redirect on a
    /// local server and exchange the authorization code for tokens
    pub async fn authorize(&self) -> SyncResult<StoredToken> {
        let state = uuid::Uuid::new_v4().to_string();

        let auth_url = format!(
            "{}?\
            client_id={}&\
            redirect_uri={}&\
            response_type=code&\
            access_type=offline&\
            prompt=consent&\
            scope={}&\
            state={}",
            AUTH_ENDPOINT, self.client_id, REDIRECT_URI, CALENDAR_SCOPE, state
        );

        info!("Opening browser for Google Calendar authorization");
        webbrowser::open(&auth_url)?;

        // Local server receives the callback
        let server = tiny_http::Server::http("0.0.0.0:8080")
            .map_err(|e| auth_error(&format!("Failed to start callback server: {}", e)))?;
        info!("Waiting for authorization callback");

        let request = server.recv()?;
        let url = request.url().to_string();

        let code = url
            .split("code=")
            .nth(1)
            .and_then(|s| s.split('&').next())
            .ok_or_else(|| auth_error("No authorization code found in callback"))?
            .to_string();

        let response = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("client_id", self.client_id.clone()),
                ("client_secret", self.client_secret.clone()),
                ("code", code),
                ("redirect_uri", REDIRECT_URI.to_string()),
                ("grant_type", "authorization_code".to_string()),
            ])
            .send()
            .await
            .map_err(|e| auth_error(&format!("Failed to exchange code: {}", e)))?;

        if !response.status().is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(auth_error(&format!("Failed to get token: {}", error_body)));
        }

        let token_data: Value = response
            .json()
            .await
            .map_err(|e| auth_error(&format!("Failed to parse token response: {}", e)))?;

        let access_token = token_data
            .get("access_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| auth_error("Token response missing 'access_token' field"))?
            .to_string();

        let refresh_token = token_data
            .get("refresh_token")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let expires_in = token_data
            .get("expires_in")
            .and_then(|v| v.as_i64())
            .unwrap_or(3600);

        // Tell the browser the flow finished
        let reply =
            tiny_http::Response::from_string("Authorization successful! You can close this window.");
        request.respond(reply)?;

        Ok(StoredToken {
            access_token,
            refresh_token,
            expires_at: Utc::now().timestamp() + expires_in,
        })
    }
}
