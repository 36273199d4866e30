use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use json::JsonValue;
use std::{
    fs,
    path::{Path, PathBuf},
};
use time::OffsetDateTime;
use tracing::{info, warn};
use yup_oauth2::{
    authenticator_delegate::InstalledFlowDelegate,
    storage::{TokenInfo, TokenStorage},
    ApplicationSecret, InstalledFlowAuthenticator, InstalledFlowReturnMethod,
};

pub const YOUTUBE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/youtube.readonly";
pub const DEFAULT_REDIRECT_PORT: u16 = 8080;

/// Reads Google's `client_secret.json` (`installed` or `web` section).
pub async fn load_client_secret(path: &Path) -> Result<ApplicationSecret> {
    yup_oauth2::read_application_secret(path)
        .await
        .map_err(|e| Error::Config(format!("cannot read client secret {}: {}", path.display(), e)))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credentials {
    pub fn to_json(&self) -> JsonValue {
        let mut value = JsonValue::new_object();
        value["access_token"] = self.access_token.clone().into();
        if let Some(refresh_token) = &self.refresh_token {
            value["refresh_token"] = refresh_token.clone().into();
        }
        if let Some(expires_at) = &self.expires_at {
            value["expires_at"] = expires_at.to_rfc3339().into();
        }
        value
    }

    pub fn from_json(value: &JsonValue) -> Result<Self> {
        let access_token = value["access_token"]
            .as_str()
            .ok_or_else(|| Error::Auth("cached token has no access_token".to_owned()))?
            .to_owned();
        let expires_at = match value["expires_at"].as_str() {
            Some(text) => Some(
                DateTime::parse_from_rfc3339(text)
                    .map_err(|e| Error::Auth(format!("bad expires_at in cached token: {}", e)))?
                    .with_timezone(&Utc),
            ),
            None => None,
        };
        Ok(Credentials {
            access_token,
            refresh_token: value["refresh_token"].as_str().map(str::to_owned),
            expires_at,
        })
    }
}

impl From<TokenInfo> for Credentials {
    fn from(token: TokenInfo) -> Self {
        Credentials {
            access_token: token.access_token.unwrap_or_default(),
            refresh_token: token.refresh_token,
            expires_at: token
                .expires_at
                .and_then(|at| Utc.timestamp_opt(at.unix_timestamp(), 0).single()),
        }
    }
}

impl From<Credentials> for TokenInfo {
    fn from(credentials: Credentials) -> Self {
        TokenInfo {
            access_token: Some(credentials.access_token),
            refresh_token: credentials.refresh_token,
            expires_at: credentials
                .expires_at
                .and_then(|at| OffsetDateTime::from_unix_timestamp(at.timestamp()).ok()),
            id_token: None,
        }
    }
}

/// The on-disk token cache. Reads and writes a single JSON file.
///
/// Only the read-only scope is ever requested, so one token is kept
/// regardless of the scopes asked for.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        CredentialStore { path: path.into() }
    }

    pub fn load(&self) -> Result<Option<Credentials>> {
        if !self.path.exists() {
            return Ok(None);
        }
        info!("Loading Credentials From File...");
        let text = fs::read_to_string(&self.path)?;
        Credentials::from_json(&json::parse(&text)?).map(Some)
    }

    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        info!("Saving Credentials for Future Use...");
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, credentials.to_json().pretty(2))?;
        Ok(())
    }
}

#[async_trait]
impl TokenStorage for CredentialStore {
    /// Refresh responses usually omit `refresh_token`; the cached one is
    /// carried over in that case.
    async fn set(&self, _scopes: &[&str], token: TokenInfo) -> anyhow::Result<()> {
        let mut credentials = Credentials::from(token);
        if credentials.refresh_token.is_none() {
            credentials.refresh_token = self
                .load()
                .ok()
                .flatten()
                .and_then(|cached| cached.refresh_token);
        }
        self.save(&credentials)?;
        Ok(())
    }

    async fn get(&self, _scopes: &[&str]) -> Option<TokenInfo> {
        match self.load() {
            Ok(cached) => cached.map(TokenInfo::from),
            Err(e) => {
                warn!("Ignoring unreadable token cache {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

/// Installed-app OAuth. A cached token is used while valid, an expired one
/// is refreshed, and when there is no refresh token (or the refresh is
/// rejected) the user is sent through consent with the redirect caught on
/// `127.0.0.1`. Every new token is written back to the store.
pub struct Authenticator {
    secret: ApplicationSecret,
    return_method: InstalledFlowReturnMethod,
    flow_delegate: Option<Box<dyn InstalledFlowDelegate>>,
}

impl Authenticator {
    pub fn new(secret: ApplicationSecret) -> Self {
        Authenticator {
            secret,
            return_method: InstalledFlowReturnMethod::HTTPPortRedirect(DEFAULT_REDIRECT_PORT),
            flow_delegate: None,
        }
    }

    /// Replaces how the consent URL is presented and where its redirect
    /// lands.
    pub fn with_flow(
        mut self,
        return_method: InstalledFlowReturnMethod,
        flow_delegate: Box<dyn InstalledFlowDelegate>,
    ) -> Self {
        self.return_method = return_method;
        self.flow_delegate = Some(flow_delegate);
        self
    }

    pub async fn access_token(self, store: &CredentialStore) -> Result<String> {
        let mut builder = InstalledFlowAuthenticator::builder(self.secret, self.return_method)
            .with_storage(Box::new(store.clone()));
        if let Some(flow_delegate) = self.flow_delegate {
            builder = builder.flow_delegate(flow_delegate);
        }
        let auth = builder.build().await?;

        let token = auth.token(&[YOUTUBE_READONLY_SCOPE]).await?;
        token
            .token()
            .map(str::to_owned)
            .ok_or_else(|| Error::Auth("token endpoint returned no access_token".to_owned()))
    }
}
